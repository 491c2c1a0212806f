//! External stream provider seam
//!
//! Everything that touches the ledger goes through [`StreamProvider`]:
//! schema id computation, schema registration, data writes, data reads and
//! confirmation waits. Two implementations ship with the engine:
//! - [`HttpStreamProvider`]: JSON client for the stream bridge sidecar
//! - [`InMemoryStreamProvider`]: in-process provider for tests and local runs

use std::str::FromStr;
use std::sync::Arc;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use types::errors::ProviderError;
use types::field::RawFieldSet;
use types::ids::{SchemaId, SubmissionId, TxHash};

use crate::codec::{PLAYER_SCHEMA, PLAYER_SCHEMA_NAME};

pub mod http;
pub mod memory;

pub use http::HttpStreamProvider;
pub use memory::InMemoryStreamProvider;

/// A schema submitted for registration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SchemaDefinition {
    pub id: String,
    pub schema: String,
    pub parent_schema_id: SchemaId,
}

impl SchemaDefinition {
    /// Root definition of the player score schema.
    pub fn player() -> Self {
        Self {
            id: PLAYER_SCHEMA_NAME.to_string(),
            schema: PLAYER_SCHEMA.to_string(),
            parent_schema_id: SchemaId::zero(),
        }
    }
}

/// One encoded item to write.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DataItem {
    pub id: SubmissionId,
    pub schema_id: SchemaId,
    /// `0x`-hex encoded payload.
    pub data: String,
}

/// Read/write access to the external data stream.
///
/// All calls may suspend; none of them hold engine state across the await.
#[async_trait]
pub trait StreamProvider: Send + Sync {
    /// Deterministic id for a schema text.
    async fn compute_schema_id(&self, schema: &str) -> Result<SchemaId, ProviderError>;

    /// Register schemas. `None` means there was nothing to submit.
    async fn register_data_schemas(
        &self,
        schemas: &[SchemaDefinition],
        ignore_registered: bool,
    ) -> Result<Option<TxHash>, ProviderError>;

    /// Write encoded items.
    async fn set(&self, items: &[DataItem]) -> Result<TxHash, ProviderError>;

    /// Every item a publisher has written for a schema, in write order.
    async fn get_all_publisher_data_for_schema(
        &self,
        schema_id: &SchemaId,
        publisher: &str,
    ) -> Result<Vec<RawFieldSet>, ProviderError>;

    /// Block until a submission is confirmed.
    async fn wait_for_confirmation(&self, tx: &TxHash) -> Result<(), ProviderError>;
}

/// Which provider implementation a process talks to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProviderKind {
    /// The stream bridge over HTTP.
    Http,
    /// In-process storage; data lives only as long as the process.
    Memory,
}

impl FromStr for ProviderKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "http" => Ok(ProviderKind::Http),
            "memory" => Ok(ProviderKind::Memory),
            other => Err(format!("unknown stream provider: {}", other)),
        }
    }
}

impl ProviderKind {
    /// Build the provider.
    ///
    /// `credential` signs HTTP writes; the in-memory provider attributes its
    /// writes to `publisher`.
    pub fn connect(
        self,
        bridge_url: &str,
        credential: Option<String>,
        publisher: &str,
    ) -> Arc<dyn StreamProvider> {
        match self {
            ProviderKind::Http => Arc::new(HttpStreamProvider::new(bridge_url, credential)),
            ProviderKind::Memory => Arc::new(InMemoryStreamProvider::new(publisher)),
        }
    }

    /// Whether writes can succeed with the given credential.
    pub fn can_write(self, credential: Option<&str>) -> bool {
        match self {
            ProviderKind::Http => credential.is_some(),
            ProviderKind::Memory => true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_provider_kind_parsing() {
        assert_eq!("http".parse::<ProviderKind>(), Ok(ProviderKind::Http));
        assert_eq!(" Memory ".parse::<ProviderKind>(), Ok(ProviderKind::Memory));
        assert!("grpc".parse::<ProviderKind>().is_err());
    }

    #[test]
    fn test_can_write() {
        assert!(!ProviderKind::Http.can_write(None));
        assert!(ProviderKind::Http.can_write(Some("key")));
        assert!(ProviderKind::Memory.can_write(None));
    }

    #[test]
    fn test_player_definition_is_root() {
        let def = SchemaDefinition::player();
        assert_eq!(def.id, "player_score");
        assert_eq!(def.parent_schema_id, SchemaId::zero());
        let json = serde_json::to_value(&def).unwrap();
        assert!(json.get("parentSchemaId").is_some());
    }
}
