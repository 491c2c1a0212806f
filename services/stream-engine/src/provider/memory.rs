//! In-process stream provider
//!
//! Behaves like the real provider from the engine's point of view: schema ids
//! are content hashes, registrations are remembered, writes are decoded with
//! the schema codec and returned in write order per publisher, and every
//! submission hands back a transaction hash that can be awaited.
//!
//! Failure injection hooks let tests exercise fetch and registration errors.

use std::collections::{HashMap, HashSet};
use std::sync::{Mutex, MutexGuard};

use async_trait::async_trait;
use sha2::{Digest, Sha256};
use tracing::debug;
use types::errors::ProviderError;
use types::field::RawFieldSet;
use types::ids::{SchemaId, TxHash};

use super::{DataItem, SchemaDefinition, StreamProvider};
use crate::codec::SchemaEncoder;

#[derive(Default)]
struct MemoryState {
    /// Schema texts by id, filled on compute or registration.
    known_schemas: HashMap<SchemaId, String>,
    registered: HashSet<SchemaId>,
    data: HashMap<(SchemaId, String), Vec<RawFieldSet>>,
    submitted: HashSet<TxHash>,
    tx_counter: u64,
    failing_fetches: usize,
    registration_error: Option<String>,
    fetch_calls: u64,
    set_calls: u64,
}

impl MemoryState {
    fn next_tx(&mut self) -> TxHash {
        self.tx_counter += 1;
        let tx = TxHash::new(format!("0x{:064x}", self.tx_counter));
        self.submitted.insert(tx.clone());
        tx
    }
}

/// [`StreamProvider`] keeping everything in memory.
pub struct InMemoryStreamProvider {
    /// Address that writes are attributed to.
    publisher: String,
    state: Mutex<MemoryState>,
}

impl InMemoryStreamProvider {
    pub fn new(publisher: impl Into<String>) -> Self {
        Self {
            publisher: publisher.into(),
            state: Mutex::new(MemoryState::default()),
        }
    }

    /// The address writes are stored under.
    pub fn publisher(&self) -> &str {
        &self.publisher
    }

    /// Schema id for a text, as computed by this provider.
    pub fn schema_id_for(schema: &str) -> SchemaId {
        let digest = Sha256::digest(schema.as_bytes());
        SchemaId::new(format!("0x{}", hex::encode(digest)))
    }

    /// Append a raw field set as if `publisher` had written it.
    pub fn insert_raw(&self, schema_id: &SchemaId, publisher: &str, fields: RawFieldSet) {
        self.lock()
            .data
            .entry((schema_id.clone(), publisher.to_string()))
            .or_default()
            .push(fields);
    }

    /// Make the next `count` fetches fail with a transport error.
    pub fn fail_next_fetches(&self, count: usize) {
        self.lock().failing_fetches = count;
    }

    /// Reject every registration with `message` until cleared with `None`.
    pub fn reject_registrations(&self, message: Option<&str>) {
        self.lock().registration_error = message.map(str::to_string);
    }

    pub fn is_registered(&self, schema_id: &SchemaId) -> bool {
        self.lock().registered.contains(schema_id)
    }

    pub fn fetch_calls(&self) -> u64 {
        self.lock().fetch_calls
    }

    pub fn set_calls(&self) -> u64 {
        self.lock().set_calls
    }

    fn lock(&self) -> MutexGuard<'_, MemoryState> {
        // A panic while holding the lock cannot leave the maps half-written.
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

#[async_trait]
impl StreamProvider for InMemoryStreamProvider {
    async fn compute_schema_id(&self, schema: &str) -> Result<SchemaId, ProviderError> {
        let id = Self::schema_id_for(schema);
        self.lock()
            .known_schemas
            .insert(id.clone(), schema.to_string());
        Ok(id)
    }

    async fn register_data_schemas(
        &self,
        schemas: &[SchemaDefinition],
        ignore_registered: bool,
    ) -> Result<Option<TxHash>, ProviderError> {
        let mut state = self.lock();
        if let Some(message) = &state.registration_error {
            return Err(ProviderError::rejected(message.clone()));
        }

        let mut pending = Vec::new();
        for def in schemas {
            let id = Self::schema_id_for(&def.schema);
            if state.registered.contains(&id) {
                if !ignore_registered {
                    return Err(ProviderError::rejected("SchemaAlreadyRegistered"));
                }
                continue;
            }
            pending.push((id, def.schema.clone()));
        }

        if pending.is_empty() {
            return Ok(None);
        }

        for (id, schema) in pending {
            debug!(schema_id = %id, "Registering schema");
            state.registered.insert(id.clone());
            state.known_schemas.insert(id, schema);
        }
        Ok(Some(state.next_tx()))
    }

    async fn set(&self, items: &[DataItem]) -> Result<TxHash, ProviderError> {
        let mut state = self.lock();
        state.set_calls += 1;

        let mut decoded = Vec::with_capacity(items.len());
        for item in items {
            let schema = state
                .known_schemas
                .get(&item.schema_id)
                .ok_or_else(|| ProviderError::rejected(format!("unknown schema {}", item.schema_id)))?;
            let encoder =
                SchemaEncoder::new(schema).map_err(|e| ProviderError::rejected(e.to_string()))?;
            let fields = encoder
                .decode_hex(&item.data)
                .map_err(|e| ProviderError::rejected(e.to_string()))?;
            decoded.push((item.schema_id.clone(), fields));
        }

        for (schema_id, fields) in decoded {
            state
                .data
                .entry((schema_id, self.publisher.clone()))
                .or_default()
                .push(fields);
        }
        Ok(state.next_tx())
    }

    async fn get_all_publisher_data_for_schema(
        &self,
        schema_id: &SchemaId,
        publisher: &str,
    ) -> Result<Vec<RawFieldSet>, ProviderError> {
        let mut state = self.lock();
        state.fetch_calls += 1;
        if state.failing_fetches > 0 {
            state.failing_fetches -= 1;
            return Err(ProviderError::Transport("injected fetch failure".to_string()));
        }

        Ok(state
            .data
            .get(&(schema_id.clone(), publisher.to_string()))
            .cloned()
            .unwrap_or_default())
    }

    async fn wait_for_confirmation(&self, tx: &TxHash) -> Result<(), ProviderError> {
        if self.lock().submitted.contains(tx) {
            Ok(())
        } else {
            Err(ProviderError::rejected(format!("unknown transaction {}", tx)))
        }
    }
}
