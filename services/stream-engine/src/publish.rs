//! Publish pipeline
//!
//! validate → encode → stamp submission id → submit.
//!
//! Validation happens before any encoding or provider call, so a bad request
//! never costs a round trip.

use std::sync::Arc;

use serde::Deserialize;
use serde_json::Value;
use tracing::{error, info};
use types::errors::{CodecError, PublishError};
use types::ids::{SubmissionId, TxHash};
use types::record::Record;
use types::uint::Uint256;

use crate::codec::{FieldValue, SchemaEncoder};
use crate::provider::{DataItem, StreamProvider};
use crate::schema::SchemaHandle;

/// Message returned when a required field is absent.
pub const MISSING_FIELDS: &str = "Missing player, score, or playTime";

/// Inbound publish body. Every field is optional so absence can be reported
/// as a client error instead of a parse failure.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PublishRequest {
    #[serde(default)]
    pub player: Option<String>,
    #[serde(default)]
    pub score: Option<Value>,
    #[serde(default)]
    pub play_time: Option<Value>,
}

/// A successful submission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Published {
    pub tx_hash: TxHash,
    pub submission_id: SubmissionId,
    pub record: Record,
}

/// Check presence and integer-ness of every field.
pub fn validate(request: &PublishRequest) -> Result<Record, PublishError> {
    let player = request.player.as_deref().filter(|p| !p.is_empty());
    let score = request.score.as_ref().filter(|v| !v.is_null());
    let play_time = request.play_time.as_ref().filter(|v| !v.is_null());

    let (player, score, play_time) = match (player, score, play_time) {
        (Some(player), Some(score), Some(play_time)) => (player, score, play_time),
        _ => return Err(PublishError::ClientInput(MISSING_FIELDS.to_string())),
    };

    let integer = |name: &str, value: &Value| {
        Uint256::from_json(value)
            .map_err(|e| PublishError::ClientInput(format!("Invalid {}: {}", name, e)))
    };

    Ok(Record::new(
        player,
        integer("score", score)?,
        integer("playTime", play_time)?,
    ))
}

/// Encodes and submits records for one schema.
pub struct Publisher {
    provider: Arc<dyn StreamProvider>,
    schema: Arc<SchemaHandle>,
    encoder: SchemaEncoder,
}

impl Publisher {
    pub fn new(
        provider: Arc<dyn StreamProvider>,
        schema: Arc<SchemaHandle>,
    ) -> Result<Self, CodecError> {
        let encoder = SchemaEncoder::new(&schema.definition().schema)?;
        Ok(Self {
            provider,
            schema,
            encoder,
        })
    }

    /// Validate, encode and submit one record.
    pub async fn publish(&self, request: &PublishRequest) -> Result<Published, PublishError> {
        let record = validate(request)?;

        let data = self.encoder.encode_hex(&[
            FieldValue::address(&record.identity)?,
            FieldValue::Uint(record.score),
            FieldValue::Uint(record.duration),
        ])?;

        let schema_id = self.schema.schema_id().await?;
        let submission_id = SubmissionId::new();
        let item = DataItem {
            id: submission_id,
            schema_id,
            data,
        };

        let tx_hash = self.provider.set(std::slice::from_ref(&item)).await.map_err(|e| {
            error!(player = %record.identity, error = %e, "Publish failed");
            e
        })?;

        info!(
            player = %record.identity,
            score = %record.score,
            play_time = %record.duration,
            tx = %tx_hash,
            "Published"
        );

        Ok(Published {
            tx_hash,
            submission_id,
            record,
        })
    }
}
