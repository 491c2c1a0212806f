//! Identifier types for stream entities
//!
//! Schema ids and transaction hashes are opaque `0x`-prefixed hex strings
//! handed out by the provider. Submission ids are generated locally from a
//! UUID v7, so they embed a millisecond timestamp and sort chronologically.

use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// All-zero bytes32, used as the parent of root schemas.
pub const ZERO_BYTES32: &str =
    "0x0000000000000000000000000000000000000000000000000000000000000000";

/// Byte width of a submission id.
pub const SUBMISSION_ID_BYTES: usize = 32;

/// Identifier of a registered data schema
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SchemaId(String);

impl SchemaId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// The zero schema id.
    pub fn zero() -> Self {
        Self(ZERO_BYTES32.to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SchemaId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Reference to a submitted transaction
///
/// Usable to wait for confirmation.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TxHash(String);

impl TxHash {
    pub fn new(hash: impl Into<String>) -> Self {
        Self(hash.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Whether this looks like a real transaction reference (`0x`-prefixed).
    pub fn is_transaction(&self) -> bool {
        self.0.starts_with("0x") && self.0.len() > 2
    }
}

impl fmt::Display for TxHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Unique id attached to each published data item
///
/// The 16 UUID v7 bytes, right-padded with zeros to 32 bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SubmissionId([u8; SUBMISSION_ID_BYTES]);

impl SubmissionId {
    /// Create a new SubmissionId with current timestamp
    pub fn new() -> Self {
        Self::from_uuid(Uuid::now_v7())
    }

    pub fn from_uuid(uuid: Uuid) -> Self {
        let mut bytes = [0u8; SUBMISSION_ID_BYTES];
        bytes[..16].copy_from_slice(uuid.as_bytes());
        Self(bytes)
    }

    pub fn as_bytes(&self) -> &[u8; SUBMISSION_ID_BYTES] {
        &self.0
    }

    /// `0x`-prefixed hex form used on the wire.
    pub fn to_hex(&self) -> String {
        format!("0x{}", hex::encode(self.0))
    }
}

impl Default for SubmissionId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for SubmissionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_hex())
    }
}

impl Serialize for SubmissionId {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_hex())
    }
}
