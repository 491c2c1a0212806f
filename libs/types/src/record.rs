//! Decoded stream records

use serde::{Deserialize, Serialize};

use crate::uint::Uint256;

/// One decoded `{identity, score, duration}` event.
///
/// Serialized with the stream's field names (`player`, `score`, `playTime`).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Record {
    #[serde(rename = "player")]
    pub identity: String,
    pub score: Uint256,
    #[serde(rename = "playTime")]
    pub duration: Uint256,
}

impl Record {
    pub fn new(identity: impl Into<String>, score: Uint256, duration: Uint256) -> Self {
        Self {
            identity: identity.into(),
            score,
            duration,
        }
    }

    /// Records without an identity never enter aggregation.
    pub fn has_identity(&self) -> bool {
        !self.identity.is_empty()
    }

    /// Composite `identity|score|duration` key used for feed dedup.
    pub fn key(&self) -> String {
        format!("{}|{}|{}", self.identity, self.score, self.duration)
    }
}
