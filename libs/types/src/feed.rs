//! Live feed events

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::record::Record;

/// A record observed for the first time by the poll loop.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeedEvent {
    pub record: Record,
    /// Composite dedup key (`identity|score|duration`).
    pub key: String,
    pub observed_at: DateTime<Utc>,
}

impl FeedEvent {
    pub fn observe(record: Record) -> Self {
        Self::observe_at(record, Utc::now())
    }

    pub fn observe_at(record: Record, observed_at: DateTime<Utc>) -> Self {
        let key = record.key();
        Self {
            record,
            key,
            observed_at,
        }
    }
}
