//! Identity deduplication
//!
//! Folds a batch of decoded records into one best record per identity:
//! - records with an empty identity are skipped
//! - a record replaces the stored one only on a strictly higher score, so the
//!   first record seen wins a tie
//!
//! Iteration order is the order in which each identity was first seen.
//! Replacing an identity's record keeps its original position.

use std::collections::HashMap;

use tracing::debug;
use types::record::Record;

/// Outcome of offering a record to the table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Offer {
    /// First record for this identity.
    Inserted,
    /// Beat the stored score and replaced it.
    Replaced,
    /// Did not beat the stored score.
    Kept,
    /// No identity; never stored.
    Skipped,
}

/// Best record per identity, in first-seen order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BestRecordTable {
    entries: Vec<Record>,
    index: HashMap<String, usize>,
}

impl BestRecordTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Offer one record.
    pub fn offer(&mut self, record: Record) -> Offer {
        if !record.has_identity() {
            debug!("Skipping record without identity");
            return Offer::Skipped;
        }

        match self.index.get(&record.identity) {
            Some(&slot) => {
                if record.score > self.entries[slot].score {
                    self.entries[slot] = record;
                    Offer::Replaced
                } else {
                    Offer::Kept
                }
            }
            None => {
                self.index.insert(record.identity.clone(), self.entries.len());
                self.entries.push(record);
                Offer::Inserted
            }
        }
    }

    /// Best record stored for an identity.
    pub fn get(&self, identity: &str) -> Option<&Record> {
        self.index.get(identity).map(|&slot| &self.entries[slot])
    }

    /// Number of distinct identities.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entries in first-seen order.
    pub fn iter(&self) -> impl Iterator<Item = &Record> {
        self.entries.iter()
    }

    pub fn into_records(self) -> Vec<Record> {
        self.entries
    }
}

impl FromIterator<Record> for BestRecordTable {
    fn from_iter<I: IntoIterator<Item = Record>>(iter: I) -> Self {
        let mut table = BestRecordTable::new();
        for record in iter {
            table.offer(record);
        }
        table
    }
}

/// Keep only the highest-score record per identity.
pub fn best_by_identity(records: impl IntoIterator<Item = Record>) -> BestRecordTable {
    records.into_iter().collect()
}
