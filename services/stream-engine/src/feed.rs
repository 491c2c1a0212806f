//! Live feed poll loop
//!
//! On every tick the poller fetches the publisher's full history, decodes
//! each item and emits the ones whose `identity|score|duration` key it has
//! not seen before. Keys are remembered for the life of the poller, so an
//! item is emitted once no matter how many polls return it.
//!
//! A failed fetch is logged and the loop waits for the next tick. Cycles never
//! overlap: a slow cycle delays the next one instead of running beside it.

use std::collections::{HashSet, VecDeque};
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::mpsc;
use tokio::time::{interval_at, Instant, MissedTickBehavior};
use tracing::{debug, error, info};
use types::errors::ProviderError;
use types::feed::FeedEvent;

use crate::decoder::decode_record;
use crate::provider::StreamProvider;
use crate::schema::SchemaHandle;

/// Default time between polls.
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_millis(3000);

/// Configuration for the feed poller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeedConfig {
    pub poll_interval: Duration,
    /// Maximum number of remembered keys; `None` or zero never forgets.
    pub seen_capacity: Option<usize>,
}

impl Default for FeedConfig {
    fn default() -> Self {
        Self {
            poll_interval: DEFAULT_POLL_INTERVAL,
            seen_capacity: None,
        }
    }
}

/// Keys already emitted.
///
/// Unbounded by default. With a capacity, the oldest key is evicted first and
/// may be emitted again if it reappears.
#[derive(Debug, Clone, Default)]
pub struct SeenSet {
    keys: HashSet<String>,
    /// Insertion order, only tracked when bounded.
    order: VecDeque<String>,
    capacity: Option<usize>,
}

impl SeenSet {
    /// A capacity of zero would remember nothing, so it is treated as unbounded.
    pub fn new(capacity: Option<usize>) -> Self {
        Self {
            keys: HashSet::new(),
            order: VecDeque::new(),
            capacity: capacity.filter(|&c| c > 0),
        }
    }

    /// Insert a key; `true` if it was not present.
    pub fn insert(&mut self, key: &str) -> bool {
        if self.keys.contains(key) {
            return false;
        }

        if let Some(capacity) = self.capacity {
            if self.order.len() >= capacity {
                if let Some(evicted) = self.order.pop_front() {
                    self.keys.remove(&evicted);
                }
            }
            self.order.push_back(key.to_string());
        }
        self.keys.insert(key.to_string());
        true
    }

    pub fn contains(&self, key: &str) -> bool {
        self.keys.contains(key)
    }

    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }
}

/// Destination for newly observed events.
pub trait FeedSink: Send {
    fn emit(&mut self, event: FeedEvent);
}

/// Writes one log line per event.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogSink;

impl FeedSink for LogSink {
    fn emit(&mut self, event: FeedEvent) {
        info!(
            player = %event.record.identity,
            score = %event.record.score,
            play_time = %event.record.duration,
            "New score"
        );
    }
}

impl FeedSink for mpsc::UnboundedSender<FeedEvent> {
    fn emit(&mut self, event: FeedEvent) {
        if self.send(event).is_err() {
            debug!("Feed receiver dropped, discarding event");
        }
    }
}

impl FeedSink for Vec<FeedEvent> {
    fn emit(&mut self, event: FeedEvent) {
        self.push(event);
    }
}

/// Poller counters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FeedStats {
    pub cycles: u64,
    pub fetch_failures: u64,
    pub events_emitted: u64,
    pub duplicates_dropped: u64,
}

/// Fetch-decode-dedupe loop for one schema and publisher.
pub struct FeedPoller<S: FeedSink> {
    provider: Arc<dyn StreamProvider>,
    schema: Arc<SchemaHandle>,
    publisher: String,
    seen: SeenSet,
    sink: S,
    config: FeedConfig,
    stats: FeedStats,
}

impl<S: FeedSink> FeedPoller<S> {
    pub fn new(
        provider: Arc<dyn StreamProvider>,
        schema: Arc<SchemaHandle>,
        publisher: impl Into<String>,
        sink: S,
        config: FeedConfig,
    ) -> Self {
        info!(
            poll_interval_ms = config.poll_interval.as_millis() as u64,
            seen_capacity = ?config.seen_capacity,
            "FeedPoller initialized"
        );

        Self {
            provider,
            schema,
            publisher: publisher.into(),
            seen: SeenSet::new(config.seen_capacity),
            sink,
            config,
            stats: FeedStats::default(),
        }
    }

    /// Run one cycle. Returns the number of events emitted.
    pub async fn poll_once(&mut self) -> Result<usize, ProviderError> {
        self.stats.cycles += 1;

        let schema_id = self.schema.schema_id().await?;
        let items = self
            .provider
            .get_all_publisher_data_for_schema(&schema_id, &self.publisher)
            .await?;

        let mut emitted = 0;
        for fields in &items {
            let record = decode_record(fields);
            let key = record.key();
            if !self.seen.insert(&key) {
                self.stats.duplicates_dropped += 1;
                continue;
            }
            self.sink.emit(FeedEvent::observe(record));
            emitted += 1;
        }

        self.stats.events_emitted += emitted as u64;
        debug!(
            items = items.len(),
            emitted,
            seen = self.seen.len(),
            "Feed cycle complete"
        );
        Ok(emitted)
    }

    /// Poll forever. The first poll happens one interval after start.
    pub async fn run(mut self) {
        let period = self.config.poll_interval;
        let mut ticker = interval_at(Instant::now() + period, period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            ticker.tick().await;
            if let Err(e) = self.poll_once().await {
                self.stats.fetch_failures += 1;
                error!(
                    publisher = %self.publisher,
                    error = %e,
                    failures = self.stats.fetch_failures,
                    "Feed poll failed, retrying next tick"
                );
            }
        }
    }

    pub fn stats(&self) -> FeedStats {
        self.stats
    }

    pub fn seen(&self) -> &SeenSet {
        &self.seen
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }
}
