//! Score Stream Engine
//!
//! Turns the raw, unordered, possibly repeating field sets a publisher has
//! written to the data stream into:
//! - a deterministic best-score leaderboard per player
//! - a duplicate-free live feed of newly observed scores
//!
//! and encodes/submits new scores on the way in.
//!
//! # Architecture
//!
//! ```text
//!   Publisher ──► codec ──► StreamProvider (external)
//!                                 │
//!                 ┌───────────────┴───────────────┐
//!                 │                               │
//!             ┌───▼────┐                      ┌───▼────┐
//!             │Decoder │                      │Decoder │
//!             └───┬────┘                      └───┬────┘
//!             ┌───▼────┐                      ┌───▼────┐
//!             │ Dedup  │  best per player     │SeenSet │  new keys only
//!             └───┬────┘                      └───┬────┘
//!             ┌───▼────┐                      ┌───▼────┐
//!             │ Ranker │                      │  Sink  │
//!             └────────┘                      └────────┘
//!          on-demand snapshot                poll loop feed
//! ```

pub mod codec;
pub mod decoder;
pub mod dedup;
pub mod feed;
pub mod leaderboard;
pub mod provider;
pub mod publish;
pub mod ranker;
pub mod schema;

// Library version
pub const SERVICE_VERSION: &str = "0.1.0";
