//! Types library for the score stream leaderboard
//!
//! Shared type definitions used by the stream engine, the HTTP gateway and
//! the live-feed subscriber. Everything here is pure data: no I/O, no clocks
//! beyond id generation.
//!
//! # Modules
//! - `uint`: 256-bit unsigned integer for scores and durations
//! - `ids`: Identifiers (SchemaId, TxHash, SubmissionId)
//! - `field`: Raw, provider-shaped field sets
//! - `record`: Decoded `{identity, score, duration}` records
//! - `leaderboard`: Ranked snapshot types
//! - `feed`: Live feed events
//! - `errors`: Error taxonomy

// Public modules
pub mod uint;
pub mod ids;
pub mod field;
pub mod record;
pub mod leaderboard;
pub mod feed;
pub mod errors;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::uint::*;
    pub use crate::ids::*;
    pub use crate::field::*;
    pub use crate::record::*;
    pub use crate::leaderboard::*;
    pub use crate::feed::*;
    pub use crate::errors::*;
}
