//! Types library for live match event derivation
//!
//! Shared definitions between the event engine and its feed drivers: the
//! records the live stats feed delivers, the match metadata built from
//! them, and the events the engine emits.
//!
//! # Modules
//! - `ids`: Identifiers (MatchId, GameId, TeamId, PlayerId, ParticipantId)
//! - `side`: The two map sides
//! - `event`: Scenario tags, events and per-update snapshots
//! - `feed`: Wire records of the live stats and event-details feeds
//! - `game`: Match metadata (teams, participants, recordings)
//! - `time`: Feed timestamp parsing and window time formatting
//! - `errors`: Error taxonomy

pub mod ids;
pub mod side;
pub mod event;
pub mod feed;
pub mod game;
pub mod time;
pub mod errors;

// Library version constant
pub const LIB_VERSION: &str = "1.0.0";

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::ids::*;
    pub use crate::side::*;
    pub use crate::event::*;
    pub use crate::feed::*;
    pub use crate::game::*;
    pub use crate::errors::*;
}
