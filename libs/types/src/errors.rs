//! Error types for the event engine
//!
//! Comprehensive error taxonomy using thiserror

use thiserror::Error;

use crate::ids::ParticipantId;
use crate::side::Side;

/// Top-level engine error
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EngineError {
    #[error("Frame error: {0}")]
    Frame(#[from] FrameError),

    #[error("Roster error: {0}")]
    Roster(#[from] RosterError),

    #[error("Match already finished with status {status}")]
    MatchFinished { status: String },
}

/// Malformed or out-of-order input frames
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FrameError {
    #[error("Unknown participant {participant_id} on side {side}")]
    UnknownParticipant {
        side: Side,
        participant_id: ParticipantId,
    },

    #[error("Participant {participant_id} on side {side} missing from frame")]
    MissingParticipant {
        side: Side,
        participant_id: ParticipantId,
    },

    #[error("Counter {counter} of participant {participant_id} went backwards: {previous} -> {current}")]
    CounterRegression {
        participant_id: ParticipantId,
        counter: &'static str,
        previous: u32,
        current: u32,
    },

    #[error("Out-of-order frame: {received} is earlier than {last}")]
    OutOfOrder { last: i64, received: i64 },

    #[error("Invalid timestamp: {0}")]
    InvalidTimestamp(String),
}

/// Roster correlation errors. These are configuration errors and are never
/// retried.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RosterError {
    #[error("Unknown team: {team_id}")]
    UnknownTeam { team_id: String },

    #[error("No side assigned to team {team_id}")]
    MissingSide { team_id: String },

    #[error("Unknown side: {0}")]
    UnknownSide(String),

    #[error("No team playing on side {side}")]
    MissingTeam { side: Side },

    #[error("Invalid {field}: {value}")]
    InvalidId { field: &'static str, value: String },

    #[error("Unknown role: {0}")]
    UnknownRole(String),

    #[error("Game index {index} out of range ({games} games)")]
    GameIndexOutOfRange { index: usize, games: usize },
}
