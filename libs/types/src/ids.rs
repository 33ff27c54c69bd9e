//! Identifier types for esports entities
//!
//! The esports schedule and live stats feeds publish their identifiers as
//! decimal strings (`"102844412693683492"`). They are parsed once at the
//! roster boundary into numeric newtypes so the engine never compares raw
//! strings.

use serde::{Deserialize, Serialize};
use std::fmt;

macro_rules! esports_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(u64);

        impl $name {
            pub fn new(value: u64) -> Self {
                Self(value)
            }

            /// Parse the decimal string form used by the feeds.
            pub fn parse(value: &str) -> Option<Self> {
                value.trim().parse::<u64>().ok().map(Self)
            }

            pub fn as_u64(&self) -> u64 {
                self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl From<u64> for $name {
            fn from(value: u64) -> Self {
                Self(value)
            }
        }
    };
}

esports_id!(
    /// Identifier of a scheduled match (a series of one or more games)
    MatchId
);

esports_id!(
    /// Identifier of a single game within a match
    GameId
);

esports_id!(
    /// Identifier of an esports organisation's team
    TeamId
);

esports_id!(
    /// Identifier of an esports player, stable across games
    PlayerId
);

esports_id!(
    /// Identifier of a recorded broadcast (VOD)
    VodId
);

/// In-game participant slot
///
/// The live stats feed numbers the ten players of a game 1..=10; the slot
/// is only meaningful within one game.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ParticipantId(u8);

impl ParticipantId {
    pub fn new(slot: u8) -> Self {
        Self(slot)
    }

    pub fn as_u8(&self) -> u8 {
        self.0
    }
}

impl fmt::Display for ParticipantId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u8> for ParticipantId {
    fn from(slot: u8) -> Self {
        Self(slot)
    }
}
