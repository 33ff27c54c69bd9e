//! Match metadata models
//!
//! A `Game` is assembled from the event details feed (teams, sides,
//! recordings) and completed from the first live stats window (patch and
//! participants). The engine reads the rosters from it and stamps the
//! recording end times when the game finishes.

use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::errors::RosterError;
use crate::ids::{GameId, MatchId, ParticipantId, PlayerId, TeamId, VodId};
use crate::side::Side;

/// Participant role
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Role {
    Top,
    Jungle,
    Mid,
    Bottom,
    Support,
}

impl FromStr for Role {
    type Err = RosterError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "top" => Ok(Role::Top),
            "jungle" => Ok(Role::Jungle),
            "mid" => Ok(Role::Mid),
            "bottom" => Ok(Role::Bottom),
            "support" => Ok(Role::Support),
            _ => Err(RosterError::UnknownRole(s.to_string())),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Participant {
    pub id: ParticipantId,
    pub player_id: PlayerId,
    pub champion: String,
    pub summoner_name: String,
    pub role: Role,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Team {
    pub id: TeamId,
    pub name: String,
    pub code: String,
    pub side: Side,
    pub participants: Vec<Participant>,
}

/// A broadcast recording of the game.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Vod {
    pub id: VodId,
    pub platform: String,
    pub parameter: String,
    pub locale: String,
    /// Position of the game start within the recording, in milliseconds
    pub start_time_ms: i64,
    /// Position of the game end within the recording, set at game end
    pub end_time_ms: Option<i64>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Metadata {
    pub match_id: MatchId,
    pub game_id: GameId,
    pub patch: String,
    pub teams: Vec<Team>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Game {
    pub metadata: Metadata,
    /// Width of the event time buckets, in seconds
    pub bucket_interval_secs: u64,
    pub vods: Vec<Vod>,
}

impl Game {
    pub fn game_id(&self) -> GameId {
        self.metadata.game_id
    }

    pub fn match_id(&self) -> MatchId {
        self.metadata.match_id
    }

    /// The team playing on `side`.
    pub fn team(&self, side: Side) -> Result<&Team, RosterError> {
        self.metadata
            .teams
            .iter()
            .find(|t| t.side == side)
            .ok_or(RosterError::MissingTeam { side })
    }

    pub fn team_by_id_mut(&mut self, team_id: TeamId) -> Option<&mut Team> {
        self.metadata.teams.iter_mut().find(|t| t.id == team_id)
    }
}
