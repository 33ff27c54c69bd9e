//! Wire records of the upstream feeds
//!
//! Two feeds are consumed:
//! - the live stats *window* feed, which returns the game metadata plus a
//!   short run of frames starting at a requested time;
//! - the *event details* feed, which describes a scheduled match, its teams,
//!   its games and their recordings.
//!
//! Only the fields the engine needs are modeled; unknown fields are ignored.
//! Missing required fields fail deserialization: counters are never
//! defaulted.

use serde::{Deserialize, Serialize};

use crate::errors::FrameError;
use crate::ids::ParticipantId;
use crate::side::Side;
use crate::time;

/// Game state string the feed reports while the game is running.
pub const IN_GAME: &str = "in_game";

/// One response of the live stats window feed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WindowResponse {
    pub esports_game_id: String,
    pub esports_match_id: String,
    pub game_metadata: GameMetadata,
    #[serde(default)]
    pub frames: Vec<Frame>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GameMetadata {
    pub patch_version: String,
    pub blue_team_metadata: TeamMetadata,
    pub red_team_metadata: TeamMetadata,
}

impl GameMetadata {
    pub fn team(&self, side: Side) -> &TeamMetadata {
        match side {
            Side::Blue => &self.blue_team_metadata,
            Side::Red => &self.red_team_metadata,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TeamMetadata {
    pub esports_team_id: String,
    pub participant_metadata: Vec<ParticipantMetadata>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ParticipantMetadata {
    pub participant_id: ParticipantId,
    pub esports_player_id: String,
    pub summoner_name: String,
    pub champion_id: String,
    pub role: String,
}

/// A timestamped snapshot of the whole game's counters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Frame {
    pub rfc460_timestamp: String,
    pub game_state: String,
    pub blue_team: TeamFrame,
    pub red_team: TeamFrame,
}

impl Frame {
    /// Frame time in Unix nanoseconds.
    pub fn timestamp(&self) -> Result<i64, FrameError> {
        time::parse_timestamp(&self.rfc460_timestamp)
    }

    pub fn is_in_game(&self) -> bool {
        self.game_state == IN_GAME
    }

    pub fn team(&self, side: Side) -> &TeamFrame {
        match side {
            Side::Blue => &self.blue_team,
            Side::Red => &self.red_team,
        }
    }
}

/// Cumulative team counters within a frame.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TeamFrame {
    pub towers: u32,
    pub inhibitors: u32,
    pub barons: u32,
    /// One entry (the dragon type) per dragon taken so far
    pub dragons: Vec<String>,
    pub participants: Vec<ParticipantFrame>,
}

/// Cumulative participant counters within a frame.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ParticipantFrame {
    pub participant_id: ParticipantId,
    pub kills: u32,
    pub deaths: u32,
    pub current_health: u32,
    pub max_health: u32,
}

/// Root of the event details feed (a scheduled match).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventDetails {
    pub id: String,
    #[serde(rename = "match")]
    pub match_details: MatchDetails,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchDetails {
    pub teams: Vec<TeamDetails>,
    pub games: Vec<GameDetails>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TeamDetails {
    pub id: String,
    pub name: String,
    pub code: String,
}

/// Game states reported by the event details feed.
pub const GAME_COMPLETED: &str = "completed";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameDetails {
    pub id: String,
    pub state: String,
    pub teams: Vec<GameTeamDetails>,
    #[serde(default)]
    pub vods: Vec<VodDetails>,
}

impl GameDetails {
    pub fn is_completed(&self) -> bool {
        self.state == GAME_COMPLETED
    }
}

/// Side assignment of a team for one game.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameTeamDetails {
    pub id: String,
    pub side: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VodDetails {
    pub id: String,
    pub parameter: String,
    pub locale: String,
    pub provider: String,
    /// Milliseconds between the recording start and the game start; zero
    /// when the offset is unknown
    pub offset: i64,
}

#[cfg(test)]
mod tests {
    use super::*;

    const FRAME_JSON: &str = r#"{
        "rfc460Timestamp": "2021-09-05T08:12:37.409Z",
        "gameState": "in_game",
        "blueTeam": {
            "totalGold": 2500, "inhibitors": 0, "towers": 1, "barons": 0,
            "totalKills": 1, "dragons": ["ocean"],
            "participants": [
                {"participantId": 1, "totalGold": 500, "level": 1, "kills": 1,
                 "deaths": 0, "assists": 0, "creepScore": 0,
                 "currentHealth": 600, "maxHealth": 600}
            ]
        },
        "redTeam": {
            "totalGold": 2500, "inhibitors": 0, "towers": 0, "barons": 0,
            "totalKills": 0, "dragons": [],
            "participants": [
                {"participantId": 6, "totalGold": 500, "level": 1, "kills": 0,
                 "deaths": 1, "assists": 0, "creepScore": 0,
                 "currentHealth": 0, "maxHealth": 620}
            ]
        }
    }"#;

    #[test]
    fn test_frame_deserialization() {
        let frame: Frame = serde_json::from_str(FRAME_JSON).unwrap();
        assert!(frame.is_in_game());
        assert_eq!(frame.team(Side::Blue).towers, 1);
        assert_eq!(frame.team(Side::Blue).dragons.len(), 1);
        assert_eq!(frame.team(Side::Red).participants[0].deaths, 1);
        assert_eq!(frame.timestamp().unwrap(), 1_630_829_557_409_000_000);
    }

    #[test]
    fn test_frame_missing_counter_is_rejected() {
        let broken = FRAME_JSON.replace("\"deaths\": 1,", "");
        let result: Result<Frame, _> = serde_json::from_str(&broken);
        assert!(result.is_err(), "missing counters must not be defaulted");
    }

    #[test]
    fn test_event_details_deserialization() {
        let json = r#"{
            "id": "102844412694338854",
            "match": {
                "teams": [
                    {"id": "98767991853197861", "name": "T1", "code": "T1"},
                    {"id": "98767991877340524", "name": "Cloud9", "code": "C9"}
                ],
                "games": [{
                    "id": "102844412694338855",
                    "state": "completed",
                    "teams": [
                        {"id": "98767991853197861", "side": "blue"},
                        {"id": "98767991877340524", "side": "red"}
                    ],
                    "vods": [{"id": "1", "parameter": "abc", "locale": "en-US",
                              "provider": "youtube", "offset": -123000}]
                }]
            }
        }"#;
        let details: EventDetails = serde_json::from_str(json).unwrap();
        assert_eq!(details.match_details.teams.len(), 2);
        assert!(details.match_details.games[0].is_completed());
        assert_eq!(details.match_details.games[0].vods[0].offset, -123000);
    }
}
