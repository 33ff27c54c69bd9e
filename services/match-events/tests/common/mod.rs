//! Shared fixtures: a scripted game whose frames carry cumulative counters
//! the way the live feed does.

#![allow(dead_code)]

use match_events::engine::MatchEngine;
use match_events::state::State;
use match_types::event::{Event, Scenario};
use match_types::feed::{
    EventDetails, Frame, GameDetails, GameMetadata, GameTeamDetails, MatchDetails,
    ParticipantFrame, ParticipantMetadata, TeamDetails, TeamFrame, TeamMetadata, VodDetails,
    WindowResponse, IN_GAME,
};
use match_types::game::{Game, Metadata, Participant, Role, Team};
use match_types::ids::{GameId, MatchId, ParticipantId, PlayerId, TeamId};
use match_types::side::Side;
use match_types::time::{parse_timestamp, secs};

pub const T0: &str = "2021-09-05T08:00:00Z";
pub const MAX_HEALTH: u32 = 600;
pub const BLUE_TEAM: u64 = 100;
pub const RED_TEAM: u64 = 600;

const ROLES: [Role; 5] = [Role::Top, Role::Jungle, Role::Mid, Role::Bottom, Role::Support];
const ROLE_NAMES: [&str; 5] = ["top", "jungle", "mid", "bottom", "support"];

pub fn init_time() -> i64 {
    parse_timestamp(T0).unwrap()
}

fn side_of(slot: u8) -> Side {
    if slot <= 5 {
        Side::Blue
    } else {
        Side::Red
    }
}

fn first_slot(side: Side) -> u8 {
    match side {
        Side::Blue => 1,
        Side::Red => 6,
    }
}

fn team_id(side: Side) -> u64 {
    match side {
        Side::Blue => BLUE_TEAM,
        Side::Red => RED_TEAM,
    }
}

pub fn game(match_id: u64, game_id: u64) -> Game {
    let team = |side: Side| Team {
        id: TeamId::new(team_id(side)),
        name: format!("{} team", side),
        code: side.as_str().to_string(),
        side,
        participants: (0..5u8)
            .map(|i| Participant {
                id: ParticipantId::new(first_slot(side) + i),
                player_id: PlayerId::new(1000 + u64::from(first_slot(side) + i)),
                champion: "Ahri".to_string(),
                summoner_name: format!("player{}", first_slot(side) + i),
                role: ROLES[i as usize],
            })
            .collect(),
    };

    Game {
        metadata: Metadata {
            match_id: MatchId::new(match_id),
            game_id: GameId::new(game_id),
            patch: "11.17".to_string(),
            teams: vec![team(Side::Blue), team(Side::Red)],
        },
        bucket_interval_secs: 30,
        vods: Vec::new(),
    }
}

pub fn engine() -> MatchEngine {
    MatchEngine::new(game(1, 2), init_time()).unwrap()
}

/// Event details of a one-game match, as the schedule feed reports it.
pub fn event_details(match_id: u64, game_id: u64) -> EventDetails {
    let team = |side: Side| TeamDetails {
        id: team_id(side).to_string(),
        name: format!("{} team", side),
        code: side.as_str().to_string(),
    };
    let entry = |side: Side| GameTeamDetails {
        id: team_id(side).to_string(),
        side: side.as_str().to_lowercase(),
    };
    EventDetails {
        id: match_id.to_string(),
        match_details: MatchDetails {
            teams: vec![team(Side::Blue), team(Side::Red)],
            games: vec![GameDetails {
                id: game_id.to_string(),
                state: "completed".to_string(),
                teams: vec![entry(Side::Blue), entry(Side::Red)],
                vods: vec![VodDetails {
                    id: "7".to_string(),
                    parameter: "abc".to_string(),
                    locale: "en-US".to_string(),
                    provider: "youtube".to_string(),
                    offset: -60_000,
                }],
            }],
        },
    }
}

/// A captured window carrying the game metadata and `frames`.
pub fn window(match_id: u64, game_id: u64, frames: Vec<Frame>) -> WindowResponse {
    let team = |side: Side| TeamMetadata {
        esports_team_id: team_id(side).to_string(),
        participant_metadata: (0..5u8)
            .map(|i| ParticipantMetadata {
                participant_id: ParticipantId::new(first_slot(side) + i),
                esports_player_id: (1000 + u64::from(first_slot(side) + i)).to_string(),
                summoner_name: format!("player{}", first_slot(side) + i),
                champion_id: "Ahri".to_string(),
                role: ROLE_NAMES[i as usize].to_string(),
            })
            .collect(),
    };
    WindowResponse {
        esports_game_id: game_id.to_string(),
        esports_match_id: match_id.to_string(),
        game_metadata: GameMetadata {
            patch_version: "11.17".to_string(),
            blue_team_metadata: team(Side::Blue),
            red_team_metadata: team(Side::Red),
        },
        frames,
    }
}

/// Scripted game state. Mutators change the cumulative counters; `at`
/// stamps the current state as a frame.
#[derive(Debug, Clone)]
pub struct Sim {
    frame: Frame,
}

impl Default for Sim {
    fn default() -> Self {
        Self::new()
    }
}

impl Sim {
    pub fn new() -> Self {
        let team = |side: Side| TeamFrame {
            towers: 0,
            inhibitors: 0,
            barons: 0,
            dragons: Vec::new(),
            participants: (0..5u8)
                .map(|i| ParticipantFrame {
                    participant_id: ParticipantId::new(first_slot(side) + i),
                    kills: 0,
                    deaths: 0,
                    current_health: MAX_HEALTH,
                    max_health: MAX_HEALTH,
                })
                .collect(),
        };
        Self {
            frame: Frame {
                rfc460_timestamp: T0.to_string(),
                game_state: IN_GAME.to_string(),
                blue_team: team(Side::Blue),
                red_team: team(Side::Red),
            },
        }
    }

    pub fn team(&mut self, side: Side) -> &mut TeamFrame {
        match side {
            Side::Blue => &mut self.frame.blue_team,
            Side::Red => &mut self.frame.red_team,
        }
    }

    pub fn participant(&mut self, slot: u8) -> &mut ParticipantFrame {
        let index = (slot - first_slot(side_of(slot))) as usize;
        &mut self.team(side_of(slot)).participants[index]
    }

    /// `killer` scores a kill on `victim`.
    pub fn kill(&mut self, killer: u8, victim: u8) -> &mut Self {
        self.participant(killer).kills += 1;
        self.die(victim)
    }

    /// `slot` dies (no kill credited to anyone by this call).
    pub fn die(&mut self, slot: u8) -> &mut Self {
        let p = self.participant(slot);
        p.deaths += 1;
        p.current_health = 0;
        self
    }

    pub fn respawn(&mut self, slot: u8) -> &mut Self {
        let p = self.participant(slot);
        p.current_health = p.max_health;
        self
    }

    pub fn respawn_all(&mut self) -> &mut Self {
        for slot in 1..=10 {
            self.respawn(slot);
        }
        self
    }

    pub fn towers(&mut self, side: Side, count: u32) -> &mut Self {
        self.team(side).towers += count;
        self
    }

    pub fn inhibitors(&mut self, side: Side, count: u32) -> &mut Self {
        self.team(side).inhibitors += count;
        self
    }

    pub fn barons(&mut self, side: Side, count: u32) -> &mut Self {
        self.team(side).barons += count;
        self
    }

    pub fn dragons(&mut self, side: Side, count: u32) -> &mut Self {
        for _ in 0..count {
            self.team(side).dragons.push("infernal".to_string());
        }
        self
    }

    /// The current state as a frame `offset_secs` into the game.
    pub fn at(&mut self, offset_secs: u32) -> Frame {
        self.frame.rfc460_timestamp = format!(
            "2021-09-05T{:02}:{:02}:{:02}Z",
            8 + offset_secs / 3600,
            (offset_secs / 60) % 60,
            offset_secs % 60
        );
        self.frame.clone()
    }

    /// The current state as the terminal frame.
    pub fn finish(&mut self, offset_secs: u32) -> Frame {
        self.frame.game_state = "finished".to_string();
        self.at(offset_secs)
    }
}

/// Apply a frame and return the events it produced.
pub fn step(engine: &mut MatchEngine, frame: &Frame) -> Vec<Event> {
    engine
        .update(frame)
        .unwrap()
        .snapshot
        .map(|s| s.events)
        .unwrap_or_default()
}

pub fn scenarios(events: &[Event]) -> Vec<Scenario> {
    events.iter().map(|e| e.scenario).collect()
}

/// Offset in nanoseconds of `offset_secs` into the game.
pub fn game_time(offset_secs: u32) -> i64 {
    secs(i64::from(offset_secs))
}
