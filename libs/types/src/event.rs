//! Emitted event definitions
//!
//! Every update cycle of the engine yields zero or more `Event`s, grouped
//! into a `Snapshot` stamped with the in-game time of the cycle.

use serde::{Deserialize, Serialize};

use crate::ids::ParticipantId;
use crate::side::Side;

/// Closed set of scenario tags the engine can emit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Scenario {
    /// A kill with no streak tier
    Kill,
    // Streak tiers (consecutive kills without dying)
    Spree,
    Rampage,
    Unstoppable,
    Dominating,
    Godlike,
    Legendary,
    // Multi-kill tiers (kills within the multi-kill window)
    Double,
    Triple,
    Quadra,
    Penta,
    /// A death no enemy kill accounts for
    Executed,
    FirstBlood,
    /// Kill of a participant holding a streak
    Shutdown,
    /// Whole enemy team dead at once
    Ace,
    Turret,
    Inhibitor,
    Baron,
    Dragon,
    GameEnd,
}

impl Scenario {
    pub const ALL: [Scenario; 20] = [
        Scenario::Kill,
        Scenario::Spree,
        Scenario::Rampage,
        Scenario::Unstoppable,
        Scenario::Dominating,
        Scenario::Godlike,
        Scenario::Legendary,
        Scenario::Double,
        Scenario::Triple,
        Scenario::Quadra,
        Scenario::Penta,
        Scenario::Executed,
        Scenario::FirstBlood,
        Scenario::Shutdown,
        Scenario::Ace,
        Scenario::Turret,
        Scenario::Inhibitor,
        Scenario::Baron,
        Scenario::Dragon,
        Scenario::GameEnd,
    ];

    /// Streak tier for a consecutive-kill count.
    pub fn for_streak(consecutive_kills: u32) -> Self {
        match consecutive_kills {
            0..=2 => Scenario::Kill,
            3 => Scenario::Spree,
            4 => Scenario::Rampage,
            5 => Scenario::Unstoppable,
            6 => Scenario::Dominating,
            7 => Scenario::Godlike,
            _ => Scenario::Legendary,
        }
    }

    /// Label used in logs; identical to the wire name.
    pub fn label(&self) -> &'static str {
        match self {
            Scenario::Kill => "KILL",
            Scenario::Spree => "SPREE",
            Scenario::Rampage => "RAMPAGE",
            Scenario::Unstoppable => "UNSTOPPABLE",
            Scenario::Dominating => "DOMINATING",
            Scenario::Godlike => "GODLIKE",
            Scenario::Legendary => "LEGENDARY",
            Scenario::Double => "DOUBLE",
            Scenario::Triple => "TRIPLE",
            Scenario::Quadra => "QUADRA",
            Scenario::Penta => "PENTA",
            Scenario::Executed => "EXECUTED",
            Scenario::FirstBlood => "FIRST_BLOOD",
            Scenario::Shutdown => "SHUTDOWN",
            Scenario::Ace => "ACE",
            Scenario::Turret => "TURRET",
            Scenario::Inhibitor => "INHIBITOR",
            Scenario::Baron => "BARON",
            Scenario::Dragon => "DRAGON",
            Scenario::GameEnd => "GAME_END",
        }
    }
}

/// A single derived event.
///
/// `side` is the side credited with the event (the killer's side for kill
/// scenarios, the victim's side for `Executed`). `GameEnd` has no side.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Event {
    pub side: Option<Side>,
    pub scenario: Scenario,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub participant_id: Option<ParticipantId>,
}

impl Event {
    /// Event credited to one participant.
    pub fn participant(side: Side, participant_id: ParticipantId, scenario: Scenario) -> Self {
        Self {
            side: Some(side),
            scenario,
            participant_id: Some(participant_id),
        }
    }

    /// Event credited to a whole team (aces, objectives).
    pub fn team(side: Side, scenario: Scenario) -> Self {
        Self {
            side: Some(side),
            scenario,
            participant_id: None,
        }
    }

    pub fn game_end() -> Self {
        Self {
            side: None,
            scenario: Scenario::GameEnd,
            participant_id: None,
        }
    }
}

/// Events emitted by one update cycle.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Snapshot {
    /// Nanoseconds since the first frame of the game
    pub game_time: i64,
    pub events: Vec<Event>,
}

impl Snapshot {
    pub fn new(game_time: i64, events: Vec<Event>) -> Self {
        Self { game_time, events }
    }

    /// Number of events tagged with `scenario`.
    pub fn count(&self, scenario: Scenario) -> usize {
        self.events.iter().filter(|e| e.scenario == scenario).count()
    }
}
