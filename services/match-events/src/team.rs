//! Per-team tracking
//!
//! Owns the participant trackers of one side, the objective counters, the
//! set of dead participants and the sticky ace flag.
//!
//! The ace flag is hysteresis: once a wipe has been reported it stays set
//! until at least one participant has respawned, so the same wipe is never
//! reported twice.

use std::collections::BTreeSet;

use match_types::errors::FrameError;
use match_types::feed::TeamFrame;
use match_types::game::Team;
use match_types::ids::{ParticipantId, TeamId};
use match_types::side::Side;

use crate::participant::ParticipantTracker;
use crate::state::State;

/// Cumulative objective counters of one team.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ObjectiveCounters {
    pub towers: u32,
    pub inhibitors: u32,
    pub barons: u32,
    pub dragons: u32,
}

impl From<&TeamFrame> for ObjectiveCounters {
    fn from(frame: &TeamFrame) -> Self {
        Self {
            towers: frame.towers,
            inhibitors: frame.inhibitors,
            barons: frame.barons,
            dragons: frame.dragons.len() as u32,
        }
    }
}

#[derive(Debug, Clone)]
pub struct TeamTracker {
    team_id: TeamId,
    side: Side,
    participants: Vec<ParticipantTracker>,
    previous: ObjectiveCounters,
    current: ObjectiveCounters,
    /// Participants that died and have not respawned yet.
    dead: BTreeSet<ParticipantId>,
    aced: bool,
}

impl TeamTracker {
    pub fn new(team: &Team) -> Self {
        let participants = team
            .participants
            .iter()
            .map(|p| ParticipantTracker::new(p.id, team.side))
            .collect();

        Self {
            team_id: team.id,
            side: team.side,
            participants,
            previous: ObjectiveCounters::default(),
            current: ObjectiveCounters::default(),
            dead: BTreeSet::new(),
            aced: false,
        }
    }

    pub fn team_id(&self) -> TeamId {
        self.team_id
    }

    pub fn side(&self) -> Side {
        self.side
    }

    /// Participants in roster order.
    pub fn participants(&self) -> &[ParticipantTracker] {
        &self.participants
    }

    pub fn participant(&self, id: ParticipantId) -> Option<&ParticipantTracker> {
        self.participants.iter().find(|p| p.id() == id)
    }

    pub fn participant_mut(&mut self, id: ParticipantId) -> Option<&mut ParticipantTracker> {
        self.participants.iter_mut().find(|p| p.id() == id)
    }

    pub fn team_size(&self) -> usize {
        self.participants.len()
    }

    pub fn dead_count(&self) -> usize {
        self.dead.len()
    }

    pub fn is_dead(&self, id: ParticipantId) -> bool {
        self.dead.contains(&id)
    }

    pub fn towers(&self) -> i64 {
        self.current.towers as i64 - self.previous.towers as i64
    }

    pub fn inhibitors(&self) -> i64 {
        self.current.inhibitors as i64 - self.previous.inhibitors as i64
    }

    pub fn barons(&self) -> i64 {
        self.current.barons as i64 - self.previous.barons as i64
    }

    pub fn dragons(&self) -> i64 {
        self.current.dragons as i64 - self.previous.dragons as i64
    }

    pub fn objectives(&self) -> ObjectiveCounters {
        self.current
    }

    /// Whether the whole team is dead and the wipe has not been reported.
    ///
    /// With `save_state` the wipe is latched as reported; it re-arms once
    /// the dead count drops below the team size.
    pub fn is_aced(&mut self, save_state: bool) -> bool {
        let wiped = self.team_size() > 0 && self.dead.len() == self.team_size();

        if self.aced || !wiped {
            return false;
        }
        if save_state {
            self.aced = true;
        }
        true
    }

    pub fn is_ace_latched(&self) -> bool {
        self.aced
    }

    /// Check a team frame against the roster before anything is mutated.
    ///
    /// Every rostered participant must be present, no unknown participant
    /// may appear, and no counter may go backwards.
    pub fn validate(&self, frame: &TeamFrame) -> Result<(), FrameError> {
        for record in &frame.participants {
            let tracker = self.participant(record.participant_id).ok_or(
                FrameError::UnknownParticipant {
                    side: self.side,
                    participant_id: record.participant_id,
                },
            )?;
            tracker.validate(record)?;
        }

        for tracker in &self.participants {
            let present = frame
                .participants
                .iter()
                .any(|r| r.participant_id == tracker.id());
            if !present {
                return Err(FrameError::MissingParticipant {
                    side: self.side,
                    participant_id: tracker.id(),
                });
            }
        }

        Ok(())
    }
}

impl State for TeamTracker {
    type Record = TeamFrame;
    type Output = ();
    type Error = FrameError;

    fn update(&mut self, frame: &TeamFrame) -> Result<(), FrameError> {
        self.validate(frame)?;

        self.previous = self.current;
        self.current = ObjectiveCounters::from(frame);

        for record in &frame.participants {
            if let Some(tracker) = self.participant_mut(record.participant_id) {
                tracker.update(record)?;
            }
        }

        for tracker in &self.participants {
            if tracker.died_this_update() {
                self.dead.insert(tracker.id());
            }
        }

        // Respawned participants are back at max health
        let participants = &self.participants;
        self.dead.retain(|id| {
            participants
                .iter()
                .find(|p| p.id() == *id)
                .is_some_and(|p| !p.is_at_full_health())
        });

        if self.aced && self.dead.len() < self.team_size() {
            self.aced = false;
        }

        Ok(())
    }
}
