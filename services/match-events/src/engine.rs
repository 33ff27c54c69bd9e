//! Match event engine
//!
//! Consumes the frame stream of one game and derives the events of every
//! update cycle.
//!
//! Cycle:
//! 1. Apply the frame to both team trackers
//! 2. Advance the clock, rotating the time bucket on the interval
//! 3. Pair this cycle's kills with this cycle's deaths
//! 4. Executions, then per-killer first blood, streak, shutdown and
//!    multi-kill scenarios
//! 5. Aces, then objectives expanded one event per unit
//! 6. Game end when the feed leaves `in_game`
//! 7. Append the cycle's snapshot to the current bucket
//!
//! The engine is synchronous and single-owner: frames must arrive in
//! timestamp order and each frame is applied once.

use tracing::{debug, info};

use match_types::errors::{EngineError, FrameError};
use match_types::event::{Event, Scenario, Snapshot};
use match_types::feed::{Frame, IN_GAME};
use match_types::game::Game;
use match_types::side::Side;
use match_types::time::{secs, NANOS_PER_MILLI};

use crate::attribution::{Attribution, KillAttributor, ParticipantKey};
use crate::buckets::{BucketBuilder, TimeBucket};
use crate::participant::ParticipantTracker;
use crate::state::State;
use crate::team::TeamTracker;
use crate::{PENTA_WINDOW, SHUTDOWN_STREAK};

/// Lifecycle of the match as last reported by the feed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MatchStatus {
    InGame,
    /// Terminal state string reported by the feed (e.g. `finished`)
    Ended(String),
}

impl MatchStatus {
    pub fn as_str(&self) -> &str {
        match self {
            MatchStatus::InGame => IN_GAME,
            MatchStatus::Ended(status) => status,
        }
    }
}

/// What one update produced.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UpdateOutcome {
    /// Events of this cycle, if any were emitted
    pub snapshot: Option<Snapshot>,
    /// Buckets closed by this cycle (rotation and/or game end)
    pub closed_buckets: Vec<TimeBucket>,
}

pub struct MatchEngine {
    game: Game,
    blue: TeamTracker,
    red: TeamTracker,
    /// Timestamp of the first frame (in-game time zero)
    init_time: i64,
    /// Timestamp of the last applied frame
    current_time: i64,
    buckets: BucketBuilder,
    total_kills: u64,
    status: MatchStatus,
}

impl MatchEngine {
    /// Create the engine for a game whose first frame is at `init_time`.
    pub fn new(game: Game, init_time: i64) -> Result<Self, EngineError> {
        let blue = TeamTracker::new(game.team(Side::Blue)?);
        let red = TeamTracker::new(game.team(Side::Red)?);
        let interval = secs(game.bucket_interval_secs as i64);

        info!(
            game_id = %game.game_id(),
            match_id = %game.match_id(),
            bucket_interval_secs = game.bucket_interval_secs,
            "MatchEngine initialized"
        );

        Ok(Self {
            game,
            blue,
            red,
            init_time,
            current_time: init_time,
            buckets: BucketBuilder::new(interval, init_time),
            total_kills: 0,
            status: MatchStatus::InGame,
        })
    }

    pub fn game(&self) -> &Game {
        &self.game
    }

    pub fn status(&self) -> &MatchStatus {
        &self.status
    }

    pub fn is_in_game(&self) -> bool {
        self.status == MatchStatus::InGame
    }

    /// Kills observed so far, across both teams.
    pub fn total_kills(&self) -> u64 {
        self.total_kills
    }

    pub fn init_time(&self) -> i64 {
        self.init_time
    }

    pub fn current_time(&self) -> i64 {
        self.current_time
    }

    /// Closed, non-empty buckets so far.
    pub fn buckets(&self) -> &[TimeBucket] {
        self.buckets.closed()
    }

    pub fn team(&self, side: Side) -> &TeamTracker {
        match side {
            Side::Blue => &self.blue,
            Side::Red => &self.red,
        }
    }

    fn team_mut(&mut self, side: Side) -> &mut TeamTracker {
        match side {
            Side::Blue => &mut self.blue,
            Side::Red => &mut self.red,
        }
    }

    fn tracker(&self, key: ParticipantKey) -> Option<&ParticipantTracker> {
        self.team(key.side).participant(key.participant_id)
    }

    fn tracker_mut(&mut self, key: ParticipantKey) -> Option<&mut ParticipantTracker> {
        self.team_mut(key.side).participant_mut(key.participant_id)
    }

    /// Close the current bucket without ending the game, for recordings
    /// that stop before the game does.
    pub fn flush(&mut self) -> Option<TimeBucket> {
        self.buckets.close_current()
    }

    /// Consume the engine, returning the game metadata (with recording end
    /// times when the game finished) and the closed buckets.
    pub fn into_parts(self) -> (Game, Vec<TimeBucket>) {
        (self.game, self.buckets.into_closed())
    }

    fn process_kills(&mut self, attribution: &Attribution, now: i64, events: &mut Vec<Event>) {
        events.extend(
            attribution
                .executed
                .iter()
                .filter_map(|victim| self.tracker(*victim))
                .map(|victim| victim.event(Scenario::Executed)),
        );

        // First blood and shutdowns look at the total before this cycle
        let prior_kills = self.total_kills;
        let mut cycle_kills = 0u64;

        for claim in &attribution.claims {
            let Some(killer) = self.tracker_mut(claim.killer) else {
                continue;
            };

            let since_last_kill = killer.register_kills(now);
            let multi_kills = killer.multi_kills();
            let spree = killer.spree();
            let killer_event = |scenario| {
                Event::participant(claim.killer.side, claim.killer.participant_id, scenario)
            };

            cycle_kills += claim.kills as u64;

            if prior_kills == 0 {
                events.push(killer_event(Scenario::FirstBlood));
            }

            let scenario = match multi_kills {
                1 if prior_kills > 0 => {
                    let shutdown = claim
                        .victims
                        .first()
                        .and_then(|victim| self.tracker(*victim))
                        .is_some_and(|victim| victim.consecutive_kills() >= SHUTDOWN_STREAK);
                    Some(if shutdown { Scenario::Shutdown } else { spree })
                }
                2 => Some(Scenario::Double),
                3 => Some(Scenario::Triple),
                4 => Some(Scenario::Quadra),
                5 if since_last_kill <= PENTA_WINDOW
                    && self.team_mut(claim.killer.side.opposite()).is_aced(false) =>
                {
                    Some(Scenario::Penta)
                }
                _ => None,
            };

            if let Some(scenario) = scenario {
                events.push(killer_event(scenario));
            }

            for victim in &claim.victims {
                if let Some(victim) = self.tracker_mut(*victim) {
                    victim.end_streak();
                }
            }
        }

        self.total_kills += cycle_kills;
    }

    fn process_aces(&mut self, events: &mut Vec<Event>) {
        for side in Side::BOTH {
            if self.team_mut(side.opposite()).is_aced(true) {
                events.push(Event::team(side, Scenario::Ace));
            }
        }
    }

    fn process_objectives(&self, events: &mut Vec<Event>) {
        for side in Side::BOTH {
            let team = self.team(side);
            let deltas = [
                (team.inhibitors(), Scenario::Inhibitor),
                (team.towers(), Scenario::Turret),
                (team.barons(), Scenario::Baron),
                (team.dragons(), Scenario::Dragon),
            ];
            for (count, scenario) in deltas {
                for _ in 0..count.max(0) {
                    events.push(Event::team(side, scenario));
                }
            }
        }
    }

    fn finish(&mut self, status: &str, game_time: i64, events: &mut Vec<Event>) {
        self.status = MatchStatus::Ended(status.to_string());

        let elapsed_ms = game_time / NANOS_PER_MILLI;
        for vod in &mut self.game.vods {
            vod.end_time_ms = Some(vod.start_time_ms + elapsed_ms);
        }

        events.push(Event::game_end());

        info!(
            game_id = %self.game.game_id(),
            status = status,
            total_kills = self.total_kills,
            game_time_secs = game_time / secs(1),
            "Game finished"
        );
    }
}

impl State for MatchEngine {
    type Record = Frame;
    type Output = UpdateOutcome;
    type Error = EngineError;

    fn update(&mut self, frame: &Frame) -> Result<UpdateOutcome, EngineError> {
        if let MatchStatus::Ended(status) = &self.status {
            return Err(EngineError::MatchFinished {
                status: status.clone(),
            });
        }

        let now = frame.timestamp()?;
        if now < self.current_time {
            return Err(FrameError::OutOfOrder {
                last: self.current_time,
                received: now,
            }
            .into());
        }

        // Both sides validated up front so a bad frame leaves no partial update
        self.blue.validate(&frame.blue_team)?;
        self.red.validate(&frame.red_team)?;
        self.blue.update(&frame.blue_team)?;
        self.red.update(&frame.red_team)?;

        self.current_time = now;
        let mut closed_buckets: Vec<TimeBucket> = self.buckets.advance(now).into_iter().collect();
        let game_time = now - self.init_time;

        let mut events = Vec::new();

        let attribution = KillAttributor::from_teams(&self.blue, &self.red).attribute();
        self.process_kills(&attribution, now, &mut events);
        self.process_aces(&mut events);
        self.process_objectives(&mut events);

        if !frame.is_in_game() {
            self.finish(&frame.game_state, game_time, &mut events);
        }

        let snapshot = if events.is_empty() {
            None
        } else {
            let snapshot = Snapshot::new(game_time, events);
            debug!(
                game_id = %self.game.game_id(),
                game_time_ms = game_time / NANOS_PER_MILLI,
                events = ?snapshot.events.iter().map(|e| e.scenario.label()).collect::<Vec<_>>(),
                "Snapshot"
            );
            self.buckets.record(snapshot.clone());
            Some(snapshot)
        };

        if !self.is_in_game() {
            closed_buckets.extend(self.buckets.close_current());
        }

        Ok(UpdateOutcome {
            snapshot,
            closed_buckets,
        })
    }
}
