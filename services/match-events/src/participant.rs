//! Per-participant counter tracking
//!
//! The feed only publishes cumulative counters, so every quantity the
//! engine reasons about (kills this cycle, a death this cycle, a respawn)
//! is a difference between the previous and the current frame.

use match_types::errors::FrameError;
use match_types::event::{Event, Scenario};
use match_types::feed::ParticipantFrame;
use match_types::ids::ParticipantId;
use match_types::side::Side;

use crate::state::State;
use crate::MULTI_KILL_WINDOW;

/// Tracks one participant's counters across update cycles.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParticipantTracker {
    id: ParticipantId,
    side: Side,

    previous_kills: u32,
    current_kills: u32,

    previous_deaths: u32,
    current_deaths: u32,

    previous_health: u32,
    current_health: u32,
    max_health: u32,

    /// Time of the most recent kill (Unix nanos); unset before the first kill.
    last_kill_time: Option<i64>,

    /// Kills since the participant last died (sprees and shutdowns).
    consecutive_kills: u32,
    /// Kills inside the rolling multi-kill window (doubles, triples, ...).
    multi_kills: u32,
}

impl ParticipantTracker {
    pub fn new(id: ParticipantId, side: Side) -> Self {
        Self {
            id,
            side,
            previous_kills: 0,
            current_kills: 0,
            previous_deaths: 0,
            current_deaths: 0,
            previous_health: 0,
            current_health: 0,
            max_health: 0,
            last_kill_time: None,
            consecutive_kills: 0,
            multi_kills: 0,
        }
    }

    pub fn id(&self) -> ParticipantId {
        self.id
    }

    pub fn side(&self) -> Side {
        self.side
    }

    /// Kills scored between the previous and the current frame.
    pub fn kills_this_update(&self) -> u32 {
        self.current_kills - self.previous_kills
    }

    /// A death counts only when the counter moved by exactly one.
    pub fn died_this_update(&self) -> bool {
        self.current_deaths - self.previous_deaths == 1
    }

    /// Respawned participants come back at max health.
    pub fn is_at_full_health(&self) -> bool {
        self.current_health == self.max_health
    }

    pub fn current_kills(&self) -> u32 {
        self.current_kills
    }

    pub fn current_deaths(&self) -> u32 {
        self.current_deaths
    }

    pub fn current_health(&self) -> u32 {
        self.current_health
    }

    pub fn previous_health(&self) -> u32 {
        self.previous_health
    }

    pub fn max_health(&self) -> u32 {
        self.max_health
    }

    pub fn consecutive_kills(&self) -> u32 {
        self.consecutive_kills
    }

    pub fn multi_kills(&self) -> u32 {
        self.multi_kills
    }

    pub fn last_kill_time(&self) -> Option<i64> {
        self.last_kill_time
    }

    /// Streak tier of the current consecutive-kill count.
    pub fn spree(&self) -> Scenario {
        Scenario::for_streak(self.consecutive_kills)
    }

    /// The participant died: their streak is over.
    pub fn end_streak(&mut self) {
        self.consecutive_kills = 0;
    }

    /// Fold this cycle's kills into the multi-kill window.
    ///
    /// Returns the time elapsed since the previous kill (zero for the first
    /// kill ever). The window resets when that gap exceeds
    /// [`MULTI_KILL_WINDOW`].
    pub fn register_kills(&mut self, now: i64) -> i64 {
        let last = *self.last_kill_time.get_or_insert(now);
        let since_last_kill = now - last;

        if since_last_kill > MULTI_KILL_WINDOW {
            self.multi_kills = 0;
        }

        self.last_kill_time = Some(now);
        self.multi_kills += self.kills_this_update();

        since_last_kill
    }

    pub fn event(&self, scenario: Scenario) -> Event {
        Event::participant(self.side, self.id, scenario)
    }

    /// Reject counters that went backwards before anything is mutated.
    pub fn validate(&self, record: &ParticipantFrame) -> Result<(), FrameError> {
        if record.kills < self.current_kills {
            return Err(FrameError::CounterRegression {
                participant_id: self.id,
                counter: "kills",
                previous: self.current_kills,
                current: record.kills,
            });
        }
        if record.deaths < self.current_deaths {
            return Err(FrameError::CounterRegression {
                participant_id: self.id,
                counter: "deaths",
                previous: self.current_deaths,
                current: record.deaths,
            });
        }
        Ok(())
    }
}

impl State for ParticipantTracker {
    type Record = ParticipantFrame;
    type Output = ();
    type Error = FrameError;

    fn update(&mut self, record: &ParticipantFrame) -> Result<(), FrameError> {
        self.validate(record)?;

        self.previous_kills = self.current_kills;
        self.current_kills = record.kills;

        self.consecutive_kills += self.kills_this_update();

        self.previous_deaths = self.current_deaths;
        self.current_deaths = record.deaths;

        self.previous_health = self.current_health;
        self.current_health = record.current_health;
        self.max_health = record.max_health;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use match_types::time::secs;

    fn record(kills: u32, deaths: u32, health: u32) -> ParticipantFrame {
        ParticipantFrame {
            participant_id: ParticipantId::new(1),
            kills,
            deaths,
            current_health: health,
            max_health: 600,
        }
    }

    fn tracker() -> ParticipantTracker {
        ParticipantTracker::new(ParticipantId::new(1), Side::Blue)
    }

    #[test]
    fn test_kill_delta() {
        let mut p = tracker();
        p.update(&record(2, 0, 600)).unwrap();
        assert_eq!(p.kills_this_update(), 2);

        p.update(&record(2, 0, 600)).unwrap();
        assert_eq!(p.kills_this_update(), 0);

        p.update(&record(5, 0, 600)).unwrap();
        assert_eq!(p.kills_this_update(), 3);
        assert_eq!(p.consecutive_kills(), 5);
    }

    #[test]
    fn test_death_requires_single_increment() {
        let mut p = tracker();
        p.update(&record(0, 1, 0)).unwrap();
        assert!(p.died_this_update());

        p.update(&record(0, 1, 0)).unwrap();
        assert!(!p.died_this_update());

        // Two deaths between frames is not classified as a death
        p.update(&record(0, 3, 0)).unwrap();
        assert!(!p.died_this_update());
    }

    #[test]
    fn test_full_health() {
        let mut p = tracker();
        p.update(&record(0, 1, 0)).unwrap();
        assert!(!p.is_at_full_health());

        p.update(&record(0, 1, 600)).unwrap();
        assert!(p.is_at_full_health());
        assert_eq!(p.previous_health(), 0);
    }

    #[test]
    fn test_spree_tiers_follow_streak() {
        let mut p = tracker();
        p.update(&record(2, 0, 600)).unwrap();
        assert_eq!(p.spree(), Scenario::Kill);

        p.update(&record(3, 0, 600)).unwrap();
        assert_eq!(p.spree(), Scenario::Spree);

        p.update(&record(8, 0, 600)).unwrap();
        assert_eq!(p.spree(), Scenario::Legendary);

        p.end_streak();
        assert_eq!(p.spree(), Scenario::Kill);
        assert_eq!(p.consecutive_kills(), 0);
    }

    #[test]
    fn test_multi_kill_window() {
        let mut p = tracker();
        let t0 = secs(1_000);

        p.update(&record(1, 0, 600)).unwrap();
        assert_eq!(p.register_kills(t0), 0);
        assert_eq!(p.multi_kills(), 1);

        p.update(&record(2, 0, 600)).unwrap();
        assert_eq!(p.register_kills(t0 + secs(10)), secs(10));
        assert_eq!(p.multi_kills(), 2, "a 10s gap stays inside the window");

        p.update(&record(3, 0, 600)).unwrap();
        p.register_kills(t0 + secs(21));
        assert_eq!(p.multi_kills(), 1, "an 11s gap resets the window");
        assert_eq!(p.last_kill_time(), Some(t0 + secs(21)));
    }

    #[test]
    fn test_counter_regression_rejected_without_mutation() {
        let mut p = tracker();
        p.update(&record(3, 2, 600)).unwrap();

        let err = p.update(&record(2, 2, 600)).unwrap_err();
        assert_eq!(
            err,
            FrameError::CounterRegression {
                participant_id: ParticipantId::new(1),
                counter: "kills",
                previous: 3,
                current: 2,
            }
        );
        assert_eq!(p.current_kills(), 3);

        assert!(p.update(&record(3, 1, 600)).is_err());
        assert_eq!(p.current_deaths(), 2);
    }

    #[test]
    fn test_event_carries_identity() {
        let p = tracker();
        let event = p.event(Scenario::Kill);
        assert_eq!(event.side, Some(Side::Blue));
        assert_eq!(event.participant_id, Some(ParticipantId::new(1)));
    }
}
