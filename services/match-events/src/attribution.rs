//! Kill attribution for one update cycle
//!
//! The feed reports how many kills each participant scored and which
//! participants died, but not who killed whom. For each cycle the attributor
//! pairs every kill with one victim from the cycle's deaths.
//!
//! Contract: each kill claims at most one victim and each victim is claimed
//! at most once. Deaths left unclaimed are executions.
//!
//! Order: killers are visited in roster order, blue side first. A killer
//! claims victims from the opposing side first (roster order) and falls back
//! to any remaining death only when no enemy death is left.

use match_types::ids::ParticipantId;
use match_types::side::Side;

use crate::team::TeamTracker;

/// Identity of a participant within one game.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ParticipantKey {
    pub side: Side,
    pub participant_id: ParticipantId,
}

impl ParticipantKey {
    pub fn new(side: Side, participant_id: ParticipantId) -> Self {
        Self {
            side,
            participant_id,
        }
    }
}

/// Victims claimed by one killer this cycle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KillClaim {
    pub killer: ParticipantKey,
    /// Kills scored this cycle. May exceed `victims.len()` when the death
    /// set ran out.
    pub kills: u32,
    pub victims: Vec<ParticipantKey>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Attribution {
    pub claims: Vec<KillClaim>,
    /// Deaths no kill accounted for
    pub executed: Vec<ParticipantKey>,
}

impl Attribution {
    pub fn total_kills(&self) -> u64 {
        self.claims.iter().map(|c| c.kills as u64).sum()
    }
}

/// Collects one cycle's killers and deaths, then pairs them.
#[derive(Debug, Default)]
pub struct KillAttributor {
    killers: Vec<(ParticipantKey, u32)>,
    deaths: Vec<ParticipantKey>,
}

impl KillAttributor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Gather killers and deaths of the current cycle from both teams.
    pub fn from_teams(blue: &TeamTracker, red: &TeamTracker) -> Self {
        let mut attributor = Self::new();
        for team in [blue, red] {
            for p in team.participants() {
                let key = ParticipantKey::new(p.side(), p.id());
                if p.kills_this_update() > 0 {
                    attributor.add_killer(key, p.kills_this_update());
                }
                if p.died_this_update() {
                    attributor.add_death(key);
                }
            }
        }
        attributor
    }

    pub fn add_killer(&mut self, killer: ParticipantKey, kills: u32) {
        self.killers.push((killer, kills));
    }

    pub fn add_death(&mut self, victim: ParticipantKey) {
        self.deaths.push(victim);
    }

    pub fn attribute(self) -> Attribution {
        let mut remaining = self.deaths;
        let mut claims = Vec::with_capacity(self.killers.len());

        for (killer, kills) in self.killers {
            let mut victims = Vec::with_capacity(kills as usize);

            while victims.len() < kills as usize {
                let pick = remaining
                    .iter()
                    .position(|v| v.side != killer.side)
                    .or_else(|| remaining.iter().position(|v| *v != killer));

                match pick {
                    Some(index) => victims.push(remaining.remove(index)),
                    None => break,
                }
            }

            claims.push(KillClaim {
                killer,
                kills,
                victims,
            });
        }

        Attribution {
            claims,
            executed: remaining,
        }
    }
}
