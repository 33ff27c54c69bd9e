//! Replay of recorded games
//!
//! Rebuilds the event buckets of a game from its captured frames and
//! fingerprints the output so runs can be compared:
//! - Same game and frames in, identical buckets and digest out
//! - Optional check against a known digest
//! - Strict mode rejects repeated or out-of-order frames; relaxed mode drops
//!   them the way the live runner does for overlapping windows

use sha2::{Digest, Sha256};
use tracing::{error, info};

use match_types::errors::{EngineError, FrameError};
use match_types::feed::Frame;
use match_types::game::Game;

use crate::buckets::TimeBucket;
use crate::engine::{MatchEngine, MatchStatus};
use crate::ingestion::{FrameIngester, IngestionResult};
use crate::state::State;

/// Result of a replay operation.
#[derive(Debug, Clone)]
pub struct ReplayResult {
    /// Final metadata, with recording end times if the game ended
    pub game: Game,
    pub buckets: Vec<TimeBucket>,
    pub total_kills: u64,
    pub status: MatchStatus,
    pub frames_applied: u64,
    pub frames_dropped: u64,
    /// SHA-256 of the JSON encoding of `buckets`, hex
    pub digest: String,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ReplayError {
    #[error("no frames to replay")]
    Empty,

    #[error("frame {index} at {timestamp} does not advance the clock")]
    NonMonotonic { index: usize, timestamp: i64 },

    #[error("engine error: {0}")]
    Engine(#[from] EngineError),

    #[error("frame error: {0}")]
    Frame(#[from] FrameError),

    #[error("digest mismatch: expected {expected}, got {actual}")]
    DigestMismatch { expected: String, actual: String },

    #[error("failed to encode buckets: {0}")]
    Encode(String),
}

pub struct ReplayEngine {
    /// Expected output digest for validation (if known).
    expected_digest: Option<String>,
    strict_ordering: bool,
}

impl ReplayEngine {
    pub fn new() -> Self {
        Self {
            expected_digest: None,
            strict_ordering: true,
        }
    }

    pub fn with_expected_digest(mut self, digest: String) -> Self {
        self.expected_digest = Some(digest);
        self
    }

    /// Drop repeated frames instead of failing (overlapping captures).
    pub fn with_relaxed_ordering(mut self) -> Self {
        self.strict_ordering = false;
        self
    }

    /// Replay `frames` of `game` from the first frame on.
    ///
    /// A recording that stops before the game ends still yields its last,
    /// partial bucket.
    pub fn replay(&self, game: Game, frames: &[Frame]) -> Result<ReplayResult, ReplayError> {
        let first = frames.first().ok_or(ReplayError::Empty)?;
        let game_id = game.game_id();

        info!(game_id = %game_id, frame_count = frames.len(), "Starting replay");

        let mut engine = MatchEngine::new(game, first.timestamp()?)?;
        let mut ingester = FrameIngester::new();

        for (index, frame) in frames.iter().enumerate() {
            match ingester.ingest(frame)? {
                IngestionResult::Accepted(_) => {
                    engine.update(frame)?;
                }
                IngestionResult::Dropped if self.strict_ordering => {
                    if !engine.is_in_game() {
                        return Err(EngineError::MatchFinished {
                            status: engine.status().as_str().to_string(),
                        }
                        .into());
                    }
                    return Err(ReplayError::NonMonotonic {
                        index,
                        timestamp: frame.timestamp()?,
                    });
                }
                IngestionResult::Dropped => {}
            }
        }

        engine.flush();
        let status = engine.status().clone();
        let total_kills = engine.total_kills();
        let (game, buckets) = engine.into_parts();
        let digest = compute_digest(&buckets)?;

        if let Some(expected) = &self.expected_digest {
            if &digest != expected {
                error!(
                    expected = %expected,
                    actual = %digest,
                    "Digest mismatch after replay"
                );
                return Err(ReplayError::DigestMismatch {
                    expected: expected.clone(),
                    actual: digest,
                });
            }
        }

        info!(
            game_id = %game_id,
            buckets = buckets.len(),
            total_kills,
            frames_dropped = ingester.frames_dropped(),
            "Replay completed"
        );

        Ok(ReplayResult {
            game,
            buckets,
            total_kills,
            status,
            frames_applied: ingester.frames_accepted(),
            frames_dropped: ingester.frames_dropped(),
            digest,
        })
    }
}

impl Default for ReplayEngine {
    fn default() -> Self {
        Self::new()
    }
}

/// SHA-256 over the JSON encoding of the buckets.
pub fn compute_digest(buckets: &[TimeBucket]) -> Result<String, ReplayError> {
    let encoded = serde_json::to_vec(buckets).map_err(|e| ReplayError::Encode(e.to_string()))?;
    let mut hasher = Sha256::new();
    hasher.update(&encoded);
    Ok(format!("{:x}", hasher.finalize()))
}
