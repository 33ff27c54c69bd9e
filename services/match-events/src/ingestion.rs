//! Frame ingestion guard
//!
//! Feed windows overlap, so the same frame is usually delivered more than
//! once. The ingester sits in front of the engine and admits each frame at
//! most once, in timestamp order:
//! - frames at or before the last admitted timestamp are dropped
//! - frames after a terminal (non `in_game`) frame are dropped

use tracing::{debug, info};

use match_types::errors::FrameError;
use match_types::feed::Frame;

/// Result of ingesting a single frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IngestionResult {
    /// Frame is new and should be applied; carries its timestamp.
    Accepted(i64),
    /// Frame was already applied or arrived after the game ended.
    Dropped,
}

#[derive(Debug, Default)]
pub struct FrameIngester {
    /// Timestamp of the last admitted frame.
    last_timestamp: Option<i64>,
    /// Set once a terminal frame has been admitted.
    finished: bool,
    frames_accepted: u64,
    frames_dropped: u64,
}

impl FrameIngester {
    pub fn new() -> Self {
        Self::default()
    }

    /// Decide whether a frame is new.
    ///
    /// An unparseable timestamp is a malformed frame and is returned as an
    /// error rather than dropped.
    pub fn ingest(&mut self, frame: &Frame) -> Result<IngestionResult, FrameError> {
        let timestamp = frame.timestamp()?;

        if self.finished {
            self.frames_dropped += 1;
            debug!(timestamp, "Dropping frame after game end");
            return Ok(IngestionResult::Dropped);
        }

        if let Some(last) = self.last_timestamp {
            if timestamp <= last {
                self.frames_dropped += 1;
                debug!(timestamp, last_timestamp = last, "Dropping already applied frame");
                return Ok(IngestionResult::Dropped);
            }
        }

        self.last_timestamp = Some(timestamp);
        self.frames_accepted += 1;

        if !frame.is_in_game() {
            self.finished = true;
            info!(
                timestamp,
                game_state = %frame.game_state,
                "Terminal frame accepted"
            );
        }

        Ok(IngestionResult::Accepted(timestamp))
    }

    pub fn last_timestamp(&self) -> Option<i64> {
        self.last_timestamp
    }

    pub fn is_finished(&self) -> bool {
        self.finished
    }

    /// Total frames accepted since creation.
    pub fn frames_accepted(&self) -> u64 {
        self.frames_accepted
    }

    /// Total frames dropped since creation.
    pub fn frames_dropped(&self) -> u64 {
        self.frames_dropped
    }
}
