//! Feed access
//!
//! The runner never talks to the network directly: it is handed a
//! `FeedClient`. Production wires an HTTP client behind this trait; tests and
//! the replay binary use `RecordedFeed`, which serves windows out of frames
//! captured earlier.

use std::collections::HashMap;

use async_trait::async_trait;
use thiserror::Error;

use match_types::feed::{EventDetails, Frame, WindowResponse};
use match_types::ids::{GameId, MatchId};
use match_types::time::{self, secs};

use crate::config::RunnerConfig;

#[derive(Error, Debug)]
pub enum FeedError {
    #[error("Transport error: {0}")]
    Transport(String),

    #[error("Decode error: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("Not found: {resource}")]
    NotFound { resource: String },
}

/// Source of event details and live stats windows.
#[async_trait]
pub trait FeedClient: Send + Sync {
    /// Details of a scheduled match: teams, games and recordings.
    async fn event_details(&self, match_id: MatchId) -> Result<EventDetails, FeedError>;

    /// A window of frames for `game_id`. Without a starting time the feed
    /// returns its first window (which carries the game metadata).
    async fn window(
        &self,
        game_id: GameId,
        starting_time: Option<&str>,
    ) -> Result<WindowResponse, FeedError>;
}

/// Position of the next window to request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WindowCursor {
    position: i64,
    step: i64,
}

impl WindowCursor {
    /// Cursor for a game whose first frame is at `first_frame`.
    pub fn new(first_frame: i64, config: &RunnerConfig) -> Self {
        Self {
            position: time::align_to_window(first_frame + secs(config.initial_offset_secs)),
            step: secs(config.window_step_secs),
        }
    }

    pub fn position(&self) -> i64 {
        self.position
    }

    /// The `startingTime` parameter of the next request.
    pub fn starting_time(&self) -> String {
        time::format_window_time(self.position)
    }

    pub fn advance(&mut self) {
        self.position += self.step;
    }
}

/// One game as it was captured from the window feed.
#[derive(Debug, Clone)]
struct RecordedGame {
    /// First window, frames stripped
    template: WindowResponse,
    /// Every frame of the game, in feed order
    frames: Vec<(i64, Frame)>,
}

/// In-memory feed serving captured games.
///
/// A window request returns the frames whose timestamps fall within
/// `window_span` of the starting time; requests past the last frame return
/// an empty window, like a live feed that has not caught up yet.
#[derive(Debug, Clone)]
pub struct RecordedFeed {
    matches: HashMap<MatchId, EventDetails>,
    games: HashMap<GameId, RecordedGame>,
    window_span: i64,
}

impl Default for RecordedFeed {
    fn default() -> Self {
        Self::new()
    }
}

impl RecordedFeed {
    pub fn new() -> Self {
        Self {
            matches: HashMap::new(),
            games: HashMap::new(),
            window_span: secs(time::WINDOW_ALIGNMENT_SECS),
        }
    }

    pub fn with_window_span_secs(mut self, span: i64) -> Self {
        self.window_span = secs(span);
        self
    }

    pub fn add_match(&mut self, match_id: MatchId, details: EventDetails) {
        self.matches.insert(match_id, details);
    }

    /// Register a game from its captured windows. Frames of overlapping
    /// windows are merged by timestamp.
    pub fn add_game(
        &mut self,
        game_id: GameId,
        windows: Vec<WindowResponse>,
    ) -> Result<(), FeedError> {
        let mut windows = windows.into_iter();
        let Some(mut template) = windows.next() else {
            return Err(FeedError::NotFound {
                resource: format!("windows of game {}", game_id),
            });
        };

        let mut frames = Vec::new();
        for frame in std::mem::take(&mut template.frames)
            .into_iter()
            .chain(windows.flat_map(|w| w.frames))
        {
            let timestamp = frame
                .timestamp()
                .map_err(|e| FeedError::Transport(e.to_string()))?;
            frames.push((timestamp, frame));
        }
        frames.sort_by_key(|(timestamp, _)| *timestamp);
        frames.dedup_by_key(|(timestamp, _)| *timestamp);

        self.games.insert(game_id, RecordedGame { template, frames });
        Ok(())
    }
}

#[async_trait]
impl FeedClient for RecordedFeed {
    async fn event_details(&self, match_id: MatchId) -> Result<EventDetails, FeedError> {
        self.matches
            .get(&match_id)
            .cloned()
            .ok_or_else(|| FeedError::NotFound {
                resource: format!("match {}", match_id),
            })
    }

    async fn window(
        &self,
        game_id: GameId,
        starting_time: Option<&str>,
    ) -> Result<WindowResponse, FeedError> {
        let game = self.games.get(&game_id).ok_or_else(|| FeedError::NotFound {
            resource: format!("game {}", game_id),
        })?;

        let start = match starting_time {
            Some(value) => {
                time::parse_timestamp(value).map_err(|e| FeedError::Transport(e.to_string()))?
            }
            None => match game.frames.first() {
                Some((first, _)) => *first,
                None => 0,
            },
        };
        let end = start + self.window_span;

        let mut window = game.template.clone();
        window.frames = game
            .frames
            .iter()
            .filter(|(timestamp, _)| *timestamp >= start && *timestamp < end)
            .map(|(_, frame)| frame.clone())
            .collect();
        Ok(window)
    }
}
