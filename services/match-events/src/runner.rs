//! Feed runner
//!
//! Drives one engine per game from an injected `FeedClient`: fetch the first
//! window, correlate the roster, then walk the feed window by window until
//! the game ends. Closed buckets are pushed to an mpsc channel as they close.
//!
//! Matches are independent: `spawn_matches` runs each on its own tokio task
//! with no shared mutable state. Dropping the receiving end of the channel
//! cancels every run at its next emission.

use std::collections::HashMap;
use std::sync::Arc;

use thiserror::Error;
use tokio::sync::mpsc;
use tokio::task::JoinSet;
use tracing::{debug, error, info, info_span, warn, Instrument};
use uuid::Uuid;

use match_types::errors::{EngineError, FrameError, RosterError};
use match_types::feed::Frame;
use match_types::game::Game;
use match_types::ids::{GameId, MatchId};

use crate::buckets::TimeBucket;
use crate::config::RunnerConfig;
use crate::engine::{MatchEngine, MatchStatus};
use crate::feed::{FeedClient, FeedError, WindowCursor};
use crate::ingestion::{FrameIngester, IngestionResult};
use crate::roster;
use crate::state::State;

#[derive(Error, Debug)]
pub enum RunError {
    #[error("Feed error: {0}")]
    Feed(#[from] FeedError),

    #[error("Roster error: {0}")]
    Roster(#[from] RosterError),

    #[error("Engine error: {0}")]
    Engine(#[from] EngineError),

    #[error("Frame error: {0}")]
    Frame(#[from] FrameError),

    #[error("First window of game {game_id} has no frames")]
    EmptyWindow { game_id: GameId },

    #[error("Game {game_id} did not end within {windows} windows")]
    Stalled { game_id: GameId, windows: u32 },

    #[error("Output channel closed")]
    Cancelled,

    #[error("Task failed: {0}")]
    TaskFailed(String),
}

/// Summary of one finished game.
#[derive(Debug, Clone)]
pub struct GameReport {
    pub correlation_id: Uuid,
    /// Final metadata, with recording end times set
    pub game: Game,
    pub status: MatchStatus,
    pub total_kills: u64,
    pub frames_applied: u64,
    pub frames_dropped: u64,
    /// Windows polled after the first one
    pub windows: u32,
}

#[derive(Debug, Clone)]
pub struct MatchReport {
    pub match_id: MatchId,
    pub games: Vec<GameReport>,
}

/// What the runner pushes downstream.
#[derive(Debug, Clone)]
pub enum Emission {
    Bucket { game_id: GameId, bucket: TimeBucket },
    Finished(GameReport),
}

async fn emit(tx: &mpsc::Sender<Emission>, emission: Emission) -> Result<(), RunError> {
    tx.send(emission).await.map_err(|_| {
        warn!("Output receiver dropped, stopping run");
        RunError::Cancelled
    })
}

/// Per-game driver state.
struct GameRun {
    engine: MatchEngine,
    ingester: FrameIngester,
}

impl GameRun {
    async fn apply(
        &mut self,
        frames: &[Frame],
        tx: &mpsc::Sender<Emission>,
    ) -> Result<(), RunError> {
        let game_id = self.engine.game().game_id();
        for frame in frames {
            if self.ingester.ingest(frame)? == IngestionResult::Dropped {
                continue;
            }
            let outcome = self.engine.update(frame)?;
            for bucket in outcome.closed_buckets {
                debug!(
                    start_time = bucket.start_time,
                    events = bucket.event_count(),
                    "Bucket closed"
                );
                emit(tx, Emission::Bucket { game_id, bucket }).await?;
            }
        }
        Ok(())
    }
}

/// Run one game to its end.
///
/// `game` must carry the teams and sides; the participants are attached from
/// the first window.
pub async fn run_game<C>(
    client: &C,
    game: Game,
    config: &RunnerConfig,
    tx: &mpsc::Sender<Emission>,
) -> Result<GameReport, RunError>
where
    C: FeedClient + ?Sized,
{
    let correlation_id = Uuid::now_v7();
    let span = info_span!("game", game_id = %game.game_id(), correlation_id = %correlation_id);
    drive_game(client, game, correlation_id, config, tx)
        .instrument(span)
        .await
}

async fn drive_game<C>(
    client: &C,
    mut game: Game,
    correlation_id: Uuid,
    config: &RunnerConfig,
    tx: &mpsc::Sender<Emission>,
) -> Result<GameReport, RunError>
where
    C: FeedClient + ?Sized,
{
    let game_id = game.game_id();
    let first = client.window(game_id, None).await?;
    roster::attach_participants(&mut game, &first)?;

    let init_time = first
        .frames
        .first()
        .ok_or(RunError::EmptyWindow { game_id })?
        .timestamp()?;

    let mut run = GameRun {
        engine: MatchEngine::new(game, init_time)?,
        ingester: FrameIngester::new(),
    };
    run.apply(&first.frames, tx).await?;

    let mut cursor = WindowCursor::new(init_time, config);
    let mut windows = 0u32;
    while run.engine.is_in_game() {
        if let Some(max_windows) = config.max_windows {
            if windows >= max_windows {
                warn!(windows, "Feed stalled before game end");
                return Err(RunError::Stalled { game_id, windows });
            }
        }

        let starting_time = cursor.starting_time();
        let window = client.window(game_id, Some(&starting_time)).await?;
        windows += 1;
        debug!(
            starting_time = %starting_time,
            frames = window.frames.len(),
            "Window received"
        );
        run.apply(&window.frames, tx).await?;
        cursor.advance();
    }

    let status = run.engine.status().clone();
    let total_kills = run.engine.total_kills();
    let (game, _) = run.engine.into_parts();
    let report = GameReport {
        correlation_id,
        game,
        status,
        total_kills,
        frames_applied: run.ingester.frames_accepted(),
        frames_dropped: run.ingester.frames_dropped(),
        windows,
    };

    info!(
        status = %report.status.as_str(),
        total_kills,
        frames_applied = report.frames_applied,
        frames_dropped = report.frames_dropped,
        "Game run complete"
    );
    emit(tx, Emission::Finished(report.clone())).await?;
    Ok(report)
}

/// Run every completed game of a match, one after the other.
pub async fn run_match<C>(
    client: &C,
    match_id: MatchId,
    config: &RunnerConfig,
    tx: &mpsc::Sender<Emission>,
) -> Result<MatchReport, RunError>
where
    C: FeedClient + ?Sized,
{
    let details = client.event_details(match_id).await?;
    let completed = roster::completed_games(&details);
    info!(match_id = %match_id, games = completed.len(), "Running match");

    let mut games = Vec::with_capacity(completed.len());
    for index in completed {
        let game = roster::build_game(&details, index, &config.engine)?;
        games.push(run_game(client, game, config, tx).await?);
    }

    info!(match_id = %match_id, "Match finished");
    Ok(MatchReport { match_id, games })
}

/// Run many matches concurrently, one task each.
///
/// Results are returned in match id order. A failed match does not affect
/// the others.
pub async fn spawn_matches<C>(
    client: Arc<C>,
    match_ids: Vec<MatchId>,
    config: RunnerConfig,
    tx: mpsc::Sender<Emission>,
) -> Vec<(MatchId, Result<MatchReport, RunError>)>
where
    C: FeedClient + 'static,
{
    let mut tasks = JoinSet::new();
    let mut task_matches = HashMap::new();

    for match_id in match_ids {
        let client = Arc::clone(&client);
        let config = config.clone();
        let tx = tx.clone();
        let handle = tasks.spawn(async move {
            let result = run_match(client.as_ref(), match_id, &config, &tx).await;
            (match_id, result)
        });
        task_matches.insert(handle.id(), match_id);
    }
    drop(tx);

    let mut results = Vec::with_capacity(task_matches.len());
    while let Some(joined) = tasks.join_next().await {
        let (match_id, result) = match joined {
            Ok(outcome) => outcome,
            Err(join_error) => match task_matches.get(&join_error.id()) {
                Some(match_id) => (*match_id, Err(RunError::TaskFailed(join_error.to_string()))),
                None => {
                    error!(error = %join_error, "Untracked task failed");
                    continue;
                }
            },
        };
        if let Err(e) = &result {
            error!(match_id = %match_id, error = %e, "Match failed");
        }
        results.push((match_id, result));
    }

    results.sort_by_key(|(match_id, _)| *match_id);
    results
}
