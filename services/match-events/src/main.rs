use std::fs;
use std::sync::Arc;

use anyhow::{bail, Context};
use tokio::sync::mpsc;
use tracing_subscriber::EnvFilter;

use match_events::config::RunnerConfig;
use match_events::feed::RecordedFeed;
use match_events::replay::ReplayEngine;
use match_events::roster::game_from_window;
use match_events::runner::{spawn_matches, Emission};
use match_types::feed::{EventDetails, WindowResponse};
use match_types::ids::{GameId, MatchId};

const USAGE: &str = "usage: match-events <windows.json> [event-details.json]";

fn read_json<T: serde::de::DeserializeOwned>(path: &str) -> anyhow::Result<T> {
    let raw = fs::read_to_string(path).with_context(|| format!("reading {}", path))?;
    serde_json::from_str(&raw).with_context(|| format!("decoding {}", path))
}

/// Replay a captured game and print its buckets.
fn replay(windows: Vec<WindowResponse>, config: &RunnerConfig) -> anyhow::Result<()> {
    let Some(first) = windows.first() else {
        bail!("no windows in capture");
    };
    let game = game_from_window(first, &config.engine)?;
    let frames: Vec<_> = windows.into_iter().flat_map(|w| w.frames).collect();

    let result = ReplayEngine::new()
        .with_relaxed_ordering()
        .replay(game, &frames)?;

    tracing::info!(
        digest = %result.digest,
        total_kills = result.total_kills,
        status = %result.status.as_str(),
        "Replay finished"
    );
    println!("{}", serde_json::to_string_pretty(&result.buckets)?);
    Ok(())
}

/// Drive the live runner over a captured match.
async fn run(
    windows: Vec<WindowResponse>,
    details: EventDetails,
    config: RunnerConfig,
) -> anyhow::Result<()> {
    let match_id = MatchId::parse(&details.id).context("invalid match id")?;
    let Some(first) = windows.first() else {
        bail!("no windows in capture");
    };
    let game_id = GameId::parse(&first.esports_game_id).context("invalid game id")?;

    let mut feed = RecordedFeed::new();
    feed.add_match(match_id, details);
    feed.add_game(game_id, windows)?;

    let (tx, mut rx) = mpsc::channel(config.channel_capacity);
    let runner = tokio::spawn(spawn_matches(Arc::new(feed), vec![match_id], config, tx));

    while let Some(emission) = rx.recv().await {
        match emission {
            Emission::Bucket { bucket, .. } => println!("{}", serde_json::to_string(&bucket)?),
            Emission::Finished(report) => tracing::info!(
                game_id = %report.game.game_id(),
                correlation_id = %report.correlation_id,
                total_kills = report.total_kills,
                "Game finished"
            ),
        }
    }

    for (match_id, result) in runner.await? {
        if let Err(e) = result {
            bail!("match {} failed: {}", match_id, e);
        }
    }
    Ok(())
}

#[tokio::main]
async fn main() -> Result<(), anyhow::Error> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    tracing::info!(version = match_events::SERVICE_VERSION, "Starting match event service");

    let args: Vec<String> = std::env::args().skip(1).collect();
    let config = RunnerConfig::from_env()?;

    match args.as_slice() {
        [windows] => replay(read_json(windows)?, &config),
        [windows, details] => run(read_json(windows)?, read_json(details)?, config).await,
        _ => bail!(USAGE),
    }
}
