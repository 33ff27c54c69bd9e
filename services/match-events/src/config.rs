//! Service configuration
//!
//! Only the bucket width is tunable on the engine side; the multi-kill and
//! penta windows are game rules and live as constants in the crate root.
//! Runner settings govern how the feed is walked.

use std::env;

use serde::Deserialize;
use tracing::info;

/// Errors loading configuration.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    #[error("invalid value for {var}: {value}")]
    Invalid { var: &'static str, value: String },
}

pub const ENV_BUCKET_INTERVAL_SECS: &str = "MATCH_EVENTS_BUCKET_INTERVAL_SECS";
pub const ENV_MAX_WINDOWS: &str = "MATCH_EVENTS_MAX_WINDOWS";
pub const ENV_CHANNEL_CAPACITY: &str = "MATCH_EVENTS_CHANNEL_CAPACITY";

/// Configuration for the event engine.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Width of a time bucket in seconds.
    pub bucket_interval_secs: u64,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            bucket_interval_secs: 30,
        }
    }
}

impl EngineConfig {
    pub fn with_bucket_interval_secs(mut self, secs: u64) -> Self {
        self.bucket_interval_secs = secs;
        self
    }
}

/// Configuration for the feed runner.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct RunnerConfig {
    pub engine: EngineConfig,
    /// Offset of the first polled window from the game's first frame.
    pub initial_offset_secs: i64,
    /// Distance between consecutive windows.
    pub window_step_secs: i64,
    /// Give up on a game after this many windows without reaching game end.
    pub max_windows: Option<u32>,
    /// Capacity of the emission channel.
    pub channel_capacity: usize,
}

impl Default for RunnerConfig {
    fn default() -> Self {
        Self {
            engine: EngineConfig::default(),
            initial_offset_secs: 20,
            window_step_secs: 10,
            max_windows: None,
            channel_capacity: 64,
        }
    }
}

impl RunnerConfig {
    pub fn with_engine(mut self, engine: EngineConfig) -> Self {
        self.engine = engine;
        self
    }

    pub fn with_max_windows(mut self, max_windows: u32) -> Self {
        self.max_windows = Some(max_windows);
        self
    }

    pub fn with_channel_capacity(mut self, capacity: usize) -> Self {
        self.channel_capacity = capacity;
        self
    }

    /// Defaults overridden by `MATCH_EVENTS_*` environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|var| env::var(var).ok())
    }

    /// Defaults overridden by whatever `lookup` returns for each variable.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&'static str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(value) = parse_var::<_, u64>(&lookup, ENV_BUCKET_INTERVAL_SECS)? {
            if value == 0 {
                return Err(ConfigError::Invalid {
                    var: ENV_BUCKET_INTERVAL_SECS,
                    value: value.to_string(),
                });
            }
            config.engine.bucket_interval_secs = value;
        }
        if let Some(value) = parse_var::<_, u32>(&lookup, ENV_MAX_WINDOWS)? {
            config.max_windows = Some(value);
        }
        if let Some(value) = parse_var::<_, usize>(&lookup, ENV_CHANNEL_CAPACITY)? {
            if value == 0 {
                return Err(ConfigError::Invalid {
                    var: ENV_CHANNEL_CAPACITY,
                    value: value.to_string(),
                });
            }
            config.channel_capacity = value;
        }

        info!(
            bucket_interval_secs = config.engine.bucket_interval_secs,
            max_windows = ?config.max_windows,
            channel_capacity = config.channel_capacity,
            "Configuration loaded"
        );

        Ok(config)
    }
}

fn parse_var<F, T>(lookup: &F, var: &'static str) -> Result<Option<T>, ConfigError>
where
    F: Fn(&'static str) -> Option<String>,
    T: std::str::FromStr,
{
    match lookup(var) {
        None => Ok(None),
        Some(raw) => raw
            .trim()
            .parse::<T>()
            .map(Some)
            .map_err(|_| ConfigError::Invalid { var, value: raw }),
    }
}
