//! Configuration loading for the match client.

use serde::Deserialize;
use std::path::Path;
use thiserror::Error;
use tokio::time::Duration;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse config file: {0}")]
    Parse(#[from] toml::de::Error),
}

/// Client configuration, loaded from `match.toml`.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    /// Server base, e.g. `wss://example.org` or `ws://localhost:8080`.
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_matchmaking_path")]
    pub matchmaking_path: String,
    #[serde(default = "default_engine_path")]
    pub engine_path: String,
    /// Grace period after a sent action during which a server
    /// rejection may still arrive.
    #[serde(default = "default_commit_window_ms")]
    pub commit_window_ms: u64,
    /// Pause between the transport opening and the initial event.
    #[serde(default = "default_settle_delay_ms")]
    pub settle_delay_ms: u64,
}

fn default_host() -> String {
    "ws://localhost:8080".to_string()
}

fn default_matchmaking_path() -> String {
    "/matches/ws".to_string()
}

fn default_engine_path() -> String {
    "/engines/ws".to_string()
}

fn default_commit_window_ms() -> u64 {
    200
}

fn default_settle_delay_ms() -> u64 {
    150
}

impl Config {
    /// Loads `match.toml` from the current directory or a parent,
    /// falling back to defaults when no file exists.
    pub async fn load() -> Result<Self, ConfigError> {
        let paths = ["match.toml", "../match.toml", "../../match.toml"];

        for path in paths {
            if Path::new(path).exists() {
                let content = tokio::fs::read_to_string(path).await?;
                let config: Config = toml::from_str(&content)?;
                tracing::info!(%path, "loaded config");
                return Ok(config);
            }
        }

        tracing::info!("no match.toml found, using defaults");
        Ok(Config::default())
    }

    /// Full URL of the matchmaking endpoint.
    pub fn matchmaking_url(&self) -> String {
        format!("{}{}", self.host, self.matchmaking_path)
    }

    /// Full URL of the engine-match endpoint.
    pub fn engine_url(&self) -> String {
        format!("{}{}", self.host, self.engine_path)
    }

    pub fn commit_window(&self) -> Duration {
        Duration::from_millis(self.commit_window_ms)
    }

    pub fn settle_delay(&self) -> Duration {
        Duration::from_millis(self.settle_delay_ms)
    }
}

impl Default for Config {
    fn default() -> Self {
        Config {
            host: default_host(),
            matchmaking_path: default_matchmaking_path(),
            engine_path: default_engine_path(),
            commit_window_ms: default_commit_window_ms(),
            settle_delay_ms: default_settle_delay_ms(),
        }
    }
}
