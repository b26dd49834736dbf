//! Configuration loading from TOML with environment variable resolution.
//!
//! Reads `config.toml` and deserializes into strongly-typed structs.
//! Secrets (the Sheets API token) are referenced by env-var name in the
//! config and resolved at runtime via `std::env::var`.

use anyhow::{Context, Result};
use rust_decimal::Decimal;
use serde::Deserialize;
use std::fs;

/// Top-level application configuration.
#[derive(Debug, Deserialize, Clone)]
pub struct AppConfig {
    pub tracker: TrackerConfig,
    pub sheet: SheetConfig,
    pub dashboard: DashboardConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct TrackerConfig {
    pub name: String,
    /// Starting bankroll; the displayed balance is this plus net profit
    /// minus pending exposure.
    pub initial_bankroll: Decimal,
    pub currency: String,
    pub refresh_interval_secs: u64,
}

#[derive(Debug, Deserialize, Clone)]
pub struct SheetConfig {
    /// "google" for the live spreadsheet, "file" for a local snapshot.
    pub provider: String,
    /// Google spreadsheet id (google provider only).
    #[serde(default)]
    pub spreadsheet_id: Option<String>,
    /// Env var holding the bearer token (google provider only).
    #[serde(default)]
    pub token_env: Option<String>,
    #[serde(default = "default_bets_range")]
    pub bets_range: String,
    #[serde(default = "default_competitions_range")]
    pub competitions_range: String,
    /// Path of the local snapshot (file provider only).
    #[serde(default)]
    pub snapshot_path: Option<String>,
}

fn default_bets_range() -> String {
    "Bets!A2:G".to_string()
}

fn default_competitions_range() -> String {
    "Competitions!A2:E".to_string()
}

#[derive(Debug, Deserialize, Clone)]
pub struct DashboardConfig {
    pub enabled: bool,
    pub port: u16,
}

impl AppConfig {
    /// Load configuration from a TOML file.
    pub fn load(path: &str) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {path}"))?;
        let config: AppConfig = toml::from_str(&contents)
            .with_context(|| format!("Failed to parse config file: {path}"))?;
        Ok(config)
    }

    /// Resolve an environment variable name to its value.
    /// Useful for loading secrets referenced in the config.
    pub fn resolve_env(env_name: &str) -> Result<String> {
        std::env::var(env_name)
            .with_context(|| format!("Environment variable not set: {env_name}"))
    }
}
