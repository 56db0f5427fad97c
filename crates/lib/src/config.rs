//! # Application Configuration
//!
//! This module defines the `Settings` struct consumed by the analyzer, the batch
//! runner and the application operations, and the logic for assembling it.
//!
//! Settings are resolved in layers, each overriding the previous one:
//! 1. Programmatic defaults from `constants`.
//! 2. An optional JSON config file (`config.json` unless overridden). `${VAR}`
//!    references inside the file are expanded from the environment. A
//!    `criteria` object in this file replaces the default criteria as a whole.
//! 3. Environment variables named after the fields (`GEMINI_API_KEY`,
//!    `BATCH_SIZE`, `RATE_LIMIT_SECONDS`, ...).

use crate::constants::*;
use crate::errors::ConfigError;
use crate::types::Criteria;
use config::{Config as ConfigBuilder, Environment, File, FileFormat};
use regex::Regex;
use serde::Deserialize;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::info;

/// Every knob the tool reads, resolved once at process start.
#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    pub tweets_archive_path: PathBuf,
    pub transformed_tweets_path: PathBuf,
    pub checkpoint_path: PathBuf,
    pub processed_results_path: PathBuf,
    pub base_twitter_url: String,
    pub x_username: String,
    /// Empty when unset; the analyzer refuses to start without it.
    pub gemini_api_key: String,
    pub gemini_model: String,
    pub gemini_api_url: String,
    pub batch_size: usize,
    /// Minimum time between two Gemini requests.
    pub rate_limit_seconds: f64,
    /// Total attempts per tweet, including the first one.
    pub max_retries: u32,
    pub initial_retry_delay_seconds: f64,
    #[serde(default = "Criteria::defaults")]
    pub criteria: Criteria,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            tweets_archive_path: PathBuf::from(DEFAULT_TWEETS_ARCHIVE_PATH),
            transformed_tweets_path: PathBuf::from(DEFAULT_TRANSFORMED_TWEETS_PATH),
            checkpoint_path: PathBuf::from(DEFAULT_CHECKPOINT_PATH),
            processed_results_path: PathBuf::from(DEFAULT_PROCESSED_RESULTS_PATH),
            base_twitter_url: DEFAULT_BASE_TWITTER_URL.to_string(),
            x_username: DEFAULT_X_USERNAME.to_string(),
            gemini_api_key: String::new(),
            gemini_model: DEFAULT_GEMINI_MODEL.to_string(),
            gemini_api_url: DEFAULT_GEMINI_API_URL.to_string(),
            batch_size: DEFAULT_BATCH_SIZE,
            rate_limit_seconds: DEFAULT_RATE_LIMIT_SECONDS,
            max_retries: DEFAULT_MAX_RETRIES,
            initial_retry_delay_seconds: DEFAULT_INITIAL_RETRY_DELAY_SECONDS,
            criteria: Criteria::defaults(),
        }
    }
}

impl Settings {
    /// The public URL of a tweet, written to the results file.
    pub fn tweet_url(&self, tweet_id: &str) -> String {
        format!(
            "{}/{}/status/{}",
            self.base_twitter_url.trim_end_matches('/'),
            self.x_username,
            tweet_id
        )
    }

    pub fn rate_limit_interval(&self) -> Duration {
        Duration::from_secs_f64(self.rate_limit_seconds)
    }

    pub fn initial_retry_delay(&self) -> Duration {
        Duration::from_secs_f64(self.initial_retry_delay_seconds)
    }

    /// Rejects values the runner and analyzer cannot work with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.batch_size == 0 {
            return Err(ConfigError::InvalidValue {
                key: "batch_size".to_string(),
                reason: "must be a positive integer".to_string(),
            });
        }
        if !self.rate_limit_seconds.is_finite() || self.rate_limit_seconds < 0.0 {
            return Err(ConfigError::InvalidValue {
                key: "rate_limit_seconds".to_string(),
                reason: format!("must be zero or positive, got {}", self.rate_limit_seconds),
            });
        }
        if !self.initial_retry_delay_seconds.is_finite() || self.initial_retry_delay_seconds < 0.0
        {
            return Err(ConfigError::InvalidValue {
                key: "initial_retry_delay_seconds".to_string(),
                reason: format!(
                    "must be zero or positive, got {}",
                    self.initial_retry_delay_seconds
                ),
            });
        }
        if self.max_retries == 0 {
            return Err(ConfigError::InvalidValue {
                key: "max_retries".to_string(),
                reason: "must be at least 1".to_string(),
            });
        }
        Ok(())
    }
}

// Reads a file and expands `${VAR}` references from the environment.
// Returns Ok(None) if the file does not exist.
fn read_and_substitute(path: &Path) -> Result<Option<String>, ConfigError> {
    if !path.exists() {
        return Ok(None);
    }

    let content = fs::read_to_string(path).map_err(|e| {
        ConfigError::General(format!(
            "Failed to read config file '{}': {e}",
            path.display()
        ))
    })?;

    let re = Regex::new(r"\$\{(?P<var>[A-Z0-9_]+)\}")
        .map_err(|e| ConfigError::General(format!("Invalid substitution pattern: {e}")))?;
    let expanded = re.replace_all(&content, |caps: &regex::Captures| {
        env::var(&caps["var"]).unwrap_or_default()
    });

    Ok(Some(expanded.into_owned()))
}

/// Loads the settings from defaults, an optional config file and the environment.
pub fn get_config(config_path_override: Option<&Path>) -> Result<Settings, ConfigError> {
    let defaults = Settings::default();
    let mut builder = ConfigBuilder::builder()
        .set_default(
            "tweets_archive_path",
            defaults.tweets_archive_path.to_string_lossy().to_string(),
        )?
        .set_default(
            "transformed_tweets_path",
            defaults.transformed_tweets_path.to_string_lossy().to_string(),
        )?
        .set_default(
            "checkpoint_path",
            defaults.checkpoint_path.to_string_lossy().to_string(),
        )?
        .set_default(
            "processed_results_path",
            defaults.processed_results_path.to_string_lossy().to_string(),
        )?
        .set_default("base_twitter_url", defaults.base_twitter_url)?
        .set_default("x_username", defaults.x_username)?
        .set_default("gemini_api_key", defaults.gemini_api_key)?
        .set_default("gemini_model", defaults.gemini_model)?
        .set_default("gemini_api_url", defaults.gemini_api_url)?
        .set_default("batch_size", defaults.batch_size as i64)?
        .set_default("rate_limit_seconds", defaults.rate_limit_seconds)?
        .set_default("max_retries", defaults.max_retries as i64)?
        .set_default(
            "initial_retry_delay_seconds",
            defaults.initial_retry_delay_seconds,
        )?;

    let config_path = config_path_override
        .map(Path::to_path_buf)
        .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_FILE));
    match read_and_substitute(&config_path)? {
        Some(content) => {
            info!("Loading configuration file '{}'.", config_path.display());
            builder = builder.add_source(File::from_str(&content, FileFormat::Json));
        }
        None => info!(
            "Config file '{}' not found, using default criteria.",
            config_path.display()
        ),
    }

    let settings: Settings = builder
        .add_source(
            Environment::default()
                .try_parsing(true)
                .ignore_empty(true),
        )
        .build()?
        .try_deserialize()?;

    settings.validate()?;
    Ok(settings)
}
