//! # Configuration Tests
//!
//! Tests for the layered settings loader. Environment variables are a shared,
//! global resource, so every test here runs serially and starts from a clean
//! slate.

use serial_test::serial;
use std::env;
use std::fs;
use std::path::PathBuf;
use tempfile::tempdir;
use tweet_audit::constants::*;
use tweet_audit::{get_config, ConfigError, Criteria, Settings};

const SETTINGS_VARS: &[&str] = &[
    "TWEETS_ARCHIVE_PATH",
    "TRANSFORMED_TWEETS_PATH",
    "CHECKPOINT_PATH",
    "PROCESSED_RESULTS_PATH",
    "BASE_TWITTER_URL",
    "X_USERNAME",
    "GEMINI_API_KEY",
    "GEMINI_MODEL",
    "GEMINI_API_URL",
    "BATCH_SIZE",
    "RATE_LIMIT_SECONDS",
    "MAX_RETRIES",
    "INITIAL_RETRY_DELAY_SECONDS",
    "TEST_AUDIT_KEY",
];

/// Clears all environment variables read by `get_config`.
fn clear_env_vars() {
    for var in SETTINGS_VARS {
        env::remove_var(var);
    }
}

fn missing_config_file() -> PathBuf {
    PathBuf::from("/nonexistent/tweet-audit/config.json")
}

#[test]
#[serial]
fn test_get_config_defaults() {
    clear_env_vars();

    let settings = get_config(Some(&missing_config_file())).expect("defaults should load");

    assert_eq!(
        settings.tweets_archive_path,
        PathBuf::from(DEFAULT_TWEETS_ARCHIVE_PATH)
    );
    assert_eq!(
        settings.processed_results_path,
        PathBuf::from(DEFAULT_PROCESSED_RESULTS_PATH)
    );
    assert_eq!(settings.checkpoint_path, PathBuf::from(DEFAULT_CHECKPOINT_PATH));
    assert_eq!(settings.gemini_model, DEFAULT_GEMINI_MODEL);
    assert_eq!(settings.gemini_api_key, "");
    assert_eq!(settings.batch_size, DEFAULT_BATCH_SIZE);
    assert_eq!(settings.max_retries, DEFAULT_MAX_RETRIES);
    assert_eq!(settings.rate_limit_seconds, DEFAULT_RATE_LIMIT_SECONDS);
    assert_eq!(settings.criteria, Criteria::defaults());
}

#[test]
#[serial]
fn test_environment_overrides_defaults() {
    clear_env_vars();
    env::set_var("GEMINI_API_KEY", "env-key");
    env::set_var("X_USERNAME", "alice");
    env::set_var("BATCH_SIZE", "25");
    env::set_var("RATE_LIMIT_SECONDS", "0.5");
    env::set_var("TWEETS_ARCHIVE_PATH", "/tmp/archive/tweets.json");

    let settings = get_config(Some(&missing_config_file())).expect("config should load");
    clear_env_vars();

    assert_eq!(settings.gemini_api_key, "env-key");
    assert_eq!(settings.x_username, "alice");
    assert_eq!(settings.batch_size, 25);
    assert_eq!(settings.rate_limit_seconds, 0.5);
    assert_eq!(
        settings.tweets_archive_path,
        PathBuf::from("/tmp/archive/tweets.json")
    );
    assert_eq!(settings.tweet_url("99"), "https://x.com/alice/status/99");
}

#[test]
#[serial]
fn test_config_file_criteria_replace_defaults() {
    clear_env_vars();
    let dir = tempdir().unwrap();
    let config_path = dir.path().join("config.json");
    fs::write(
        &config_path,
        r#"{
            "criteria": {
                "topics_to_exclude": ["Cryptocurrency shilling"],
                "forbidden_words": ["moon", "lambo"]
            }
        }"#,
    )
    .unwrap();

    let settings = get_config(Some(&config_path)).expect("config should load");

    assert_eq!(
        settings.criteria,
        Criteria {
            topics_to_exclude: vec!["Cryptocurrency shilling".to_string()],
            tone_requirements: vec![],
            forbidden_words: vec!["moon".to_string(), "lambo".to_string()],
            additional_instructions: String::new(),
        }
    );
}

#[test]
#[serial]
fn test_config_file_substitutes_env_references() {
    clear_env_vars();
    env::set_var("TEST_AUDIT_KEY", "substituted-key");
    let dir = tempdir().unwrap();
    let config_path = dir.path().join("config.json");
    fs::write(
        &config_path,
        r#"{"gemini_api_key": "${TEST_AUDIT_KEY}", "batch_size": 5}"#,
    )
    .unwrap();

    let settings = get_config(Some(&config_path)).expect("config should load");
    clear_env_vars();

    assert_eq!(settings.gemini_api_key, "substituted-key");
    assert_eq!(settings.batch_size, 5);
}

#[test]
#[serial]
fn test_environment_overrides_config_file() {
    clear_env_vars();
    env::set_var("BATCH_SIZE", "7");
    let dir = tempdir().unwrap();
    let config_path = dir.path().join("config.json");
    fs::write(&config_path, r#"{"batch_size": 5}"#).unwrap();

    let settings = get_config(Some(&config_path)).expect("config should load");
    clear_env_vars();

    assert_eq!(settings.batch_size, 7);
}

#[test]
#[serial]
fn test_zero_batch_size_is_rejected() {
    clear_env_vars();
    env::set_var("BATCH_SIZE", "0");

    let result = get_config(Some(&missing_config_file()));
    clear_env_vars();

    match result {
        Err(ConfigError::InvalidValue { key, .. }) => assert_eq!(key, "batch_size"),
        other => panic!("Expected InvalidValue, got {other:?}"),
    }
}

#[test]
#[serial]
fn test_malformed_config_file_is_an_error() {
    clear_env_vars();
    let dir = tempdir().unwrap();
    let config_path = dir.path().join("config.json");
    fs::write(&config_path, "{ not valid json").unwrap();

    let result = get_config(Some(&config_path));

    assert!(matches!(result, Err(ConfigError::General(_))));
}

#[test]
fn test_tweet_url_trims_trailing_slash() {
    let settings = Settings {
        base_twitter_url: "https://twitter.com/".to_string(),
        x_username: "bob".to_string(),
        ..Settings::default()
    };

    assert_eq!(settings.tweet_url("123"), "https://twitter.com/bob/status/123");
}

#[test]
fn test_validate_rejects_negative_rate_limit() {
    let settings = Settings {
        rate_limit_seconds: -1.0,
        ..Settings::default()
    };

    assert!(settings.validate().is_err());
    assert!(Settings::default().validate().is_ok());
}

#[test]
fn test_default_settings_carry_built_in_criteria() {
    let criteria = Settings::default().criteria;

    assert_eq!(criteria, Criteria::defaults());
    assert!(!criteria.topics_to_exclude.is_empty());
    assert!(!criteria.additional_instructions.is_empty());
}
