#![allow(dead_code)]
//! # Common Test Utilities
//!
//! Shared setup for the integration tests. Mocks and fixtures live in the
//! `tweet-audit-test-utils` crate.

use dotenvy::dotenv;
use std::fs;
use std::path::Path;
use std::sync::Once;

static INIT: Once = Once::new();

/// Initializes the tracing subscriber and loads .env for tests.
pub fn setup_tracing() {
    INIT.call_once(|| {
        dotenv().ok();
        let _ = tracing_subscriber::fmt()
            .with_test_writer()
            .with_env_filter(tracing_subscriber::EnvFilter::new("debug"))
            .try_init();
    });
}

/// Writes `content` to `path`, creating parent directories.
pub fn write_file(path: &Path, content: &str) {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).unwrap();
    }
    fs::write(path, content).unwrap();
}

/// The permission bits of `path`.
#[cfg(unix)]
pub fn mode_of(path: &Path) -> u32 {
    use std::os::unix::fs::PermissionsExt;
    fs::metadata(path).unwrap().permissions().mode() & 0o777
}
