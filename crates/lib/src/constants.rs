//! # Shared Constants
//!
//! File formats, permissions and defaults shared by the storage layer, the
//! configuration loader and the CLI.

/// Owner read/write only. Applied to every file the tool writes.
pub const PRIVATE_FILE_MODE: u32 = 0o600;

/// Owner rwx, group r-x. Applied to directories the tool creates.
pub const PRIVATE_DIR_MODE: u32 = 0o750;

// --- Twitter archive (vendor export) ---

/// The identifier field of a tweet object in the Twitter archive.
pub const ARCHIVE_ID_FIELD: &str = "id_str";
/// The text field of a tweet object in the Twitter archive.
pub const ARCHIVE_TEXT_FIELD: &str = "full_text";

// --- Intermediate tweet CSV ---

pub const TWEET_CSV_ID_COLUMN: &str = "id";
pub const TWEET_CSV_TEXT_COLUMN: &str = "text";

// --- Analysis result CSV ---

pub const RESULT_CSV_URL_COLUMN: &str = "tweet_url";
pub const RESULT_CSV_DELETED_COLUMN: &str = "deleted";

pub const CSV_BOOL_TRUE: &str = "true";
pub const CSV_BOOL_FALSE: &str = "false";

// --- Defaults ---

pub const DEFAULT_CONFIG_FILE: &str = "config.json";
pub const DEFAULT_TWEETS_ARCHIVE_PATH: &str = "data/tweets/tweets.json";
pub const DEFAULT_TRANSFORMED_TWEETS_PATH: &str = "data/tweets/transformed/tweets.csv";
pub const DEFAULT_CHECKPOINT_PATH: &str = "data/checkpoint.txt";
pub const DEFAULT_PROCESSED_RESULTS_PATH: &str = "data/tweets/processed/results.csv";
pub const DEFAULT_BASE_TWITTER_URL: &str = "https://x.com";
pub const DEFAULT_X_USERNAME: &str = "user";
pub const DEFAULT_GEMINI_MODEL: &str = "gemini-2.5-flash";
pub const DEFAULT_GEMINI_API_URL: &str = "https://generativelanguage.googleapis.com";
pub const DEFAULT_BATCH_SIZE: usize = 10;
pub const DEFAULT_RATE_LIMIT_SECONDS: f64 = 1.0;
pub const DEFAULT_MAX_RETRIES: u32 = 3;
pub const DEFAULT_INITIAL_RETRY_DELAY_SECONDS: f64 = 1.0;

/// Upper bound for a single Gemini HTTP request.
pub const GEMINI_REQUEST_TIMEOUT_SECS: u64 = 60;

/// Substrings (lowercase) that mark an error message as a transient failure.
pub const RETRYABLE_ERROR_KEYWORDS: &[&str] = &[
    "timeout",
    "connection",
    "rate limit",
    "quota",
    "503",
    "429",
    "temporarily unavailable",
];
