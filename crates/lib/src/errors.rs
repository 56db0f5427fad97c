use std::path::PathBuf;
use thiserror::Error;

/// Errors raised by the archive/CSV adapters and the checkpoint store.
#[derive(Error, Debug)]
pub enum StorageError {
    #[error("File not found: {}", path.display())]
    NotFound { path: PathBuf },

    #[error("Invalid format in {}: {reason}", path.display())]
    InvalidFormat { path: PathBuf, reason: String },

    #[error("Permission denied for {}: {source}", path.display())]
    PermissionDenied {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Corrupted checkpoint {}: expected an integer, found {content:?}", path.display())]
    CorruptedCheckpoint { path: PathBuf, content: String },

    #[error("I/O error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("CSV error on {}: {source}", path.display())]
    Csv { path: PathBuf, source: csv::Error },
}

impl StorageError {
    /// Maps an `io::Error` to the matching variant, keeping the path for context.
    pub fn from_io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        let path = path.into();
        match source.kind() {
            std::io::ErrorKind::NotFound => StorageError::NotFound { path },
            std::io::ErrorKind::PermissionDenied => {
                StorageError::PermissionDenied { path, source }
            }
            _ => StorageError::Io { path, source },
        }
    }

    /// Maps a `csv::Error`, unwrapping the I/O cases so they keep their kind.
    pub fn from_csv(path: impl Into<PathBuf>, source: csv::Error) -> Self {
        let path = path.into();
        if let csv::ErrorKind::Io(io) = source.kind() {
            return StorageError::from_io(path, std::io::Error::new(io.kind(), io.to_string()));
        }
        StorageError::Csv { path, source }
    }
}

/// Errors raised while asking the model for a decision on a single tweet.
#[derive(Error, Debug)]
pub enum AnalyzerError {
    #[error("Empty response from Gemini for tweet {tweet_id} (response: {response:?})")]
    EmptyResponse { tweet_id: String, response: String },

    #[error("Invalid Gemini response for tweet {tweet_id}: {reason} (response: {response})")]
    MalformedResponse {
        tweet_id: String,
        reason: String,
        response: String,
    },

    #[error("Missing {field} field in Gemini response for tweet {tweet_id} (response: {response})")]
    MissingField {
        tweet_id: String,
        field: String,
        response: String,
    },

    #[error("Invalid decision value {value:?} from Gemini for tweet {tweet_id} (response: {response})")]
    InvalidDecision {
        tweet_id: String,
        value: String,
        response: String,
    },

    #[error("Gemini API request failed: {0}")]
    Transport(String),

    #[error("Gemini API returned status {status}: {body}")]
    Api { status: u16, body: String },

    #[error("Failed to build Reqwest client: {0}")]
    ClientBuild(reqwest::Error),

    #[error("GEMINI_API_KEY is required. Set it via environment variable or .env file")]
    MissingApiKey,
}

impl AnalyzerError {
    /// True for the variants produced by validating the model's answer. These
    /// describe a bad answer, not a bad connection, and are never retried.
    pub fn is_validation_error(&self) -> bool {
        matches!(
            self,
            AnalyzerError::EmptyResponse { .. }
                | AnalyzerError::MalformedResponse { .. }
                | AnalyzerError::MissingField { .. }
                | AnalyzerError::InvalidDecision { .. }
        )
    }
}

impl From<reqwest::Error> for AnalyzerError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            AnalyzerError::Transport(format!("request timeout: {err}"))
        } else if err.is_connect() {
            AnalyzerError::Transport(format!("connection error: {err}"))
        } else if err.is_decode() {
            AnalyzerError::Transport(format!("undecodable response body: {err}"))
        } else {
            AnalyzerError::Transport(err.to_string())
        }
    }
}

/// Errors raised while assembling `Settings`.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Configuration error: {0}")]
    General(String),

    #[error("Invalid value for {key}: {reason}")]
    InvalidValue { key: String, reason: String },
}

impl From<config::ConfigError> for ConfigError {
    fn from(err: config::ConfigError) -> Self {
        ConfigError::General(err.to_string())
    }
}

/// The crate-level error, used at operation boundaries.
#[derive(Error, Debug)]
pub enum AuditError {
    #[error(transparent)]
    Storage(#[from] StorageError),

    #[error(transparent)]
    Analyzer(#[from] AnalyzerError),

    #[error(transparent)]
    Config(#[from] ConfigError),
}

/// Stable tags reported in a failed `RunResult`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    FileNotFound,
    InvalidFormat,
    PermissionDenied,
    CorruptedCheckpoint,
    AnalysisFailed,
    ConfigurationError,
    UnexpectedError,
}

impl ErrorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorKind::FileNotFound => "file_not_found",
            ErrorKind::InvalidFormat => "invalid_format",
            ErrorKind::PermissionDenied => "permission_denied",
            ErrorKind::CorruptedCheckpoint => "corrupted_checkpoint",
            ErrorKind::AnalysisFailed => "analysis_failed",
            ErrorKind::ConfigurationError => "configuration_error",
            ErrorKind::UnexpectedError => "unexpected_error",
        }
    }
}

impl std::fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<&StorageError> for ErrorKind {
    fn from(err: &StorageError) -> Self {
        match err {
            StorageError::NotFound { .. } => ErrorKind::FileNotFound,
            StorageError::InvalidFormat { .. } | StorageError::Csv { .. } => {
                ErrorKind::InvalidFormat
            }
            StorageError::PermissionDenied { .. } => ErrorKind::PermissionDenied,
            StorageError::CorruptedCheckpoint { .. } => ErrorKind::CorruptedCheckpoint,
            StorageError::Io { .. } => ErrorKind::UnexpectedError,
        }
    }
}

impl From<&AuditError> for ErrorKind {
    fn from(err: &AuditError) -> Self {
        match err {
            AuditError::Storage(e) => ErrorKind::from(e),
            AuditError::Analyzer(AnalyzerError::MissingApiKey)
            | AuditError::Analyzer(AnalyzerError::ClientBuild(_))
            | AuditError::Config(_) => ErrorKind::ConfigurationError,
            AuditError::Analyzer(_) => ErrorKind::AnalysisFailed,
        }
    }
}
