use crate::constants::{
    DEFAULT_INITIAL_RETRY_DELAY_SECONDS, DEFAULT_MAX_RETRIES, RETRYABLE_ERROR_KEYWORDS,
};
use crate::errors::{AnalyzerError, ConfigError};
use rand::Rng;
use std::fmt;
use std::time::Duration;

/// Decides whether a failed attempt is worth repeating.
pub type RetryPredicate = fn(&AnalyzerError) -> bool;

/// Computes the pause before the retry that follows attempt `attempt` (0-based).
pub type BackoffFn = fn(initial_delay: Duration, attempt: u32) -> Duration;

/// The default predicate: answers that failed validation are final, anything
/// else is retried when its message looks like a transient failure (timeouts,
/// connection problems, rate limits, quota, HTTP 429/503).
pub fn is_transient_error(err: &AnalyzerError) -> bool {
    if err.is_validation_error() {
        return false;
    }
    let message = err.to_string().to_lowercase();
    RETRYABLE_ERROR_KEYWORDS
        .iter()
        .any(|keyword| message.contains(keyword))
}

/// `initial_delay * 2^attempt`.
pub fn exponential_backoff(initial_delay: Duration, attempt: u32) -> Duration {
    initial_delay.saturating_mul(1u32 << attempt.min(16))
}

/// `initial_delay * 2^attempt` plus up to one second of random jitter.
pub fn exponential_backoff_with_jitter(initial_delay: Duration, attempt: u32) -> Duration {
    let jitter = Duration::from_millis(rand::thread_rng().gen_range(0..1000));
    exponential_backoff(initial_delay, attempt) + jitter
}

/// How many times an analysis is attempted and how long to wait in between.
#[derive(Clone, Copy)]
pub struct RetryPolicy {
    max_attempts: u32,
    initial_delay: Duration,
    is_retryable: RetryPredicate,
    backoff: BackoffFn,
}

impl fmt::Debug for RetryPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RetryPolicy")
            .field("max_attempts", &self.max_attempts)
            .field("initial_delay", &self.initial_delay)
            .finish_non_exhaustive()
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: DEFAULT_MAX_RETRIES,
            initial_delay: Duration::from_secs_f64(DEFAULT_INITIAL_RETRY_DELAY_SECONDS),
            is_retryable: is_transient_error,
            backoff: exponential_backoff_with_jitter,
        }
    }
}

impl RetryPolicy {
    /// `max_attempts` counts the first call, so it must be at least 1.
    pub fn new(max_attempts: u32, initial_delay: Duration) -> Result<Self, ConfigError> {
        if max_attempts < 1 {
            return Err(ConfigError::InvalidValue {
                key: "max_retries".to_string(),
                reason: format!("must be at least 1, got {max_attempts}"),
            });
        }
        Ok(Self {
            max_attempts,
            initial_delay,
            ..Self::default()
        })
    }

    pub fn with_predicate(mut self, is_retryable: RetryPredicate) -> Self {
        self.is_retryable = is_retryable;
        self
    }

    pub fn with_backoff(mut self, backoff: BackoffFn) -> Self {
        self.backoff = backoff;
        self
    }

    pub fn max_attempts(&self) -> u32 {
        self.max_attempts
    }

    /// True when attempt `attempt` (0-based) failed with `err` and another
    /// attempt is both allowed and worthwhile.
    pub fn should_retry(&self, err: &AnalyzerError, attempt: u32) -> bool {
        attempt + 1 < self.max_attempts && (self.is_retryable)(err)
    }

    /// The pause before the attempt following `attempt`.
    pub fn delay_for(&self, attempt: u32) -> Duration {
        (self.backoff)(self.initial_delay, attempt)
    }
}
