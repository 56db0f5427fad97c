//! # Tweet Analyzer
//!
//! Turns a tweet into a `Decision` by asking the model. The analyzer owns the
//! pieces that wrap each request: the rate limiter that spaces requests out,
//! the retry policy that absorbs transient failures and the validation of the
//! model's JSON answer.

pub mod rate_limit;
pub mod retry;

pub use rate_limit::RateLimiter;
pub use retry::{
    exponential_backoff, exponential_backoff_with_jitter, is_transient_error, RetryPolicy,
};

use crate::config::Settings;
use crate::errors::{AnalyzerError, AuditError};
use crate::prompts::build_evaluation_prompt;
use crate::providers::ai::{AiProvider, GeminiProvider};
use crate::types::{Criteria, Decision, Tweet};
use async_trait::async_trait;
use serde_json::Value;
use tokio::time::sleep;
use tracing::{debug, warn};

/// Produces a decision for one tweet.
///
/// Takes `&mut self` because implementations carry per-run state (the rate
/// limiter cursor) and are driven by exactly one caller.
#[async_trait]
pub trait TweetAnalyzer: Send {
    async fn analyze(&mut self, tweet: &Tweet) -> Result<Decision, AnalyzerError>;
}

/// Removes a Markdown code fence around a JSON answer, if there is one.
fn strip_code_fence(raw: &str) -> &str {
    let trimmed = raw.trim();
    if let Some(rest) = trimmed.strip_prefix("```") {
        let rest = rest.strip_prefix("json").unwrap_or(rest);
        if let Some(body) = rest.strip_suffix("```") {
            return body.trim();
        }
    }
    trimmed
}

/// Validates the model's raw answer and extracts the decision.
///
/// Every error carries the tweet id and the raw text so a failure can be
/// diagnosed from the log alone.
pub fn parse_decision(tweet_id: &str, raw: &str) -> Result<Decision, AnalyzerError> {
    if raw.trim().is_empty() {
        return Err(AnalyzerError::EmptyResponse {
            tweet_id: tweet_id.to_string(),
            response: raw.to_string(),
        });
    }

    let data: Value =
        serde_json::from_str(strip_code_fence(raw)).map_err(|e| AnalyzerError::MalformedResponse {
            tweet_id: tweet_id.to_string(),
            reason: e.to_string(),
            response: raw.to_string(),
        })?;

    match data.get("decision") {
        None | Some(Value::Null) => Err(AnalyzerError::MissingField {
            tweet_id: tweet_id.to_string(),
            field: "decision".to_string(),
            response: raw.to_string(),
        }),
        Some(Value::String(value)) => {
            value
                .parse::<Decision>()
                .map_err(|_| AnalyzerError::InvalidDecision {
                    tweet_id: tweet_id.to_string(),
                    value: value.clone(),
                    response: raw.to_string(),
                })
        }
        Some(other) => Err(AnalyzerError::InvalidDecision {
            tweet_id: tweet_id.to_string(),
            value: other.to_string(),
            response: raw.to_string(),
        }),
    }
}

/// A `TweetAnalyzer` backed by a generative model provider.
#[derive(Debug)]
pub struct GeminiAnalyzer<P: AiProvider = GeminiProvider> {
    provider: P,
    criteria: Criteria,
    rate_limiter: RateLimiter,
    retry_policy: RetryPolicy,
}

impl GeminiAnalyzer<GeminiProvider> {
    /// Builds an analyzer talking to the Gemini API described by `settings`.
    ///
    /// Fails immediately when no API key is configured or when the timing
    /// settings are out of range.
    pub fn new(settings: &Settings) -> Result<Self, AuditError> {
        settings.validate()?;
        let provider = GeminiProvider::new(
            &settings.gemini_api_url,
            &settings.gemini_model,
            settings.gemini_api_key.clone(),
        )?;
        let retry_policy =
            RetryPolicy::new(settings.max_retries, settings.initial_retry_delay())?;
        Ok(Self::with_provider(
            provider,
            settings.criteria.clone(),
            RateLimiter::new(settings.rate_limit_interval()),
            retry_policy,
        ))
    }
}

impl<P: AiProvider> GeminiAnalyzer<P> {
    pub fn with_provider(
        provider: P,
        criteria: Criteria,
        rate_limiter: RateLimiter,
        retry_policy: RetryPolicy,
    ) -> Self {
        Self {
            provider,
            criteria,
            rate_limiter,
            retry_policy,
        }
    }

    /// One rate-limited request plus validation of its answer.
    async fn attempt(&mut self, tweet: &Tweet, prompt: &str) -> Result<Decision, AnalyzerError> {
        self.rate_limiter.wait().await;
        let raw = self.provider.generate(prompt).await?;
        parse_decision(&tweet.id, &raw)
    }
}

#[async_trait]
impl<P: AiProvider> TweetAnalyzer for GeminiAnalyzer<P> {
    async fn analyze(&mut self, tweet: &Tweet) -> Result<Decision, AnalyzerError> {
        let prompt = build_evaluation_prompt(tweet, &self.criteria);

        let mut attempt = 0;
        loop {
            match self.attempt(tweet, &prompt).await {
                Ok(decision) => {
                    debug!("Tweet {}: {decision}", tweet.id);
                    return Ok(decision);
                }
                Err(e) if self.retry_policy.should_retry(&e, attempt) => {
                    let delay = self.retry_policy.delay_for(attempt);
                    warn!(
                        "Attempt {}/{} for tweet {} failed: {e}. Retrying in {delay:?}",
                        attempt + 1,
                        self.retry_policy.max_attempts(),
                        tweet.id
                    );
                    sleep(delay).await;
                    attempt += 1;
                }
                Err(e) => return Err(e),
            }
        }
    }
}
