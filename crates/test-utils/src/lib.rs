use anyhow::Result;
use async_trait::async_trait;
use serde_json::json;
use std::collections::{HashMap, HashSet, VecDeque};
use std::fs;
use std::path::Path;
use std::sync::{Arc, Mutex};
use tweet_audit::errors::AnalyzerError;
use tweet_audit::providers::ai::AiProvider;
use tweet_audit::{Decision, Settings, Tweet, TweetAnalyzer};

// --- Mock AI Provider ---

/// A provider that replays a queue of scripted answers, one per call.
#[derive(Clone, Debug, Default)]
pub struct MockAiProvider {
    responses: Arc<Mutex<VecDeque<Result<String, AnalyzerError>>>>,
    calls: Arc<Mutex<Vec<String>>>,
}

impl MockAiProvider {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queues a raw text answer.
    pub fn push_response(&self, response: &str) {
        self.responses
            .lock()
            .unwrap()
            .push_back(Ok(response.to_string()));
    }

    /// Queues an error for the next call.
    pub fn push_error(&self, error: AnalyzerError) {
        self.responses.lock().unwrap().push_back(Err(error));
    }

    /// Retrieves the recorded prompts for assertion.
    pub fn get_calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl AiProvider for MockAiProvider {
    async fn generate(&self, prompt: &str) -> Result<String, AnalyzerError> {
        self.calls.lock().unwrap().push(prompt.to_string());
        self.responses
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| {
                Err(AnalyzerError::Api {
                    status: 400,
                    body: "MockAiProvider: no response programmed".to_string(),
                })
            })
    }
}

// --- Mock Analyzer ---

/// An analyzer with fixed decisions per tweet id.
///
/// Clones share their call log, so a clone can be boxed into an
/// `Application` while this handle is kept for assertions.
#[derive(Clone, Debug)]
pub struct MockAnalyzer {
    default_decision: Decision,
    decisions: HashMap<String, Decision>,
    failing: HashSet<String>,
    calls: Arc<Mutex<Vec<String>>>,
}

impl MockAnalyzer {
    pub fn new(default_decision: Decision) -> Self {
        Self {
            default_decision,
            decisions: HashMap::new(),
            failing: HashSet::new(),
            calls: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub fn with_decision(mut self, tweet_id: &str, decision: Decision) -> Self {
        self.decisions.insert(tweet_id.to_string(), decision);
        self
    }

    /// Makes every analysis of `tweet_id` fail with a malformed response.
    pub fn failing_on(mut self, tweet_id: &str) -> Self {
        self.failing.insert(tweet_id.to_string());
        self
    }

    /// The tweet ids analyzed so far, in call order.
    pub fn get_calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl TweetAnalyzer for MockAnalyzer {
    async fn analyze(&mut self, tweet: &Tweet) -> Result<Decision, AnalyzerError> {
        self.calls.lock().unwrap().push(tweet.id.clone());
        if self.failing.contains(&tweet.id) {
            return Err(AnalyzerError::MalformedResponse {
                tweet_id: tweet.id.clone(),
                reason: "mock failure".to_string(),
                response: "not json".to_string(),
            });
        }
        Ok(self
            .decisions
            .get(&tweet.id)
            .copied()
            .unwrap_or(self.default_decision))
    }
}

// --- Fixtures ---

/// Tweets with ids `"1"..="n"` and text `"Tweet number i"`.
pub fn sample_tweets(n: usize) -> Vec<Tweet> {
    (1..=n)
        .map(|i| Tweet::new(i.to_string(), format!("Tweet number {i}")))
        .collect()
}

/// Writes `tweets` as a Twitter archive export (`{"tweet": {...}}` entries).
pub fn write_archive(path: &Path, tweets: &[Tweet]) -> Result<()> {
    let entries: Vec<_> = tweets
        .iter()
        .map(|t| {
            json!({
                "tweet": {
                    "id_str": t.id,
                    "full_text": t.content,
                    "created_at": "Wed Oct 10 20:19:24 +0000 2018",
                    "favorite_count": "0"
                }
            })
        })
        .collect();
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(path, serde_json::to_string_pretty(&entries)?)?;
    Ok(())
}

/// Settings rooted in `dir`, with no rate limiting or retry delay.
pub fn test_settings(dir: &Path) -> Settings {
    Settings {
        tweets_archive_path: dir.join("tweets.json"),
        transformed_tweets_path: dir.join("transformed").join("tweets.csv"),
        checkpoint_path: dir.join("checkpoint.txt"),
        processed_results_path: dir.join("processed").join("results.csv"),
        base_twitter_url: "https://x.com".to_string(),
        x_username: "testuser".to_string(),
        gemini_api_key: "test-api-key".to_string(),
        rate_limit_seconds: 0.0,
        initial_retry_delay_seconds: 0.0,
        ..Settings::default()
    }
}
