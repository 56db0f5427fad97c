//! # Application Operations
//!
//! The two user-facing operations:
//!
//! - `extract_tweets`: archive export to the intermediate `id,text` CSV.
//! - `analyze_tweets`: intermediate CSV to the results file, through the
//!   checkpointed batch runner.
//!
//! Both return a `RunResult`. Errors never escape these methods; they are
//! logged with their full context and reported as a tagged failure.

use crate::analyzer::{GeminiAnalyzer, TweetAnalyzer};
use crate::config::Settings;
use crate::errors::AuditError;
use crate::pipeline::BatchRunner;
use crate::storage::{CsvTweetParser, CsvWriter, JsonArchiveParser, Parser};
use crate::types::{RunResult, Tweet};
use tracing::{error, info, warn};

pub struct Application {
    settings: Settings,
    analyzer: Option<Box<dyn TweetAnalyzer>>,
}

impl Application {
    pub fn new(settings: Settings) -> Self {
        Self {
            settings,
            analyzer: None,
        }
    }

    /// Uses `analyzer` instead of building a Gemini analyzer from the settings.
    pub fn with_analyzer(mut self, analyzer: Box<dyn TweetAnalyzer>) -> Self {
        self.analyzer = Some(analyzer);
        self
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    fn build_error_result(context: &str, err: AuditError, processed: usize) -> RunResult {
        error!("{context}: {err}");
        RunResult::from_error(&err, processed)
    }

    /// Reads the archive export and writes every tweet, in archive order, to
    /// the intermediate CSV. The intermediate file is rewritten on each run.
    ///
    /// An archive with no tweets still produces a header-only intermediate
    /// file, so a later analysis reports zero tweets rather than a missing file.
    pub fn extract_tweets(&self) -> RunResult {
        match self.write_transformed() {
            Ok(count) => RunResult::ok(count),
            Err(e) => Self::build_error_result("Tweet extraction failed", e, 0),
        }
    }

    fn write_transformed(&self) -> Result<usize, AuditError> {
        let tweets = JsonArchiveParser::new(&self.settings.tweets_archive_path).parse()?;
        if tweets.is_empty() {
            warn!(
                "No tweets found in archive {}",
                self.settings.tweets_archive_path.display()
            );
        }

        let mut writer = CsvWriter::open(&self.settings.transformed_tweets_path, false)?;
        writer.write_tweets(&tweets)?;
        writer.close()?;

        info!(
            "Extracted {} tweets to {}",
            tweets.len(),
            self.settings.transformed_tweets_path.display()
        );
        Ok(tweets.len())
    }

    fn load_transformed(&self) -> Result<Vec<Tweet>, AuditError> {
        let tweets = CsvTweetParser::new(&self.settings.transformed_tweets_path).parse()?;
        info!(
            "Loaded {} tweets from {}",
            tweets.len(),
            self.settings.transformed_tweets_path.display()
        );
        Ok(tweets)
    }

    /// Analyzes the extracted tweets, resuming from the checkpoint.
    ///
    /// The Gemini analyzer is only built once there is something to analyze,
    /// so a missing API key fails here as a configuration error before any
    /// tweet is sent.
    pub async fn analyze_tweets(&mut self) -> RunResult {
        let tweets = match self.load_transformed() {
            Ok(tweets) => tweets,
            Err(e) => return Self::build_error_result("Tweet analysis failed", e, 0),
        };
        if tweets.is_empty() {
            warn!("No tweets found to analyze");
            return RunResult::ok(0);
        }

        let analyzer = match self.analyzer.take() {
            Some(analyzer) => analyzer,
            None => match GeminiAnalyzer::new(&self.settings) {
                Ok(analyzer) => {
                    info!(
                        "Gemini analyzer initialized with model {}",
                        self.settings.gemini_model
                    );
                    Box::new(analyzer)
                }
                Err(e) => {
                    return Self::build_error_result("Failed to initialize analyzer", e, 0)
                }
            },
        };
        let analyzer = self.analyzer.insert(analyzer);

        let result = BatchRunner::new(&mut **analyzer, &self.settings)
            .run(&tweets)
            .await;
        if result.success {
            info!("Analyzed {} tweets", result.processed_count);
        }
        result
    }
}
