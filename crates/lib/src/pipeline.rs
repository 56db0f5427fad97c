//! # Batch Runner
//!
//! Drives one analysis run over the ordered tweet list:
//!
//! 1.  Resume from the checkpoint cursor.
//! 2.  Split the remaining tweets into contiguous batches of `batch_size`.
//! 3.  Analyze each tweet in order, appending `DELETE` results to the results
//!     file as soon as they are known.
//! 4.  After a batch completes without error, commit `batch_start + batch_len`
//!     to the checkpoint.
//!
//! The first tweet that cannot be analyzed stops the run. The checkpoint then
//! still points at the start of the unfinished batch, so the next run repeats
//! that batch and nothing before it.

use crate::analyzer::TweetAnalyzer;
use crate::config::Settings;
use crate::errors::{AuditError, ErrorKind, StorageError};
use crate::storage::{Checkpoint, CsvWriter};
use crate::types::{AnalysisResult, Decision, RunResult, Tweet};
use tracing::{debug, error, info, warn};

pub struct BatchRunner<'a> {
    analyzer: &'a mut dyn TweetAnalyzer,
    settings: &'a Settings,
}

impl<'a> BatchRunner<'a> {
    pub fn new(analyzer: &'a mut dyn TweetAnalyzer, settings: &'a Settings) -> Self {
        Self { analyzer, settings }
    }

    fn storage_failure(err: StorageError, processed: usize) -> RunResult {
        error!("Storage failure during analysis: {err}");
        RunResult::from_error(&AuditError::from(err), processed)
    }

    /// Runs the analysis over `tweets` and reports how many were analyzed.
    ///
    /// An empty list returns immediately without touching the checkpoint or
    /// the results file.
    pub async fn run(&mut self, tweets: &[Tweet]) -> RunResult {
        if tweets.is_empty() {
            warn!("No tweets found to analyze");
            return RunResult::ok(0);
        }

        let mut checkpoint = match Checkpoint::open(&self.settings.checkpoint_path) {
            Ok(checkpoint) => checkpoint,
            Err(e) => return Self::storage_failure(e, 0),
        };
        let start_index = match checkpoint.load() {
            Ok(index) => index,
            Err(e) => return Self::storage_failure(e, 0),
        };

        if start_index >= tweets.len() {
            if start_index > tweets.len() {
                warn!(
                    "Checkpoint {start_index} is past the end of {} tweets; nothing to resume",
                    tweets.len()
                );
            }
            info!("All {} tweets were already analyzed", tweets.len());
            return match checkpoint.close() {
                Ok(()) => RunResult::ok(0),
                Err(e) => Self::storage_failure(e, 0),
            };
        }
        info!("Resuming from tweet index {start_index}");

        let mut writer = match CsvWriter::open(&self.settings.processed_results_path, true) {
            Ok(writer) => writer,
            Err(e) => return Self::storage_failure(e, 0),
        };

        let result = self
            .process_batches(tweets, start_index, &mut checkpoint, &mut writer)
            .await;

        // Release both files before reporting, whatever the outcome.
        let closed = writer.close().and(checkpoint.close());
        match closed {
            Err(e) if result.success => Self::storage_failure(e, result.processed_count),
            Err(e) => {
                warn!("Failed to release analysis files after an aborted run: {e}");
                result
            }
            Ok(()) => result,
        }
    }

    async fn process_batches(
        &mut self,
        tweets: &[Tweet],
        start_index: usize,
        checkpoint: &mut Checkpoint,
        writer: &mut CsvWriter,
    ) -> RunResult {
        let total = tweets.len();
        let batch_size = self.settings.batch_size.max(1);
        let total_batches = total.div_ceil(batch_size);
        let mut analyzed_count = 0;

        for batch_start in (start_index..total).step_by(batch_size) {
            let batch_end = (batch_start + batch_size).min(total);
            let batch = &tweets[batch_start..batch_end];
            info!(
                "Processing batch {}/{total_batches} (tweets {}-{batch_end} of {total})",
                batch_start / batch_size + 1,
                batch_start + 1,
            );

            for tweet in batch {
                let decision = match self.analyzer.analyze(tweet).await {
                    Ok(decision) => decision,
                    Err(e) => {
                        error!("Failed to analyze tweet {}: {e}", tweet.id);
                        return RunResult::failure(
                            ErrorKind::AnalysisFailed,
                            e.to_string(),
                            analyzed_count,
                        );
                    }
                };
                analyzed_count += 1;
                debug!("Tweet {}: {decision}", tweet.id);

                if decision == Decision::Delete {
                    let result = AnalysisResult {
                        tweet_url: self.settings.tweet_url(&tweet.id),
                        decision,
                    };
                    if let Err(e) = writer.write_result(&result) {
                        return Self::storage_failure(e, analyzed_count);
                    }
                }
            }

            if let Err(e) = checkpoint.save(batch_end) {
                return Self::storage_failure(e, analyzed_count);
            }
            info!("Checkpoint saved at index {batch_end}");
        }

        info!(
            "Analysis complete. Results written to {}",
            self.settings.processed_results_path.display()
        );
        RunResult::ok(analyzed_count)
    }
}
