//! # Tweet Audit
//!
//! This crate evaluates an exported tweet archive against a configurable set of
//! content criteria using a generative language model, producing a resumable
//! worklist of tweets that should be deleted.
//!
//! The work is split into two stages:
//!
//! 1.  **Extraction:** the vendor archive is flattened into an intermediate
//!     `id,text` CSV file.
//! 2.  **Analysis:** every tweet is sent to the model in fixed-size batches. Only
//!     tweets marked for deletion are written to the results file, and a
//!     checkpoint is committed after each completed batch so an interrupted run
//!     can resume without re-paying for finished work.

pub mod analyzer;
pub mod application;
pub mod config;
pub mod constants;
pub mod errors;
pub mod pipeline;
pub mod prompts;
pub mod providers;
pub mod storage;
pub mod types;

pub use analyzer::{GeminiAnalyzer, RateLimiter, RetryPolicy, TweetAnalyzer};
pub use application::Application;
pub use crate::config::{get_config, Settings};
pub use errors::{AnalyzerError, AuditError, ConfigError, ErrorKind, StorageError};
pub use pipeline::BatchRunner;
pub use types::{AnalysisResult, Criteria, Decision, RunResult, Tweet};
