pub mod gemini;

use crate::errors::AnalyzerError;
use async_trait::async_trait;
use std::fmt::Debug;

pub use gemini::GeminiProvider;

/// A trait for sending a prompt to a generative model.
///
/// Implementations only move text over the wire; validating what comes back
/// is the analyzer's job.
#[async_trait]
pub trait AiProvider: Send + Sync + Debug {
    /// Sends `prompt` and returns the model's raw text answer.
    ///
    /// An empty string means the model answered with no text.
    async fn generate(&self, prompt: &str) -> Result<String, AnalyzerError>;
}
