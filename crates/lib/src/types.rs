use crate::errors::{AuditError, ErrorKind};
use serde::Deserialize;
use std::fmt;

/// A single post from the archive. Identity is `id`; archive order is kept.
#[derive(Clone, PartialEq, Eq, Deserialize)]
pub struct Tweet {
    pub id: String,
    #[serde(rename = "text")]
    pub content: String,
}

impl Tweet {
    pub fn new(id: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            content: content.into(),
        }
    }
}

impl fmt::Debug for Tweet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let preview: String = self.content.chars().take(50).collect();
        let preview = if self.content.chars().count() > 50 {
            format!("{preview}...")
        } else {
            preview
        };
        f.debug_struct("Tweet")
            .field("id", &self.id)
            .field("content", &preview)
            .finish()
    }
}

/// The policy rules a tweet is judged against.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Criteria {
    #[serde(default)]
    pub topics_to_exclude: Vec<String>,
    #[serde(default)]
    pub tone_requirements: Vec<String>,
    #[serde(default)]
    pub forbidden_words: Vec<String>,
    #[serde(default)]
    pub additional_instructions: String,
}

impl Criteria {
    /// The criteria used when no config file overrides them.
    pub fn defaults() -> Self {
        Self {
            topics_to_exclude: vec![
                "Profanity or unprofessional language".to_string(),
                "Personal attacks or insults".to_string(),
                "Outdated political opinions".to_string(),
            ],
            tone_requirements: vec![
                "Professional language only".to_string(),
                "Respectful communication".to_string(),
            ],
            forbidden_words: Vec::new(),
            additional_instructions: "Flag any content that could harm professional reputation"
                .to_string(),
        }
    }
}

/// The model's verdict for a tweet.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    Delete,
    Keep,
}

impl Decision {
    pub fn as_str(&self) -> &'static str {
        match self {
            Decision::Delete => "DELETE",
            Decision::Keep => "KEEP",
        }
    }
}

impl std::str::FromStr for Decision {
    type Err = ();

    /// Case-insensitive; surrounding whitespace is ignored.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_uppercase().as_str() {
            "DELETE" => Ok(Decision::Delete),
            "KEEP" => Ok(Decision::Keep),
            _ => Err(()),
        }
    }
}

impl fmt::Display for Decision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A row of the results file: where the tweet lives and what to do with it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnalysisResult {
    pub tweet_url: String,
    pub decision: Decision,
}

impl AnalysisResult {
    pub fn should_delete(&self) -> bool {
        self.decision == Decision::Delete
    }
}

/// The outcome reported by `extract_tweets` and `analyze_tweets`.
///
/// A failed result still carries the number of tweets completed before the
/// failure, so callers can report partial progress.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunResult {
    pub success: bool,
    pub processed_count: usize,
    pub error_kind: Option<ErrorKind>,
    pub error_detail: Option<String>,
}

impl RunResult {
    pub fn ok(processed_count: usize) -> Self {
        Self {
            success: true,
            processed_count,
            error_kind: None,
            error_detail: None,
        }
    }

    pub fn failure(kind: ErrorKind, detail: impl Into<String>, processed_count: usize) -> Self {
        Self {
            success: false,
            processed_count,
            error_kind: Some(kind),
            error_detail: Some(detail.into()),
        }
    }

    /// Builds a failure from an error, tagging it with the matching `ErrorKind`.
    ///
    /// Errors without a specific kind only report a generic message; their
    /// details belong in the log.
    pub fn from_error(err: &AuditError, processed_count: usize) -> Self {
        let kind = ErrorKind::from(err);
        let detail = match kind {
            ErrorKind::UnexpectedError => "An unexpected error occurred".to_string(),
            _ => err.to_string(),
        };
        Self::failure(kind, detail, processed_count)
    }

    pub fn is_failure(&self) -> bool {
        !self.success
    }
}

impl fmt::Display for RunResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.success {
            return write!(f, "success (count={})", self.processed_count);
        }
        write!(
            f,
            "failure ({}: {}, count={})",
            self.error_kind.map(|k| k.as_str()).unwrap_or("unknown"),
            self.error_detail.as_deref().unwrap_or(""),
            self.processed_count
        )
    }
}
