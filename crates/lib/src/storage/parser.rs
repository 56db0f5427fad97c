use crate::constants::*;
use crate::errors::StorageError;
use crate::types::{AnalysisResult, Decision, Tweet};
use serde::Deserialize;
use serde_json::Value;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{error, info};

/// A reader for one of the tabular or archive formats.
///
/// Readers never drop or invent records: a missing file is `NotFound` and any
/// record that does not fit the format fails the whole read with `InvalidFormat`.
pub trait Parser {
    type Record;

    fn parse(&self) -> Result<Vec<Self::Record>, StorageError>;
}

// --- Twitter archive ---

/// Reads tweets from a Twitter archive export.
///
/// Accepts a JSON array whose elements are either `{"tweet": {...}}` wrappers
/// or bare tweet objects. The `window.YTD.tweets.part0 = ` assignment that
/// prefixes `tweets.js` in real exports is stripped first.
#[derive(Debug, Clone)]
pub struct JsonArchiveParser {
    path: PathBuf,
}

impl JsonArchiveParser {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    fn invalid(&self, reason: impl Into<String>) -> StorageError {
        StorageError::InvalidFormat {
            path: self.path.clone(),
            reason: reason.into(),
        }
    }

    fn string_field(&self, tweet: &Value, field: &str, index: usize) -> Result<String, StorageError> {
        match tweet.get(field) {
            Some(Value::String(s)) => Ok(s.clone()),
            Some(other) => Err(self.invalid(format!(
                "Field '{field}' of entry {index} must be a string, found {other}"
            ))),
            None => Err(self.invalid(format!(
                "Missing required field '{field}' in entry {index}"
            ))),
        }
    }
}

fn strip_assignment_prefix(content: &str) -> &str {
    let trimmed = content.trim_start_matches('\u{feff}').trim_start();
    if trimmed.starts_with("window.") {
        if let Some(eq) = trimmed.find('=') {
            return trimmed[eq + 1..].trim_start();
        }
    }
    trimmed
}

impl Parser for JsonArchiveParser {
    type Record = Tweet;

    fn parse(&self) -> Result<Vec<Tweet>, StorageError> {
        let content = fs::read_to_string(&self.path).map_err(|e| {
            error!("Error reading archive {}: {e}", self.path.display());
            StorageError::from_io(&self.path, e)
        })?;

        let entries: Vec<Value> =
            serde_json::from_str(strip_assignment_prefix(&content)).map_err(|e| {
                error!("Error parsing JSON file {}: {e}", self.path.display());
                self.invalid(format!("Invalid JSON: {e}"))
            })?;

        let tweets = entries
            .iter()
            .enumerate()
            .map(|(index, entry)| {
                let tweet = entry.get("tweet").unwrap_or(entry);
                if !tweet.is_object() {
                    return Err(self.invalid(format!("Entry {index} is not a tweet object")));
                }
                Ok(Tweet::new(
                    self.string_field(tweet, ARCHIVE_ID_FIELD, index)?,
                    self.string_field(tweet, ARCHIVE_TEXT_FIELD, index)?,
                ))
            })
            .collect::<Result<Vec<_>, _>>()?;

        info!(
            "Parsed {} tweets from archive {}",
            tweets.len(),
            self.path.display()
        );
        Ok(tweets)
    }
}

// --- CSV helpers ---

fn open_csv(path: &Path, required: &[&str]) -> Result<csv::Reader<fs::File>, StorageError> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .from_path(path)
        .map_err(|e| StorageError::from_csv(path, e))?;

    let headers = reader
        .headers()
        .map_err(|e| StorageError::from_csv(path, e))?
        .clone();
    for column in required {
        if !headers.iter().any(|h| h == *column) {
            error!("CSV file {} lacks column '{column}'", path.display());
            return Err(StorageError::InvalidFormat {
                path: path.to_path_buf(),
                reason: format!("Missing required column '{column}'"),
            });
        }
    }
    Ok(reader)
}

// --- Intermediate tweet CSV ---

/// Reads the intermediate `id,text` CSV written by the extraction stage.
#[derive(Debug, Clone)]
pub struct CsvTweetParser {
    path: PathBuf,
}

impl CsvTweetParser {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl Parser for CsvTweetParser {
    type Record = Tweet;

    fn parse(&self) -> Result<Vec<Tweet>, StorageError> {
        let mut reader = open_csv(&self.path, &[TWEET_CSV_ID_COLUMN, TWEET_CSV_TEXT_COLUMN])?;
        reader
            .deserialize::<Tweet>()
            .map(|row| row.map_err(|e| StorageError::from_csv(&self.path, e)))
            .collect()
    }
}

// --- Results CSV ---

#[derive(Deserialize)]
struct ResultRow {
    tweet_url: String,
    deleted: String,
}

/// Reads the `tweet_url,deleted` results CSV.
#[derive(Debug, Clone)]
pub struct CsvResultParser {
    path: PathBuf,
}

impl CsvResultParser {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl Parser for CsvResultParser {
    type Record = AnalysisResult;

    fn parse(&self) -> Result<Vec<AnalysisResult>, StorageError> {
        let mut reader = open_csv(
            &self.path,
            &[RESULT_CSV_URL_COLUMN, RESULT_CSV_DELETED_COLUMN],
        )?;
        reader
            .deserialize::<ResultRow>()
            .enumerate()
            .map(|(index, row)| {
                let row = row.map_err(|e| StorageError::from_csv(&self.path, e))?;
                let decision = match row.deleted.as_str() {
                    CSV_BOOL_TRUE => Decision::Delete,
                    CSV_BOOL_FALSE => Decision::Keep,
                    other => {
                        return Err(StorageError::InvalidFormat {
                            path: self.path.clone(),
                            reason: format!(
                                "Row {} has '{other}' in '{RESULT_CSV_DELETED_COLUMN}', expected true or false",
                                index + 1
                            ),
                        })
                    }
                };
                Ok(AnalysisResult {
                    tweet_url: row.tweet_url,
                    decision,
                })
            })
            .collect()
    }
}
