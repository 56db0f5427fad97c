use super::{ensure_parent_dir, private_open_options, set_private_permissions};
use crate::constants::*;
use crate::errors::StorageError;
use crate::types::{AnalysisResult, Tweet};
use std::fs::{self, File};
use std::path::{Path, PathBuf};
use tracing::{debug, error};

/// A scoped CSV writer for the intermediate tweet file and the results file.
///
/// The file handle lives exactly as long as the writer. `close` flushes and
/// reports errors; dropping the writer on any other path still flushes on a
/// best-effort basis.
#[derive(Debug)]
pub struct CsvWriter {
    path: PathBuf,
    writer: csv::Writer<File>,
    header_written: bool,
}

impl CsvWriter {
    /// Opens `path` for writing.
    ///
    /// With `append = true` an existing file is extended and, if it already
    /// has content, no header is written again. Otherwise the file is
    /// truncated and the first write emits exactly one header row.
    pub fn open(path: impl AsRef<Path>, append: bool) -> Result<Self, StorageError> {
        let path = path.as_ref();
        ensure_parent_dir(path)?;

        let has_content = append
            && fs::metadata(path)
                .map(|m| m.len() > 0)
                .unwrap_or(false);

        let mut options = private_open_options();
        options.create(true);
        if append {
            options.append(true);
        } else {
            options.write(true).truncate(true);
        }
        let file = options.open(path).map_err(|e| {
            error!("Error opening CSV writer {}: {e}", path.display());
            StorageError::from_io(path, e)
        })?;
        set_private_permissions(path)?;

        let writer = csv::WriterBuilder::new()
            .has_headers(false)
            .from_writer(file);

        debug!(
            "Opened CSV writer {} (append={append}, header_present={has_content})",
            path.display()
        );
        Ok(Self {
            path: path.to_path_buf(),
            writer,
            header_written: has_content,
        })
    }

    fn write_header(&mut self, header: [&str; 2]) -> Result<(), StorageError> {
        if self.header_written {
            return Ok(());
        }
        self.writer
            .write_record(header)
            .map_err(|e| StorageError::from_csv(&self.path, e))?;
        self.header_written = true;
        Ok(())
    }

    fn flush(&mut self) -> Result<(), StorageError> {
        self.writer
            .flush()
            .map_err(|e| StorageError::from_io(&self.path, e))
    }

    /// Writes the `id,text` header (once) followed by one row per tweet.
    pub fn write_tweets(&mut self, tweets: &[Tweet]) -> Result<(), StorageError> {
        self.write_header([TWEET_CSV_ID_COLUMN, TWEET_CSV_TEXT_COLUMN])?;
        for tweet in tweets {
            self.writer
                .write_record([tweet.id.as_str(), tweet.content.as_str()])
                .map_err(|e| {
                    error!("Error writing tweets to {}: {e}", self.path.display());
                    StorageError::from_csv(&self.path, e)
                })?;
        }
        self.flush()
    }

    /// Appends one result row and flushes it to disk immediately.
    pub fn write_result(&mut self, result: &AnalysisResult) -> Result<(), StorageError> {
        self.write_header([RESULT_CSV_URL_COLUMN, RESULT_CSV_DELETED_COLUMN])?;
        let deleted = if result.should_delete() {
            CSV_BOOL_TRUE
        } else {
            CSV_BOOL_FALSE
        };
        self.writer
            .write_record([result.tweet_url.as_str(), deleted])
            .map_err(|e| {
                error!("Error writing result to {}: {e}", self.path.display());
                StorageError::from_csv(&self.path, e)
            })?;
        self.flush()
    }

    /// Flushes and releases the file.
    pub fn close(mut self) -> Result<(), StorageError> {
        self.flush()
    }
}
