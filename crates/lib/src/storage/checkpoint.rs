use super::{ensure_parent_dir, private_open_options, set_private_permissions};
use crate::errors::StorageError;
use std::fs::{self, File};
use std::io::{Read, Seek, SeekFrom, Write};
use std::path::{Path, PathBuf};
use tracing::{error, warn};

/// The durable resume cursor: how many tweets, counted from the start of the
/// intermediate file, are fully processed.
///
/// A `Checkpoint` is an acquired file handle. `load` and `save` exist only on
/// an open checkpoint, and the handle is released when the value is closed or
/// dropped, on every exit path.
#[derive(Debug)]
pub struct Checkpoint {
    path: PathBuf,
    file: File,
}

impl Checkpoint {
    /// Opens (creating if needed) the checkpoint file at `path`.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, StorageError> {
        let path = path.as_ref();
        ensure_parent_dir(path)?;
        let file = Self::open_file(path)?;
        set_private_permissions(path)?;
        Ok(Self {
            path: path.to_path_buf(),
            file,
        })
    }

    fn open_file(path: &Path) -> Result<File, StorageError> {
        private_open_options()
            .read(true)
            .write(true)
            .create(true)
            .truncate(false)
            .open(path)
            .map_err(|e| StorageError::from_io(path, e))
    }

    /// Reads the stored cursor. An empty file means nothing has been processed.
    ///
    /// Content that is not a non-negative integer is reported as
    /// `CorruptedCheckpoint` instead of being treated as zero.
    pub fn load(&mut self) -> Result<usize, StorageError> {
        let mut content = String::new();
        self.file
            .seek(SeekFrom::Start(0))
            .and_then(|_| self.file.read_to_string(&mut content))
            .map_err(|e| StorageError::from_io(&self.path, e))?;

        let content = content.trim();
        if content.is_empty() {
            return Ok(0);
        }
        content.parse::<usize>().map_err(|_| {
            warn!("Could not load checkpoint {}: {content:?}", self.path.display());
            StorageError::CorruptedCheckpoint {
                path: self.path.clone(),
                content: content.to_string(),
            }
        })
    }

    /// Replaces the stored cursor with `index`.
    ///
    /// The value is written to a sibling temp file and renamed over the
    /// checkpoint, so a crash leaves either the old or the new value.
    pub fn save(&mut self, index: usize) -> Result<(), StorageError> {
        let mut tmp_name = self.path.file_name().unwrap_or_default().to_os_string();
        tmp_name.push(".tmp");
        let tmp_path = self.path.with_file_name(tmp_name);
        let result = self.replace_contents(&tmp_path, index);
        if let Err(e) = &result {
            error!("Error saving checkpoint {}: {e}", self.path.display());
            let _ = fs::remove_file(&tmp_path);
        }
        result
    }

    fn replace_contents(&mut self, tmp_path: &Path, index: usize) -> Result<(), StorageError> {
        let mut tmp = private_open_options()
            .write(true)
            .create(true)
            .truncate(true)
            .open(tmp_path)
            .map_err(|e| StorageError::from_io(tmp_path, e))?;
        tmp.write_all(index.to_string().as_bytes())
            .and_then(|_| tmp.sync_all())
            .map_err(|e| StorageError::from_io(tmp_path, e))?;
        drop(tmp);

        fs::rename(tmp_path, &self.path).map_err(|e| StorageError::from_io(&self.path, e))?;
        set_private_permissions(&self.path)?;
        // The old handle points at the replaced file.
        self.file = Self::open_file(&self.path)?;
        Ok(())
    }

    /// Releases the checkpoint file.
    pub fn close(self) -> Result<(), StorageError> {
        self.file
            .sync_all()
            .map_err(|e| StorageError::from_io(&self.path, e))
    }
}
