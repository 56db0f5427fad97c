//! # Record Store and Checkpoint Store
//!
//! File adapters for the three on-disk shapes the tool works with: the vendor
//! archive (read only), the intermediate `id,text` CSV and the
//! `tweet_url,deleted` results CSV, plus the single-integer checkpoint file.
//!
//! Every file written here is created owner-only (`0o600`) inside directories
//! created with `0o750`.

pub mod checkpoint;
pub mod parser;
pub mod writer;

pub use checkpoint::Checkpoint;
pub use parser::{CsvResultParser, CsvTweetParser, JsonArchiveParser, Parser};
pub use writer::CsvWriter;

use crate::constants::{PRIVATE_DIR_MODE, PRIVATE_FILE_MODE};
use crate::errors::StorageError;
use std::fs;
use std::path::Path;

/// Creates the parent directory of `path` (recursively) if it is missing.
pub(crate) fn ensure_parent_dir(path: &Path) -> Result<(), StorageError> {
    let parent = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => return Ok(()),
    };
    if parent.exists() {
        return Ok(());
    }

    let mut builder = fs::DirBuilder::new();
    builder.recursive(true);
    #[cfg(unix)]
    {
        use std::os::unix::fs::DirBuilderExt;
        builder.mode(PRIVATE_DIR_MODE);
    }
    builder
        .create(parent)
        .map_err(|e| StorageError::from_io(parent, e))?;

    // The creation mode is masked by the umask.
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        fs::set_permissions(parent, fs::Permissions::from_mode(PRIVATE_DIR_MODE))
            .map_err(|e| StorageError::from_io(parent, e))?;
    }
    Ok(())
}

/// Restricts `path` to owner read/write.
pub(crate) fn set_private_permissions(path: &Path) -> Result<(), StorageError> {
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        fs::set_permissions(path, fs::Permissions::from_mode(PRIVATE_FILE_MODE))
            .map_err(|e| StorageError::from_io(path, e))?;
    }
    #[cfg(not(unix))]
    let _ = (path, PRIVATE_FILE_MODE);
    Ok(())
}

/// Open options for a file the tool owns, creating it owner-only.
pub(crate) fn private_open_options() -> fs::OpenOptions {
    let mut options = fs::OpenOptions::new();
    #[cfg(unix)]
    {
        use std::os::unix::fs::OpenOptionsExt;
        options.mode(PRIVATE_FILE_MODE);
    }
    options
}
