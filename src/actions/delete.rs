//! Safe file deletion.
//!
//! Deletion goes to the system trash by default (recoverable) with an
//! explicit flag for permanent removal. Every operation verifies the
//! file still matches its scan-time snapshot before touching it, and
//! batch operations report per-file failures without stopping.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::time::SystemTime;

use thiserror::Error;

use crate::scanner::FileRef;

/// Error type for deletion operations.
#[derive(Debug, Error)]
pub enum DeleteError {
    /// File was not found (may have been deleted or moved).
    #[error("file not found: {0}")]
    NotFound(PathBuf),

    /// Permission denied when attempting to delete.
    #[error("permission denied: {0}")]
    PermissionDenied(PathBuf),

    /// File was modified since the scan captured it.
    #[error("file modified since scan: {0}")]
    Modified(PathBuf),

    /// Trash operation failed.
    #[error("trash operation failed for {path}: {message}")]
    TrashFailed {
        /// Path that failed
        path: PathBuf,
        /// Description from the trash backend
        message: String,
    },

    /// The selected keep index does not name a cluster member.
    #[error("cannot delete all copies - at least one file must be preserved")]
    AllCopiesWouldBeDeleted,

    /// General I/O error.
    #[error("I/O error for {path}: {source}")]
    Io {
        /// Path where the error occurred
        path: PathBuf,
        /// The underlying I/O error
        #[source]
        source: io::Error,
    },
}

fn io_error(path: &Path, e: io::Error) -> DeleteError {
    match e.kind() {
        io::ErrorKind::NotFound => DeleteError::NotFound(path.to_path_buf()),
        io::ErrorKind::PermissionDenied => DeleteError::PermissionDenied(path.to_path_buf()),
        _ => DeleteError::Io {
            path: path.to_path_buf(),
            source: e,
        },
    }
}

/// Result of a successful deletion.
#[derive(Debug, Clone)]
pub struct DeleteResult {
    /// Path that was deleted.
    pub path: PathBuf,
    /// Size of the deleted file in bytes.
    pub size: u64,
    /// Whether deletion was permanent (true) or to trash (false).
    pub permanent: bool,
}

/// Results of a batch deletion.
#[derive(Debug, Clone, Default)]
pub struct BatchDeleteResult {
    /// Successfully deleted files.
    pub successes: Vec<DeleteResult>,
    /// Failed deletions with their error messages.
    pub failures: Vec<(PathBuf, String)>,
    /// Total bytes freed.
    pub bytes_freed: u64,
}

impl BatchDeleteResult {
    /// Check if all deletions succeeded.
    #[must_use]
    pub fn all_succeeded(&self) -> bool {
        self.failures.is_empty()
    }

    /// Human-readable summary of the operation.
    #[must_use]
    pub fn summary(&self) -> String {
        if self.all_succeeded() {
            format!(
                "Deleted {} file(s), freed {}",
                self.successes.len(),
                bytesize::ByteSize(self.bytes_freed)
            )
        } else {
            format!(
                "Deleted {} file(s), {} failed, freed {}",
                self.successes.len(),
                self.failures.len(),
                bytesize::ByteSize(self.bytes_freed)
            )
        }
    }
}

/// Configuration for deletion operations.
#[derive(Debug, Clone)]
pub struct DeleteConfig {
    /// Use permanent deletion instead of trash.
    pub permanent: bool,
    /// Verify size and mtime against the scan snapshot before deleting.
    pub verify_snapshot: bool,
}

impl Default for DeleteConfig {
    fn default() -> Self {
        Self {
            permanent: false,
            verify_snapshot: true,
        }
    }
}

impl DeleteConfig {
    /// Config for trash deletion.
    #[must_use]
    pub fn trash() -> Self {
        Self::default()
    }

    /// Config for permanent deletion.
    #[must_use]
    pub fn permanent() -> Self {
        Self {
            permanent: true,
            ..Self::default()
        }
    }

    /// Enable or disable snapshot verification.
    #[must_use]
    pub fn with_verify_snapshot(mut self, verify: bool) -> Self {
        self.verify_snapshot = verify;
        self
    }
}

/// Scan-time metadata snapshot for pre-deletion verification.
#[derive(Debug, Clone)]
pub struct FileSnapshot {
    /// Path to the file.
    pub path: PathBuf,
    /// File size in bytes.
    pub size: u64,
    /// Last modification time.
    pub mtime: Option<SystemTime>,
}

impl FileSnapshot {
    /// Snapshot a file's current on-disk state.
    ///
    /// # Errors
    ///
    /// Returns an error if the file doesn't exist or can't be accessed.
    pub fn capture(path: &Path) -> Result<Self, DeleteError> {
        let metadata = fs::metadata(path).map_err(|e| io_error(path, e))?;
        Ok(Self {
            path: path.to_path_buf(),
            size: metadata.len(),
            mtime: metadata.modified().ok(),
        })
    }

    /// Verify the on-disk file still matches this snapshot.
    ///
    /// # Errors
    ///
    /// Returns [`DeleteError::Modified`] if size or mtime changed, or a
    /// capture error if the file is gone.
    pub fn verify(&self) -> Result<(), DeleteError> {
        let current = Self::capture(&self.path)?;

        if let (Some(orig), Some(curr)) = (self.mtime, current.mtime) {
            if orig != curr {
                log::warn!("File modified since scan: {} (mtime)", self.path.display());
                return Err(DeleteError::Modified(self.path.clone()));
            }
        }
        if self.size != current.size {
            log::warn!("File modified since scan: {} (size)", self.path.display());
            return Err(DeleteError::Modified(self.path.clone()));
        }

        Ok(())
    }
}

impl From<&FileRef> for FileSnapshot {
    fn from(file: &FileRef) -> Self {
        Self {
            path: file.path.clone(),
            size: file.size,
            mtime: Some(file.modified),
        }
    }
}

/// Move a single file to the system trash.
///
/// # Errors
///
/// Returns [`DeleteError`] if the file is missing, deletion is not
/// permitted, or the trash backend fails.
pub fn delete_to_trash(path: &Path) -> Result<DeleteResult, DeleteError> {
    let metadata = fs::metadata(path).map_err(|e| io_error(path, e))?;
    let size = metadata.len();

    trash::delete(path).map_err(|e| {
        log::error!("Trash operation failed for {}: {}", path.display(), e);
        DeleteError::TrashFailed {
            path: path.to_path_buf(),
            message: e.to_string(),
        }
    })?;

    log::info!("Moved to trash: {} ({} bytes)", path.display(), size);
    Ok(DeleteResult {
        path: path.to_path_buf(),
        size,
        permanent: false,
    })
}

/// Permanently delete a single file.
///
/// This cannot be undone.
///
/// # Errors
///
/// Returns [`DeleteError`] if the file is missing or removal fails.
pub fn permanent_delete(path: &Path) -> Result<DeleteResult, DeleteError> {
    let metadata = fs::metadata(path).map_err(|e| io_error(path, e))?;
    let size = metadata.len();

    fs::remove_file(path).map_err(|e| io_error(path, e))?;

    log::info!("Permanently deleted: {} ({} bytes)", path.display(), size);
    Ok(DeleteResult {
        path: path.to_path_buf(),
        size,
        permanent: true,
    })
}

/// Delete one file according to config, with optional snapshot check.
pub(crate) fn delete_file(
    file: &FileRef,
    config: &DeleteConfig,
) -> Result<DeleteResult, DeleteError> {
    if config.verify_snapshot {
        FileSnapshot::from(file).verify()?;
    }

    if config.permanent {
        permanent_delete(&file.path)
    } else {
        delete_to_trash(&file.path)
    }
}
