//! Scanner module for directory enumeration.
//!
//! This module provides:
//! - [`FileRef`]: an immutable reference to a file captured for a scan
//! - [`Walker`]: parallel directory traversal using jwalk
//! - [`WalkerConfig`]: filtering and traversal options
//!
//! # Example
//!
//! ```no_run
//! use dupecheck::scanner::{Walker, WalkerConfig};
//! use std::path::Path;
//!
//! let config = WalkerConfig {
//!     recursive: true,
//!     skip_hidden: true,
//!     ..Default::default()
//! };
//!
//! let walker = Walker::new(Path::new("."), config);
//! for entry in walker.walk() {
//!     match entry {
//!         Ok(file) => println!("{}: {} bytes", file.path.display(), file.size),
//!         Err(e) => eprintln!("Warning: {}", e),
//!     }
//! }
//! ```

pub mod walker;

use std::io;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::SystemTime;

pub use walker::Walker;

/// An immutable reference to a file captured during enumeration.
///
/// Holds the path plus the metadata needed for duplicate detection.
/// Content is never cached here; comparators read it on demand.
#[derive(Debug, Clone)]
pub struct FileRef {
    /// Path to the file
    pub path: PathBuf,
    /// File size in bytes
    pub size: u64,
    /// Last modification time
    pub modified: SystemTime,
}

impl FileRef {
    /// Create a new file reference.
    #[must_use]
    pub fn new(path: PathBuf, size: u64, modified: SystemTime) -> Self {
        Self {
            path,
            size,
            modified,
        }
    }

    /// Capture a file reference from disk metadata.
    ///
    /// # Errors
    ///
    /// Returns a [`ScanError`] if the metadata cannot be read.
    pub fn capture(path: PathBuf) -> Result<Self, ScanError> {
        let metadata = std::fs::metadata(&path).map_err(|e| ScanError::Metadata {
            path: path.clone(),
            source: Arc::new(e),
        })?;
        let modified = metadata.modified().unwrap_or(SystemTime::UNIX_EPOCH);
        Ok(Self::new(path, metadata.len(), modified))
    }
}

/// Configuration for directory walking.
#[derive(Debug, Clone, Default)]
pub struct WalkerConfig {
    /// Descend into subdirectories. When false, only the top level is listed.
    pub recursive: bool,

    /// Follow symbolic links during traversal.
    /// Warning: may cause infinite loops with symlink cycles.
    pub follow_symlinks: bool,

    /// Skip hidden files and directories (names starting with `.`).
    pub skip_hidden: bool,

    /// Minimum file size to include (in bytes).
    pub min_size: Option<u64>,

    /// Maximum file size to include (in bytes).
    pub max_size: Option<u64>,

    /// Glob patterns to ignore (gitignore-style).
    /// Applied in addition to any .gitignore at the scan root.
    pub ignore_patterns: Vec<String>,
}

/// Errors that can occur while enumerating files.
///
/// These are per-entry errors; the walker keeps iterating after
/// yielding one, so callers decide whether they are fatal.
#[derive(Debug, Clone, thiserror::Error)]
pub enum ScanError {
    /// A directory entry could not be read.
    #[error("failed to read directory entry: {message}")]
    Walk {
        /// Description from the underlying walker
        message: String,
    },

    /// Metadata for a file could not be read.
    #[error("failed to read metadata for {path}: {source}")]
    Metadata {
        /// Path where the error occurred
        path: PathBuf,
        /// The underlying I/O error
        #[source]
        source: Arc<io::Error>,
    },
}
