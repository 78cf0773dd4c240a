//! Directory walker implementation using jwalk for parallel traversal.
//!
//! The walker yields [`FileRef`] entries for regular files only. Errors
//! are yielded as [`ScanError`] values rather than stopping iteration,
//! so a single unreadable entry never aborts the enumeration.

use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::SystemTime;

use ignore::gitignore::{Gitignore, GitignoreBuilder};
use jwalk::WalkDir;

use super::{FileRef, ScanError, WalkerConfig};

/// Directory walker for file discovery.
///
/// Uses jwalk for efficient parallel traversal of directory trees.
/// Children are sorted per directory so the resulting [`FileRef`]
/// sequence is deterministic for a given tree.
#[derive(Debug)]
pub struct Walker {
    /// Root path to walk
    root: PathBuf,
    /// Walker configuration
    config: WalkerConfig,
    /// Optional shutdown flag for graceful termination
    shutdown_flag: Option<Arc<AtomicBool>>,
}

impl Walker {
    /// Create a new walker for the given path.
    #[must_use]
    pub fn new(path: &Path, config: WalkerConfig) -> Self {
        Self {
            root: path.to_path_buf(),
            config,
            shutdown_flag: None,
        }
    }

    /// Set the shutdown flag for graceful termination.
    ///
    /// When the flag is set to `true`, the walker stops iteration as
    /// soon as possible. This allows for clean Ctrl+C handling.
    #[must_use]
    pub fn with_shutdown_flag(mut self, flag: Arc<AtomicBool>) -> Self {
        self.shutdown_flag = Some(flag);
        self
    }

    fn is_shutdown_requested(&self) -> bool {
        self.shutdown_flag
            .as_ref()
            .is_some_and(|f| f.load(Ordering::SeqCst))
    }

    /// Build a gitignore matcher from config patterns and any .gitignore file.
    fn build_gitignore(&self) -> Option<Gitignore> {
        let mut builder = GitignoreBuilder::new(&self.root);

        let gitignore_path = self.root.join(".gitignore");
        if gitignore_path.exists() {
            if let Some(e) = builder.add(&gitignore_path) {
                log::warn!(
                    "Failed to load .gitignore from {}: {}",
                    gitignore_path.display(),
                    e
                );
            }
        }

        for pattern in &self.config.ignore_patterns {
            if let Err(e) = builder.add_line(None, pattern) {
                log::warn!("Invalid ignore pattern '{}': {}", pattern, e);
            }
        }

        match builder.build() {
            Ok(gitignore) if !gitignore.is_empty() => Some(gitignore),
            Ok(_) => None,
            Err(e) => {
                log::warn!("Failed to build ignore patterns: {}", e);
                None
            }
        }
    }

    /// Check if a path should be ignored based on configured patterns.
    fn should_ignore(&self, path: &Path, is_dir: bool, gitignore: &Option<Gitignore>) -> bool {
        let Some(gi) = gitignore else {
            return false;
        };

        // Gitignore matching expects paths relative to the root with
        // forward slashes, even on Windows.
        let relative_path = path.strip_prefix(&self.root).unwrap_or(path);
        let path_str = relative_path.to_string_lossy();
        let normalized = if cfg!(windows) {
            path_str.replace('\\', "/")
        } else {
            path_str.into_owned()
        };

        gi.matched(normalized, is_dir).is_ignore()
    }

    fn passes_size_filter(&self, size: u64) -> bool {
        if let Some(min) = self.config.min_size {
            if size < min {
                return false;
            }
        }
        if let Some(max) = self.config.max_size {
            if size > max {
                return false;
            }
        }
        true
    }

    /// Walk the directory tree, yielding file references.
    ///
    /// When the config is not recursive, only the top level of the root
    /// directory is listed (matching a flat glob).
    ///
    /// # Example
    ///
    /// ```no_run
    /// use dupecheck::scanner::{Walker, WalkerConfig};
    /// use std::path::Path;
    ///
    /// let walker = Walker::new(Path::new("."), WalkerConfig::default());
    /// let files: Vec<_> = walker.walk().filter_map(Result::ok).collect();
    /// println!("Found {} files", files.len());
    /// ```
    pub fn walk(&self) -> impl Iterator<Item = Result<FileRef, ScanError>> + '_ {
        let gitignore = self.build_gitignore();

        let max_depth = if self.config.recursive {
            usize::MAX
        } else {
            1
        };

        let walk_dir = WalkDir::new(&self.root)
            .follow_links(self.config.follow_symlinks)
            .skip_hidden(self.config.skip_hidden)
            .max_depth(max_depth)
            .process_read_dir(move |_depth, _path, _state, children| {
                // Sort children for deterministic output
                children.sort_by(|a, b| match (a, b) {
                    (Ok(a), Ok(b)) => a.file_name().cmp(b.file_name()),
                    (Ok(_), Err(_)) => std::cmp::Ordering::Less,
                    (Err(_), Ok(_)) => std::cmp::Ordering::Greater,
                    (Err(_), Err(_)) => std::cmp::Ordering::Equal,
                });
            });

        walk_dir.into_iter().filter_map(move |entry_result| {
            if self.is_shutdown_requested() {
                log::debug!("Walker: shutdown requested, stopping iteration");
                return None;
            }

            let entry = match entry_result {
                Ok(entry) => entry,
                Err(e) => {
                    return Some(Err(ScanError::Walk {
                        message: e.to_string(),
                    }));
                }
            };

            let path = entry.path();
            if path == self.root {
                return None;
            }

            let file_type = entry.file_type();
            if file_type.is_dir() {
                return None;
            }
            if file_type.is_symlink() && !self.config.follow_symlinks {
                log::trace!("Skipping symlink: {}", path.display());
                return None;
            }

            if self.should_ignore(&path, false, &gitignore) {
                log::trace!("Ignoring file: {}", path.display());
                return None;
            }

            // Follow the link for metadata only when configured to.
            let metadata = if self.config.follow_symlinks {
                std::fs::metadata(&path)
            } else {
                std::fs::symlink_metadata(&path)
            };
            let metadata = match metadata {
                Ok(metadata) => metadata,
                Err(e) => {
                    return Some(Err(ScanError::Metadata {
                        path,
                        source: Arc::new(e),
                    }));
                }
            };

            if !metadata.is_file() {
                return None;
            }

            let size = metadata.len();
            if !self.passes_size_filter(size) {
                log::trace!("Size filter excluded: {}", path.display());
                return None;
            }

            let modified = metadata.modified().unwrap_or(SystemTime::UNIX_EPOCH);
            Some(Ok(FileRef::new(path, size, modified)))
        })
    }
}
