//! Size prefilter: group files by byte length before comparison.
//!
//! Files with different sizes cannot be byte-identical, so grouping by
//! size first cuts the candidate pair count from O(n²) over all files
//! to O(Σ kᵢ²) over the size groups. Metadata only, no file I/O.

use std::collections::HashMap;

use crate::scanner::FileRef;

/// Statistics from the size prefilter.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PrefilterStats {
    /// Total number of files processed
    pub total_files: usize,
    /// Total size of all files in bytes
    pub total_size: u64,
    /// Number of distinct file sizes seen
    pub unique_sizes: usize,
    /// Number of files that could still be duplicates (in groups of 2+)
    pub potential_duplicates: usize,
    /// Number of files eliminated as unique (singleton size groups)
    pub eliminated_unique: usize,
    /// Number of size groups with 2+ files
    pub candidate_groups: usize,
}

impl PrefilterStats {
    /// Percentage of files eliminated by the prefilter.
    #[must_use]
    pub fn elimination_rate(&self) -> f64 {
        if self.total_files == 0 {
            0.0
        } else {
            (self.eliminated_unique as f64 / self.total_files as f64) * 100.0
        }
    }
}

/// Group files by size, keeping only groups with 2+ members.
///
/// Files are identified by their index into `files` so the groups can
/// feed straight into pair generation and union-find, which both work
/// on dense ids.
///
/// # Returns
///
/// A tuple of:
/// - `HashMap<u64, Vec<usize>>` - indices grouped by size (groups of 2+ only)
/// - [`PrefilterStats`] - statistics about the grouping
///
/// # Example
///
/// ```
/// use dupecheck::duplicates::group_by_size;
/// use dupecheck::scanner::FileRef;
/// use std::path::PathBuf;
/// use std::time::SystemTime;
///
/// let files = vec![
///     FileRef::new(PathBuf::from("/a.txt"), 100, SystemTime::now()),
///     FileRef::new(PathBuf::from("/b.txt"), 100, SystemTime::now()),
///     FileRef::new(PathBuf::from("/c.txt"), 200, SystemTime::now()),
/// ];
///
/// let (groups, stats) = group_by_size(&files);
///
/// assert_eq!(groups.len(), 1);
/// assert_eq!(groups[&100], vec![0, 1]);
/// assert_eq!(stats.eliminated_unique, 1);
/// ```
#[must_use]
pub fn group_by_size(files: &[FileRef]) -> (HashMap<u64, Vec<usize>>, PrefilterStats) {
    let mut all_groups: HashMap<u64, Vec<usize>> = HashMap::new();
    let mut stats = PrefilterStats {
        total_files: files.len(),
        ..Default::default()
    };

    for (idx, file) in files.iter().enumerate() {
        stats.total_size += file.size;
        all_groups.entry(file.size).or_default().push(idx);
    }

    stats.unique_sizes = all_groups.len();

    let filtered: HashMap<u64, Vec<usize>> = all_groups
        .into_iter()
        .filter(|(size, members)| {
            if members.len() == 1 {
                stats.eliminated_unique += 1;
                log::trace!(
                    "Eliminated unique size {}: {}",
                    size,
                    files[members[0]].path.display()
                );
                false
            } else {
                stats.potential_duplicates += members.len();
                stats.candidate_groups += 1;
                log::debug!(
                    "Size group {} bytes: {} potential duplicates",
                    size,
                    members.len()
                );
                true
            }
        })
        .collect();

    log::info!(
        "Prefilter: {} files -> {} potential duplicates ({:.1}% eliminated)",
        stats.total_files,
        stats.potential_duplicates,
        stats.elimination_rate()
    );

    (filtered, stats)
}
