//! Scan orchestrator: walk, prefilter, compare in parallel, aggregate.
//!
//! [`DupeFinder`] runs the whole pipeline as one blocking call. Pair
//! comparisons fan out over a bounded rayon pool; every candidate pair
//! is evaluated exactly once and the full match set is collected before
//! aggregation, so result order never affects the clusters. Per-pair
//! read failures are logged, counted, and excluded from the match set
//! without aborting the batch.

use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use rayon::prelude::*;

use crate::progress::ProgressCallback;
use crate::scanner::{FileRef, ScanError, Walker, WalkerConfig};

use super::cluster::{cluster_matches, Cluster};
use super::compare::{compare_exact, similarity, CompareError, MatchResult};
use super::pairs::{all_pairs, size_group_pairs, Pair};
use super::prefilter::group_by_size;

/// Configuration for the duplicate finder.
#[derive(Clone)]
pub struct FinderConfig {
    /// Number of I/O threads for parallel comparison.
    /// Default is 4 to prevent disk thrashing.
    pub io_threads: usize,
    /// Fail-fast on any per-item error during the scan.
    pub strict: bool,
    /// Walker configuration for directory traversal.
    pub walker_config: WalkerConfig,
    /// Optional shutdown flag for graceful termination.
    pub shutdown_flag: Option<Arc<AtomicBool>>,
    /// Optional progress callback for reporting.
    pub progress_callback: Option<Arc<dyn ProgressCallback>>,
}

impl std::fmt::Debug for FinderConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FinderConfig")
            .field("io_threads", &self.io_threads)
            .field("strict", &self.strict)
            .field("walker_config", &self.walker_config)
            .field("shutdown_flag", &self.shutdown_flag)
            .field(
                "progress_callback",
                &self.progress_callback.as_ref().map(|_| "<callback>"),
            )
            .finish()
    }
}

impl Default for FinderConfig {
    fn default() -> Self {
        Self {
            io_threads: 4,
            strict: false,
            walker_config: WalkerConfig::default(),
            shutdown_flag: None,
            progress_callback: None,
        }
    }
}

impl FinderConfig {
    /// Set the I/O thread count (minimum 1).
    #[must_use]
    pub fn with_io_threads(mut self, threads: usize) -> Self {
        self.io_threads = threads.max(1);
        self
    }

    /// Fail-fast on any per-item error.
    #[must_use]
    pub fn with_strict(mut self, strict: bool) -> Self {
        self.strict = strict;
        self
    }

    /// Set the walker configuration.
    #[must_use]
    pub fn with_walker_config(mut self, config: WalkerConfig) -> Self {
        self.walker_config = config;
        self
    }

    /// Set the shutdown flag for graceful termination.
    #[must_use]
    pub fn with_shutdown_flag(mut self, flag: Arc<AtomicBool>) -> Self {
        self.shutdown_flag = Some(flag);
        self
    }

    /// Set the progress callback.
    #[must_use]
    pub fn with_progress_callback(mut self, callback: Arc<dyn ProgressCallback>) -> Self {
        self.progress_callback = Some(callback);
        self
    }

    fn is_shutdown_requested(&self) -> bool {
        self.shutdown_flag
            .as_ref()
            .is_some_and(|f| f.load(Ordering::SeqCst))
    }
}

/// Summary statistics from a scan.
#[derive(Debug, Clone, Default)]
pub struct ScanSummary {
    /// Total number of files enumerated
    pub total_files: usize,
    /// Total size of all enumerated files in bytes
    pub total_size: u64,
    /// Number of files eliminated by the size prefilter
    pub eliminated_by_size: usize,
    /// Candidate pairs produced for comparison
    pub candidate_pairs: usize,
    /// Pairs actually compared (equals candidates unless interrupted)
    pub compared_pairs: usize,
    /// Matching pairs found
    pub matching_pairs: usize,
    /// Number of clusters produced
    pub clusters: usize,
    /// Total space reclaimable by keeping one file per cluster
    pub reclaimable_space: u64,
    /// Duration of the scan
    pub scan_duration: Duration,
    /// Per-item enumeration errors (non-fatal)
    pub scan_errors: Vec<ScanError>,
    /// Per-pair comparison errors (non-fatal, treated as no-match)
    pub compare_errors: Vec<CompareError>,
}

impl ScanSummary {
    /// True if any non-fatal per-item error was recorded.
    #[must_use]
    pub fn has_errors(&self) -> bool {
        !self.scan_errors.is_empty() || !self.compare_errors.is_empty()
    }
}

/// A pair of files ranked by fuzzy similarity.
#[derive(Debug, Clone)]
pub struct SimilarPair {
    /// First file (lower path)
    pub left: FileRef,
    /// Second file
    pub right: FileRef,
    /// Similarity ratio in [0, 1]
    pub ratio: f64,
}

impl SimilarPair {
    /// Ratio expressed as a percentage.
    #[must_use]
    pub fn percent(&self) -> f64 {
        self.ratio * 100.0
    }
}

/// Errors that can occur during duplicate finding.
#[derive(Debug, thiserror::Error)]
pub enum FinderError {
    /// The scan was interrupted by user (Ctrl+C or shutdown signal).
    #[error("scan interrupted by user")]
    Interrupted,

    /// The provided path does not exist.
    #[error("path not found: {0}")]
    PathNotFound(PathBuf),

    /// The provided path is not a directory.
    #[error("not a directory: {0}")]
    NotADirectory(PathBuf),

    /// A per-item enumeration error escalated by strict mode.
    #[error(transparent)]
    Scan(#[from] ScanError),

    /// A per-pair comparison error escalated by strict mode.
    #[error(transparent)]
    Compare(#[from] CompareError),
}

/// Duplicate finder that orchestrates the pairwise comparison pipeline.
///
/// # Example
///
/// ```no_run
/// use dupecheck::duplicates::{DupeFinder, FinderConfig};
/// use std::path::Path;
///
/// let finder = DupeFinder::new(FinderConfig::default().with_io_threads(4));
/// let (clusters, summary) = finder.find_duplicates(Path::new(".")).unwrap();
///
/// println!("{} clusters, {} bytes reclaimable", clusters.len(), summary.reclaimable_space);
/// ```
pub struct DupeFinder {
    config: FinderConfig,
}

impl DupeFinder {
    /// Create a new finder with the given configuration.
    #[must_use]
    pub fn new(config: FinderConfig) -> Self {
        Self { config }
    }

    /// Create a new finder with default configuration.
    #[must_use]
    pub fn with_defaults() -> Self {
        Self::new(FinderConfig::default())
    }

    /// Find all duplicate file clusters under the given path.
    ///
    /// Pipeline: enumerate -> size prefilter -> within-group pairs ->
    /// parallel exact comparison -> union-find clustering. Blocks until
    /// every candidate pair has been evaluated.
    ///
    /// # Errors
    ///
    /// Returns [`FinderError`] if the path does not exist, is not a
    /// directory, the scan is interrupted, or (in strict mode) any
    /// per-item error occurs.
    pub fn find_duplicates(
        &self,
        path: &Path,
    ) -> Result<(Vec<Cluster>, ScanSummary), FinderError> {
        let start_time = std::time::Instant::now();
        let mut summary = ScanSummary::default();

        let files = self.enumerate(path, &mut summary)?;

        let (size_groups, prefilter_stats) = group_by_size(&files);
        summary.eliminated_by_size = prefilter_stats.eliminated_unique;

        if self.config.is_shutdown_requested() {
            return Err(FinderError::Interrupted);
        }

        let pairs = size_group_pairs(&size_groups);
        summary.candidate_pairs = pairs.len();
        log::info!(
            "Comparing {} candidate pairs across {} size groups",
            pairs.len(),
            size_groups.len()
        );

        let results: Vec<MatchResult> = self
            .compare_pairs(&files, &pairs, &mut summary, |a, b| {
                compare_exact(a, b).map(Some)
            })?
            .into_iter()
            .map(|(pair, matched)| MatchResult { pair, matched })
            .collect();

        let edges: Vec<Pair> = results
            .into_iter()
            .filter(|r| r.matched)
            .map(|r| r.pair)
            .collect();

        let clusters = cluster_matches(&files, &edges);
        summary.matching_pairs = edges.len();
        summary.clusters = clusters.len();
        summary.reclaimable_space = clusters.iter().map(Cluster::wasted_space).sum();
        summary.scan_duration = start_time.elapsed();

        log::info!(
            "Scan complete: {} clusters from {} matching pairs in {:.2?}",
            summary.clusters,
            summary.matching_pairs,
            summary.scan_duration
        );

        Ok((clusters, summary))
    }

    /// Rank all unique pairs under the given path by fuzzy similarity.
    ///
    /// Every pair is scored; pairs at or above `threshold` (a ratio in
    /// [0, 1]) are returned sorted by descending ratio, ties broken by
    /// path. The size prefilter does not apply: files of different
    /// sizes can still be similar.
    ///
    /// # Errors
    ///
    /// Same failure modes as [`Self::find_duplicates`].
    pub fn rank_similar(
        &self,
        path: &Path,
        threshold: f64,
    ) -> Result<(Vec<SimilarPair>, ScanSummary), FinderError> {
        let start_time = std::time::Instant::now();
        let mut summary = ScanSummary::default();

        let files = self.enumerate(path, &mut summary)?;

        let pairs = all_pairs(files.len());
        summary.candidate_pairs = pairs.len();
        log::info!("Scoring {} pairs for similarity", pairs.len());

        let scored = self.compare_pairs(&files, &pairs, &mut summary, |a, b| {
            similarity(a, b).map(Some)
        })?;

        let mut ranked: Vec<SimilarPair> = scored
            .into_iter()
            .filter(|(_, ratio)| *ratio >= threshold)
            .map(|(pair, ratio)| SimilarPair {
                left: files[pair.a].clone(),
                right: files[pair.b].clone(),
                ratio,
            })
            .collect();

        ranked.sort_by(|a, b| {
            b.ratio
                .partial_cmp(&a.ratio)
                .unwrap_or(std::cmp::Ordering::Equal)
                .then_with(|| a.left.path.cmp(&b.left.path))
                .then_with(|| a.right.path.cmp(&b.right.path))
        });

        summary.matching_pairs = ranked.len();
        summary.scan_duration = start_time.elapsed();

        Ok((ranked, summary))
    }

    /// Validate the path and collect the scan input.
    fn enumerate(
        &self,
        path: &Path,
        summary: &mut ScanSummary,
    ) -> Result<Vec<FileRef>, FinderError> {
        if !path.exists() {
            return Err(FinderError::PathNotFound(path.to_path_buf()));
        }
        if !path.is_dir() {
            return Err(FinderError::NotADirectory(path.to_path_buf()));
        }

        if self.config.is_shutdown_requested() {
            return Err(FinderError::Interrupted);
        }

        log::info!("Enumerating files under {}", path.display());
        if let Some(ref callback) = self.config.progress_callback {
            callback.on_phase_start("walking", 0);
        }

        let mut walker = Walker::new(path, self.config.walker_config.clone());
        if let Some(ref flag) = self.config.shutdown_flag {
            walker = walker.with_shutdown_flag(flag.clone());
        }

        let mut files = Vec::new();
        for result in walker.walk() {
            match result {
                Ok(file) => {
                    if let Some(ref callback) = self.config.progress_callback {
                        callback.on_progress(files.len() + 1, file.path.to_string_lossy().as_ref());
                    }
                    files.push(file);
                }
                Err(e) => {
                    log::warn!("Enumeration error: {}", e);
                    if self.config.strict {
                        return Err(FinderError::Scan(e));
                    }
                    summary.scan_errors.push(e);
                }
            }
        }

        if let Some(ref callback) = self.config.progress_callback {
            callback.on_phase_end("walking");
        }

        if self.config.is_shutdown_requested() {
            return Err(FinderError::Interrupted);
        }

        summary.total_files = files.len();
        summary.total_size = files.iter().map(|f| f.size).sum();
        log::info!("Found {} files", files.len());

        Ok(files)
    }

    /// Evaluate every pair in parallel on a bounded pool.
    ///
    /// `compare` returns `Ok(Some(v))` for a completed comparison
    /// carrying its outcome, `Ok(None)` to discard the pair, and `Err`
    /// for a read failure (logged, counted, treated as non-match). The
    /// pool blocks until every pair has been evaluated exactly once.
    fn compare_pairs<T: Send>(
        &self,
        files: &[FileRef],
        pairs: &[Pair],
        summary: &mut ScanSummary,
        compare: impl Fn(&FileRef, &FileRef) -> Result<Option<T>, CompareError> + Send + Sync,
    ) -> Result<Vec<(Pair, T)>, FinderError> {
        if pairs.is_empty() {
            return Ok(Vec::new());
        }

        if let Some(ref callback) = self.config.progress_callback {
            callback.on_phase_start("comparing", pairs.len());
        }

        // Bounded pool to limit concurrent disk reads; fall back to the
        // global pool rather than refusing to scan.
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(self.config.io_threads)
            .build()
            .unwrap_or_else(|e| {
                log::warn!("Failed to create comparison thread pool ({}), using default", e);
                rayon::ThreadPoolBuilder::new().build().unwrap()
            });

        let completed = Arc::new(AtomicUsize::new(0));
        let results: Vec<(Pair, Option<Result<Option<T>, CompareError>>)> = pool.install(|| {
            pairs
                .par_iter()
                .map(|&pair| {
                    // Skipped pairs are detected after the join; the
                    // whole batch is discarded on interruption.
                    if self.config.is_shutdown_requested() {
                        return (pair, None);
                    }

                    let a = &files[pair.a];
                    let b = &files[pair.b];
                    let outcome = compare(a, b);

                    let done = completed.fetch_add(1, Ordering::Relaxed) + 1;
                    if let Some(ref callback) = self.config.progress_callback {
                        callback.on_progress(done, a.path.to_string_lossy().as_ref());
                        callback.on_item_completed(a.size + b.size);
                    }

                    (pair, Some(outcome))
                })
                .collect()
        });

        if let Some(ref callback) = self.config.progress_callback {
            callback.on_phase_end("comparing");
        }

        if self.config.is_shutdown_requested() {
            return Err(FinderError::Interrupted);
        }

        let mut matches = Vec::new();
        for (pair, outcome) in results {
            // None only occurs under shutdown, handled above.
            let Some(outcome) = outcome else { continue };
            summary.compared_pairs += 1;
            match outcome {
                Ok(Some(value)) => matches.push((pair, value)),
                Ok(None) => {}
                Err(e) => {
                    log::warn!("Comparison failed, treating as non-match: {}", e);
                    if self.config.strict {
                        return Err(FinderError::Compare(e));
                    }
                    summary.compare_errors.push(e);
                }
            }
        }

        Ok(matches)
    }
}
