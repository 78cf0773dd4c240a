//! Duplicate detection pipeline.
//!
//! The pipeline runs in stages:
//! 1. **Prefilter** ([`prefilter`]): group files by size; only same-size
//!    files can be byte-identical.
//! 2. **Pair generation** ([`pairs`]): form every unique unordered pair
//!    within each size group.
//! 3. **Comparison** ([`compare`]): exact byte comparison, or a fuzzy
//!    similarity ratio for near-duplicate ranking.
//! 4. **Aggregation** ([`cluster`]): merge matching pairs into maximal
//!    clusters via union-find.
//!
//! [`finder::DupeFinder`] orchestrates the stages, fanning comparisons
//! out across a bounded rayon pool.

pub mod cluster;
pub mod compare;
pub mod finder;
pub mod pairs;
pub mod prefilter;

pub use cluster::{cluster_matches, Cluster, UnionFind};
pub use compare::{compare_exact, similarity, CompareError, MatchResult};
pub use finder::{DupeFinder, FinderConfig, FinderError, ScanSummary, SimilarPair};
pub use pairs::{all_pairs, size_group_pairs, Pair};
pub use prefilter::{group_by_size, PrefilterStats};
