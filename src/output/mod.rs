//! Console report rendering for scan results.
//!
//! Two human-readable reports are produced: a cluster table for exact
//! duplicate scans and a ranked percentage table for similarity scans.
//! Both print `No duplicates detected.` when the scan found nothing.

pub mod table;

pub use table::{ClusterTable, SimilarityTable};
