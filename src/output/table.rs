//! Plain-text tables for duplicate clusters and similarity rankings.
//!
//! # Example
//!
//! ```no_run
//! use dupecheck::duplicates::DupeFinder;
//! use dupecheck::output::ClusterTable;
//! use std::path::Path;
//!
//! let finder = DupeFinder::with_defaults();
//! let (clusters, summary) = finder.find_duplicates(Path::new(".")).unwrap();
//!
//! let table = ClusterTable::new(&clusters, &summary);
//! table.write_to(std::io::stdout()).unwrap();
//! ```

use std::io;

use bytesize::ByteSize;
use yansi::Paint;

use crate::duplicates::{Cluster, ScanSummary, SimilarPair};

/// Printed when a scan produced no duplicate clusters or similar pairs.
pub const NO_DUPLICATES_MESSAGE: &str = "No duplicates detected.";

/// Table formatter for exact duplicate clusters.
pub struct ClusterTable<'a> {
    clusters: &'a [Cluster],
    summary: &'a ScanSummary,
}

impl<'a> ClusterTable<'a> {
    /// Create a new cluster table formatter.
    #[must_use]
    pub fn new(clusters: &'a [Cluster], summary: &'a ScanSummary) -> Self {
        Self { clusters, summary }
    }

    /// Write the report to the given writer.
    ///
    /// # Errors
    ///
    /// Returns an I/O error if writing fails.
    pub fn write_to<W: io::Write>(&self, mut writer: W) -> io::Result<()> {
        if self.clusters.is_empty() {
            writeln!(writer, "{}", NO_DUPLICATES_MESSAGE.green())?;
            self.write_summary(&mut writer)?;
            return Ok(());
        }

        for (idx, cluster) in self.clusters.iter().enumerate() {
            writeln!(
                writer,
                "{} ({} files, {} each, {} reclaimable)",
                format!("Cluster {}", idx + 1).cyan().bold(),
                cluster.len(),
                ByteSize(cluster.files[0].size),
                ByteSize(cluster.wasted_space()),
            )?;
            for file in &cluster.files {
                writeln!(writer, "  {}", file.path.display())?;
            }
            writeln!(writer)?;
        }

        self.write_summary(&mut writer)
    }

    fn write_summary<W: io::Write>(&self, writer: &mut W) -> io::Result<()> {
        let s = self.summary;
        writeln!(
            writer,
            "Scanned {} files ({}) in {:.2}s",
            s.total_files,
            ByteSize(s.total_size),
            s.scan_duration.as_secs_f64(),
        )?;
        writeln!(
            writer,
            "{} clusters, {} reclaimable ({} of {} candidate pairs matched)",
            s.clusters,
            ByteSize(s.reclaimable_space).yellow(),
            s.matching_pairs,
            s.candidate_pairs,
        )?;
        if s.has_errors() {
            writeln!(
                writer,
                "{}",
                format!(
                    "{} scan errors, {} compare errors (run with -v for details)",
                    s.scan_errors.len(),
                    s.compare_errors.len()
                )
                .red(),
            )?;
        }
        Ok(())
    }

    /// Render the report to a string.
    #[must_use]
    pub fn render(&self) -> String {
        let mut buf = Vec::new();
        // Writing to a Vec<u8> cannot fail.
        let _ = self.write_to(&mut buf);
        String::from_utf8_lossy(&buf).into_owned()
    }
}

/// Table formatter for similarity rankings, highest ratio first.
pub struct SimilarityTable<'a> {
    pairs: &'a [SimilarPair],
    summary: &'a ScanSummary,
    threshold: f64,
}

impl<'a> SimilarityTable<'a> {
    /// Create a new similarity table formatter.
    ///
    /// `threshold` is the ratio cutoff in `[0, 1]` that produced `pairs`,
    /// echoed in the report header.
    #[must_use]
    pub fn new(pairs: &'a [SimilarPair], summary: &'a ScanSummary, threshold: f64) -> Self {
        Self {
            pairs,
            summary,
            threshold,
        }
    }

    /// Write the report to the given writer.
    ///
    /// # Errors
    ///
    /// Returns an I/O error if writing fails.
    pub fn write_to<W: io::Write>(&self, mut writer: W) -> io::Result<()> {
        if self.pairs.is_empty() {
            writeln!(writer, "{}", NO_DUPLICATES_MESSAGE.green())?;
            return Ok(());
        }

        writeln!(
            writer,
            "{} (threshold {:.0}%)",
            "Similar files".cyan().bold(),
            self.threshold * 100.0,
        )?;
        for pair in self.pairs {
            let percent = format!("{:5.1}%", pair.percent());
            let percent = if pair.ratio >= 1.0 {
                percent.green().bold()
            } else {
                percent.yellow().bold()
            };
            writeln!(
                writer,
                "{}  {}",
                percent,
                pair.left.path.display(),
            )?;
            writeln!(writer, "        {}", pair.right.path.display())?;
        }
        writeln!(writer)?;
        writeln!(
            writer,
            "Compared {} of {} pairs across {} files",
            self.summary.compared_pairs, self.summary.candidate_pairs, self.summary.total_files,
        )
    }

    /// Render the report to a string.
    #[must_use]
    pub fn render(&self) -> String {
        let mut buf = Vec::new();
        let _ = self.write_to(&mut buf);
        String::from_utf8_lossy(&buf).into_owned()
    }
}
