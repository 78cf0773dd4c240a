//! Command-line interface definitions for dupecheck.
//!
//! All arguments are defined with the clap derive API. The tool takes a
//! single directory path and flags that select the comparison mode,
//! filtering, and deletion behavior.
//!
//! # Example
//!
//! ```bash
//! # Find exact duplicates in the current directory
//! dupecheck
//!
//! # Recurse and delete interactively
//! dupecheck ~/Downloads -r --delete
//!
//! # Rank near-duplicates at 90% similarity or better
//! dupecheck ~/Documents --similar --threshold 90
//!
//! # Restrict by size and ignore build output
//! dupecheck . -r --min-size 1MB --ignore target
//! ```

use clap::Parser;
use std::path::PathBuf;

/// Duplicate file finder with pairwise content comparison.
///
/// dupecheck finds exact duplicates by streaming byte comparison, groups
/// them into clusters, and can rank near-duplicates by content similarity
/// or delete redundant copies interactively.
#[derive(Debug, Parser)]
#[command(name = "dupecheck")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Directory to scan for duplicates
    #[arg(value_name = "PATH", default_value = ".")]
    pub path: PathBuf,

    /// Recurse into subdirectories
    #[arg(short, long)]
    pub recursive: bool,

    /// Interactively delete redundant copies after the scan
    #[arg(long)]
    pub delete: bool,

    /// Rank file pairs by content similarity instead of exact matching
    #[arg(long, conflicts_with = "delete")]
    pub similar: bool,

    /// Similarity threshold as a percentage (only with --similar)
    ///
    /// Defaults to the configured value (80 unless changed in the
    /// config file).
    #[arg(
        long,
        value_name = "PCT",
        value_parser = parse_threshold,
        requires = "similar"
    )]
    pub threshold: Option<f64>,

    /// Minimum file size to consider (e.g., 1KB, 1MB, 1GB)
    ///
    /// Supports suffixes: B, KB, KiB, MB, MiB, GB, GiB, TB, TiB
    #[arg(long, value_name = "SIZE", value_parser = parse_size)]
    pub min_size: Option<u64>,

    /// Maximum file size to consider (e.g., 1KB, 1MB, 1GB)
    ///
    /// Supports suffixes: B, KB, KiB, MB, MiB, GB, GiB, TB, TiB
    #[arg(long, value_name = "SIZE", value_parser = parse_size)]
    pub max_size: Option<u64>,

    /// Glob patterns to ignore (can be specified multiple times)
    ///
    /// These patterns are added to any .gitignore patterns found.
    #[arg(short, long = "ignore", value_name = "PATTERN")]
    pub ignore_patterns: Vec<String>,

    /// Follow symbolic links during scan
    ///
    /// Warning: May cause infinite loops if symlinks form cycles.
    #[arg(long)]
    pub follow_symlinks: bool,

    /// Skip hidden files and directories (starting with .)
    #[arg(long)]
    pub skip_hidden: bool,

    /// Number of I/O threads for comparison
    ///
    /// Lower values reduce disk thrashing on HDDs. Defaults to the
    /// configured value (4 unless changed in the config file).
    #[arg(long, value_name = "N")]
    pub threads: Option<usize>,

    /// Use permanent deletion instead of moving to trash
    ///
    /// Warning: Files cannot be recovered after permanent deletion.
    #[arg(long, requires = "delete")]
    pub permanent: bool,

    /// Skip confirmation prompts (keeps the first copy in each cluster)
    #[arg(short = 'y', long, requires = "delete")]
    pub yes: bool,

    /// Increase verbosity level (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Suppress all output except errors and results
    #[arg(short, long, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Disable colored output
    #[arg(long, env = "NO_COLOR")]
    pub no_color: bool,

    /// Report fatal errors as JSON on stderr
    #[arg(long)]
    pub json_errors: bool,
}

/// Parse a similarity threshold percentage in `[0, 100]`.
///
/// # Errors
///
/// Returns an error if the value is not a number or falls outside the
/// valid range.
pub fn parse_threshold(s: &str) -> Result<f64, String> {
    let pct: f64 = s
        .trim()
        .parse()
        .map_err(|_| format!("Invalid percentage: '{s}'"))?;
    if !(0.0..=100.0).contains(&pct) {
        return Err(format!("Threshold must be between 0 and 100, got {pct}"));
    }
    Ok(pct)
}

/// Parse a human-readable size string into bytes.
///
/// Supports suffixes: B, KB, KiB, MB, MiB, GB, GiB, TB, TiB
/// Case-insensitive. Numbers without suffix are treated as bytes.
///
/// # Examples
///
/// ```
/// use dupecheck::cli::parse_size;
///
/// assert_eq!(parse_size("1024").unwrap(), 1024);
/// assert_eq!(parse_size("1KB").unwrap(), 1000);
/// assert_eq!(parse_size("1KiB").unwrap(), 1024);
/// assert_eq!(parse_size("1MB").unwrap(), 1_000_000);
/// assert_eq!(parse_size("1MiB").unwrap(), 1_048_576);
/// ```
/// # Errors
///
/// Returns an error if the string is empty, contains an invalid number,
/// a negative number, or an unknown size suffix.
pub fn parse_size(s: &str) -> Result<u64, String> {
    let s = s.trim();
    if s.is_empty() {
        return Err("Size cannot be empty".to_string());
    }

    // Find where the number ends and the suffix begins
    let (num_str, suffix) = match s.find(|c: char| !c.is_ascii_digit() && c != '.') {
        Some(idx) => (&s[..idx], s[idx..].trim().to_uppercase()),
        None => (s, String::new()),
    };

    let num: f64 = num_str
        .parse()
        .map_err(|_| format!("Invalid number: '{num_str}'"))?;

    if num < 0.0 {
        return Err("Size cannot be negative".to_string());
    }

    let multiplier: u64 = match suffix.as_str() {
        "" | "B" => 1,
        "KB" | "K" => 1_000,
        "KIB" => 1_024,
        "MB" | "M" => 1_000_000,
        "MIB" => 1_048_576,
        "GB" | "G" => 1_000_000_000,
        "GIB" => 1_073_741_824,
        "TB" | "T" => 1_000_000_000_000,
        "TIB" => 1_099_511_627_776,
        _ => return Err(format!("Unknown size suffix: '{suffix}'")),
    };

    Ok((num * multiplier as f64) as u64)
}
