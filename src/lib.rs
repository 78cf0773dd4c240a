//! dupecheck - Duplicate File Finder
//!
//! A cross-platform Rust CLI application for finding duplicate files by
//! pairwise content comparison, with a size prefilter, optional fuzzy
//! similarity ranking, and safe interactive deletion via system trash.

pub mod actions;
pub mod cli;
pub mod config;
pub mod duplicates;
pub mod error;
pub mod logging;
pub mod output;
pub mod progress;
pub mod scanner;
pub mod signal;

use std::io::{self, Write};
use std::sync::Arc;

use anyhow::{Context, Result};

use crate::actions::{resolve_interactively, resolve_keep_first, DeleteConfig};
use crate::cli::Cli;
use crate::config::Config;
use crate::duplicates::{DupeFinder, FinderConfig, ScanSummary};
use crate::error::ExitCode;
use crate::output::{ClusterTable, SimilarityTable};
use crate::progress::{Progress, ProgressCallback};
use crate::scanner::WalkerConfig;
use crate::signal::ShutdownHandler;

/// Run the application with parsed CLI arguments.
///
/// Dispatches to exact duplicate detection or similarity ranking,
/// renders the report, and optionally resolves clusters by deletion.
/// Returns the exit code the process should terminate with.
///
/// # Errors
///
/// Returns an error for fatal conditions: invalid scan path,
/// interruption, or strict-mode escalation. Per-item I/O failures are
/// counted in the summary instead and surface as a partial-success
/// exit code.
pub fn run_app(cli: Cli) -> Result<ExitCode> {
    logging::init_logging(cli.verbose, cli.quiet);

    if cli.no_color {
        yansi::disable();
    }

    let config = Config::load();

    let shutdown = match signal::install_handler() {
        Ok(handler) => handler,
        Err(e) => {
            log::warn!("Failed to install Ctrl+C handler: {}", e);
            ShutdownHandler::new()
        }
    };

    let walker_config = WalkerConfig {
        recursive: cli.recursive,
        follow_symlinks: cli.follow_symlinks,
        skip_hidden: cli.skip_hidden,
        min_size: cli.min_size,
        max_size: cli.max_size,
        ignore_patterns: cli.ignore_patterns.clone(),
    };

    let progress: Arc<dyn ProgressCallback> = Arc::new(Progress::new(cli.quiet));

    let finder_config = FinderConfig::default()
        .with_io_threads(cli.threads.unwrap_or(config.threads))
        .with_walker_config(walker_config)
        .with_shutdown_flag(shutdown.flag())
        .with_progress_callback(progress);

    let finder = DupeFinder::new(finder_config);

    if cli.similar {
        let threshold = cli.threshold.unwrap_or(config.threshold) / 100.0;
        let (pairs, summary) = finder.rank_similar(&cli.path, threshold)?;

        let stdout = io::stdout();
        let mut handle = stdout.lock();
        SimilarityTable::new(&pairs, &summary, threshold)
            .write_to(&mut handle)
            .context("Failed to write similarity report")?;
        handle.flush().ok();

        return Ok(exit_code_for(pairs.is_empty(), &summary));
    }

    let (clusters, summary) = finder.find_duplicates(&cli.path)?;

    {
        let stdout = io::stdout();
        let mut handle = stdout.lock();
        ClusterTable::new(&clusters, &summary)
            .write_to(&mut handle)
            .context("Failed to write cluster report")?;
        handle.flush().ok();
    }

    if cli.delete && !clusters.is_empty() {
        let delete_config = if cli.permanent || config.permanent_delete {
            DeleteConfig::permanent()
        } else {
            DeleteConfig::trash()
        };

        let deleted = if cli.yes {
            resolve_keep_first(&clusters, &delete_config)
        } else {
            resolve_interactively(&clusters, &delete_config)
        };

        if !cli.quiet {
            println!("\nDeleted {} files", deleted);
        }
    }

    Ok(exit_code_for(clusters.is_empty(), &summary))
}

/// Map a completed scan to its exit code.
///
/// Per-item errors take precedence: results may be incomplete, so even
/// an empty report is only a partial success.
fn exit_code_for(empty: bool, summary: &ScanSummary) -> ExitCode {
    if summary.has_errors() {
        ExitCode::PartialSuccess
    } else if empty {
        ExitCode::NoDuplicates
    } else {
        ExitCode::Success
    }
}
