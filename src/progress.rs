//! Progress reporting behind an injected callback interface.
//!
//! The pipeline never talks to the terminal directly; it reports
//! through [`ProgressCallback`], and [`Progress`] implements that
//! with indicatif bars. Tests inject their own recorder instead.

use std::sync::Mutex;
use std::time::Duration;

use indicatif::{MultiProgress, ProgressBar, ProgressStyle};

/// Progress callback for scan phases.
///
/// All methods may be called from worker threads; implementations must
/// be internally synchronized.
pub trait ProgressCallback: Send + Sync {
    /// Called when a phase starts.
    ///
    /// `total` is the number of items the phase will process, or 0 if
    /// unknown (the walking phase).
    fn on_phase_start(&self, phase: &str, total: usize);

    /// Called for each item processed (1-based count).
    fn on_progress(&self, current: usize, path: &str);

    /// Called when an item completes, with the bytes it covered.
    fn on_item_completed(&self, _bytes: u64) {}

    /// Called when a phase completes.
    fn on_phase_end(&self, phase: &str);
}

/// Terminal progress reporter using indicatif.
///
/// A spinner for the walking phase and a bar for the comparison phase.
/// indicatif bars are internally synchronized, so worker threads can
/// drive them without extra locking beyond the slot mutexes here.
pub struct Progress {
    multi: MultiProgress,
    walking: Mutex<Option<ProgressBar>>,
    comparing: Mutex<Option<ProgressBar>>,
    quiet: bool,
}

impl Progress {
    /// Create a new progress reporter.
    ///
    /// When `quiet` is true nothing is displayed.
    #[must_use]
    pub fn new(quiet: bool) -> Self {
        Self {
            multi: MultiProgress::new(),
            walking: Mutex::new(None),
            comparing: Mutex::new(None),
            quiet,
        }
    }

    fn walking_style() -> ProgressStyle {
        ProgressStyle::with_template("{spinner:.green} {msg} [{elapsed_precise}] {pos} files")
            .unwrap_or_else(|_| ProgressStyle::default_spinner())
    }

    fn comparing_style() -> ProgressStyle {
        ProgressStyle::with_template(
            "[{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} ({percent}%) {msg} (ETA: {eta})",
        )
        .unwrap_or_else(|_| ProgressStyle::default_bar())
        .progress_chars("█>-")
    }
}

impl ProgressCallback for Progress {
    fn on_phase_start(&self, phase: &str, total: usize) {
        if self.quiet {
            return;
        }

        match phase {
            "walking" => {
                let pb = self.multi.add(ProgressBar::new_spinner());
                pb.set_style(Self::walking_style());
                pb.set_message("Enumerating files");
                pb.enable_steady_tick(Duration::from_millis(100));
                *self.walking.lock().unwrap() = Some(pb);
            }
            "comparing" => {
                let pb = self.multi.add(ProgressBar::new(total as u64));
                pb.set_style(Self::comparing_style());
                pb.set_message("Comparing pairs");
                *self.comparing.lock().unwrap() = Some(pb);
            }
            _ => {}
        }
    }

    fn on_progress(&self, current: usize, path: &str) {
        if self.quiet {
            return;
        }

        let message = truncate_path(path, 30);
        if let Some(ref pb) = *self.comparing.lock().unwrap() {
            pb.set_position(current as u64);
            pb.set_message(message);
        } else if let Some(ref pb) = *self.walking.lock().unwrap() {
            pb.set_position(current as u64);
            pb.set_message(message);
        }
    }

    fn on_phase_end(&self, phase: &str) {
        if self.quiet {
            return;
        }

        match phase {
            "walking" => {
                if let Some(pb) = self.walking.lock().unwrap().take() {
                    pb.finish_with_message("Enumeration complete");
                }
            }
            "comparing" => {
                if let Some(pb) = self.comparing.lock().unwrap().take() {
                    pb.finish_with_message("Comparison complete");
                }
            }
            _ => {}
        }
    }
}

/// Truncate a path for display in the progress bar.
fn truncate_path(path: &str, max_len: usize) -> String {
    if path.len() <= max_len {
        return path.to_string();
    }

    let file_name = std::path::Path::new(path)
        .file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_default();

    if file_name.len() >= max_len {
        // Slice on char boundaries; file names are not always ASCII.
        let tail_chars = max_len.saturating_sub(3);
        let start = file_name
            .char_indices()
            .rev()
            .nth(tail_chars.saturating_sub(1))
            .map_or(0, |(i, _)| i);
        return format!("...{}", &file_name[start..]);
    }

    format!(".../{}", file_name)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncate_path_short_unchanged() {
        assert_eq!(truncate_path("/a/b.txt", 30), "/a/b.txt");
    }

    #[test]
    fn test_truncate_path_long_keeps_file_name() {
        let long = "/very/long/directory/chain/that/never/ends/name.txt";
        assert_eq!(truncate_path(long, 30), ".../name.txt");
    }

    #[test]
    fn test_truncate_path_multibyte_file_name() {
        let name = format!("{}.txt", "あ".repeat(30));
        let out = truncate_path(&format!("/tmp/{name}"), 30);
        assert!(out.starts_with("..."));
        assert!(out.ends_with(".txt"));
        assert_eq!(out.chars().count(), 30);
    }

    #[test]
    fn test_progress_with_multibyte_file_name() {
        let progress = Progress::new(false);
        progress.on_phase_start("comparing", 10);
        progress.on_progress(1, "/tmp/ああああああああああ.txt");
        progress.on_phase_end("comparing");
    }

    #[test]
    fn test_quiet_progress_is_silent() {
        // Smoke test: quiet mode must not panic or create bars.
        let progress = Progress::new(true);
        progress.on_phase_start("comparing", 10);
        progress.on_progress(1, "/some/path");
        progress.on_phase_end("comparing");
        assert!(progress.comparing.lock().unwrap().is_none());
    }
}
