//! Application configuration management.
//!
//! Persisted defaults for settings the user would otherwise repeat on
//! every invocation. CLI flags always win over the stored values.

use anyhow::Result;
use directories::ProjectDirs;
use serde::Deserialize;
use std::fs;
use std::path::PathBuf;

fn default_threads() -> usize {
    4
}

fn default_threshold() -> f64 {
    80.0
}

/// Application configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    /// Default I/O thread count for the comparison phase.
    #[serde(default = "default_threads")]
    pub threads: usize,
    /// Default similarity threshold percentage for fuzzy mode.
    #[serde(default = "default_threshold")]
    pub threshold: f64,
    /// Delete permanently instead of moving to trash.
    #[serde(default)]
    pub permanent_delete: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            threads: default_threads(),
            threshold: default_threshold(),
            permanent_delete: false,
        }
    }
}

impl Config {
    /// Load the configuration from the default platform-specific path.
    ///
    /// Any failure falls back to defaults; a corrupt config file must
    /// not prevent the tool from running.
    pub fn load() -> Self {
        match Self::load_internal() {
            Ok(config) => config,
            Err(e) => {
                log::debug!("Failed to load config, using defaults: {}", e);
                Self::default()
            }
        }
    }

    fn load_internal() -> Result<Self> {
        let path = Self::config_path()?;
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(path)?;
        let config: Config = serde_json::from_str(&content)?;
        Ok(config.sanitized())
    }

    /// Replace out-of-range stored values with defaults.
    ///
    /// The config file is hand-editable; a bad value must not leak past
    /// the validation the CLI flags go through.
    fn sanitized(mut self) -> Self {
        if !(0.0..=100.0).contains(&self.threshold) {
            log::warn!(
                "Ignoring stored threshold {} (must be between 0 and 100)",
                self.threshold
            );
            self.threshold = default_threshold();
        }
        if self.threads == 0 {
            log::warn!("Ignoring stored thread count 0");
            self.threads = default_threads();
        }
        self
    }

    /// Get the default platform-specific configuration path.
    fn config_path() -> Result<PathBuf> {
        let project_dirs = ProjectDirs::from("io", "dupecheck", "dupecheck")
            .ok_or_else(|| anyhow::anyhow!("Failed to determine project directories"))?;
        Ok(project_dirs.config_dir().join("config.json"))
    }
}
