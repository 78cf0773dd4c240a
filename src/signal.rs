//! Signal handling for graceful shutdown.
//!
//! Centralized Ctrl+C handling: an `AtomicBool` flag shared across
//! threads signals when shutdown has been requested. The walker and
//! the comparison pool poll the flag and wind down cooperatively; the
//! application then exits with code 130 (128 + SIGINT).

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Centralized shutdown handler for graceful termination.
///
/// Wraps an `AtomicBool` set when a Ctrl+C signal is received. Clone
/// the flag via [`ShutdownHandler::flag`] and hand it to workers.
#[derive(Debug, Clone)]
pub struct ShutdownHandler {
    flag: Arc<AtomicBool>,
}

impl ShutdownHandler {
    /// Create a new handler with the flag initially unset.
    #[must_use]
    pub fn new() -> Self {
        Self {
            flag: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Check if shutdown has been requested.
    #[must_use]
    pub fn is_shutdown_requested(&self) -> bool {
        self.flag.load(Ordering::SeqCst)
    }

    /// Manually request a shutdown.
    pub fn request_shutdown(&self) {
        self.flag.store(true, Ordering::SeqCst);
    }

    /// Get a clone of the flag for passing to worker threads.
    #[must_use]
    pub fn flag(&self) -> Arc<AtomicBool> {
        self.flag.clone()
    }
}

impl Default for ShutdownHandler {
    fn default() -> Self {
        Self::new()
    }
}

/// Install the Ctrl+C handler and return the shared shutdown handler.
///
/// # Errors
///
/// Returns an error if a handler is already installed for this process.
pub fn install_handler() -> Result<ShutdownHandler, ctrlc::Error> {
    let handler = ShutdownHandler::new();
    let flag = handler.flag();

    ctrlc::set_handler(move || {
        if flag.swap(true, Ordering::SeqCst) {
            // Second Ctrl+C: the user really wants out.
            eprintln!("Forced exit.");
            std::process::exit(crate::error::ExitCode::Interrupted.as_i32());
        }
        eprintln!("Interrupted. Cleaning up...");
    })?;

    Ok(handler)
}
