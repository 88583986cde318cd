//! Synchronous façade over one asynchronous handler call.
//!
//! Each call builds a fresh single-threaded runtime, drives exactly one future
//! to completion and drops the runtime again. Nothing is shared between calls.

use anyhow::{Context, Result};
use indicatif::{ProgressBar, ProgressStyle};
use std::future::Future;
use std::time::Duration;
use tracing::debug;

/// Runs handler futures to completion, optionally behind a spinner.
#[derive(Debug, Clone, Copy)]
pub struct Runner {
    show_progress: bool,
}

impl Runner {
    pub fn new(show_progress: bool) -> Self {
        Self { show_progress }
    }

    /// Submit `future`, block until it resolves, discard the runtime.
    pub fn run_once<F, T>(&self, message: &str, future: F) -> Result<T>
    where
        F: Future<Output = Result<T>>,
    {
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .context("Failed to start async runtime")?;

        let spinner = self.show_progress.then(|| spinner(message));
        debug!("Running one-shot task: {}", message);

        let result = runtime.block_on(future);

        if let Some(pb) = spinner {
            pb.finish_and_clear();
        }
        result
    }
}

fn spinner(message: &str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    pb.set_style(
        ProgressStyle::default_spinner()
            .tick_strings(&["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏", "✓"])
            .template("{spinner:.cyan} {msg} [{elapsed}]")
            .unwrap_or_else(|_| ProgressStyle::default_spinner()),
    );
    pb.set_message(message.to_string());
    pb.enable_steady_tick(Duration::from_millis(100));
    pb
}
