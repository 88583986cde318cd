//! Per-session dashboard state.
//!
//! Created once in `main` and passed by `&mut` through the router, so every
//! controller sees and updates the same flags without any global state.

use std::path::PathBuf;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SessionState {
    /// A handler call is in flight.
    pub analysis_running: bool,
    /// The last analysis run finished successfully.
    pub analysis_complete: bool,
    /// Documents produced by the last successful analysis.
    pub generated_files: Vec<PathBuf>,
}

impl SessionState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Mark an analysis as started; a previous result no longer counts.
    pub fn begin_analysis(&mut self) {
        self.analysis_running = true;
        self.analysis_complete = false;
    }

    /// Mark the analysis as finished. `generated` is `None` on failure.
    pub fn finish_analysis(&mut self, generated: Option<Vec<PathBuf>>) {
        self.analysis_running = false;
        if let Some(files) = generated {
            self.analysis_complete = true;
            self.generated_files = files;
        }
    }
}
