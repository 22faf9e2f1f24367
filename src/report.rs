//! report — injected progress and diagnostics sink.
//!
//! Purpose
//! -------
//! Decouple the pipeline stages from any particular output channel. Every
//! stage that talks to the operator (loading progress, convergence warnings,
//! the degenerate-N_eff notice, the saved archive path) receives a
//! `&dyn Reporter` explicitly instead of printing.
//!
//! Key behaviors
//! -------------
//! - [`LogReporter`] forwards to the `log` facade; the binary installs
//!   `env_logger` as the backend.
//! - [`RecordingReporter`] keeps every message in memory so tests can assert
//!   on warnings without a global logger.
//!
//! Conventions
//! -----------
//! - The numerical core (`precision`, `optimization`) never reports; only
//!   the loader, the jackknife builder, and the pipelines do.
use std::cell::RefCell;

use log::Level;

/// Progress and diagnostics sink passed into pipeline stages.
pub trait Reporter {
    /// Routine status message.
    fn info(&self, message: &str);

    /// Advisory condition that does not stop the run.
    fn warn(&self, message: &str);

    /// Per-item progress of a sequential task (`done` of `total` finished).
    fn progress(&self, label: &str, done: usize, total: usize) {
        if done == total {
            self.info(&format!("{label}: {done}/{total}"));
        }
    }
}

/// Reporter backed by the `log` crate.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogReporter;

impl Reporter for LogReporter {
    fn info(&self, message: &str) {
        log::info!("{message}");
    }

    fn warn(&self, message: &str) {
        log::warn!("{message}");
    }

    fn progress(&self, label: &str, done: usize, total: usize) {
        if done == total {
            log::info!("{label}: {done}/{total}");
        } else {
            log::debug!("{label}: {done}/{total}");
        }
    }
}

/// Reporter that records messages in memory.
#[derive(Debug, Default)]
pub struct RecordingReporter {
    records: RefCell<Vec<(Level, String)>>,
}

impl RecordingReporter {
    pub fn new() -> Self {
        Self::default()
    }

    /// All recorded messages in emission order.
    pub fn records(&self) -> Vec<(Level, String)> {
        self.records.borrow().clone()
    }

    /// Recorded warning messages only.
    pub fn warnings(&self) -> Vec<String> {
        self.records
            .borrow()
            .iter()
            .filter(|(level, _)| *level == Level::Warn)
            .map(|(_, msg)| msg.clone())
            .collect()
    }

    /// Whether any info or warning message contains `needle`.
    pub fn contains(&self, needle: &str) -> bool {
        self.records.borrow().iter().any(|(_, msg)| msg.contains(needle))
    }
}

impl Reporter for RecordingReporter {
    fn info(&self, message: &str) {
        self.records.borrow_mut().push((Level::Info, message.to_string()));
    }

    fn warn(&self, message: &str) {
        self.records.borrow_mut().push((Level::Warn, message.to_string()));
    }
}
