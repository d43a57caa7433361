//! Structured logger with dry-run awareness and summary collection.
use std::sync::Mutex;

use super::types::{FileEntry, FileStatus, Log};
use super::{DRY_RUN_TARGET, STAGE_TARGET};

/// Implement the display methods of [`Log`] by delegating to inherent methods
/// of the same name on the implementing type.
macro_rules! forward_log_methods {
    ($($method:ident),+ $(,)?) => {
        $(
            fn $method(&self, msg: &str) {
                self.$method(msg);
            }
        )+
    };
}

/// Structured logger that forwards to [`tracing`] and remembers the outcome
/// of each compiled file for the closing summary.
#[derive(Debug, Default)]
pub struct Logger {
    files: Mutex<Vec<FileEntry>>,
}

impl Logger {
    /// Create a logger with an empty summary.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Return a clone of all recorded file entries.
    #[must_use]
    pub fn file_entries(&self) -> Vec<FileEntry> {
        self.files.lock().map_or_else(|_| vec![], |g| g.clone())
    }

    /// Log an error message.
    pub fn error(&self, msg: &str) {
        tracing::error!("{msg}");
    }

    /// Log a warning message.
    pub fn warn(&self, msg: &str) {
        tracing::warn!("{msg}");
    }

    /// Log a stage header (major section).
    pub fn stage(&self, msg: &str) {
        tracing::info!(target: STAGE_TARGET, "{msg}");
    }

    /// Log an informational message.
    pub fn info(&self, msg: &str) {
        tracing::info!("{msg}");
    }

    /// Log a debug message (suppressed on console unless verbose).
    pub fn debug(&self, msg: &str) {
        tracing::debug!("{msg}");
    }

    /// Log a dry-run action message.
    pub fn dry_run(&self, msg: &str) {
        tracing::info!(target: DRY_RUN_TARGET, "{msg}");
    }

    /// Record a source file result for the summary.
    pub fn record_file(&self, source: &str, status: FileStatus, artifacts: usize) {
        if let Ok(mut guard) = self.files.lock() {
            guard.push(FileEntry {
                source: source.to_string(),
                status,
                artifacts,
            });
        }
    }

    /// Count the files that failed.
    #[must_use]
    pub fn failure_count(&self) -> usize {
        self.files.lock().map_or(0, |guard| {
            guard
                .iter()
                .filter(|f| f.status == FileStatus::Failed)
                .count()
        })
    }

    /// Print the summary of all recorded files.
    pub fn print_summary(&self) {
        let files = self.file_entries();
        if files.is_empty() {
            return;
        }

        self.stage("Summary");

        let mut artifacts = 0usize;
        for file in &files {
            let (icon, color, verb) = match file.status {
                FileStatus::Written => ("✓", "\x1b[32m", "written"),
                FileStatus::DryRun => ("~", "\x1b[37m", "not written"),
                FileStatus::Failed => ("✗", "\x1b[31m", "failed"),
            };
            artifacts += file.artifacts;
            self.info(&format!(
                "{color}{icon} {} ({} files {verb})\x1b[0m",
                file.source, file.artifacts
            ));
        }

        self.info(&format!(
            "{} sources, {artifacts} files, \x1b[31m{} failed\x1b[0m",
            files.len(),
            self.failure_count()
        ));
    }
}

impl Log for Logger {
    forward_log_methods!(stage, info, debug, warn, error, dry_run);

    fn record_file(&self, source: &str, status: FileStatus, artifacts: usize) {
        self.record_file(source, status, artifacts);
    }
}
