//! Core logging types: file entries, status, and the [`Log`] trait.

/// Compilation result of one source file, for summary reporting.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileEntry {
    /// Source path as given on the command line.
    pub source: String,
    /// Final status of the file.
    pub status: FileStatus,
    /// Number of artifacts produced (or that would have been written).
    pub artifacts: usize,
}

/// Status of a compiled source file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileStatus {
    /// Compiled and all artifacts were written.
    Written,
    /// Compiled in dry-run mode; nothing was written.
    DryRun,
    /// Compilation or writing failed.
    Failed,
}

/// Abstraction over logging backends, so command code can log without
/// knowing where output goes.
pub trait Log {
    /// Log a stage header (major section).
    fn stage(&self, msg: &str);
    /// Log an informational message.
    fn info(&self, msg: &str);
    /// Log a debug message (suppressed on console unless verbose).
    fn debug(&self, msg: &str);
    /// Log a warning message.
    fn warn(&self, msg: &str);
    /// Log an error message.
    fn error(&self, msg: &str);
    /// Log a dry-run action message.
    fn dry_run(&self, msg: &str);
    /// Record a source file result for the summary.
    fn record_file(&self, source: &str, status: FileStatus, artifacts: usize);
}
