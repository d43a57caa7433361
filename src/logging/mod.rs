//! Console logging: a [`tracing`] subscriber with compiler-style output and a
//! [`Logger`] facade that also collects the per-file run summary.
mod logger;
mod subscriber;
mod types;

pub use logger::Logger;
pub use subscriber::init_subscriber;
pub use types::{FileEntry, FileStatus, Log};

/// Target used for stage headers.
pub const STAGE_TARGET: &str = "sensible::stage";

/// Target used for dry-run action messages.
pub const DRY_RUN_TARGET: &str = "sensible::dry_run";
