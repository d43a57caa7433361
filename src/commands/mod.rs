//! Top-level command orchestration.
/// The `sensible FILES...` command.
pub mod compile;
