use std::collections::BTreeMap;

use super::{Sink, validate_relative_path};
use crate::error::SinkError;

/// Keeps artifacts in memory, keyed by relative path.
///
/// Used for dry runs and tests.
///
/// # Examples
///
/// ```
/// use sensible_cli::sink::{MemorySink, Sink};
///
/// let mut sink = MemorySink::default();
/// sink.write_file("site.yaml", "---\n[]\n").unwrap();
/// assert_eq!(sink.get("site.yaml"), Some("---\n[]\n"));
/// ```
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct MemorySink {
    files: BTreeMap<String, String>,
}

impl MemorySink {
    /// Content written at `relative_path`, if any.
    #[must_use]
    pub fn get(&self, relative_path: &str) -> Option<&str> {
        self.files.get(relative_path).map(String::as_str)
    }

    /// All written files, ordered by path.
    #[must_use]
    pub const fn files(&self) -> &BTreeMap<String, String> {
        &self.files
    }
}

impl Sink for MemorySink {
    fn write_file(&mut self, relative_path: &str, content: &str) -> Result<(), SinkError> {
        validate_relative_path(relative_path)?;
        self.files
            .insert(relative_path.to_string(), content.to_string());
        Ok(())
    }
}
