use std::io::Write as _;
use std::path::PathBuf;

use super::{Sink, io_error, validate_relative_path};
use crate::error::SinkError;

/// Writes artifacts under a root directory on the local file system.
///
/// Each file is written to a temporary file in its destination directory
/// and then renamed over the target.
#[derive(Debug)]
pub struct DirectorySink {
    root: PathBuf,
}

impl DirectorySink {
    /// A sink writing under `root`, which is created on first write.
    #[must_use]
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }
}

impl Sink for DirectorySink {
    fn write_file(&mut self, relative_path: &str, content: &str) -> Result<(), SinkError> {
        let target = self.root.join(validate_relative_path(relative_path)?);
        let parent = target.parent().unwrap_or(self.root.as_path());
        std::fs::create_dir_all(parent).map_err(io_error(parent))?;

        let mut staged = tempfile::NamedTempFile::new_in(parent).map_err(io_error(&target))?;
        staged
            .write_all(content.as_bytes())
            .map_err(io_error(&target))?;
        staged.as_file().sync_all().map_err(io_error(&target))?;
        staged
            .persist(&target)
            .map_err(|e| io_error(&target)(e.error))?;
        tracing::debug!("wrote {}", target.display());
        Ok(())
    }
}
