//! Destinations for compiled artifacts.
//!
//! The compiler only ever hands a sink a relative path and the full content
//! of a file; where the bytes land is up to the implementation.
mod archive;
mod directory;
mod memory;

pub use archive::TarSink;
pub use directory::DirectorySink;
pub use memory::MemorySink;

use std::path::{Component, Path};

use crate::error::SinkError;

/// A place artifacts can be written to.
#[cfg_attr(test, mockall::automock)]
pub trait Sink {
    /// Write `content` as the whole file at `relative_path`.
    ///
    /// Parent directories are created as needed and an existing file is
    /// replaced atomically: readers see either the old or the new content.
    ///
    /// # Errors
    ///
    /// Returns [`SinkError::UnsafePath`] for absolute paths or paths that
    /// climb out of the root, and [`SinkError::Io`] if the write fails.
    fn write_file(&mut self, relative_path: &str, content: &str) -> Result<(), SinkError>;

    /// Release any held resources.
    ///
    /// # Errors
    ///
    /// Returns [`SinkError::Io`] if pending output cannot be flushed.
    fn close(&mut self) -> Result<(), SinkError> {
        Ok(())
    }
}

fn io_error(path: &Path) -> impl FnOnce(std::io::Error) -> SinkError + '_ {
    move |source| SinkError::Io {
        path: path.display().to_string(),
        source,
    }
}

/// Check that `relative_path` stays inside the output root.
///
/// # Errors
///
/// Returns [`SinkError::UnsafePath`] if the path is empty, absolute, or
/// contains `..`.
pub fn validate_relative_path(relative_path: &str) -> Result<&Path, SinkError> {
    let path = Path::new(relative_path);
    let safe = !relative_path.is_empty()
        && path
            .components()
            .all(|c| matches!(c, Component::Normal(_) | Component::CurDir));
    if safe {
        Ok(path)
    } else {
        Err(SinkError::UnsafePath(relative_path.to_string()))
    }
}
