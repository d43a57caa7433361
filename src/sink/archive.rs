use std::path::{Path, PathBuf};

use super::{Sink, io_error, validate_relative_path};
use crate::error::SinkError;

/// Collects artifacts into a single tar archive.
///
/// Entries are buffered until [`Sink::close`], which writes the archive to
/// a temporary file next to the target and renames it into place. A run
/// that never reaches `close` leaves no archive behind. Writing a path a
/// second time replaces the earlier entry, keeping its position.
///
/// Entries are plain files with mode `0644` and a zero timestamp, so the
/// same input always yields the same bytes.
#[derive(Debug)]
pub struct TarSink {
    target: PathBuf,
    prefix: Option<String>,
    entries: Vec<(String, String)>,
    closed: bool,
}

impl TarSink {
    /// A sink that will write the archive to `target`, naming every entry
    /// `<prefix>/<path>` when `prefix` is given.
    ///
    /// # Errors
    ///
    /// Returns [`SinkError::UnsafePath`] if `prefix` is absolute or climbs
    /// with `..`.
    pub fn new(target: impl Into<PathBuf>, prefix: Option<&str>) -> Result<Self, SinkError> {
        let prefix = prefix
            .map(|p| validate_relative_path(p).map(|_| p.trim_end_matches('/').to_string()))
            .transpose()?;
        Ok(Self {
            target: target.into(),
            prefix,
            entries: Vec::new(),
            closed: false,
        })
    }

    fn entry_name(&self, relative_path: &str) -> String {
        match &self.prefix {
            Some(prefix) if !prefix.is_empty() => format!("{prefix}/{relative_path}"),
            _ => relative_path.to_string(),
        }
    }

    fn staging_dir(&self) -> &Path {
        match self.target.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        }
    }
}

impl Sink for TarSink {
    fn write_file(&mut self, relative_path: &str, content: &str) -> Result<(), SinkError> {
        if self.closed {
            return Err(SinkError::Closed(self.target.display().to_string()));
        }
        validate_relative_path(relative_path)?;
        let name = self.entry_name(relative_path);
        if let Some(entry) = self.entries.iter_mut().find(|(n, _)| *n == name) {
            entry.1 = content.to_string();
        } else {
            self.entries.push((name, content.to_string()));
        }
        Ok(())
    }

    fn close(&mut self) -> Result<(), SinkError> {
        if self.closed {
            return Ok(());
        }
        self.closed = true;

        let dir = self.staging_dir();
        std::fs::create_dir_all(dir).map_err(io_error(dir))?;
        let staged = tempfile::NamedTempFile::new_in(dir).map_err(io_error(&self.target))?;

        let mut builder = tar::Builder::new(staged);
        for (name, content) in &self.entries {
            let mut header = tar::Header::new_gnu();
            header.set_entry_type(tar::EntryType::Regular);
            header.set_size(content.len() as u64);
            header.set_mode(0o644);
            header.set_mtime(0);
            builder
                .append_data(&mut header, name, content.as_bytes())
                .map_err(io_error(&self.target))?;
        }
        let staged = builder.into_inner().map_err(io_error(&self.target))?;
        staged.as_file().sync_all().map_err(io_error(&self.target))?;
        staged
            .persist(&self.target)
            .map_err(|e| io_error(&self.target)(e.error))?;
        tracing::debug!(
            "wrote {} entries to {}",
            self.entries.len(),
            self.target.display()
        );
        Ok(())
    }
}
