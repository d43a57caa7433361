use std::path::{Path, PathBuf};

use anyhow::{Context as _, Result, bail};

use crate::cli::{Cli, VERSION};
use crate::compiler::Compiler;
use crate::config::Settings;
use crate::error::{CompileError, SinkError};
use crate::logging::{FileStatus, Log, Logger};
use crate::output::Artifact;
use crate::sink::{DirectorySink, MemorySink, Sink, TarSink, validate_relative_path};

/// An artifact rendered to text, ready to be written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rendered {
    /// Path relative to the output root.
    pub path: String,
    /// Full file content.
    pub content: String,
}

/// Run the compile command.
///
/// # Errors
///
/// Returns an error if settings cannot be resolved, a source file cannot be
/// read or compiled, or an artifact cannot be written.
pub fn run(cli: &Cli, log: &Logger) -> Result<()> {
    let settings = Settings::resolve(cli)?;

    log.info(&format!("sensible {VERSION}"));
    log.debug(&format!("output: {}", settings.output.display()));

    let mut sink: Box<dyn Sink> = if settings.dry_run {
        Box::new(MemorySink::default())
    } else if settings.tar {
        if settings.output.is_dir() {
            bail!(
                "--tar needs an archive file name, but {} is a directory",
                settings.output.display()
            );
        }
        Box::new(TarSink::new(&settings.output, settings.prefix.as_deref())?)
    } else {
        Box::new(DirectorySink::new(&settings.output))
    };

    let result = compile_files(&settings, &cli.files, sink.as_mut(), log)
        .and_then(|()| sink.close().context("Failed to close output"));
    log.print_summary();
    result
}

/// Compile `files` in order with one shared compiler, writing each file's
/// artifacts to `sink` once that file has compiled completely.
///
/// Stops at the first failure; artifacts of earlier files stay written.
///
/// # Errors
///
/// Returns an error if a file cannot be read, compiled, or written.
pub fn compile_files(
    settings: &Settings,
    files: &[PathBuf],
    sink: &mut dyn Sink,
    log: &dyn Log,
) -> Result<()> {
    let mut compiler = Compiler::new(settings.extension.clone());
    for file in files {
        let source = file.display().to_string();
        log.stage(&format!("Compiling {source}"));
        match compile_file(&mut compiler, file, settings.dry_run, sink, log) {
            Ok(count) => {
                let status = if settings.dry_run {
                    FileStatus::DryRun
                } else {
                    FileStatus::Written
                };
                log.record_file(&source, status, count);
            }
            Err(err) => {
                log.record_file(&source, FileStatus::Failed, 0);
                return Err(err);
            }
        }
    }
    Ok(())
}

fn compile_file(
    compiler: &mut Compiler,
    path: &Path,
    dry_run: bool,
    sink: &mut dyn Sink,
    log: &dyn Log,
) -> Result<usize> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    let artifacts = compiler
        .compile_source(&text)
        .with_context(|| format!("Failed to compile {}", path.display()))?;
    let rendered =
        render_all(&artifacts).with_context(|| format!("Failed to render {}", path.display()))?;
    write_artifacts(sink, &rendered, dry_run, log)
        .with_context(|| format!("Failed to write output of {}", path.display()))?;
    Ok(rendered.len())
}

/// Render every artifact before anything is written, so that a rendering
/// failure leaves the output untouched.
///
/// # Errors
///
/// Returns [`CompileError::Emit`] if an artifact cannot be serialized.
pub fn render_all(artifacts: &[Artifact]) -> Result<Vec<Rendered>, CompileError> {
    artifacts
        .iter()
        .map(|artifact| {
            artifact.render().map(|content| Rendered {
                path: artifact.path.clone(),
                content,
            })
        })
        .collect()
}

/// Hand rendered artifacts to `sink` in order.
///
/// Every path is checked before the first write, so an unsafe path leaves
/// the sink untouched.
///
/// # Errors
///
/// Returns [`SinkError::UnsafePath`] for a path outside the output root, or
/// the first [`SinkError`] reported by the sink.
pub fn write_artifacts(
    sink: &mut dyn Sink,
    rendered: &[Rendered],
    dry_run: bool,
    log: &dyn Log,
) -> Result<(), SinkError> {
    for artifact in rendered {
        validate_relative_path(&artifact.path)?;
    }
    for artifact in rendered {
        if dry_run {
            log.dry_run(&format!("would write {}", artifact.path));
        } else {
            log.debug(&format!("writing {}", artifact.path));
        }
        sink.write_file(&artifact.path, &artifact.content)?;
    }
    Ok(())
}

#[cfg(test)]
#[allow(clippy::expect_used, clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use super::*;
    use crate::sink::MockSink;
    use mockall::Sequence;

    fn settings(dry_run: bool) -> Settings {
        Settings {
            output: PathBuf::from("."),
            extension: "yaml".to_string(),
            tar: false,
            prefix: None,
            dry_run,
        }
    }

    fn source_file(dir: &tempfile::TempDir, name: &str, text: &str) -> PathBuf {
        let path = dir.path().join(name);
        std::fs::write(&path, text).unwrap();
        path
    }

    fn rendered(path: &str, content: &str) -> Rendered {
        Rendered {
            path: path.to_string(),
            content: content.to_string(),
        }
    }

    // -----------------------------------------------------------------------
    // write_artifacts
    // -----------------------------------------------------------------------

    #[test]
    fn write_artifacts_preserves_order() {
        let mut seq = Sequence::new();
        let mut sink = MockSink::new();
        sink.expect_write_file()
            .withf(|path, content| path == "ansible.cfg" && content.starts_with("[defaults]"))
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_, _| Ok(()));
        sink.expect_write_file()
            .withf(|path, _| path == "hosts.yaml")
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_, _| Ok(()));

        let log = Logger::new();
        write_artifacts(
            &mut sink,
            &[
                rendered("ansible.cfg", "[defaults]\n"),
                rendered("hosts.yaml", "---\n{}\n"),
            ],
            false,
            &log,
        )
        .unwrap();
    }

    #[test]
    fn write_artifacts_stops_at_first_sink_error() {
        let mut sink = MockSink::new();
        sink.expect_write_file().times(1).returning(|path, _| {
            Err(SinkError::Io {
                path: path.to_string(),
                source: std::io::Error::other("disk full"),
            })
        });

        let log = Logger::new();
        let err = write_artifacts(
            &mut sink,
            &[rendered("a", "x"), rendered("b", "y")],
            false,
            &log,
        )
        .unwrap_err();
        assert!(matches!(err, SinkError::Io { .. }));
    }

    #[test]
    fn unsafe_path_anywhere_means_nothing_is_written() {
        let mut sink = MockSink::new();
        sink.expect_write_file().never();

        let log = Logger::new();
        let err = write_artifacts(
            &mut sink,
            &[
                rendered("ansible.cfg", "[defaults]\n"),
                rendered("hosts.yaml", "---\n{}\n"),
                rendered("../escape.yaml", "---\n[]\n"),
            ],
            false,
            &log,
        )
        .unwrap_err();
        assert!(matches!(err, SinkError::UnsafePath(path) if path == "../escape.yaml"));
    }

    // -----------------------------------------------------------------------
    // compile_files
    // -----------------------------------------------------------------------

    #[test]
    fn compile_error_writes_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let file = source_file(&dir, "bad.scm", r#"(options (var debug "yes"))"#);
        let mut sink = MockSink::new();
        sink.expect_write_file().never();

        let log = Logger::new();
        let err = compile_files(&settings(false), &[file], &mut sink, &log).unwrap_err();
        assert!(format!("{err:#}").contains("Bad ansible.cfg value for debug"));
        assert_eq!(log.file_entries()[0].status, FileStatus::Failed);
    }

    #[test]
    fn missing_source_is_reported_with_path() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("absent.scm");
        let mut sink = MockSink::new();
        sink.expect_write_file().never();

        let log = Logger::new();
        let err = compile_files(&settings(false), &[missing], &mut sink, &log).unwrap_err();
        assert!(err.to_string().starts_with("Failed to read"));
    }

    #[test]
    fn earlier_files_stay_written_when_a_later_one_fails() {
        let dir = tempfile::tempdir().unwrap();
        let good = source_file(&dir, "good.scm", "(groups (group (name web)))");
        let bad = source_file(&dir, "bad.scm", "(groups (group");
        let mut sink = MemorySink::default();

        let log = Logger::new();
        assert!(compile_files(&settings(false), &[good, bad], &mut sink, &log).is_err());
        assert!(sink.get("hosts.yaml").is_some());
        let entries = log.file_entries();
        assert_eq!(entries[0].status, FileStatus::Written);
        assert_eq!(entries[0].artifacts, 2);
        assert_eq!(entries[1].status, FileStatus::Failed);
    }

    #[test]
    fn dry_run_records_dry_run_status() {
        let dir = tempfile::tempdir().unwrap();
        let file = source_file(&dir, "site.scm", "(options (var debug #t))");
        let mut sink = MemorySink::default();

        let log = Logger::new();
        compile_files(&settings(true), &[file], &mut sink, &log).unwrap();
        assert_eq!(
            sink.get("ansible.cfg"),
            Some("[defaults]\ninventory = hosts.yaml\ndebug = true\n\n")
        );
        assert_eq!(log.file_entries()[0].status, FileStatus::DryRun);
    }

    #[test]
    fn mangling_is_shared_across_files() {
        let dir = tempfile::tempdir().unwrap();
        let first = source_file(&dir, "a.scm", "(groups (group (name my-group)))");
        let second = source_file(&dir, "b.scm", "(groups (group (name my_group)))");
        let mut sink = MemorySink::default();

        let log = Logger::new();
        compile_files(&settings(false), &[first, second], &mut sink, &log).unwrap();
        assert_eq!(
            sink.get("hosts.yaml"),
            Some("---\nmy_group_2:\n  hosts: {}\n  vars: {}\n")
        );
    }
}
