// Shared helpers for integration tests.
//
// Provides a temporary workspace holding source files and an output
// directory, so each test runs the compiler end to end in isolation.
//
// Used by all integration test binaries that declare `mod common;`.
#![allow(dead_code)]

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use clap::Parser as _;
use sensible_cli::cli::Cli;
use sensible_cli::commands::compile;
use sensible_cli::logging::Logger;

/// An isolated workspace backed by a [`tempfile::TempDir`].
///
/// Sources live directly under the root; artifacts are written to `out/`.
pub struct Workspace {
    pub root: tempfile::TempDir,
}

impl Workspace {
    pub fn new() -> Self {
        Self {
            root: tempfile::tempdir().expect("create temp dir"),
        }
    }

    /// Write a source file and return its path.
    pub fn source(&self, name: &str, text: &str) -> PathBuf {
        let path = self.root.path().join(name);
        std::fs::write(&path, text).expect("write source file");
        path
    }

    pub fn out_dir(&self) -> PathBuf {
        self.root.path().join("out")
    }

    /// Run the compile command with `-o <out>` and the given extra arguments.
    pub fn compile(&self, args: &[&str]) -> anyhow::Result<()> {
        self.compile_to(&self.out_dir(), args)
    }

    /// Run the compile command with `-o <output>` and the given extra arguments.
    pub fn compile_to(&self, output: &Path, args: &[&str]) -> anyhow::Result<()> {
        let mut argv = vec!["sensible", "-o", output.to_str().expect("utf-8 temp path")];
        argv.extend_from_slice(args);
        let cli = Cli::parse_from(argv);
        compile::run(&cli, &Logger::new())
    }

    /// Read an artifact relative to the output directory.
    pub fn artifact(&self, relative: &str) -> String {
        std::fs::read_to_string(self.out_dir().join(relative)).expect("read artifact")
    }
}

/// Collect `(entry name, content)` pairs from a tar archive, in order.
pub fn read_archive(path: &Path) -> Vec<(String, String)> {
    use std::io::Read as _;

    let file = std::fs::File::open(path).expect("open archive");
    let mut archive = tar::Archive::new(file);
    archive
        .entries()
        .expect("archive entries")
        .map(|entry| {
            let mut entry = entry.expect("archive entry");
            let name = entry.path().expect("entry path").to_string_lossy().into_owned();
            let mut content = String::new();
            entry.read_to_string(&mut content).expect("entry content");
            (name, content)
        })
        .collect()
}

/// Collect every file under `dir`, keyed by path relative to `dir`.
pub fn read_tree(dir: &Path) -> BTreeMap<String, Vec<u8>> {
    fn walk(base: &Path, dir: &Path, files: &mut BTreeMap<String, Vec<u8>>) {
        for entry in std::fs::read_dir(dir).expect("read dir") {
            let path = entry.expect("dir entry").path();
            if path.is_dir() {
                walk(base, &path, files);
            } else {
                let relative = path
                    .strip_prefix(base)
                    .expect("path under base")
                    .to_string_lossy()
                    .replace('\\', "/");
                files.insert(relative, std::fs::read(&path).expect("read file"));
            }
        }
    }

    let mut files = BTreeMap::new();
    if dir.exists() {
        walk(dir, dir, &mut files);
    }
    files
}
