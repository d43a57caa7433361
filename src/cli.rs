//! Command-line interface definition.
use clap::Parser;
use std::path::PathBuf;

/// Version reported by `--version` and the run banner: `SENSIBLE_VERSION`
/// when set at build time, otherwise the package version.
pub const VERSION: &str = match option_env!("SENSIBLE_VERSION") {
    Some(version) => version,
    None => env!("CARGO_PKG_VERSION"),
};

/// Top-level CLI entry point for the compiler.
#[derive(Parser, Debug)]
#[command(
    name = "sensible",
    about = "Compile S-expression infrastructure descriptions into Ansible files",
    version = VERSION
)]
pub struct Cli {
    /// S-expression source files, compiled in order
    #[arg(required = true)]
    pub files: Vec<PathBuf>,

    /// Output directory (default: current directory), or the archive file
    /// with --tar
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Write all artifacts into one tar archive at --output
    #[arg(long)]
    pub tar: bool,

    /// Directory prefix for entries in the tar archive
    #[arg(long, requires = "tar")]
    pub prefix: Option<String>,

    /// Settings file (default: sensible.toml in the current directory, if present)
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// File extension for YAML artifacts (default: yaml)
    #[arg(long)]
    pub extension: Option<String>,

    /// Compile and list the files that would be written, without writing them
    #[arg(short = 'd', long)]
    pub dry_run: bool,

    /// Enable verbose output
    #[arg(short, long)]
    pub verbose: bool,
}
