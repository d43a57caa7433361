//! Layered settings: defaults, TOML file, environment, command line.
use anyhow::{Context as _, Result, bail};
use serde::Deserialize;
use std::path::{Path, PathBuf};

use crate::cli::Cli;
use crate::compiler::DEFAULT_EXTENSION;

/// Settings file picked up from the working directory when `--config` is
/// not given.
pub const DEFAULT_CONFIG_FILE: &str = "sensible.toml";

/// Environment variable overriding the output directory.
pub const OUTPUT_ENV: &str = "SENSIBLE_OUTPUT";

/// Contents of a settings file. Every key is optional.
///
/// ```toml
/// output = "build/ansible"
/// extension = "yml"
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FileSettings {
    /// Output directory.
    pub output: Option<PathBuf>,
    /// Extension of YAML artifacts.
    pub extension: Option<String>,
}

/// Fully resolved settings for one run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    /// Root directory artifacts are written under, or the archive file.
    pub output: PathBuf,
    /// Write a tar archive at `output` instead of a directory tree.
    pub tar: bool,
    /// Directory prefix for archive entries.
    pub prefix: Option<String>,
    /// Extension of YAML artifacts, without the dot.
    pub extension: String,
    /// Compile only; do not write anything.
    pub dry_run: bool,
}

/// Load a settings file.
///
/// # Errors
///
/// Returns an error if the file cannot be read or parsed.
pub fn load_file(path: &Path) -> Result<FileSettings> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read settings file: {}", path.display()))?;
    toml::from_str(&content)
        .with_context(|| format!("Failed to parse settings file: {}", path.display()))
}

/// Load a settings file if it exists, or return empty settings.
///
/// # Errors
///
/// Returns an error if the file exists but cannot be read or parsed.
pub fn load_optional(path: &Path) -> Result<FileSettings> {
    if !path.exists() {
        return Ok(FileSettings::default());
    }
    load_file(path)
}

/// Normalise an extension: strip one leading dot, reject empty values and
/// path separators.
fn normalise_extension(raw: &str) -> Result<String> {
    let ext = raw.strip_prefix('.').unwrap_or(raw);
    if ext.is_empty() || ext.contains(['/', '\\']) {
        bail!("invalid extension '{raw}'");
    }
    Ok(ext.to_string())
}

impl Settings {
    /// Resolve settings for `cli`, reading the settings file and environment.
    ///
    /// An explicit `--config` file must exist; the default file is optional.
    ///
    /// # Errors
    ///
    /// Returns an error if a settings file is unreadable or invalid, or the
    /// extension is invalid.
    pub fn resolve(cli: &Cli) -> Result<Self> {
        let file = match &cli.config {
            Some(path) => load_file(path)?,
            None => load_optional(Path::new(DEFAULT_CONFIG_FILE))?,
        };
        let env_output = std::env::var_os(OUTPUT_ENV).map(PathBuf::from);
        Self::layer(file, env_output, cli)
    }

    /// Combine the layers, later ones winning.
    ///
    /// # Errors
    ///
    /// Returns an error if the resulting extension is invalid, or `--tar`
    /// is given without an output file name.
    pub fn layer(file: FileSettings, env_output: Option<PathBuf>, cli: &Cli) -> Result<Self> {
        let output = cli.output.clone().or(env_output).or(file.output);
        if cli.tar && output.is_none() {
            bail!("--tar needs --output naming the archive file");
        }
        let output = output.unwrap_or_else(|| PathBuf::from("."));
        let extension = cli
            .extension
            .as_deref()
            .or(file.extension.as_deref())
            .unwrap_or(DEFAULT_EXTENSION);
        Ok(Self {
            output,
            extension: normalise_extension(extension)?,
            tar: cli.tar,
            prefix: cli.prefix.clone(),
            dry_run: cli.dry_run,
        })
    }
}

#[cfg(test)]
#[allow(clippy::expect_used, clippy::unwrap_used)]
mod tests {
    use super::*;
    use clap::Parser as _;

    fn cli(args: &[&str]) -> Cli {
        Cli::parse_from(std::iter::once("sensible").chain(args.iter().copied()))
    }

    #[test]
    fn defaults_apply_without_layers() {
        let settings = Settings::layer(FileSettings::default(), None, &cli(&["a.scm"])).unwrap();
        assert_eq!(settings.output, PathBuf::from("."));
        assert_eq!(settings.extension, "yaml");
        assert!(!settings.dry_run);
    }

    #[test]
    fn file_then_env_then_cli() {
        let file = FileSettings {
            output: Some(PathBuf::from("from-file")),
            extension: Some("yml".to_string()),
        };
        let s = Settings::layer(file.clone(), None, &cli(&["a.scm"])).unwrap();
        assert_eq!(s.output, PathBuf::from("from-file"));
        assert_eq!(s.extension, "yml");

        let s = Settings::layer(file.clone(), Some(PathBuf::from("from-env")), &cli(&["a.scm"]))
            .unwrap();
        assert_eq!(s.output, PathBuf::from("from-env"));

        let s = Settings::layer(
            file,
            Some(PathBuf::from("from-env")),
            &cli(&["-o", "from-cli", "--extension", ".yaml", "a.scm"]),
        )
        .unwrap();
        assert_eq!(s.output, PathBuf::from("from-cli"));
        assert_eq!(s.extension, "yaml");
    }

    #[test]
    fn tar_needs_an_output_name() {
        let err = Settings::layer(FileSettings::default(), None, &cli(&["--tar", "a.scm"]))
            .unwrap_err();
        assert!(err.to_string().contains("--tar needs --output"));

        let s = Settings::layer(
            FileSettings::default(),
            Some(PathBuf::from("site.tar")),
            &cli(&["--tar", "--prefix", "site", "a.scm"]),
        )
        .unwrap();
        assert!(s.tar);
        assert_eq!(s.output, PathBuf::from("site.tar"));
        assert_eq!(s.prefix.as_deref(), Some("site"));
    }

    #[test]
    fn invalid_extension_is_rejected() {
        let err = Settings::layer(
            FileSettings::default(),
            None,
            &cli(&["--extension", "a/b", "a.scm"]),
        )
        .unwrap_err();
        assert!(err.to_string().contains("invalid extension"));
        assert!(normalise_extension(".").is_err());
    }

    #[test]
    fn load_file_parses_toml() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("sensible.toml");
        std::fs::write(&path, "output = \"build\"\nextension = \"yml\"\n").unwrap();
        let file = load_file(&path).unwrap();
        assert_eq!(file.output, Some(PathBuf::from("build")));
        assert_eq!(file.extension.as_deref(), Some("yml"));
    }

    #[test]
    fn load_file_rejects_unknown_keys() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("sensible.toml");
        std::fs::write(&path, "outptu = \"build\"\n").unwrap();
        let err = load_file(&path).unwrap_err();
        assert!(err.to_string().contains("Failed to parse settings file"));
    }

    #[test]
    fn missing_optional_file_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        let file = load_optional(&dir.path().join("absent.toml")).unwrap();
        assert_eq!(file, FileSettings::default());
    }

    #[test]
    fn missing_explicit_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        assert!(load_file(&dir.path().join("absent.toml")).is_err());
    }
}
