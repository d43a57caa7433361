//! Structural compiler: source text to target artifacts.
//!
//! Compilation runs in three steps:
//!
//! 1. [`reader::parse_all`] turns text into a generic form tree
//! 2. [`Document::decode`] validates the tree into typed records
//! 3. lowering maps each record to its target file, mangling every
//!    identifier that becomes a path segment or configuration key
//!
//! Nothing is produced for a file unless all three steps succeed.
mod lower;
pub mod model;

pub use lower::{ENGINE_DEFAULTS_FILE, INVENTORY_BASENAME, scalar_to_yaml};
pub use model::Document;

use crate::error::CompileError;
use crate::mangle::Mangler;
use crate::output::Artifact;
use crate::reader::{self, Form};

/// Extension used for YAML artifacts unless configured otherwise.
pub const DEFAULT_EXTENSION: &str = "yaml";

/// One compiler run.
///
/// The mangled-name table lives as long as the compiler, so every file
/// compiled by the same instance shares one consistent mangling. Create a
/// new instance per run.
///
/// # Examples
///
/// ```
/// use sensible_cli::compiler::Compiler;
///
/// let mut compiler = Compiler::default();
/// let artifacts = compiler
///     .compile_source("(groups (group (name web) (hosts (host (name web1)))))")
///     .unwrap();
/// assert_eq!(artifacts[1].path, "hosts.yaml");
/// ```
#[derive(Debug)]
pub struct Compiler {
    mangler: Mangler,
    extension: String,
}

impl Default for Compiler {
    fn default() -> Self {
        Self::new(DEFAULT_EXTENSION)
    }
}

impl Compiler {
    /// A fresh compiler writing YAML artifacts with `extension`.
    #[must_use]
    pub fn new(extension: impl Into<String>) -> Self {
        Self {
            mangler: Mangler::new(),
            extension: extension.into(),
        }
    }

    /// Parse and compile one source file.
    ///
    /// # Errors
    ///
    /// Returns the first [`CompileError`] encountered; no artifacts are
    /// returned in that case.
    pub fn compile_source(&mut self, source: &str) -> Result<Vec<Artifact>, CompileError> {
        let forms = reader::parse_all(source)?;
        self.compile_forms(&forms)
    }

    /// Compile already-parsed top-level forms.
    ///
    /// # Errors
    ///
    /// Returns a structural or value error for malformed input.
    pub fn compile_forms(&mut self, forms: &[Form]) -> Result<Vec<Artifact>, CompileError> {
        let document = Document::decode(forms)?;
        tracing::debug!(
            "decoded {} option(s), {} group(s), {} role(s), {} playbook(s)",
            document.options.len(),
            document.groups.len(),
            document.roles.len(),
            document.playbooks.len()
        );
        lower::Lowerer::new(&mut self.mangler, &self.extension).document(&document)
    }

    /// The mangled-name table built so far.
    #[must_use]
    pub const fn mangler(&self) -> &Mangler {
        &self.mangler
    }
}
