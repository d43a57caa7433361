//! Domain-specific error types for the compiler.
//!
//! This module provides a structured error hierarchy using [`thiserror`].
//! The reader, object layer and compiler return typed errors while the
//! command handler at the CLI boundary converts them to [`anyhow::Error`]
//! via the standard `?` operator, adding the name of the input file.
//!
//! # Error hierarchy
//!
//! ```text
//! CompileError
//! ├── Syntax(SyntaxError)      : malformed source text
//! ├── Structure(StructureError): missing/malformed properties, unknown tags
//! ├── Value(ValueError)        : scalar of the wrong kind for a typed field
//! └── Emit(serde_yaml::Error)  : a value tree could not be serialized
//!
//! SinkError                    : an artifact could not be persisted
//! ```
//!
//! Every variant is fatal: compilation of the current file stops at the
//! first error and nothing is written.

use thiserror::Error;

/// Top-level error type for compiling one source file.
#[derive(Error, Debug)]
pub enum CompileError {
    /// The source text is not a well-formed sequence of S-expressions.
    #[error(transparent)]
    Syntax(#[from] SyntaxError),

    /// A tagged object does not have the shape its tag requires.
    #[error(transparent)]
    Structure(#[from] StructureError),

    /// A scalar destined for a typed target field has the wrong kind.
    #[error(transparent)]
    Value(#[from] ValueError),

    /// A lowered value tree could not be rendered as YAML.
    #[error("Failed to emit YAML: {0}")]
    Emit(#[from] serde_yaml::Error),
}

/// Malformed source text, located by 1-based line and column.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Syntax error at line {line}, column {column}: {message}")]
pub struct SyntaxError {
    /// Line of the offending character (1-based).
    pub line: usize,
    /// Column of the offending character (1-based, in characters).
    pub column: usize,
    /// Human-readable description.
    pub message: String,
}

impl SyntaxError {
    /// Build an error at `line`/`column`.
    #[must_use]
    pub fn new(line: usize, column: usize, message: impl Into<String>) -> Self {
        Self {
            line,
            column,
            message: message.into(),
        }
    }
}

/// Errors in the shape of tagged objects.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StructureError {
    /// A form was expected to be a list headed by a given tag.
    #[error("Not a ({expected} ...) object: {found}")]
    NotTagged {
        /// The tag that was expected.
        expected: String,
        /// Printed form of what was found instead.
        found: String,
    },

    /// A mandatory property is absent.
    #[error("Missing ({property} ...) in {object}")]
    MissingProperty {
        /// Tag of the object being decoded.
        object: String,
        /// Name of the missing property.
        property: String,
    },

    /// A property was found but has the wrong arity or value type.
    #[error("Bad property {found}: expected exactly one {expected}")]
    BadProperty {
        /// Description of the expected value kind.
        expected: String,
        /// Printed form of the whole property.
        found: String,
    },

    /// The top level contains a form that is not a known section.
    #[error("Unknown top-level expression: {0}")]
    UnknownTopLevel(String),

    /// A top-level section appears more than once.
    #[error("Duplicate top-level section ({0} ...)")]
    DuplicateSection(String),

    /// A role has no `(tasks ...)`, or its task list is empty.
    #[error("Role {0} has no (tasks ...)")]
    RoleWithoutTasks(String),

    /// A form does not have the shape required at this position.
    #[error("Malformed {what}: {found}")]
    Malformed {
        /// What was being decoded (e.g. `"module invocation"`).
        what: &'static str,
        /// Printed form of the offending value.
        found: String,
    },
}

/// Errors for scalars that do not fit the typed field they target.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValueError {
    /// Engine defaults only accept booleans.
    #[error("Bad ansible.cfg value for {key}: {found}")]
    NotBoolean {
        /// The option name as written in the source.
        key: String,
        /// Printed form of the offending value.
        found: String,
    },
}

/// Errors raised while persisting artifacts.
#[derive(Error, Debug)]
pub enum SinkError {
    /// The artifact path would escape the output root.
    #[error("Refusing to write outside the output root: {0}")]
    UnsafePath(String),

    /// The sink was already closed.
    #[error("Output {0} is already closed")]
    Closed(String),

    /// An I/O error occurred while writing an artifact.
    #[error("IO error writing {path}: {source}")]
    Io {
        /// Path of the artifact that could not be written.
        path: String,
        /// Underlying I/O error.
        source: std::io::Error,
    },
}
