//! S-expression reader.
//!
//! Turns source text into a homogeneous tree of [`Form`]s with no knowledge
//! of what the forms mean. Supported syntax:
//!
//! - lists delimited by `( )` or `[ ]` (a closer must match its opener)
//! - double-quoted strings with `\" \\ \n \t \r \0` and `\xHH;` escapes
//! - signed 64-bit integers
//! - booleans `#t`, `#f`, `#true`, `#false`
//! - symbols: any other run of non-whitespace, non-delimiter characters
//! - `;` line comments and `#;` datum comments
mod form;
mod parser;

pub use form::Form;

use crate::error::SyntaxError;

/// Parse every top-level form in `source`, in source order.
///
/// # Examples
///
/// ```
/// use sensible_cli::reader::{parse_all, Form};
///
/// let forms = parse_all("(host (name web1)) ; trailing comment").unwrap();
/// assert_eq!(forms.len(), 1);
/// assert_eq!(forms[0].head(), Some("host"));
/// ```
///
/// # Errors
///
/// Returns a [`SyntaxError`] on unbalanced delimiters, malformed tokens,
/// or end of input inside a list or string.
pub fn parse_all(source: &str) -> Result<Vec<Form>, SyntaxError> {
    parser::Parser::new(source).parse_all()
}
