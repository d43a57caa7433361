//! The parsed tree: atoms and lists.
use std::fmt;

/// A parsed S-expression.
///
/// Lists are the only composite. Symbols and strings are kept apart even
/// though both end up as text in the output: symbols are mangled into
/// identifiers, strings pass through unchanged.
///
/// # Examples
///
/// ```
/// use sensible_cli::reader::Form;
///
/// let form = Form::List(vec![Form::symbol("name"), Form::string("web")]);
/// assert_eq!(form.to_string(), "(name \"web\")");
/// assert_eq!(form.head(), Some("name"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Form {
    /// A bare identifier, case preserved.
    Symbol(String),
    /// A double-quoted string with escapes resolved.
    String(String),
    /// A signed 64-bit integer.
    Integer(i64),
    /// `#t` or `#f`.
    Boolean(bool),
    /// An ordered sequence of forms.
    List(Vec<Form>),
}

impl Form {
    /// Construct a symbol.
    #[must_use]
    pub fn symbol(name: impl Into<String>) -> Self {
        Self::Symbol(name.into())
    }

    /// Construct a string.
    #[must_use]
    pub fn string(value: impl Into<String>) -> Self {
        Self::String(value.into())
    }

    /// The symbol's name, if this is a symbol.
    #[must_use]
    pub fn as_symbol(&self) -> Option<&str> {
        match self {
            Self::Symbol(name) => Some(name),
            _ => None,
        }
    }

    /// The string's value, if this is a string.
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(value) => Some(value),
            _ => None,
        }
    }

    /// The boolean's value, if this is a boolean.
    #[must_use]
    pub const fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Boolean(value) => Some(*value),
            _ => None,
        }
    }

    /// The elements, if this is a list.
    #[must_use]
    pub fn as_list(&self) -> Option<&[Self]> {
        match self {
            Self::List(items) => Some(items),
            _ => None,
        }
    }

    /// The leading symbol of a non-empty list, i.e. its tag.
    #[must_use]
    pub fn head(&self) -> Option<&str> {
        self.as_list()?.first()?.as_symbol()
    }
}

/// Canonical printer. Reading the printed text yields an equal form.
impl fmt::Display for Form {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Symbol(name) => f.write_str(name),
            Self::String(value) => {
                f.write_str("\"")?;
                for ch in value.chars() {
                    match ch {
                        '"' => f.write_str("\\\"")?,
                        '\\' => f.write_str("\\\\")?,
                        '\n' => f.write_str("\\n")?,
                        '\t' => f.write_str("\\t")?,
                        '\r' => f.write_str("\\r")?,
                        '\0' => f.write_str("\\0")?,
                        c if c.is_control() => write!(f, "\\x{:x};", u32::from(c))?,
                        c => write!(f, "{c}")?,
                    }
                }
                f.write_str("\"")
            }
            Self::Integer(value) => write!(f, "{value}"),
            Self::Boolean(true) => f.write_str("#t"),
            Self::Boolean(false) => f.write_str("#f"),
            Self::List(items) => {
                f.write_str("(")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        f.write_str(" ")?;
                    }
                    write!(f, "{item}")?;
                }
                f.write_str(")")
            }
        }
    }
}
