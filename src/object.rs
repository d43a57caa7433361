//! Tagged objects: lists whose first element is a symbol naming their kind.
//!
//! A property of an object is a body element that is itself a tagged object
//! whose tag is the property name. Lookups return the *first* match; later
//! duplicates are never observed.
use crate::error::StructureError;
use crate::reader::Form;

/// The scalar kind a simple property must hold.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Scalar {
    /// A bare identifier.
    Symbol,
    /// A double-quoted string.
    String,
    /// `#t` or `#f`.
    Boolean,
}

impl Scalar {
    /// True iff `form` is a scalar of this kind.
    #[must_use]
    pub const fn matches(self, form: &Form) -> bool {
        matches!(
            (self, form),
            (Self::Symbol, Form::Symbol(_))
                | (Self::String, Form::String(_))
                | (Self::Boolean, Form::Boolean(_))
        )
    }

    const fn describe(self) -> &'static str {
        match self {
            Self::Symbol => "symbol",
            Self::String => "string",
            Self::Boolean => "boolean",
        }
    }
}

/// True iff `form` is a non-empty list headed by the symbol `tag`.
///
/// # Examples
///
/// ```
/// use sensible_cli::object::is_tagged;
/// use sensible_cli::reader::parse_all;
///
/// let forms = parse_all("(host (name web1)) (\"host\")").unwrap();
/// assert!(is_tagged("host", &forms[0]));
/// assert!(!is_tagged("host", &forms[1]));
/// ```
#[must_use]
pub fn is_tagged(tag: &str, form: &Form) -> bool {
    form.head() == Some(tag)
}

/// Return the body of a `(tag ...)` object.
///
/// # Errors
///
/// Returns [`StructureError::NotTagged`] if `form` is not headed by `tag`.
pub fn strip_tag<'a>(tag: &str, form: &'a Form) -> Result<&'a [Form], StructureError> {
    match form.as_list() {
        Some([head, body @ ..]) if head.as_symbol() == Some(tag) => Ok(body),
        _ => Err(StructureError::NotTagged {
            expected: tag.to_string(),
            found: form.to_string(),
        }),
    }
}

/// The first element of `forms` headed by `tag`.
#[must_use]
pub fn find_first<'a>(tag: &str, forms: &'a [Form]) -> Option<&'a Form> {
    forms.iter().find(|form| is_tagged(tag, form))
}

/// Like [`find_first`], for properties the object cannot do without.
///
/// # Errors
///
/// Returns [`StructureError::MissingProperty`] if no element matches.
pub fn find_first_or_fail<'a>(
    object: &str,
    tag: &str,
    forms: &'a [Form],
) -> Result<&'a Form, StructureError> {
    find_first(tag, forms).ok_or_else(|| StructureError::MissingProperty {
        object: object.to_string(),
        property: tag.to_string(),
    })
}

/// Look up `(name VALUE)` among `forms`.
///
/// Returns `Ok(None)` when the property is absent. A property that is
/// present but has zero or several values, or a value of the wrong kind, is
/// an error rather than being treated as absent.
///
/// # Errors
///
/// Returns [`StructureError::BadProperty`] for a malformed property.
pub fn simple_property<'a>(
    forms: &'a [Form],
    name: &str,
    kind: Scalar,
) -> Result<Option<&'a Form>, StructureError> {
    let Some(property) = find_first(name, forms) else {
        return Ok(None);
    };
    match strip_tag(name, property)? {
        [value] if kind.matches(value) => Ok(Some(value)),
        _ => Err(StructureError::BadProperty {
            expected: kind.describe().to_string(),
            found: property.to_string(),
        }),
    }
}

/// Like [`simple_property`], for properties the object cannot do without.
///
/// # Errors
///
/// Returns [`StructureError::MissingProperty`] when absent and
/// [`StructureError::BadProperty`] when malformed.
pub fn required_simple_property<'a>(
    object: &str,
    forms: &'a [Form],
    name: &str,
    kind: Scalar,
) -> Result<&'a Form, StructureError> {
    simple_property(forms, name, kind)?.ok_or_else(|| StructureError::MissingProperty {
        object: object.to_string(),
        property: name.to_string(),
    })
}

/// The body of the first `(name ...)` among `forms`, verbatim.
#[must_use]
pub fn complex_property<'a>(forms: &'a [Form], name: &str) -> Option<&'a [Form]> {
    find_first(name, forms).and_then(|form| strip_tag(name, form).ok())
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use super::*;
    use crate::reader::parse_all;

    fn body(src: &str) -> Vec<Form> {
        parse_all(src).unwrap()
    }

    #[test]
    fn is_tagged_requires_matching_symbol_head() {
        let forms = body(r#"(group) ("group") () group (groups)"#);
        assert!(is_tagged("group", &forms[0]));
        assert!(!is_tagged("group", &forms[1]));
        assert!(!is_tagged("group", &forms[2]));
        assert!(!is_tagged("group", &forms[3]));
        assert!(!is_tagged("group", &forms[4]));
    }

    #[test]
    fn strip_tag_returns_body() {
        let forms = body("(host (name web1) (vars))");
        let rest = strip_tag("host", &forms[0]).unwrap();
        assert_eq!(rest.len(), 2);
    }

    #[test]
    fn strip_tag_rejects_other_tags() {
        let forms = body("(group (name web))");
        let err = strip_tag("host", &forms[0]).unwrap_err();
        assert!(matches!(err, StructureError::NotTagged { .. }));
    }

    #[test]
    fn find_first_returns_first_match() {
        let forms = body("(name a) (vars) (name b)");
        assert_eq!(find_first("name", &forms).unwrap().to_string(), "(name a)");
        assert!(find_first("hosts", &forms).is_none());
    }

    #[test]
    fn find_first_or_fail_names_the_property() {
        let forms = body("(vars)");
        let err = find_first_or_fail("group", "name", &forms).unwrap_err();
        assert_eq!(
            err,
            StructureError::MissingProperty {
                object: "group".to_string(),
                property: "name".to_string()
            }
        );
    }

    #[test]
    fn simple_property_checks_kind() {
        let forms = body(r#"(name web) (become #t) (title "Install")"#);
        assert_eq!(
            simple_property(&forms, "name", Scalar::Symbol).unwrap(),
            Some(&Form::symbol("web"))
        );
        assert_eq!(
            simple_property(&forms, "become", Scalar::Boolean).unwrap(),
            Some(&Form::Boolean(true))
        );
        assert!(simple_property(&forms, "title", Scalar::Symbol).is_err());
        assert_eq!(
            simple_property(&forms, "missing", Scalar::String).unwrap(),
            None
        );
    }

    #[test]
    fn simple_property_found_but_malformed_is_an_error() {
        let forms = body("(name) (vars a b)");
        assert!(matches!(
            simple_property(&forms, "name", Scalar::Symbol),
            Err(StructureError::BadProperty { .. })
        ));
        assert!(simple_property(&forms, "vars", Scalar::Symbol).is_err());
    }

    #[test]
    fn simple_property_ignores_later_duplicates() {
        let forms = body(r#"(name web) (name "ignored")"#);
        assert_eq!(
            simple_property(&forms, "name", Scalar::Symbol).unwrap(),
            Some(&Form::symbol("web"))
        );
    }

    #[test]
    fn required_simple_property_reports_absence() {
        let forms = body("(vars)");
        let err = required_simple_property("host", &forms, "name", Scalar::Symbol).unwrap_err();
        assert_eq!(err.to_string(), "Missing (name ...) in host");
    }

    #[test]
    fn complex_property_returns_body_or_none() {
        let forms = body("(hosts (host (name a)) (host (name b))) (vars)");
        assert_eq!(complex_property(&forms, "hosts").unwrap().len(), 2);
        assert_eq!(complex_property(&forms, "vars").unwrap().len(), 0);
        assert!(complex_property(&forms, "roles").is_none());
    }
}
