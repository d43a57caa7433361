//! Collision-free identifier sanitization.
use std::collections::{HashMap, HashSet};

/// Run-scoped table from original symbol names to mangled identifiers.
///
/// Each character that is not an ASCII letter or digit becomes `_`. If the
/// result was already handed out for a *different* name, `_2`, `_3`, … is
/// appended until it is unique. A name keeps its mangling for the lifetime
/// of the table, so one table must be shared by every file of a run and
/// never by two runs.
///
/// # Examples
///
/// ```
/// use sensible_cli::mangle::Mangler;
///
/// let mut mangler = Mangler::default();
/// assert_eq!(mangler.mangle("foo-bar"), "foo_bar");
/// assert_eq!(mangler.mangle("foo_bar"), "foo_bar_2");
/// assert_eq!(mangler.mangle("foo-bar"), "foo_bar");
/// ```
#[derive(Debug, Default)]
pub struct Mangler {
    by_name: HashMap<String, String>,
    taken: HashSet<String>,
}

impl Mangler {
    /// An empty table.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Mangle `name`, assigning a fresh identifier on first sight.
    pub fn mangle(&mut self, name: &str) -> String {
        if let Some(mangled) = self.by_name.get(name) {
            return mangled.clone();
        }
        let base: String = name
            .chars()
            .map(|ch| if ch.is_ascii_alphanumeric() { ch } else { '_' })
            .collect();
        let mut candidate = base.clone();
        let mut suffix = 1;
        while self.taken.contains(&candidate) {
            suffix += 1;
            candidate = format!("{base}_{suffix}");
        }
        self.taken.insert(candidate.clone());
        self.by_name.insert(name.to_string(), candidate.clone());
        candidate
    }

    /// Number of distinct names seen so far.
    #[must_use]
    pub fn len(&self) -> usize {
        self.by_name.len()
    }

    /// True before any name has been mangled.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.by_name.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn alphanumerics_pass_through() {
        let mut m = Mangler::new();
        assert_eq!(m.mangle("web1"), "web1");
        assert_eq!(m.mangle("WebServers"), "WebServers");
    }

    #[test]
    fn punctuation_and_non_ascii_become_underscores() {
        let mut m = Mangler::new();
        assert_eq!(m.mangle("db.example.com"), "db_example_com");
        assert_eq!(m.mangle("café"), "caf_");
    }

    #[test]
    fn collision_on_sanitized_form_forces_suffix() {
        let mut m = Mangler::new();
        assert_eq!(m.mangle("foo-bar"), "foo_bar");
        assert_eq!(m.mangle("foo_bar"), "foo_bar_2");
        assert_eq!(m.mangle("foo.bar"), "foo_bar_3");
    }

    #[test]
    fn suffix_skips_values_already_taken() {
        let mut m = Mangler::new();
        assert_eq!(m.mangle("a_2"), "a_2");
        assert_eq!(m.mangle("a-"), "a_");
        assert_eq!(m.mangle("a_"), "a__2");
        assert_eq!(m.mangle("a"), "a");
        assert_eq!(m.mangle("a."), "a__3");
    }

    #[test]
    fn same_name_is_stable() {
        let mut m = Mangler::new();
        let first = m.mangle("my-group");
        m.mangle("my_group");
        assert_eq!(m.mangle("my-group"), first);
        assert_eq!(m.len(), 2);
    }

    #[test]
    fn distinct_names_never_share_output() {
        let mut m = Mangler::new();
        let names = ["x", "x_2", "x-2", "x.2", "x_2_2", "x-2-2", "x__2"];
        let mut outputs = HashSet::new();
        for name in names {
            assert!(outputs.insert(m.mangle(name)), "duplicate for {name}");
        }
    }
}
