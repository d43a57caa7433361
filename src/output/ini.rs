//! Minimal INI writer for the engine-defaults file.
use std::fmt;

/// One `[name]` section with ordered `key = value` entries.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IniSection {
    /// Section name, written as `[name]`.
    pub name: String,
    /// Lowercased keys with their values, in insertion order.
    pub entries: Vec<(String, String)>,
}

impl IniSection {
    /// An empty section.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            entries: Vec::new(),
        }
    }

    /// Set `key` to `value`.
    ///
    /// Keys are case-folded to lowercase. Setting an existing key replaces
    /// its value in place, keeping its original position.
    pub fn set(&mut self, key: &str, value: impl Into<String>) {
        let key = key.to_lowercase();
        let value = value.into();
        if let Some(entry) = self.entries.iter_mut().find(|(k, _)| *k == key) {
            entry.1 = value;
        } else {
            self.entries.push((key, value));
        }
    }
}

/// An INI document: sections in insertion order.
///
/// # Examples
///
/// ```
/// use sensible_cli::output::ini::{IniFile, IniSection};
///
/// let mut defaults = IniSection::new("defaults");
/// defaults.set("inventory", "hosts.yaml");
/// let file = IniFile { sections: vec![defaults] };
/// assert_eq!(file.to_string(), "[defaults]\ninventory = hosts.yaml\n\n");
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IniFile {
    /// Sections in output order.
    pub sections: Vec<IniSection>,
}

impl fmt::Display for IniFile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for section in &self.sections {
            writeln!(f, "[{}]", section.name)?;
            for (key, value) in &section.entries {
                writeln!(f, "{key} = {value}")?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}
