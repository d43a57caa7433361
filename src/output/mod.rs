//! Lowered artifacts and their text renderings.
pub mod ini;

use crate::error::CompileError;
use ini::IniFile;

/// The content of one output file, before serialization.
#[derive(Debug, Clone, PartialEq)]
pub enum ArtifactBody {
    /// A YAML document (inventory, role tasks/handlers, playbook).
    Yaml(serde_yaml::Value),
    /// The engine-defaults file.
    Ini(IniFile),
}

/// One output file: a path relative to the output root plus its content.
#[derive(Debug, Clone, PartialEq)]
pub struct Artifact {
    /// Slash-separated relative path, e.g. `roles/web/tasks/main.yaml`.
    pub path: String,
    /// Content to render.
    pub body: ArtifactBody,
}

impl Artifact {
    /// A YAML artifact.
    #[must_use]
    pub fn yaml(path: impl Into<String>, value: serde_yaml::Value) -> Self {
        Self {
            path: path.into(),
            body: ArtifactBody::Yaml(value),
        }
    }

    /// An INI artifact.
    #[must_use]
    pub fn ini(path: impl Into<String>, file: IniFile) -> Self {
        Self {
            path: path.into(),
            body: ArtifactBody::Ini(file),
        }
    }

    /// Render the artifact as file content.
    ///
    /// YAML documents carry an explicit `---` start marker.
    ///
    /// # Errors
    ///
    /// Returns [`CompileError::Emit`] if the YAML serializer fails.
    pub fn render(&self) -> Result<String, CompileError> {
        match &self.body {
            ArtifactBody::Yaml(value) => Ok(format!("---\n{}", serde_yaml::to_string(value)?)),
            ArtifactBody::Ini(file) => Ok(file.to_string()),
        }
    }
}
