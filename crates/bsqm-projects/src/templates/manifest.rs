//! Template manifest (`template.json`)

use camino::{Utf8Component, Utf8Path};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{Error, Result};

/// A nested repository attached during repository setup
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubmoduleSpec {
    /// Path relative to the submodule directory
    pub path: String,
    pub url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub branch: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub commit: Option<String>,
}

/// Instructions shipped inside a template archive
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TemplateManifest {
    /// Files whose placeholders are substituted
    #[serde(default)]
    pub to_fill: Vec<String>,
    /// Files or folders removed from the project
    #[serde(default)]
    pub to_delete: Vec<String>,
    #[serde(default)]
    pub submodules: Vec<SubmoduleSpec>,
    /// Folder submodules are added under
    #[serde(default = "default_submodule_dir")]
    pub submodule_dir: String,
}

fn default_submodule_dir() -> String {
    "extern".to_string()
}

impl Default for TemplateManifest {
    fn default() -> Self {
        Self {
            to_fill: Vec::new(),
            to_delete: Vec::new(),
            submodules: Vec::new(),
            submodule_dir: default_submodule_dir(),
        }
    }
}

impl TemplateManifest {
    /// Parse a manifest from JSON text
    pub fn parse(content: &str, origin: &Utf8Path) -> Result<Self> {
        let manifest: Self = serde_json::from_str(content)
            .map_err(|e| Error::invalid_manifest(origin.as_str(), e.to_string()))?;
        manifest.validate(origin)?;
        Ok(manifest)
    }

    /// Fails unless every listed path stays inside the project folder
    pub fn validate(&self, origin: &Utf8Path) -> Result<()> {
        for path in &self.to_fill {
            check_contained("toFill", path, origin)?;
        }
        for path in &self.to_delete {
            check_contained("toDelete", path, origin)?;
        }
        check_contained("submoduleDir", &self.submodule_dir, origin)?;
        for submodule in &self.submodules {
            check_contained("submodules.path", &submodule.path, origin)?;
        }
        Ok(())
    }

    /// Read the manifest at `path` and delete it; `None` when there is none
    pub fn take(path: &Utf8Path) -> Result<Option<Self>> {
        if !path.is_file() {
            debug!("No template manifest at {}", path);
            return Ok(None);
        }
        let content = std::fs::read_to_string(path)?;
        let manifest = Self::parse(&content, path)?;
        std::fs::remove_file(path)?;
        debug!(
            "Manifest: {} to fill, {} to delete, {} submodules",
            manifest.to_fill.len(),
            manifest.to_delete.len(),
            manifest.submodules.len()
        );
        Ok(Some(manifest))
    }
}

/// Relative, made of plain names only, and naming at least one
fn check_contained(field: &str, path: &str, origin: &Utf8Path) -> Result<()> {
    let mut names = 0;
    for component in Utf8Path::new(path).components() {
        match component {
            Utf8Component::Normal(_) => names += 1,
            Utf8Component::CurDir => {}
            Utf8Component::Prefix(_) | Utf8Component::RootDir | Utf8Component::ParentDir => {
                return Err(Error::invalid_manifest(
                    origin.as_str(),
                    format!("{} entry '{}' leaves the project folder", field, path),
                ));
            }
        }
    }
    if names == 0 {
        return Err(Error::invalid_manifest(
            origin.as_str(),
            format!("{} entry '{}' does not name a path", field, path),
        ));
    }
    Ok(())
}
