//! Settings file loading and saving
//!
//! Loads settings with the following precedence (low to high):
//! 1. Built-in defaults
//! 2. Settings file (`~/.bsqm/config.yaml`, or `--config` / `BSQM_CONFIG`)
//! 3. Environment variables (`BSQM_GIT`, `BSQM_ADB`, `BSQM_NDK`, `BSQM_TEMPLATE_URL`)
//!
//! Environment overrides only affect the in-memory view; [`SettingsStore::save`]
//! writes the file-backed values so an override never becomes persistent.

use camino::{Utf8Path, Utf8PathBuf};
use std::fs;
use tracing::debug;

use super::settings::{Settings, ToolId};
use crate::error::{Error, Result};
use crate::utils::get_home_dir;

/// Environment variable naming an alternative settings file
pub const CONFIG_ENV_VAR: &str = "BSQM_CONFIG";

/// Settings bound to the file they were loaded from
#[derive(Debug, Clone)]
pub struct SettingsStore {
    path: Utf8PathBuf,
    persisted: Settings,
    effective: Settings,
}

impl SettingsStore {
    /// Load settings from `path`, `BSQM_CONFIG`, or the default location
    pub fn load(path: Option<&Utf8Path>) -> Result<Self> {
        let path = match path {
            Some(p) => p.to_path_buf(),
            None => Self::default_path()?,
        };
        Self::load_with_env(path, |key| std::env::var(key).ok())
    }

    /// Load settings from `path`, reading overrides through `lookup`
    pub fn load_with_env<F>(path: Utf8PathBuf, lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let persisted = if path.exists() {
            debug!("Loading settings from {}", path);
            let content = fs::read_to_string(&path)?;
            if content.trim().is_empty() {
                Settings::default()
            } else {
                serde_yaml_ng::from_str(&content)
                    .map_err(|e| Error::invalid_settings(path.as_str(), e.to_string()))?
            }
        } else {
            debug!("No settings file at {}, using defaults", path);
            Settings::default()
        };

        let effective = apply_env_overrides(persisted.clone(), lookup);

        Ok(Self {
            path,
            persisted,
            effective,
        })
    }

    /// Default settings file location (`$BSQM_CONFIG` or `~/.bsqm/config.yaml`)
    pub fn default_path() -> Result<Utf8PathBuf> {
        if let Ok(custom) = std::env::var(CONFIG_ENV_VAR) {
            return Ok(Utf8PathBuf::from(custom));
        }

        let home = get_home_dir().map_err(|e| Error::invalid_settings("~", e.to_string()))?;
        let home = Utf8PathBuf::try_from(home)
            .map_err(|e| Error::NonUtf8Path(e.into_path_buf().display().to_string()))?;
        Ok(home.join(".bsqm").join("config.yaml"))
    }

    /// Path of the backing file
    pub fn path(&self) -> &Utf8Path {
        &self.path
    }

    /// Effective settings (file values plus environment overrides)
    pub fn settings(&self) -> &Settings {
        &self.effective
    }

    /// Values as stored in the file
    pub fn persisted(&self) -> &Settings {
        &self.persisted
    }

    /// Persist a resolved tool path
    pub fn set_tool_path(&mut self, tool: ToolId, path: Option<Utf8PathBuf>) {
        self.persisted.set_tool_path(tool, path.clone());
        self.effective.set_tool_path(tool, path);
    }

    /// Set a value by dotted key
    pub fn set(&mut self, key: &str, value: Option<&str>) -> Result<()> {
        self.persisted.set(key, value)?;
        self.effective.set(key, value)
    }

    /// Write the file-backed settings
    pub fn save(&self) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        let yaml = serde_yaml_ng::to_string(&self.persisted)?;
        fs::write(&self.path, yaml)?;
        debug!("Saved settings to {}", self.path);
        Ok(())
    }
}

fn apply_env_overrides<F>(mut settings: Settings, lookup: F) -> Settings
where
    F: Fn(&str) -> Option<String>,
{
    for tool in ToolId::ALL {
        let var = format!("BSQM_{}", tool.as_str().to_uppercase());
        if let Some(value) = lookup(&var).filter(|v| !v.is_empty()) {
            debug!("{} overrides tools.{}", var, tool);
            settings.set_tool_path(tool, Some(Utf8PathBuf::from(value)));
        }
    }

    if let Some(url) = lookup("BSQM_TEMPLATE_URL").filter(|v| !v.is_empty()) {
        settings.template.url = url;
    }

    settings
}
