//! CLI command implementations

pub mod build;
pub mod config;
pub mod configure;
pub mod create;
pub mod doctor;
pub mod form;
pub mod protocol;

use anyhow::{Context, Result};
use bsqm_core::SettingsStore;
use camino::Utf8Path;

/// Load the settings store named by `--config`, or the default one
pub(crate) fn load_store(config: Option<&Utf8Path>) -> Result<SettingsStore> {
    SettingsStore::load(config).context("Failed to load settings")
}
