//! Tool resolution
//!
//! Finds a tool on `PATH`, lets the user point at an existing install, or
//! installs it from the registry's archive. The outcome is persisted into
//! the settings store so later commands trust it verbatim.

use std::fmt;

use anyhow::{Context, Result};
use bsqm_core::fs::directory_is_empty;
use bsqm_core::{prompt_path, ChooserRequest, Notice, Platform, Prompter, SettingsStore, ToolId};
use bsqm_download::ArchiveFetcher;
use camino::{Utf8Path, Utf8PathBuf};
use serde::Serialize;
use tracing::{debug, info};

use crate::locator::Locator;
use crate::registry::ToolRegistry;
use crate::tool::ToolSpec;

/// How a tool was resolved
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum ToolSource {
    SearchPath,
    Selected,
    Installed,
    NotFound,
}

impl fmt::Display for ToolSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ToolSource::SearchPath => "found on PATH",
            ToolSource::Selected => "selected",
            ToolSource::Installed => "installed",
            ToolSource::NotFound => "not found",
        };
        write!(f, "{}", s)
    }
}

/// Result of resolving one tool
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResolvedTool {
    pub tool: ToolId,
    pub available: bool,
    pub path: Option<Utf8PathBuf>,
    pub source: ToolSource,
}

impl ResolvedTool {
    fn found(tool: ToolId, path: Utf8PathBuf, source: ToolSource) -> Self {
        Self {
            tool,
            available: true,
            path: Some(path),
            source,
        }
    }

    fn unavailable(tool: ToolId) -> Self {
        Self {
            tool,
            available: false,
            path: None,
            source: ToolSource::NotFound,
        }
    }
}

/// Resolves tools from the registry
///
/// The platform is fixed at construction so every per-platform value used
/// during a pass comes from the same selection.
pub struct ToolResolver<'a> {
    platform: Platform,
    locator: &'a dyn Locator,
    fetcher: &'a dyn ArchiveFetcher,
}

impl<'a> ToolResolver<'a> {
    pub fn new(platform: Platform, locator: &'a dyn Locator, fetcher: &'a dyn ArchiveFetcher) -> Self {
        Self {
            platform,
            locator,
            fetcher,
        }
    }

    pub fn platform(&self) -> Platform {
        self.platform
    }

    /// Resolve `tool`, asking the user when it is not on `PATH`
    pub async fn resolve(&self, tool: ToolId, prompter: &mut dyn Prompter) -> Result<ResolvedTool> {
        let spec = ToolRegistry::get(tool);
        let executable = spec.executable_for(self.platform);

        if let Some(path) = self.locator.find(executable) {
            prompter.notify(Notice::Info, &format!("Found {}: {}", spec.name, path));
            return Ok(ResolvedTool::found(tool, path, ToolSource::SearchPath));
        }
        debug!("{} not on PATH", executable);

        if prompter.confirm(&format!("Couldn't find {}. Is it installed?", spec.name))? {
            if let Some(path) = self.select_existing(spec, prompter)? {
                prompter.notify(Notice::Info, &format!("Using {}: {}", spec.name, path));
                return Ok(ResolvedTool::found(tool, path, ToolSource::Selected));
            }
        }

        if let Some(url) = spec.download_url_for(self.platform) {
            if prompter.confirm(&format!("Do you wish to install {}?", spec.name))? {
                if let Some(path) = self.install(spec, url, prompter).await? {
                    return Ok(ResolvedTool::found(tool, path, ToolSource::Installed));
                }
            }
        }

        prompter.notify(
            Notice::Error,
            &format!("No {}. Some features won't be available.", spec.name),
        );
        Ok(ResolvedTool::unavailable(tool))
    }

    /// Resolve `tool` and persist the outcome; an unavailable tool clears the stored path
    pub async fn resolve_and_store(
        &self,
        store: &mut SettingsStore,
        tool: ToolId,
        prompter: &mut dyn Prompter,
    ) -> Result<ResolvedTool> {
        let resolved = self.resolve(tool, prompter).await?;
        store.set_tool_path(tool, resolved.path.clone());
        store
            .save()
            .with_context(|| format!("Failed to store path for {}", tool))?;
        info!("{}: {}", tool, resolved.source);
        Ok(resolved)
    }

    fn select_existing(
        &self,
        spec: &ToolSpec,
        prompter: &mut dyn Prompter,
    ) -> Result<Option<Utf8PathBuf>> {
        let executable = spec.executable_for(self.platform);
        let request = ChooserRequest::file(
            format!("Select {}", executable),
            spec.file_filter.select(self.platform),
        );

        let chosen = prompt_path(prompter, &request, |path| {
            if path.file_name() == Some(executable) && path.is_file() {
                Ok(())
            } else {
                Err(format!("Invalid file, expected {}.", executable))
            }
        })?;
        Ok(chosen)
    }

    async fn install(
        &self,
        spec: &ToolSpec,
        url: &str,
        prompter: &mut dyn Prompter,
    ) -> Result<Option<Utf8PathBuf>> {
        let request = ChooserRequest::folder(format!("Select {} installation folder", spec.name));
        let folder = prompt_path(prompter, &request, |path| {
            match directory_is_empty(path) {
                Ok(true) => Ok(()),
                Ok(false) => Err("Folder must be empty.".to_string()),
                Err(_) => Err("Folder does not exist.".to_string()),
            }
        })?;

        let Some(folder) = folder else {
            return Ok(None);
        };

        info!("Installing {} into {}", spec.name, folder);
        self.fetcher
            .fetch_and_extract(url, folder.as_std_path())
            .await
            .with_context(|| format!("Failed to install {}", spec.name))?;

        let path = installed_path(spec, &folder, self.platform);
        if !path.is_file() {
            anyhow::bail!("Installed {} but {} is missing", spec.name, path);
        }
        prompter.notify(Notice::Info, &format!("Installed {}: {}", spec.name, path));
        Ok(Some(path))
    }
}

/// Where the executable lands after extracting the tool archive into `folder`
pub fn installed_path(spec: &ToolSpec, folder: &Utf8Path, platform: Platform) -> Utf8PathBuf {
    let mut path = folder.to_path_buf();
    if let Some(subfolder) = spec.archive_subfolder {
        path.push(subfolder);
    }
    path.push(spec.executable_for(platform));
    path
}
