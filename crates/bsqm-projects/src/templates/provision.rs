//! Template provisioning
//!
//! Downloads the template archive next to the project folder, copies the
//! archive root into the project, then applies the template manifest:
//! deletions first, placeholder filling second. Nothing is rolled back on
//! failure; the first error aborts.

use bsqm_core::config::TemplateSettings;
use bsqm_core::fs::directory_is_empty;
use bsqm_core::ProjectMetadata;
use bsqm_download::ArchiveFetcher;
use camino::{Utf8Path, Utf8PathBuf};
use tracing::{debug, info};

use super::manifest::TemplateManifest;
use super::renderer::TokenRenderer;
use crate::error::{Error, Result};
use crate::fs::{copy_dir_contents, remove_path, utf8_path};

/// What provisioning did to the project folder
#[derive(Debug, Clone)]
pub struct ProvisionOutcome {
    /// Manifest shipped with the template, or the default one
    pub manifest: TemplateManifest,
    /// Whether the template carried a manifest
    pub from_manifest: bool,
    pub filled: Vec<Utf8PathBuf>,
    pub deleted: Vec<Utf8PathBuf>,
}

/// Fails unless `dir` is empty; a missing folder is created
pub fn ensure_empty_dir(dir: &Utf8Path) -> Result<()> {
    if !dir.exists() {
        std::fs::create_dir_all(dir)?;
        return Ok(());
    }
    if !directory_is_empty(dir)? {
        return Err(Error::not_empty(dir.as_str()));
    }
    Ok(())
}

/// Provisions projects from the configured template
pub struct Provisioner<'a> {
    fetcher: &'a dyn ArchiveFetcher,
    template: &'a TemplateSettings,
}

impl<'a> Provisioner<'a> {
    pub fn new(fetcher: &'a dyn ArchiveFetcher, template: &'a TemplateSettings) -> Self {
        Self { fetcher, template }
    }

    /// Provision `project_dir` and fill it with `metadata`
    pub async fn provision(
        &self,
        project_dir: &Utf8Path,
        metadata: &ProjectMetadata,
    ) -> Result<ProvisionOutcome> {
        metadata.validate()?;
        ensure_empty_dir(project_dir)?;

        self.download_template(project_dir).await?;

        let manifest_path = project_dir.join(&self.template.manifest);
        let (manifest, from_manifest) = match TemplateManifest::take(&manifest_path)? {
            Some(manifest) => (manifest, true),
            None => {
                debug!("Using fallback fill list");
                let manifest = TemplateManifest {
                    to_fill: self.template.fallback_fill.clone(),
                    ..TemplateManifest::default()
                };
                (manifest, false)
            }
        };
        manifest.validate(&manifest_path)?;

        let mut deleted = Vec::new();
        for relative in &manifest.to_delete {
            let path = project_dir.join(relative);
            remove_path(&path)?;
            deleted.push(path);
        }

        let renderer = TokenRenderer::new(metadata);
        let mut filled = Vec::new();
        for relative in &manifest.to_fill {
            let path = project_dir.join(relative);
            if !from_manifest && !path.is_file() {
                debug!("Skipping {}: not in template", relative);
                continue;
            }
            renderer.fill_file(&path)?;
            filled.push(path);
        }

        info!(
            "Provisioned {} ({} files filled, {} removed)",
            project_dir,
            filled.len(),
            deleted.len()
        );
        Ok(ProvisionOutcome {
            manifest,
            from_manifest,
            filled,
            deleted,
        })
    }

    async fn download_template(&self, project_dir: &Utf8Path) -> Result<()> {
        let parent = match project_dir.parent() {
            Some(parent) if !parent.as_str().is_empty() => parent,
            _ => Utf8Path::new("."),
        };
        let staging = tempfile::Builder::new()
            .prefix(".bsqm-template-")
            .tempdir_in(parent)?;

        info!("Downloading template from {}", self.template.url);
        self.fetcher
            .fetch_and_extract(&self.template.url, staging.path())
            .await
            .map_err(Error::download)?;

        let staging_dir = utf8_path(staging.path())?;
        let root = archive_root(&staging_dir, self.template.archive_root.as_deref())?;
        copy_dir_contents(&root, project_dir)?;
        staging.close()?;
        Ok(())
    }
}

/// Folder inside the extracted archive holding the template
///
/// The configured root wins; otherwise an archive with a single top-level
/// folder is unwrapped.
fn archive_root(extracted: &Utf8Path, configured: Option<&str>) -> Result<Utf8PathBuf> {
    if let Some(name) = configured {
        let candidate = extracted.join(name);
        if candidate.is_dir() {
            return Ok(candidate);
        }
        debug!("Configured archive root {} not found", name);
    }

    let entries = std::fs::read_dir(extracted)?.collect::<std::io::Result<Vec<_>>>()?;
    if let [only] = entries.as_slice() {
        if only.file_type()?.is_dir() {
            return utf8_path(&only.path());
        }
    }
    Ok(extracted.to_path_buf())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn root(temp: &TempDir) -> Utf8PathBuf {
        utf8_path(temp.path()).unwrap()
    }

    #[test]
    fn test_ensure_empty_dir() {
        let temp = TempDir::new().unwrap();
        let dir = root(&temp);

        ensure_empty_dir(&dir.join("new")).unwrap();
        assert!(dir.join("new").is_dir());

        std::fs::write(dir.join("new/file"), "").unwrap();
        let err = ensure_empty_dir(&dir.join("new")).unwrap_err();
        assert!(matches!(err, Error::DirectoryNotEmpty { .. }));
    }

    #[test]
    fn test_archive_root_configured() {
        let temp = TempDir::new().unwrap();
        let dir = root(&temp);
        std::fs::create_dir(dir.join("tpl-master")).unwrap();
        std::fs::write(dir.join("stray.txt"), "").unwrap();

        assert_eq!(
            archive_root(&dir, Some("tpl-master")).unwrap(),
            dir.join("tpl-master")
        );
        assert_eq!(archive_root(&dir, Some("missing")).unwrap(), dir);
    }

    #[test]
    fn test_archive_root_single_folder_unwrapped() {
        let temp = TempDir::new().unwrap();
        let dir = root(&temp);
        std::fs::create_dir(dir.join("only")).unwrap();

        assert_eq!(archive_root(&dir, None).unwrap(), dir.join("only"));
    }
}
