//! Zip extraction

use anyhow::{anyhow, Context, Result};
use std::fs::{self, File};
use std::io::{self, Read, Seek};
use std::path::Path;
use tracing::debug;

/// Extract every entry of a zip archive into `destination`.
///
/// Entries whose names would escape `destination` are rejected. Unix
/// permission bits stored in the archive are restored so extracted
/// executables stay executable.
pub fn extract_zip<R: Read + Seek>(reader: R, destination: &Path) -> Result<()> {
    let mut archive = zip::ZipArchive::new(reader).context("Malformed zip archive")?;
    fs::create_dir_all(destination)
        .with_context(|| format!("Failed to create {}", destination.display()))?;

    for i in 0..archive.len() {
        let mut entry = archive
            .by_index(i)
            .with_context(|| format!("Failed to read zip entry {}", i))?;

        let relative = entry
            .enclosed_name()
            .ok_or_else(|| anyhow!("Unsafe path in archive: {}", entry.name()))?;
        let target = destination.join(relative);

        if entry.is_dir() {
            fs::create_dir_all(&target)?;
            continue;
        }

        if let Some(parent) = target.parent() {
            fs::create_dir_all(parent)?;
        }
        let mut out = File::create(&target)
            .with_context(|| format!("Failed to create {}", target.display()))?;
        io::copy(&mut entry, &mut out)
            .with_context(|| format!("Failed to write {}", target.display()))?;

        #[cfg(unix)]
        if let Some(mode) = entry.unix_mode() {
            use std::os::unix::fs::PermissionsExt;
            fs::set_permissions(&target, fs::Permissions::from_mode(mode))?;
        }
    }

    debug!(
        "Extracted {} entries into {}",
        archive.len(),
        destination.display()
    );
    Ok(())
}
