//! Filesystem helpers

use camino::{Utf8Path, Utf8PathBuf};
use tracing::debug;
use walkdir::WalkDir;

use crate::error::{Error, Result};

/// Recursively copy the contents of `from` into `to`, creating `to` if needed
pub fn copy_dir_contents(from: &Utf8Path, to: &Utf8Path) -> Result<usize> {
    std::fs::create_dir_all(to)?;
    let mut copied = 0;

    for entry in WalkDir::new(from).min_depth(1) {
        let entry = entry?;
        let relative = entry
            .path()
            .strip_prefix(from)
            .map_err(|_| Error::NonUtf8Path(entry.path().display().to_string()))?;
        let relative = Utf8Path::from_path(relative)
            .ok_or_else(|| Error::NonUtf8Path(relative.display().to_string()))?;
        let target = to.join(relative);

        if entry.file_type().is_dir() {
            std::fs::create_dir_all(&target)?;
        } else {
            if let Some(parent) = target.parent() {
                std::fs::create_dir_all(parent)?;
            }
            std::fs::copy(entry.path(), &target)?;
            copied += 1;
        }
    }

    debug!("Copied {} files from {} to {}", copied, from, to);
    Ok(copied)
}

/// Remove a file or directory; missing paths are ignored
pub fn remove_path(path: &Utf8Path) -> Result<()> {
    let result = if path.is_dir() {
        std::fs::remove_dir_all(path)
    } else {
        std::fs::remove_file(path)
    };
    match result {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
        Err(e) => Err(e.into()),
    }
}

/// Convert a std path into a UTF-8 one
pub fn utf8_path(path: &std::path::Path) -> Result<Utf8PathBuf> {
    Utf8PathBuf::from_path_buf(path.to_path_buf())
        .map_err(|p| Error::NonUtf8Path(p.display().to_string()))
}
