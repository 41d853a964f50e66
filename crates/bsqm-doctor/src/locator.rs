//! Executable lookup on the search path

use camino::Utf8PathBuf;
use tracing::debug;

/// Finds an executable by filename
pub trait Locator {
    fn find(&self, executable: &str) -> Option<Utf8PathBuf>;
}

/// [`Locator`] backed by `which` over the process `PATH`
#[derive(Debug, Default, Clone, Copy)]
pub struct WhichLocator;

impl Locator for WhichLocator {
    fn find(&self, executable: &str) -> Option<Utf8PathBuf> {
        let found = which::which(executable).ok()?;
        match Utf8PathBuf::from_path_buf(found) {
            Ok(path) => Some(path),
            Err(path) => {
                debug!("Ignoring non UTF-8 match for {}: {}", executable, path.display());
                None
            }
        }
    }
}
