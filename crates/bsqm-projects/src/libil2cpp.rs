//! libil2cpp headers
//!
//! Projects compile against the game's libil2cpp headers, which are not part
//! of any submodule. They are copied from a local folder or downloaded.

use bsqm_download::ArchiveFetcher;
use camino::{Utf8Path, Utf8PathBuf};
use tracing::info;

use crate::error::{Error, Result};
use crate::fs::copy_dir_contents;

/// Where the headers come from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Libil2cppSource {
    /// A folder already on disk
    Folder(Utf8PathBuf),
    /// A zip archive URL
    Download(String),
}

/// Place the headers at `project_dir/target`, returning the final folder
pub async fn place_libil2cpp(
    project_dir: &Utf8Path,
    target: &str,
    source: &Libil2cppSource,
    fetcher: &dyn ArchiveFetcher,
) -> Result<Utf8PathBuf> {
    let destination = project_dir.join(target);
    match source {
        Libil2cppSource::Folder(folder) => {
            info!("Copying libil2cpp from {}", folder);
            if !folder.is_dir() {
                return Err(Error::Io(std::io::Error::new(
                    std::io::ErrorKind::NotFound,
                    format!("libil2cpp folder not found: {}", folder),
                )));
            }
            copy_dir_contents(folder, &destination)?;
        }
        Libil2cppSource::Download(url) => {
            info!("Downloading libil2cpp from {}", url);
            std::fs::create_dir_all(&destination)?;
            fetcher
                .fetch_and_extract(url, destination.as_std_path())
                .await
                .map_err(Error::download)?;
        }
    }
    Ok(destination)
}
