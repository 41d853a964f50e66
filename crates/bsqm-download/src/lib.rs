//! Archive download and extraction for the bsqm CLI
//!
//! Every external artifact bsqm installs (the NDK, platform-tools, the
//! project template, libil2cpp headers) is a zip archive fetched over HTTP
//! and unpacked into a target directory. This crate does exactly that, in
//! two user-visible phases: downloading, then extracting.
//!
//! # Example
//!
//! ```no_run
//! use bsqm_download::{ArchiveFetcher, HttpArchiveFetcher};
//! use std::path::Path;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let fetcher = HttpArchiveFetcher::new()?;
//!     fetcher
//!         .fetch_and_extract(
//!             "https://dl.google.com/android/repository/platform-tools-latest-linux.zip",
//!             Path::new("/opt/android"),
//!         )
//!         .await?;
//!     Ok(())
//! }
//! ```

mod download;
mod extract;

pub use download::{ArchiveFetcher, FetchPhase, HttpArchiveFetcher, PhaseObserver};
pub use extract::extract_zip;
