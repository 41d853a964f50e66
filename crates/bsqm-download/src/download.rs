//! HTTP download with progress reporting

use anyhow::{anyhow, Context, Result};
use async_trait::async_trait;
use bsqm_core::config::NetworkSettings;
use futures_util::StreamExt;
use indicatif::{ProgressBar, ProgressStyle};
use reqwest::header::CONTENT_LENGTH;
use std::io::{Seek, Write};
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info};

use crate::extract::extract_zip;

/// Fetches a zip archive and unpacks it into a directory
#[async_trait]
pub trait ArchiveFetcher: Send + Sync {
    /// Download `url` and extract it into `destination` (created if missing)
    async fn fetch_and_extract(&self, url: &str, destination: &Path) -> Result<()>;
}

/// The two user-visible phases of a fetch
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchPhase {
    Downloading,
    Extracting,
}

impl std::fmt::Display for FetchPhase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Downloading => write!(f, "Downloading"),
            Self::Extracting => write!(f, "Extracting"),
        }
    }
}

/// Called with the phase and the archive URL when a phase starts
pub type PhaseObserver = Arc<dyn Fn(FetchPhase, &str) + Send + Sync>;

/// [`ArchiveFetcher`] backed by reqwest
pub struct HttpArchiveFetcher {
    client: reqwest::Client,
    show_progress: bool,
    on_phase: Option<PhaseObserver>,
}

impl HttpArchiveFetcher {
    /// Create a fetcher with default network settings
    pub fn new() -> Result<Self> {
        Self::from_settings(&NetworkSettings::default())
    }

    /// Create a fetcher honouring the configured timeout and user agent
    pub fn from_settings(network: &NetworkSettings) -> Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent(&network.user_agent)
            .timeout(Duration::from_secs(network.download_timeout_secs))
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self {
            client,
            show_progress: true,
            on_phase: None,
        })
    }

    /// Report phase changes to `observer`
    pub fn on_phase(mut self, observer: PhaseObserver) -> Self {
        self.on_phase = Some(observer);
        self
    }

    fn enter(&self, phase: FetchPhase, url: &str) {
        if let Some(observer) = &self.on_phase {
            observer(phase, url);
        }
    }

    /// Enable or disable progress bars
    pub fn with_progress(mut self, show: bool) -> Self {
        self.show_progress = show;
        self
    }

    /// Stream the response body of `url` into `sink`, returning the byte count
    async fn download_to<W: Write>(&self, url: &str, sink: &mut W) -> Result<u64> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .with_context(|| format!("Failed to request {}", url))?;

        if !response.status().is_success() {
            return Err(anyhow!(
                "Download of {} failed with status: {}",
                url,
                response.status()
            ));
        }

        let total_size = response
            .headers()
            .get(CONTENT_LENGTH)
            .and_then(|ct| ct.to_str().ok())
            .and_then(|ct| ct.parse::<u64>().ok());

        let progress = self.show_progress.then(|| {
            let pb = match total_size {
                Some(len) => {
                    let pb = ProgressBar::new(len);
                    if let Ok(style) = ProgressStyle::default_bar().template(
                        "{msg}\n{spinner:.green} [{elapsed_precise}] [{wide_bar:.cyan/blue}] {bytes}/{total_bytes} ({bytes_per_sec}, {eta})",
                    ) {
                        pb.set_style(style.progress_chars("#>-"));
                    }
                    pb
                }
                None => ProgressBar::new_spinner(),
            };
            pb.set_message(format!("Downloading {}", url));
            pb
        });

        let mut downloaded = 0u64;
        let mut stream = response.bytes_stream();

        while let Some(chunk) = stream.next().await {
            let chunk = chunk.context("Failed to read download chunk")?;
            sink.write_all(&chunk)
                .context("Failed to write downloaded data")?;
            downloaded += chunk.len() as u64;

            if let Some(pb) = &progress {
                pb.set_position(downloaded);
            }
        }
        sink.flush()?;

        if let Some(pb) = progress {
            pb.finish_and_clear();
        }

        Ok(downloaded)
    }
}

#[async_trait]
impl ArchiveFetcher for HttpArchiveFetcher {
    async fn fetch_and_extract(&self, url: &str, destination: &Path) -> Result<()> {
        info!("Downloading {}", url);
        self.enter(FetchPhase::Downloading, url);

        let mut archive = tempfile::tempfile().context("Failed to create temporary file")?;
        let size = self.download_to(url, &mut archive).await?;
        debug!("Downloaded {} bytes from {}", size, url);
        archive.rewind()?;

        info!("Extracting into {}", destination.display());
        self.enter(FetchPhase::Extracting, url);
        let spinner = self.show_progress.then(|| {
            let pb = ProgressBar::new_spinner();
            pb.set_message(format!("Extracting into {}", destination.display()));
            pb.enable_steady_tick(Duration::from_millis(100));
            pb
        });

        let destination = destination.to_path_buf();
        let result = tokio::task::spawn_blocking(move || extract_zip(archive, &destination))
            .await
            .context("Extraction task failed")?;

        if let Some(pb) = spinner {
            pb.finish_and_clear();
        }

        result.with_context(|| format!("Failed to extract archive from {}", url))
    }
}
