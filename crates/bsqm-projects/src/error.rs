//! Error types for bsqm-projects

use thiserror::Error;

/// Result type alias using bsqm-projects's Error type
pub type Result<T> = std::result::Result<T, Error>;

/// Project scaffolding error types
#[derive(Error, Debug)]
pub enum Error {
    /// Target directory already has content
    #[error("Folder must be empty: {path}")]
    DirectoryNotEmpty { path: String },

    /// Template manifest could not be parsed
    #[error("Invalid template manifest {path}: {message}")]
    InvalidManifest { path: String, message: String },

    /// A file listed for filling is missing or unreadable
    #[error("Failed to fill {path}: {message}")]
    FillFailed { path: String, message: String },

    /// Download or extraction failed
    #[error("Download failed: {message}")]
    Download { message: String },

    /// `.vscode/tasks.json` has an unexpected shape
    #[error("Invalid tasks file {path}: {message}")]
    InvalidTasks { path: String, message: String },

    /// A command could not be started
    #[error("Failed to run {program}: {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    /// A repository setup step exited unsuccessfully
    #[error("{step} failed{}{}", exit_suffix(.status), detail_suffix(.stderr))]
    StepFailed {
        step: String,
        status: Option<i32>,
        /// Trimmed standard error of the failed command
        stderr: String,
    },

    /// ndk-build exited unsuccessfully
    #[error("Build failed")]
    BuildFailed { status: Option<i32> },

    /// Path is not valid UTF-8
    #[error("Path is not valid UTF-8: {0}")]
    NonUtf8Path(String),

    /// Directory walk error
    #[error("Failed to walk directory: {0}")]
    Walk(#[from] walkdir::Error),

    /// JSON error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Core library error
    #[error(transparent)]
    Core(#[from] bsqm_core::Error),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    pub fn not_empty(path: impl Into<String>) -> Self {
        Self::DirectoryNotEmpty { path: path.into() }
    }

    pub fn invalid_manifest(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidManifest {
            path: path.into(),
            message: message.into(),
        }
    }

    /// Wrap a fetcher error, keeping its context chain
    pub fn download(err: anyhow::Error) -> Self {
        Self::Download {
            message: format!("{:#}", err),
        }
    }

    pub fn invalid_tasks(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidTasks {
            path: path.into(),
            message: message.into(),
        }
    }
}

fn exit_suffix(status: &Option<i32>) -> String {
    match status {
        Some(code) => format!(" (exit code {})", code),
        None => String::new(),
    }
}

fn detail_suffix(stderr: &str) -> String {
    if stderr.is_empty() {
        String::new()
    } else {
        format!(": {}", stderr)
    }
}
