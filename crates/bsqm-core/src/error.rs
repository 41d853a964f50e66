//! Error types for bsqm-core

use thiserror::Error;

/// Result type alias using bsqm-core's Error type
pub type Result<T> = std::result::Result<T, Error>;

/// Core error types for bsqm
#[derive(Error, Debug)]
pub enum Error {
    /// Settings file could not be parsed
    #[error("Invalid settings in {path}: {message}")]
    InvalidSettings { path: String, message: String },

    /// Unknown settings key
    #[error("Unknown settings key: {key}")]
    UnknownKey { key: String },

    /// A metadata field failed its format rule
    #[error("Invalid {field}: {message}")]
    InvalidField {
        field: &'static str,
        message: String,
    },

    /// A prompt could not be shown or answered
    #[error("Prompt failed: {0}")]
    Prompt(String),

    /// Path is not valid UTF-8
    #[error("Path is not valid UTF-8: {0}")]
    NonUtf8Path(String),

    /// YAML parsing error
    #[error("YAML parsing error: {0}")]
    YamlParse(#[from] serde_yaml_ng::Error),

    /// JSON parsing error
    #[error("JSON parsing error: {0}")]
    JsonParse(#[from] serde_json::Error),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Create an invalid settings error
    pub fn invalid_settings(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidSettings {
            path: path.into(),
            message: message.into(),
        }
    }

    /// Create an unknown key error
    pub fn unknown_key(key: impl Into<String>) -> Self {
        Self::UnknownKey { key: key.into() }
    }

    /// Create an invalid field error
    pub fn invalid_field(field: &'static str, message: impl Into<String>) -> Self {
        Self::InvalidField {
            field,
            message: message.into(),
        }
    }

    /// Create a prompt error
    pub fn prompt(message: impl Into<String>) -> Self {
        Self::Prompt(message.into())
    }
}
