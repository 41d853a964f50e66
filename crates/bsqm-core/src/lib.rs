//! # bsqm-core
//!
//! Core library for the bsqm CLI providing:
//! - The persisted settings store (resolved tool paths, template source)
//! - Platform detection and per-platform value selection
//! - Project metadata types and their validation rules
//! - The interactive path prompt used by every workflow

pub mod config;
pub mod error;
pub mod fs;
pub mod platform;
pub mod prompt;
pub mod types;
pub mod utils;

pub use config::{Settings, SettingsStore, ToolId};
pub use error::{Error, Result};
pub use platform::{PerPlatform, Platform};
pub use prompt::{prompt_path, ChooserKind, ChooserRequest, Notice, Prompter};
pub use types::{Category, ProjectMetadata};
pub use utils::get_home_dir;
