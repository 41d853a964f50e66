//! Settings management
//!
//! The settings object is the only state shared between workflows: tool
//! resolution writes tool paths into it, provisioning and repository
//! initialisation read them back. It is always passed explicitly.

mod settings;
mod store;

pub use settings::{NetworkSettings, ProjectSettings, Settings, TemplateSettings, ToolId, ToolPaths};
pub use store::{SettingsStore, CONFIG_ENV_VAR};
