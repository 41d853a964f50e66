//! Project templates
//!
//! - `manifest`: the `template.json` shipped inside a template archive
//! - `renderer`: `{{ mod.<key> }}` placeholder substitution
//! - `provision`: download, copy and fill a template into a project folder

pub mod manifest;
pub mod provision;
pub mod renderer;

pub use manifest::{SubmoduleSpec, TemplateManifest};
pub use provision::{ensure_empty_dir, ProvisionOutcome, Provisioner};
pub use renderer::{TokenRenderer, TOKEN_KEYS};
