//! # bsqm-projects
//!
//! Project scaffolding for the bsqm CLI:
//! - Template provisioning (download, copy, placeholder filling)
//! - Repository initialization with submodules
//! - libil2cpp header placement
//! - Editor task configuration
//! - Builds through `ndk-build`

pub mod build;
pub mod error;
pub mod fs;
pub mod git;
pub mod libil2cpp;
pub mod tasks;
pub mod templates;

pub use build::build_project;
pub use error::{Error, Result};
pub use git::{CommandRunner, RepoInitializer, StepEvent, TokioCommandRunner};
pub use libil2cpp::{place_libil2cpp, Libil2cppSource};
pub use tasks::patch_tasks_path;
pub use templates::{Provisioner, ProvisionOutcome, TemplateManifest};
