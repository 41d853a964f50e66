//! bsqm Doctor - toolchain resolution
//!
//! Locates the external tools bsqm shells out to (`git`, `adb`,
//! `ndk-build`), offers to install the ones that ship as archives, and
//! reports on their state.
//!
//! # Example
//!
//! ```rust,no_run
//! use bsqm_core::config::SettingsStore;
//! use bsqm_core::prompt::TerminalPrompter;
//! use bsqm_core::{Platform, ToolId};
//! use bsqm_doctor::{ToolResolver, WhichLocator};
//! use bsqm_download::HttpArchiveFetcher;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let mut store = SettingsStore::load(None)?;
//!     let fetcher = HttpArchiveFetcher::from_settings(&store.settings().network)?;
//!     let resolver = ToolResolver::new(Platform::current(), &WhichLocator, &fetcher);
//!
//!     let ndk = resolver
//!         .resolve_and_store(&mut store, ToolId::Ndk, &mut TerminalPrompter::new())
//!         .await?;
//!     println!("{:?}", ndk.path);
//!     Ok(())
//! }
//! ```

mod locator;
mod registry;
mod report;
mod resolver;
mod tool;

pub use locator::{Locator, WhichLocator};
pub use registry::{ToolRegistry, TOOL_REGISTRY};
pub use report::{check_tools, format_human, ToolReport};
pub use resolver::{installed_path, ResolvedTool, ToolResolver, ToolSource};
pub use tool::ToolSpec;
