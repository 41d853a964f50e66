//! Tool definition types
//!
//! Each external tool bsqm depends on is described once, statically. All
//! per-platform values live in [`PerPlatform`] tables so that a single
//! platform value selects filenames and URLs consistently.

use bsqm_core::{PerPlatform, Platform, ToolId};

/// Definition of an external tool
#[derive(Debug, Clone)]
pub struct ToolSpec {
    /// Settings key the resolved path is stored under
    pub id: ToolId,

    /// Human-readable name (e.g., "Android NDK build script")
    pub name: &'static str,

    /// Executable filename per platform
    pub executable: PerPlatform<&'static str>,

    /// Zip archive to install from, per platform
    pub download_url: Option<PerPlatform<&'static str>>,

    /// Folder inside the archive that holds the executable
    pub archive_subfolder: Option<&'static str>,

    /// Extensions offered by the file chooser, per platform
    pub file_filter: PerPlatform<&'static [&'static str]>,
}

impl ToolSpec {
    /// Executable filename on `platform`
    pub fn executable_for(&self, platform: Platform) -> &'static str {
        self.executable.select(platform)
    }

    /// Download URL on `platform`, if the tool can be installed
    pub fn download_url_for(&self, platform: Platform) -> Option<&'static str> {
        self.download_url.as_ref().map(|urls| *urls.select(platform))
    }

    /// Whether bsqm knows how to install this tool
    pub fn installable(&self) -> bool {
        self.download_url.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::ToolRegistry;

    #[test]
    fn test_selection_is_consistent_per_platform() {
        let ndk = ToolRegistry::get(ToolId::Ndk);
        for platform in Platform::ALL {
            let exe = ndk.executable_for(platform);
            let url = ndk.download_url_for(platform).unwrap();
            match platform {
                Platform::Windows => {
                    assert_eq!(exe, "ndk-build.cmd");
                    assert!(url.contains("windows"));
                }
                Platform::MacOS => {
                    assert_eq!(exe, "ndk-build");
                    assert!(url.contains("darwin"));
                }
                Platform::Linux => {
                    assert_eq!(exe, "ndk-build");
                    assert!(url.contains("linux"));
                }
            }
        }
    }

    #[test]
    fn test_git_is_not_installable() {
        let git = ToolRegistry::get(ToolId::Git);
        assert!(!git.installable());
        assert!(git.download_url_for(Platform::Linux).is_none());
    }
}
