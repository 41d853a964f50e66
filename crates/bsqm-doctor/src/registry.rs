//! Tool registry
//!
//! Static registry of the tools bsqm resolves.

use bsqm_core::{PerPlatform, ToolId};

use crate::tool::ToolSpec;

/// Static registry of all known tools, in resolution order
pub static TOOL_REGISTRY: &[ToolSpec] = &[
    ToolSpec {
        id: ToolId::Git,
        name: "Git",
        executable: PerPlatform {
            windows: "git.exe",
            macos: "git",
            linux: "git",
        },
        download_url: None,
        archive_subfolder: None,
        file_filter: PerPlatform {
            windows: &["exe"],
            macos: &[],
            linux: &[],
        },
    },
    ToolSpec {
        id: ToolId::Adb,
        name: "Android Debug Bridge",
        executable: PerPlatform {
            windows: "adb.exe",
            macos: "adb",
            linux: "adb",
        },
        download_url: Some(PerPlatform {
            windows: "https://dl.google.com/android/repository/platform-tools-latest-windows.zip",
            macos: "https://dl.google.com/android/repository/platform-tools-latest-darwin.zip",
            linux: "https://dl.google.com/android/repository/platform-tools-latest-linux.zip",
        }),
        archive_subfolder: Some("platform-tools"),
        file_filter: PerPlatform {
            windows: &["exe"],
            macos: &[],
            linux: &[],
        },
    },
    ToolSpec {
        id: ToolId::Ndk,
        name: "Android NDK build script",
        executable: PerPlatform {
            windows: "ndk-build.cmd",
            macos: "ndk-build",
            linux: "ndk-build",
        },
        download_url: Some(PerPlatform {
            windows: "https://dl.google.com/android/repository/android-ndk-r20-windows-x86_64.zip",
            macos: "https://dl.google.com/android/repository/android-ndk-r20-darwin-x86_64.zip",
            linux: "https://dl.google.com/android/repository/android-ndk-r20-linux-x86_64.zip",
        }),
        archive_subfolder: Some("android-ndk-r20"),
        file_filter: PerPlatform {
            windows: &["cmd"],
            macos: &[],
            linux: &[],
        },
    },
];

/// Lookup helpers over [`TOOL_REGISTRY`]
pub struct ToolRegistry;

impl ToolRegistry {
    /// All tools
    pub fn all() -> &'static [ToolSpec] {
        TOOL_REGISTRY
    }

    /// Tool by id
    pub fn get(id: ToolId) -> &'static ToolSpec {
        TOOL_REGISTRY
            .iter()
            .find(|t| t.id == id)
            .unwrap_or_else(|| unreachable!("every ToolId has a registry entry"))
    }
}
