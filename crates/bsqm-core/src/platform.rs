//! Platform detection module
//!
//! Tool filenames and download URLs differ per operating system. Detection is
//! three-way: Windows, macOS, and everything else is treated as Linux. A
//! single `Platform` value is picked once and then used for every
//! per-platform lookup in the same pass.

use serde::{Deserialize, Serialize};

/// Operating system platform
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Platform {
    /// Windows
    Windows,
    /// macOS (Darwin)
    #[serde(rename = "macos")]
    MacOS,
    /// Linux and any other Unix-like system
    Linux,
}

impl Platform {
    /// All supported platforms
    pub const ALL: [Platform; 3] = [Platform::Windows, Platform::MacOS, Platform::Linux];

    /// Detect the platform this binary runs on
    pub fn current() -> Self {
        Self::from_os(std::env::consts::OS)
    }

    /// Map an `std::env::consts::OS` value onto a platform
    pub fn from_os(os: &str) -> Self {
        match os {
            "windows" => Self::Windows,
            "macos" => Self::MacOS,
            _ => Self::Linux,
        }
    }

    /// Separator used in the `PATH` environment variable
    pub fn path_separator(&self) -> char {
        match self {
            Self::Windows => ';',
            Self::MacOS | Self::Linux => ':',
        }
    }
}

impl std::fmt::Display for Platform {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Windows => write!(f, "Windows"),
            Self::MacOS => write!(f, "macOS"),
            Self::Linux => write!(f, "Linux"),
        }
    }
}

/// One value per supported platform
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PerPlatform<T> {
    pub windows: T,
    pub macos: T,
    pub linux: T,
}

impl<T> PerPlatform<T> {
    /// The same value on every platform
    pub const fn uniform(value: T) -> Self
    where
        T: Copy,
    {
        Self {
            windows: value,
            macos: value,
            linux: value,
        }
    }

    /// Pick the entry for `platform`
    pub fn select(&self, platform: Platform) -> &T {
        match platform {
            Platform::Windows => &self.windows,
            Platform::MacOS => &self.macos,
            Platform::Linux => &self.linux,
        }
    }
}
