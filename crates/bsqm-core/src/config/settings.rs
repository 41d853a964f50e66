//! Settings types

use camino::{Utf8Path, Utf8PathBuf};
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// External tools bsqm resolves and persists
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ToolId {
    /// Version-control client
    Git,
    /// Android device bridge
    Adb,
    /// Android NDK build script
    Ndk,
}

impl ToolId {
    /// All tools, in resolution order
    pub const ALL: [ToolId; 3] = [ToolId::Git, ToolId::Adb, ToolId::Ndk];

    /// Settings key fragment
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Git => "git",
            Self::Adb => "adb",
            Self::Ndk => "ndk",
        }
    }
}

impl std::fmt::Display for ToolId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for ToolId {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "git" => Ok(Self::Git),
            "adb" => Ok(Self::Adb),
            "ndk" | "ndk-build" => Ok(Self::Ndk),
            other => Err(format!("Unknown tool: {}. Valid tools: git, adb, ndk", other)),
        }
    }
}

/// Complete persisted settings
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct Settings {
    /// Resolved tool paths
    #[serde(default)]
    pub tools: ToolPaths,

    /// Project template source
    #[serde(default)]
    pub template: TemplateSettings,

    /// Network configuration
    #[serde(default)]
    pub network: NetworkSettings,

    /// Project defaults
    #[serde(default)]
    pub project: ProjectSettings,
}

impl Settings {
    /// Resolved path for a tool, if any
    pub fn tool_path(&self, tool: ToolId) -> Option<&Utf8Path> {
        match tool {
            ToolId::Git => self.tools.git.as_deref(),
            ToolId::Adb => self.tools.adb.as_deref(),
            ToolId::Ndk => self.tools.ndk.as_deref(),
        }
    }

    /// Replace the stored path for a tool; `None` clears it
    pub fn set_tool_path(&mut self, tool: ToolId, path: Option<Utf8PathBuf>) {
        let slot = match tool {
            ToolId::Git => &mut self.tools.git,
            ToolId::Adb => &mut self.tools.adb,
            ToolId::Ndk => &mut self.tools.ndk,
        };
        *slot = path;
    }

    /// Program to invoke for a tool: the stored path, or the bare command name
    pub fn tool_command(&self, tool: ToolId, fallback: &str) -> Utf8PathBuf {
        self.tool_path(tool)
            .map(Utf8Path::to_path_buf)
            .unwrap_or_else(|| Utf8PathBuf::from(fallback))
    }

    /// Read a scalar value by dotted key (e.g. `tools.git`)
    pub fn get(&self, key: &str) -> Result<Option<String>> {
        let value = match key {
            "tools.git" => self.tools.git.as_ref().map(|p| p.to_string()),
            "tools.adb" => self.tools.adb.as_ref().map(|p| p.to_string()),
            "tools.ndk" => self.tools.ndk.as_ref().map(|p| p.to_string()),
            "template.url" => Some(self.template.url.clone()),
            "template.archive-root" => self.template.archive_root.clone(),
            "template.manifest" => Some(self.template.manifest.clone()),
            "template.libil2cpp-url" => Some(self.template.libil2cpp_url.clone()),
            "template.libil2cpp-dir" => Some(self.template.libil2cpp_dir.clone()),
            "network.download-timeout-secs" => {
                Some(self.network.download_timeout_secs.to_string())
            }
            "network.user-agent" => Some(self.network.user_agent.clone()),
            "project.game-version" => Some(self.project.game_version.clone()),
            _ => return Err(Error::unknown_key(key)),
        };
        Ok(value)
    }

    /// Write a scalar value by dotted key; `None` resets it
    pub fn set(&mut self, key: &str, value: Option<&str>) -> Result<()> {
        let defaults = Settings::default();
        match key {
            "tools.git" => self.tools.git = value.map(Utf8PathBuf::from),
            "tools.adb" => self.tools.adb = value.map(Utf8PathBuf::from),
            "tools.ndk" => self.tools.ndk = value.map(Utf8PathBuf::from),
            "template.url" => {
                self.template.url = value.map_or(defaults.template.url, str::to_string)
            }
            "template.archive-root" => self.template.archive_root = value.map(str::to_string),
            "template.manifest" => {
                self.template.manifest = value.map_or(defaults.template.manifest, str::to_string)
            }
            "template.libil2cpp-url" => {
                self.template.libil2cpp_url =
                    value.map_or(defaults.template.libil2cpp_url, str::to_string)
            }
            "template.libil2cpp-dir" => {
                self.template.libil2cpp_dir =
                    value.map_or(defaults.template.libil2cpp_dir, str::to_string)
            }
            "network.download-timeout-secs" => {
                self.network.download_timeout_secs = match value {
                    Some(v) => v.parse().map_err(|_| {
                        Error::invalid_field("download-timeout-secs", "expected a number of seconds")
                    })?,
                    None => defaults.network.download_timeout_secs,
                }
            }
            "network.user-agent" => {
                self.network.user_agent =
                    value.map_or(defaults.network.user_agent, str::to_string)
            }
            "project.game-version" => {
                self.project.game_version = match value {
                    Some(v) => {
                        semver::Version::parse(v)
                            .map_err(|e| Error::invalid_field("game-version", e.to_string()))?;
                        v.to_string()
                    }
                    None => defaults.project.game_version,
                }
            }
            _ => return Err(Error::unknown_key(key)),
        }
        Ok(())
    }

    /// All keys accepted by [`Settings::get`] and [`Settings::set`]
    pub fn keys() -> &'static [&'static str] {
        &[
            "tools.git",
            "tools.adb",
            "tools.ndk",
            "template.url",
            "template.archive-root",
            "template.manifest",
            "template.libil2cpp-url",
            "template.libil2cpp-dir",
            "network.download-timeout-secs",
            "network.user-agent",
            "project.game-version",
        ]
    }
}

/// Resolved tool paths, keyed by tool id
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ToolPaths {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub git: Option<Utf8PathBuf>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub adb: Option<Utf8PathBuf>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ndk: Option<Utf8PathBuf>,
}

/// Where the project template comes from and how it is laid out
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct TemplateSettings {
    /// Zip archive URL of the template
    #[serde(default = "default_template_url")]
    pub url: String,

    /// Top-level folder inside the archive; detected when unset
    #[serde(default = "default_archive_root")]
    pub archive_root: Option<String>,

    /// Manifest file name inside the template
    #[serde(default = "default_manifest")]
    pub manifest: String,

    /// Files to fill when the template ships no manifest
    #[serde(default = "default_fallback_fill")]
    pub fallback_fill: Vec<String>,

    /// Zip archive URL of the libil2cpp headers
    #[serde(default = "default_libil2cpp_url")]
    pub libil2cpp_url: String,

    /// Project-relative folder the libil2cpp headers go into
    #[serde(default = "default_libil2cpp_dir")]
    pub libil2cpp_dir: String,
}

impl Default for TemplateSettings {
    fn default() -> Self {
        Self {
            url: default_template_url(),
            archive_root: default_archive_root(),
            manifest: default_manifest(),
            fallback_fill: default_fallback_fill(),
            libil2cpp_url: default_libil2cpp_url(),
            libil2cpp_dir: default_libil2cpp_dir(),
        }
    }
}

/// Network configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct NetworkSettings {
    /// Download timeout in seconds
    #[serde(default = "default_download_timeout")]
    pub download_timeout_secs: u64,

    /// User agent string for HTTP requests
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
}

impl Default for NetworkSettings {
    fn default() -> Self {
        Self {
            download_timeout_secs: default_download_timeout(),
            user_agent: default_user_agent(),
        }
    }
}

/// Defaults offered to the project form
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct ProjectSettings {
    /// Game version new projects target
    #[serde(default = "default_game_version")]
    pub game_version: String,
}

impl Default for ProjectSettings {
    fn default() -> Self {
        Self {
            game_version: default_game_version(),
        }
    }
}

fn default_template_url() -> String {
    "https://github.com/raftario/beaton-mod-template/archive/master.zip".to_string()
}

fn default_archive_root() -> Option<String> {
    Some("beaton-mod-template-master".to_string())
}

fn default_manifest() -> String {
    "template.json".to_string()
}

fn default_fallback_fill() -> Vec<String> {
    vec![
        "bmbfmod.json".to_string(),
        "Android.mk".to_string(),
        "README.md".to_string(),
    ]
}

fn default_libil2cpp_url() -> String {
    "https://files.raphaeltheriault.com/libil2cpp.zip".to_string()
}

fn default_libil2cpp_dir() -> String {
    "extern/beatsaber-hook/shared".to_string()
}

fn default_download_timeout() -> u64 {
    600
}

fn default_user_agent() -> String {
    format!("bsqm/{}", env!("CARGO_PKG_VERSION"))
}

fn default_game_version() -> String {
    "1.7.0".to_string()
}
