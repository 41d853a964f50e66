//! Project metadata types
//!
//! Every field a user enters for a new mod is validated against its own
//! format rule. Validators return the targeted message shown on re-prompt.

use camino::Utf8PathBuf;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::LazyLock;

use crate::error::{Error, Result};

static ID_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z0-9-]+$").expect("id regex is valid"));

static OUT_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[a-z]+$").expect("output name regex is valid"));

/// Mod category shown by the mod manager
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Category {
    Gameplay,
    Saber,
    Other,
}

impl Category {
    /// All categories
    pub const ALL: [Category; 3] = [Category::Gameplay, Category::Saber, Category::Other];

    /// Name as written into templates
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Gameplay => "Gameplay",
            Self::Saber => "Saber",
            Self::Other => "Other",
        }
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Category {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|c| c.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| "Should be one of Gameplay, Saber or Other.".to_string())
    }
}

/// Validate a mod identifier
pub fn validate_id(input: &str) -> std::result::Result<(), String> {
    if ID_RE.is_match(input) {
        Ok(())
    } else {
        Err("Should be unique and only contain letters, numbers and hyphens.".to_string())
    }
}

/// Validate a single-line, non-empty text field (name, author)
pub fn validate_single_line(input: &str) -> std::result::Result<(), String> {
    if input.trim().is_empty() || input.contains(['\n', '\r', '\t']) {
        Err("Should fit on a single line.".to_string())
    } else {
        Ok(())
    }
}

/// Validate a free-form description
pub fn validate_description(input: &str) -> std::result::Result<(), String> {
    if input.trim().is_empty() {
        Err("Should not be empty.".to_string())
    } else {
        Ok(())
    }
}

/// Validate the output library name
pub fn validate_out(input: &str) -> std::result::Result<(), String> {
    if OUT_RE.is_match(input) {
        Ok(())
    } else {
        Err("Should only contain lowercase letters.".to_string())
    }
}

/// Validate a project homepage URL
pub fn validate_url(input: &str) -> std::result::Result<(), String> {
    match url::Url::parse(input) {
        Ok(u) if matches!(u.scheme(), "http" | "https") && u.has_host() => Ok(()),
        _ => Err("Should be a valid url.".to_string()),
    }
}

/// Validate and parse a game version
pub fn parse_game_version(input: &str) -> std::result::Result<semver::Version, String> {
    semver::Version::parse(input.trim())
        .map_err(|_| "Should be a version such as 1.7.0.".to_string())
}

/// Output name derived from an identifier: its letters, lowercased
pub fn derive_out(id: &str) -> String {
    id.chars()
        .filter(char::is_ascii_alphabetic)
        .map(|c| c.to_ascii_lowercase())
        .collect()
}

/// Metadata substituted into a new project
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectMetadata {
    pub id: String,
    pub name: String,
    pub author: String,
    pub description: String,
    pub category: Category,
    pub game_version: semver::Version,
    pub out: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ndk_path: Option<Utf8PathBuf>,
}

impl ProjectMetadata {
    /// Check every field against its format rule
    pub fn validate(&self) -> Result<()> {
        validate_id(&self.id).map_err(|m| Error::invalid_field("id", m))?;
        validate_single_line(&self.name).map_err(|m| Error::invalid_field("name", m))?;
        validate_single_line(&self.author).map_err(|m| Error::invalid_field("author", m))?;
        validate_description(&self.description)
            .map_err(|m| Error::invalid_field("description", m))?;
        validate_out(&self.out).map_err(|m| Error::invalid_field("out", m))?;
        if let Some(url) = &self.url {
            validate_url(url).map_err(|m| Error::invalid_field("url", m))?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn metadata() -> ProjectMetadata {
        ProjectMetadata {
            id: "coolmod".to_string(),
            name: "Cool Mod".to_string(),
            author: "Jane".to_string(),
            description: "does stuff".to_string(),
            category: Category::Gameplay,
            game_version: semver::Version::new(1, 7, 0),
            out: "coolmod".to_string(),
            url: None,
            ndk_path: None,
        }
    }

    #[test]
    fn test_validate_id() {
        assert!(validate_id("My-Mod2").is_ok());
        assert!(validate_id("coolmod").is_ok());
        assert!(validate_id("My-Mod2\n").is_err());
        assert!(validate_id("my\nmod").is_err());
        assert!(validate_id("my mod").is_err());
        assert!(validate_id("").is_err());
    }

    #[test]
    fn test_validate_single_line() {
        assert!(validate_single_line("Cool Mod").is_ok());
        assert!(validate_single_line("Raphaël Thériault").is_ok());
        assert!(validate_single_line("two\nlines").is_err());
        assert!(validate_single_line("tab\there").is_err());
        assert!(validate_single_line("   ").is_err());
    }

    #[test]
    fn test_validate_out() {
        assert!(validate_out("coolmod").is_ok());
        assert!(validate_out("CoolMod").is_err());
        assert!(validate_out("cool_mod").is_err());
    }

    #[test]
    fn test_validate_url() {
        assert!(validate_url("https://github.com/raftario/beaton-mod-template").is_ok());
        assert!(validate_url("http://example.com").is_ok());
        assert!(validate_url("ftp://example.com").is_err());
        assert!(validate_url("not a url").is_err());
    }

    #[test]
    fn test_category_parse() {
        assert_eq!("saber".parse::<Category>().unwrap(), Category::Saber);
        assert_eq!("Other".parse::<Category>().unwrap(), Category::Other);
        assert!("Lighting".parse::<Category>().is_err());
    }

    #[test]
    fn test_parse_game_version() {
        assert_eq!(parse_game_version("1.7.0").unwrap(), semver::Version::new(1, 7, 0));
        assert!(parse_game_version("1.7").is_err());
    }

    #[test]
    fn test_derive_out() {
        assert_eq!(derive_out("My-Mod2"), "mymod");
        assert_eq!(derive_out("coolmod"), "coolmod");
    }

    #[test]
    fn test_metadata_validate() {
        assert!(metadata().validate().is_ok());

        let mut bad = metadata();
        bad.id = "bad id".to_string();
        assert!(matches!(
            bad.validate(),
            Err(Error::InvalidField { field: "id", .. })
        ));

        let mut bad = metadata();
        bad.url = Some("nope".to_string());
        assert!(matches!(
            bad.validate(),
            Err(Error::InvalidField { field: "url", .. })
        ));
    }

    #[test]
    fn test_metadata_json_shape() {
        let json = serde_json::to_value(metadata()).unwrap();
        assert_eq!(json["gameVersion"], "1.7.0");
        assert_eq!(json["category"], "Gameplay");
        assert!(json.get("ndkPath").is_none());
    }
}
