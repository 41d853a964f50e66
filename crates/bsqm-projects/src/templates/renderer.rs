//! Placeholder substitution
//!
//! Template files carry `{{ mod.<key> }}` markers. The vocabulary is closed:
//! each key maps to exactly one metadata field and unknown keys are left
//! untouched. Substitution is plain text replacement, no expressions.
//!
//! Layout cleanups (trailing commas, blank line runs) apply to the template
//! text only. Substituted values are held out behind private-use markers
//! while the cleanups run, so they land exactly as entered.

use std::collections::BTreeMap;
use std::sync::LazyLock;

use bsqm_core::ProjectMetadata;
use camino::Utf8Path;
use regex::{Captures, Regex};
use tracing::debug;

use crate::error::{Error, Result};

static TOKEN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\{\{\s*mod\.(\w+)\s*\}\}").expect("token regex is valid")
});
static TRAILING_COMMA: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r",(\s*)([\]}])").expect("trailing comma regex is valid"));
static BLANK_LINES: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\n{3,}").expect("blank line regex is valid"));
static HELD: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\x{E000}(\d+)\x{E001}").expect("held value regex is valid"));

/// Token keys understood by the renderer
pub const TOKEN_KEYS: [&str; 9] = [
    "id",
    "name",
    "author",
    "description",
    "category",
    "gameVersion",
    "out",
    "url",
    "ndkPath",
];

/// Substitutes project metadata into template files
#[derive(Debug, Clone)]
pub struct TokenRenderer {
    values: BTreeMap<&'static str, String>,
}

impl TokenRenderer {
    /// Build the token table from `metadata`; absent optional fields render empty
    pub fn new(metadata: &ProjectMetadata) -> Self {
        let values = BTreeMap::from([
            ("id", metadata.id.clone()),
            ("name", metadata.name.clone()),
            ("author", metadata.author.clone()),
            ("description", metadata.description.clone()),
            ("category", metadata.category.to_string()),
            ("gameVersion", metadata.game_version.to_string()),
            ("out", metadata.out.clone()),
            ("url", metadata.url.clone().unwrap_or_default()),
            (
                "ndkPath",
                metadata
                    .ndk_path
                    .as_ref()
                    .map(|p| p.to_string())
                    .unwrap_or_default(),
            ),
        ]);
        Self { values }
    }

    /// Value substituted for `key`, if it is part of the vocabulary
    pub fn value(&self, key: &str) -> Option<&str> {
        self.values.get(key).map(String::as_str)
    }

    /// Substitute every token in `content`
    ///
    /// With `json` set, values are escaped as JSON string contents and
    /// trailing commas before a closing bracket are dropped.
    pub fn render(&self, content: &str, json: bool) -> String {
        let mut held = Vec::new();
        let marked = TOKEN.replace_all(content, |caps: &Captures<'_>| {
            match self.value(&caps[1]) {
                // Empty values take part in layout cleanup
                Some("") => String::new(),
                Some(value) => {
                    held.push(if json { escape_json(value) } else { value.to_string() });
                    format!("\u{E000}{}\u{E001}", held.len() - 1)
                }
                None => caps[0].to_string(),
            }
        });

        let cleaned = if json {
            TRAILING_COMMA.replace_all(&marked, "$1$2").into_owned()
        } else {
            marked.into_owned()
        };
        let cleaned = BLANK_LINES.replace_all(&cleaned, "\n\n");

        HELD.replace_all(&cleaned, |caps: &Captures<'_>| {
            caps[1]
                .parse::<usize>()
                .ok()
                .and_then(|index| held.get(index))
                .cloned()
                .unwrap_or_else(|| caps[0].to_string())
        })
        .into_owned()
    }

    /// Fill the file at `path` in place
    pub fn fill_file(&self, path: &Utf8Path) -> Result<()> {
        let content = std::fs::read_to_string(path).map_err(|e| Error::FillFailed {
            path: path.to_string(),
            message: e.to_string(),
        })?;
        let json = path.extension() == Some("json");
        std::fs::write(path, self.render(&content, json))?;
        debug!("Filled {}", path);
        Ok(())
    }
}

fn escape_json(value: &str) -> String {
    let quoted = serde_json::Value::String(value.to_string()).to_string();
    quoted[1..quoted.len() - 1].to_string()
}
