//! Editor task configuration
//!
//! Templates ship a `.vscode/tasks.json` whose first task runs the build.
//! When `ndk-build` is not reachable through `PATH`, that task gets its own
//! `PATH` extended with the NDK folder.

use std::ffi::OsStr;
use std::path::Path;

use bsqm_core::Platform;
use camino::Utf8Path;
use serde::Serialize;
use serde_json::{Map, Value};
use tracing::debug;

use crate::error::{Error, Result};

/// Location of the tasks file inside a project
pub const TASKS_FILE: &str = ".vscode/tasks.json";

/// Point the build task at the NDK folder when it is not on `env_path`
///
/// Returns whether the file was changed.
pub fn patch_tasks_path(
    project_dir: &Utf8Path,
    ndk_path: &Utf8Path,
    env_path: Option<&OsStr>,
    platform: Platform,
) -> Result<bool> {
    let tasks_path = project_dir.join(TASKS_FILE);
    if !tasks_path.is_file() {
        debug!("No {} in project", TASKS_FILE);
        return Ok(false);
    }
    let Some(ndk_dir) = ndk_path.parent().filter(|d| !d.as_str().is_empty()) else {
        return Ok(false);
    };

    let on_path = env_path
        .map(|p| std::env::split_paths(p).any(|entry| entry == Path::new(ndk_dir.as_str())))
        .unwrap_or(false);
    if on_path {
        debug!("{} already on PATH", ndk_dir);
        return Ok(false);
    }

    let content = std::fs::read_to_string(&tasks_path)?;
    let mut tasks: Value = serde_json::from_str(&content)
        .map_err(|e| Error::invalid_tasks(tasks_path.as_str(), e.to_string()))?;

    let first = tasks
        .get_mut("tasks")
        .and_then(Value::as_array_mut)
        .and_then(|t| t.first_mut())
        .and_then(Value::as_object_mut)
        .ok_or_else(|| Error::invalid_tasks(tasks_path.as_str(), "no tasks defined"))?;

    let env = object_entry(object_entry(first, "options"), "env");
    env.insert(
        "PATH".to_string(),
        Value::String(format!(
            "${{env:PATH}}{}{}",
            platform.path_separator(),
            ndk_dir
        )),
    );

    std::fs::write(&tasks_path, to_json_4_spaces(&tasks)?)?;
    debug!("Added {} to build task PATH", ndk_dir);
    Ok(true)
}

fn object_entry<'a>(map: &'a mut Map<String, Value>, key: &str) -> &'a mut Map<String, Value> {
    let entry = map
        .entry(key.to_string())
        .or_insert_with(|| Value::Object(Map::new()));
    if !entry.is_object() {
        *entry = Value::Object(Map::new());
    }
    match entry {
        Value::Object(inner) => inner,
        _ => unreachable!("entry was just made an object"),
    }
}

fn to_json_4_spaces(value: &Value) -> Result<String> {
    let mut out = Vec::new();
    let formatter = serde_json::ser::PrettyFormatter::with_indent(b"    ");
    let mut serializer = serde_json::Serializer::with_formatter(&mut out, formatter);
    value.serialize(&mut serializer)?;
    out.push(b'\n');
    String::from_utf8(out).map_err(|e| Error::invalid_tasks("tasks.json", e.to_string()))
}
