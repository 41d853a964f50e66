//! Toolchain status report for `bsqm doctor`

use bsqm_core::{Platform, Settings, ToolId};
use camino::Utf8PathBuf;
use owo_colors::OwoColorize;
use serde::Serialize;

use crate::locator::Locator;
use crate::registry::ToolRegistry;

/// Status of one tool
#[derive(Debug, Clone, Serialize)]
pub struct ToolReport {
    pub tool: ToolId,
    pub name: &'static str,
    /// Path stored in the settings
    pub configured: Option<Utf8PathBuf>,
    /// Whether the stored path still points at a file
    pub configured_exists: bool,
    /// Match on `PATH`, if any
    pub on_path: Option<Utf8PathBuf>,
    pub installable: bool,
}

impl ToolReport {
    /// A tool is usable when either its stored path or `PATH` provides it
    pub fn usable(&self) -> bool {
        self.configured_exists || self.on_path.is_some()
    }
}

/// Check every registered tool without prompting
pub fn check_tools(settings: &Settings, locator: &dyn Locator, platform: Platform) -> Vec<ToolReport> {
    ToolRegistry::all()
        .iter()
        .map(|spec| {
            let configured = settings.tool_path(spec.id).map(|p| p.to_path_buf());
            let configured_exists = configured.as_ref().is_some_and(|p| p.is_file());
            ToolReport {
                tool: spec.id,
                name: spec.name,
                configured,
                configured_exists,
                on_path: locator.find(spec.executable_for(platform)),
                installable: spec.installable(),
            }
        })
        .collect()
}

/// Render reports for the terminal
pub fn format_human(reports: &[ToolReport], platform: Platform) -> String {
    let mut output = String::new();
    output.push_str(&format!("{}\n", "bsqm doctor".bold()));
    output.push_str(&format!("Platform: {}\n\n", platform));

    for report in reports {
        let marker = if report.usable() {
            "✓".green().to_string()
        } else {
            "✗".red().to_string()
        };
        output.push_str(&format!("  {} {} ({})\n", marker, report.name, report.tool));

        match (&report.configured, report.configured_exists) {
            (Some(path), true) => output.push_str(&format!("      configured: {}\n", path)),
            (Some(path), false) => output.push_str(&format!(
                "      configured: {} {}\n",
                path,
                "(missing)".yellow()
            )),
            (None, _) => {}
        }
        if let Some(path) = &report.on_path {
            output.push_str(&format!("      on PATH:    {}\n", path));
        }
        if !report.usable() {
            let hint = if report.installable {
                format!("run `bsqm configure --tool {}` to locate or install it", report.tool)
            } else {
                format!("install {} and make sure it is on PATH", report.name)
            };
            output.push_str(&format!("      {}\n", hint.dimmed()));
        }
    }

    let missing = reports.iter().filter(|r| !r.usable()).count();
    output.push('\n');
    if missing == 0 {
        output.push_str(&format!("{}\n", "All tools available".green()));
    } else {
        output.push_str(&format!("{}\n", format!("{} tool(s) unavailable", missing).yellow()));
    }
    output
}
