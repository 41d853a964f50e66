//! `bsqm configure` - resolve the external toolchain

use anyhow::Result;
use bsqm_core::{Platform, Prompter, ToolId};
use bsqm_doctor::{ResolvedTool, ToolRegistry, ToolResolver, WhichLocator};
use bsqm_download::HttpArchiveFetcher;
use camino::Utf8Path;
use tabled::{settings::Style, Table, Tabled};

use super::load_store;
use crate::cli::ConfigureArgs;
use crate::output;
use crate::prompter::ConsolePrompter;

#[derive(Tabled)]
struct ToolRow {
    tool: String,
    status: String,
    path: String,
}

impl From<&ResolvedTool> for ToolRow {
    fn from(resolved: &ResolvedTool) -> Self {
        Self {
            tool: ToolRegistry::get(resolved.tool).name.to_string(),
            status: resolved.source.to_string(),
            path: resolved
                .path
                .as_ref()
                .map(|p| p.to_string())
                .unwrap_or_else(|| "-".to_string()),
        }
    }
}

pub async fn run(args: ConfigureArgs, config: Option<&Utf8Path>) -> Result<()> {
    output::header("Configure toolchain");

    let mut store = load_store(config)?;
    let fetcher = HttpArchiveFetcher::from_settings(&store.settings().network)?;
    let resolver = ToolResolver::new(Platform::current(), &WhichLocator, &fetcher);

    let mut prompter: Box<dyn Prompter> = if args.non_interactive {
        Box::new(ConsolePrompter::unattended())
    } else {
        Box::new(ConsolePrompter::interactive())
    };

    let tools = match args.tool {
        Some(tool) => vec![tool],
        None => ToolId::ALL.to_vec(),
    };

    let mut resolved = Vec::with_capacity(tools.len());
    for tool in tools {
        resolved.push(
            resolver
                .resolve_and_store(&mut store, tool, prompter.as_mut())
                .await?,
        );
    }

    println!();
    let mut table = Table::new(resolved.iter().map(ToolRow::from));
    table.with(Style::sharp());
    println!("{}", table);

    let missing = resolved.iter().filter(|r| !r.available).count();
    if missing == 0 {
        output::success("Toolchain configured");
    } else {
        output::warning(&format!("{} tool(s) unavailable", missing));
    }
    output::kv("Settings", store.path().as_str());
    Ok(())
}
