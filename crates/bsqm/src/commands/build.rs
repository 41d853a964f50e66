//! `bsqm build` - run ndk-build in a project

use anyhow::{Context, Result};
use bsqm_core::{Platform, ToolId};
use bsqm_doctor::ToolRegistry;
use bsqm_projects::{build_project, TokioCommandRunner};
use camino::Utf8Path;
use tracing::debug;

use super::load_store;
use crate::cli::BuildArgs;
use crate::output;

pub async fn run(args: BuildArgs, config: Option<&Utf8Path>) -> Result<()> {
    let store = load_store(config)?;
    let fallback = ToolRegistry::get(ToolId::Ndk).executable_for(Platform::current());
    let ndk_build = store.settings().tool_command(ToolId::Ndk, fallback);

    if !args.dir.join("Android.mk").is_file() {
        output::warning(&format!("No Android.mk in {}", args.dir));
    }

    let spinner = output::spinner("Building...");
    let result = build_project(&TokioCommandRunner, &ndk_build, &args.dir).await;
    spinner.finish_and_clear();

    let build = result.with_context(|| format!("Failed to build {}", args.dir))?;
    for line in build.stdout.lines().chain(build.stderr.lines()) {
        debug!("{}", line);
    }
    output::success(&format!("Built {}", args.dir));
    Ok(())
}
