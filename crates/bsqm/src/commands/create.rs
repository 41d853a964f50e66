//! `bsqm create` command handler
//!
//! Provisioning pipeline: template download and fill, editor task patch,
//! repository setup, libil2cpp headers. Progress goes through a shared sink
//! so the same pipeline serves the terminal and the JSON line protocol.

use anyhow::{anyhow, Context, Result};
use bsqm_core::fs::directory_is_empty;
use bsqm_core::{prompt_path, ChooserRequest, Platform, ProjectMetadata, Settings, ToolId};
use bsqm_download::{FetchPhase, HttpArchiveFetcher};
use bsqm_projects::{
    patch_tasks_path, place_libil2cpp, Libil2cppSource, Provisioner, RepoInitializer, StepEvent,
    TokioCommandRunner,
};
use camino::{Utf8Path, Utf8PathBuf};
use std::sync::Arc;
use tracing::debug;

use super::{form, load_store, protocol};
use crate::cli::CreateArgs;
use crate::output;
use crate::prompter::ConsolePrompter;

/// Progress reported by the creation pipeline
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Progress<'a> {
    /// A new phase started
    Phase(&'a str),
    /// One line printed by a subprocess
    Output(&'a str),
}

/// Receives pipeline progress; shared with the archive fetcher
pub(crate) type ProgressSink = Arc<dyn Fn(Progress<'_>) + Send + Sync>;

pub(crate) fn progress_sink(f: impl Fn(Progress<'_>) + Send + Sync + 'static) -> ProgressSink {
    Arc::new(f)
}

/// Everything needed to create one project
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct CreateRequest {
    pub project_dir: Utf8PathBuf,
    pub metadata: ProjectMetadata,
    /// Local libil2cpp folder; downloaded when absent
    pub libil2cpp: Option<Utf8PathBuf>,
    pub init_git: bool,
}

pub async fn run(args: CreateArgs, config: Option<&Utf8Path>) -> Result<()> {
    let store = load_store(config)?;
    if args.stdio {
        return protocol::serve_stdio(store.settings()).await;
    }

    output::header("Create New Project");
    let mut prompter = ConsolePrompter::interactive();

    let project_dir = match &args.dir {
        Some(dir) => {
            if let Err(message) = project_folder_is_usable(dir) {
                return Err(anyhow!("{} ({})", message, dir));
            }
            dir.clone()
        }
        None => prompt_path(
            &mut prompter,
            &ChooserRequest::folder("Select empty project folder"),
            project_folder_is_usable,
        )?
        .ok_or_else(|| anyhow!("No project folder selected"))?,
    };

    let metadata = form::collect(&args, store.settings())?;

    println!();
    output::kv("Location", project_dir.as_str());
    output::kv("ID", &metadata.id);
    output::kv("Name", &metadata.name);
    output::kv("Category", metadata.category.as_str());
    output::kv("Game version", &metadata.game_version.to_string());
    println!();

    let request = CreateRequest {
        project_dir,
        metadata,
        libil2cpp: args.libil2cpp.clone(),
        init_git: !args.no_git,
    };

    let spinner = output::spinner("Setting up project");
    let bar = spinner.clone();
    let sink = progress_sink(move |progress| match progress {
        Progress::Phase(message) => bar.set_message(message.to_string()),
        Progress::Output(line) => bar.println(format!("  {}", line)),
    });
    let result = create_project(store.settings(), &request, &sink).await;
    spinner.finish_and_clear();
    let project_dir = result?;

    output::success(&format!("Project '{}' created", request.metadata.name));
    output::kv("Location", project_dir.as_str());
    if request.metadata.ndk_path.is_none() {
        output::warning("Android NDK not configured; run `bsqm configure --tool ndk` before building");
    }
    println!();
    output::info("Next steps:");
    println!("   1. cd {}", project_dir);
    println!("   2. bsqm build");
    Ok(())
}

/// A project folder must be empty; a missing one is created later
pub(crate) fn project_folder_is_usable(dir: &Utf8Path) -> std::result::Result<(), String> {
    if !dir.exists() {
        return Ok(());
    }
    match directory_is_empty(dir) {
        Ok(true) => Ok(()),
        Ok(false) => Err("Folder must be empty.".to_string()),
        Err(e) => Err(format!("Folder cannot be read: {}.", e)),
    }
}

/// Run the full creation pipeline, returning the project folder
pub(crate) async fn create_project(
    settings: &Settings,
    request: &CreateRequest,
    progress: &ProgressSink,
) -> Result<Utf8PathBuf> {
    let phases = Arc::clone(progress);
    let fetcher = HttpArchiveFetcher::from_settings(&settings.network)?
        .with_progress(false)
        .on_phase(Arc::new(move |phase: FetchPhase, url: &str| {
            phases(Progress::Phase(&format!("{} {}...", phase, url)))
        }));
    let project_dir = &request.project_dir;

    let outcome = Provisioner::new(&fetcher, &settings.template)
        .provision(project_dir, &request.metadata)
        .await
        .context("Template provisioning failed")?;

    if let Some(ndk) = &request.metadata.ndk_path {
        let env_path = std::env::var_os("PATH");
        if patch_tasks_path(project_dir, ndk, env_path.as_deref(), Platform::current())? {
            debug!("Build task PATH now includes {}", ndk);
        }
    }

    if request.init_git {
        let git = settings.tool_command(ToolId::Git, "git");
        let runner = TokioCommandRunner;
        RepoInitializer::new(&runner, git)
            .init_repo(project_dir, &outcome.manifest, &mut |event| match event {
                StepEvent::Started(step) => progress(Progress::Phase(&format!("{}...", step.label))),
                StepEvent::Output(text) => {
                    for line in text.lines() {
                        progress(Progress::Output(line));
                    }
                }
            })
            .await?;
    }

    let source = match &request.libil2cpp {
        Some(folder) => {
            progress(Progress::Phase("Copying libil2cpp..."));
            Libil2cppSource::Folder(folder.clone())
        }
        None => Libil2cppSource::Download(settings.template.libil2cpp_url.clone()),
    };
    place_libil2cpp(project_dir, &settings.template.libil2cpp_dir, &source, &fetcher)
        .await
        .context("Failed to add libil2cpp")?;

    Ok(project_dir.clone())
}
