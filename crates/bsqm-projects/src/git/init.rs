//! Repository initialization
//!
//! Setting up a project repository is an ordered list of steps executed
//! until the first failure. Nothing already done is undone; the single
//! error names the step that failed.

use camino::{Utf8Path, Utf8PathBuf};
use tracing::{debug, info};

use super::process::{CommandRunner, CommandSpec};
use crate::error::{Error, Result};
use crate::templates::TemplateManifest;

/// What a step does
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StepAction {
    Run(CommandSpec),
    CreateDir(Utf8PathBuf),
}

/// One step of repository setup
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InitStep {
    pub label: String,
    pub action: StepAction,
}

impl InitStep {
    fn run(label: impl Into<String>, command: CommandSpec) -> Self {
        Self {
            label: label.into(),
            action: StepAction::Run(command),
        }
    }
}

/// Progress reported while a plan runs
#[derive(Debug, Clone, Copy)]
pub enum StepEvent<'a> {
    Started(&'a InitStep),
    Output(&'a str),
}

/// Steps that turn `project_dir` into a repository with the manifest's submodules
pub fn plan_init(git: &Utf8Path, project_dir: &Utf8Path, manifest: &TemplateManifest) -> Vec<InitStep> {
    let mut steps = vec![InitStep::run(
        "Git repository initialisation",
        CommandSpec::new(git, project_dir).arg("init"),
    )];

    if manifest.submodules.is_empty() {
        return steps;
    }

    let submodule_root = project_dir.join(&manifest.submodule_dir);
    steps.push(InitStep {
        label: format!("Creating {}", manifest.submodule_dir),
        action: StepAction::CreateDir(submodule_root.clone()),
    });

    for submodule in &manifest.submodules {
        let relative = format!("{}/{}", manifest.submodule_dir, submodule.path);
        let submodule_dir = submodule_root.join(&submodule.path);

        let mut add = CommandSpec::new(git, project_dir).args(["submodule", "add"]);
        if let Some(branch) = &submodule.branch {
            add = add.args(["-b", branch.as_str()]);
        }
        steps.push(InitStep::run(
            format!("Git submodule add of {}", submodule.path),
            add.arg(&submodule.url).arg(relative),
        ));

        if let Some(commit) = &submodule.commit {
            steps.push(InitStep::run(
                format!("Git checkout of {} in {}", commit, submodule.path),
                CommandSpec::new(git, &submodule_dir).args(["checkout", commit.as_str()]),
            ));
        }

        steps.push(InitStep::run(
            format!("Git submodule update of {}", submodule.path),
            CommandSpec::new(git, &submodule_dir).args(["submodule", "update", "--init", "--recursive"]),
        ));
    }

    steps
}

/// Run `steps` in order, stopping at the first failure
pub async fn run_plan(
    steps: &[InitStep],
    runner: &dyn CommandRunner,
    on_event: &mut dyn FnMut(StepEvent<'_>),
) -> Result<()> {
    for step in steps {
        on_event(StepEvent::Started(step));
        match &step.action {
            StepAction::CreateDir(path) => {
                debug!("Creating {}", path);
                std::fs::create_dir_all(path)?;
            }
            StepAction::Run(command) => {
                let output = runner.run(command).await?;
                for text in [&output.stdout, &output.stderr] {
                    let text = text.trim_end();
                    if !text.is_empty() {
                        on_event(StepEvent::Output(text));
                    }
                }
                if !output.success() {
                    return Err(Error::StepFailed {
                        step: step.label.clone(),
                        status: output.code,
                        stderr: output.stderr.trim().to_string(),
                    });
                }
            }
        }
    }
    Ok(())
}

/// Initializes project repositories with a resolved git binary
pub struct RepoInitializer<'a> {
    runner: &'a dyn CommandRunner,
    git: Utf8PathBuf,
}

impl<'a> RepoInitializer<'a> {
    pub fn new(runner: &'a dyn CommandRunner, git: impl Into<Utf8PathBuf>) -> Self {
        Self {
            runner,
            git: git.into(),
        }
    }

    /// Initialize `project_dir` and attach the manifest's submodules
    pub async fn init_repo(
        &self,
        project_dir: &Utf8Path,
        manifest: &TemplateManifest,
        on_event: &mut dyn FnMut(StepEvent<'_>),
    ) -> Result<()> {
        info!("Initializing git repository at: {}", project_dir);
        manifest.validate(project_dir)?;
        let steps = plan_init(&self.git, project_dir, manifest);
        run_plan(&steps, self.runner, on_event).await?;
        info!("Repository initialized with {} submodules", manifest.submodules.len());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::templates::SubmoduleSpec;

    fn manifest() -> TemplateManifest {
        TemplateManifest {
            submodules: vec![
                SubmoduleSpec {
                    path: "beatsaber-hook".to_string(),
                    url: "https://github.com/sc2ad/beatsaber-hook".to_string(),
                    branch: None,
                    commit: Some("abc123".to_string()),
                },
                SubmoduleSpec {
                    path: "modloader".to_string(),
                    url: "https://github.com/emulamer/QuestLoader".to_string(),
                    branch: Some("dev".to_string()),
                    commit: None,
                },
            ],
            ..TemplateManifest::default()
        }
    }

    #[test]
    fn test_plan_without_submodules_is_init_only() {
        let steps = plan_init(
            Utf8Path::new("git"),
            Utf8Path::new("/p"),
            &TemplateManifest::default(),
        );
        assert_eq!(steps.len(), 1);
        assert_eq!(
            steps[0].action,
            StepAction::Run(CommandSpec::new("git", "/p").arg("init"))
        );
    }

    #[test]
    fn test_plan_orders_submodule_steps() {
        let steps = plan_init(Utf8Path::new("git"), Utf8Path::new("/p"), &manifest());
        let rendered: Vec<String> = steps
            .iter()
            .map(|s| match &s.action {
                StepAction::Run(cmd) => format!("{} @ {}", cmd, cmd.cwd),
                StepAction::CreateDir(p) => format!("mkdir {}", p),
            })
            .collect();

        assert_eq!(
            rendered,
            vec![
                "git init @ /p",
                "mkdir /p/extern",
                "git submodule add https://github.com/sc2ad/beatsaber-hook extern/beatsaber-hook @ /p",
                "git checkout abc123 @ /p/extern/beatsaber-hook",
                "git submodule update --init --recursive @ /p/extern/beatsaber-hook",
                "git submodule add -b dev https://github.com/emulamer/QuestLoader extern/modloader @ /p",
                "git submodule update --init --recursive @ /p/extern/modloader",
            ]
        );
    }
}
