//! Subprocess execution
//!
//! Repository setup and builds run external programs through a
//! [`CommandRunner`] so the step sequencing can be exercised without git or
//! the NDK installed.

use std::fmt;

use async_trait::async_trait;
use camino::Utf8PathBuf;
use tokio::process::Command;
use tracing::debug;

use crate::error::{Error, Result};

/// A program invocation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandSpec {
    pub program: Utf8PathBuf,
    pub args: Vec<String>,
    pub cwd: Utf8PathBuf,
}

impl CommandSpec {
    pub fn new(program: impl Into<Utf8PathBuf>, cwd: impl Into<Utf8PathBuf>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
            cwd: cwd.into(),
        }
    }

    pub fn arg(mut self, arg: impl Into<String>) -> Self {
        self.args.push(arg.into());
        self
    }

    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }
}

impl fmt::Display for CommandSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.program)?;
        for arg in &self.args {
            write!(f, " {}", arg)?;
        }
        Ok(())
    }
}

/// Captured result of a finished command
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommandOutput {
    /// Exit code; `None` when terminated by a signal
    pub code: Option<i32>,
    pub stdout: String,
    pub stderr: String,
}

impl CommandOutput {
    pub fn success(&self) -> bool {
        self.code == Some(0)
    }
}

/// Runs commands to completion
#[async_trait]
pub trait CommandRunner: Send + Sync {
    async fn run(&self, command: &CommandSpec) -> Result<CommandOutput>;
}

/// [`CommandRunner`] backed by `tokio::process`
#[derive(Debug, Default, Clone, Copy)]
pub struct TokioCommandRunner;

#[async_trait]
impl CommandRunner for TokioCommandRunner {
    async fn run(&self, command: &CommandSpec) -> Result<CommandOutput> {
        debug!("Running: {} (in {})", command, command.cwd);
        let output = Command::new(command.program.as_std_path())
            .args(&command.args)
            .current_dir(command.cwd.as_std_path())
            .output()
            .await
            .map_err(|source| Error::Spawn {
                program: command.program.to_string(),
                source,
            })?;

        Ok(CommandOutput {
            code: output.status.code(),
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_joins_args() {
        let cmd = CommandSpec::new("git", "/tmp/p")
            .args(["submodule", "add"])
            .arg("https://example.com/r.git");
        assert_eq!(cmd.to_string(), "git submodule add https://example.com/r.git");
    }

    #[tokio::test]
    async fn test_missing_program_is_spawn_error() {
        let cmd = CommandSpec::new("bsqm-definitely-not-a-program", ".");
        let err = TokioCommandRunner.run(&cmd).await.unwrap_err();
        assert!(matches!(err, Error::Spawn { .. }));
    }
}
