//! Project builds with `ndk-build`

use camino::Utf8Path;
use tracing::{info, warn};

use crate::error::{Error, Result};
use crate::git::{CommandOutput, CommandRunner, CommandSpec};

/// Arguments pointing `ndk-build` at the project's makefiles
pub const NDK_BUILD_ARGS: [&str; 3] = [
    "NDK_PROJECT_PATH=.",
    "APP_BUILD_SCRIPT=./Android.mk",
    "NDK_APPLICATION_MK=./Application.mk",
];

/// Build the project in `project_dir`
pub async fn build_project(
    runner: &dyn CommandRunner,
    ndk_build: &Utf8Path,
    project_dir: &Utf8Path,
) -> Result<CommandOutput> {
    info!("Building {}", project_dir);
    let command = CommandSpec::new(ndk_build, project_dir).args(NDK_BUILD_ARGS);
    let output = runner.run(&command).await?;
    if !output.success() {
        for line in output.stdout.lines().chain(output.stderr.lines()) {
            warn!("{}", line);
        }
        return Err(Error::BuildFailed {
            status: output.code,
        });
    }
    Ok(output)
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::sync::Mutex;

    struct Recorder {
        code: i32,
        seen: Mutex<Vec<CommandSpec>>,
    }

    #[async_trait]
    impl CommandRunner for Recorder {
        async fn run(&self, command: &CommandSpec) -> Result<CommandOutput> {
            self.seen.lock().unwrap().push(command.clone());
            Ok(CommandOutput {
                code: Some(self.code),
                ..Default::default()
            })
        }
    }

    #[tokio::test]
    async fn test_passes_makefile_arguments() {
        let runner = Recorder {
            code: 0,
            seen: Mutex::new(Vec::new()),
        };
        build_project(&runner, Utf8Path::new("/ndk/ndk-build"), Utf8Path::new("/p"))
            .await
            .unwrap();

        let seen = runner.seen.lock().unwrap();
        assert_eq!(seen[0].program, "/ndk/ndk-build");
        assert_eq!(seen[0].cwd, "/p");
        assert_eq!(seen[0].args, NDK_BUILD_ARGS);
    }

    #[tokio::test]
    async fn test_non_zero_exit_is_build_failed() {
        let runner = Recorder {
            code: 2,
            seen: Mutex::new(Vec::new()),
        };
        let err = build_project(&runner, Utf8Path::new("ndk-build"), Utf8Path::new("/p"))
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "Build failed");
    }
}
