//! Git operations for project repositories

pub mod init;
pub mod process;

pub use init::{plan_init, run_plan, InitStep, RepoInitializer, StepAction, StepEvent};
pub use process::{CommandOutput, CommandRunner, CommandSpec, TokioCommandRunner};
