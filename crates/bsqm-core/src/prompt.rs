//! Interactive prompts
//!
//! Workflows never talk to the terminal directly. They go through a
//! [`Prompter`], which shows choosers, asks yes/no questions and posts
//! notices. [`prompt_path`] drives the chooser/validate/retry loop as an
//! explicit state machine:
//!
//! ```text
//! Prompting --dismissed--------------------------> Cancelled
//! Prompting --chosen--> Validating --valid-------> Accepted
//!                       Validating --invalid, retry--> Prompting
//!                       Validating --invalid, no retry / limit--> Cancelled
//! ```

use camino::{Utf8Path, Utf8PathBuf};
use dialoguer::{Confirm, Input};
use tracing::{debug, error, info, warn};

use crate::error::{Error, Result};

/// What a chooser may select
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChooserKind {
    /// A file, optionally restricted to extensions (without the dot)
    File { extensions: Vec<String> },
    /// A folder
    Folder,
}

/// A chooser to show to the user
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChooserRequest {
    pub kind: ChooserKind,
    /// Label of the confirming action, e.g. "Select build script"
    pub label: String,
    /// Maximum number of choices before giving up; `None` means unlimited
    pub max_attempts: Option<usize>,
}

impl ChooserRequest {
    /// Folder chooser
    pub fn folder(label: impl Into<String>) -> Self {
        Self {
            kind: ChooserKind::Folder,
            label: label.into(),
            max_attempts: None,
        }
    }

    /// File chooser with an extension filter (empty = any file)
    pub fn file(label: impl Into<String>, extensions: &[&str]) -> Self {
        Self {
            kind: ChooserKind::File {
                extensions: extensions.iter().map(|e| e.to_string()).collect(),
            },
            label: label.into(),
            max_attempts: None,
        }
    }

    /// Give up after `attempts` choices
    pub fn with_max_attempts(mut self, attempts: usize) -> Self {
        self.max_attempts = Some(attempts);
        self
    }
}

/// Severity of a user-facing notice
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Notice {
    Info,
    Warning,
    Error,
}

/// Host UI seam used by every workflow
pub trait Prompter {
    /// Show a chooser; `None` when the user dismissed it
    fn choose_path(&mut self, request: &ChooserRequest) -> Result<Option<Utf8PathBuf>>;

    /// Ask a yes/no question
    fn confirm(&mut self, question: &str) -> Result<bool>;

    /// Post a notice
    fn notify(&mut self, level: Notice, message: &str);
}

impl<P: Prompter + ?Sized> Prompter for &mut P {
    fn choose_path(&mut self, request: &ChooserRequest) -> Result<Option<Utf8PathBuf>> {
        (**self).choose_path(request)
    }

    fn confirm(&mut self, question: &str) -> Result<bool> {
        (**self).confirm(question)
    }

    fn notify(&mut self, level: Notice, message: &str) {
        (**self).notify(level, message)
    }
}

/// States of the path prompt loop
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PromptState {
    Prompting { attempt: usize },
    Validating { attempt: usize, path: Utf8PathBuf },
    Accepted(Utf8PathBuf),
    Cancelled,
}

/// Show a chooser until `validate` accepts the result or the user gives up.
///
/// `validate` returns the message shown before asking whether to retry.
pub fn prompt_path<P, V>(
    prompter: &mut P,
    request: &ChooserRequest,
    mut validate: V,
) -> Result<Option<Utf8PathBuf>>
where
    P: Prompter + ?Sized,
    V: FnMut(&Utf8Path) -> std::result::Result<(), String>,
{
    let mut state = PromptState::Prompting { attempt: 1 };

    loop {
        state = match state {
            PromptState::Prompting { attempt } => match prompter.choose_path(request)? {
                Some(path) => PromptState::Validating { attempt, path },
                None => {
                    debug!("{} dismissed", request.label);
                    PromptState::Cancelled
                }
            },
            PromptState::Validating { attempt, path } => match validate(&path) {
                Ok(()) => PromptState::Accepted(path),
                Err(message) => {
                    let exhausted = request.max_attempts.is_some_and(|max| attempt >= max);
                    if exhausted {
                        prompter.notify(Notice::Error, &message);
                        PromptState::Cancelled
                    } else if prompter
                        .confirm(&format!("{} Do you wish to try again?", message))?
                    {
                        PromptState::Prompting {
                            attempt: attempt + 1,
                        }
                    } else {
                        PromptState::Cancelled
                    }
                }
            },
            PromptState::Accepted(path) => return Ok(Some(path)),
            PromptState::Cancelled => return Ok(None),
        };
    }
}

/// Terminal prompter built on dialoguer
///
/// Choosers are text inputs; submitting an empty line dismisses them.
#[derive(Debug, Default)]
pub struct TerminalPrompter;

impl TerminalPrompter {
    pub fn new() -> Self {
        Self
    }
}

impl Prompter for TerminalPrompter {
    fn choose_path(&mut self, request: &ChooserRequest) -> Result<Option<Utf8PathBuf>> {
        let hint = match &request.kind {
            ChooserKind::Folder => "folder".to_string(),
            ChooserKind::File { extensions } if extensions.is_empty() => "file".to_string(),
            ChooserKind::File { extensions } => {
                let list = extensions
                    .iter()
                    .map(|e| format!("*.{}", e))
                    .collect::<Vec<_>>()
                    .join(", ");
                format!("file, {}", list)
            }
        };

        let answer: String = Input::new()
            .with_prompt(format!("{} ({}, empty to cancel)", request.label, hint))
            .allow_empty(true)
            .interact_text()
            .map_err(|e| Error::prompt(e.to_string()))?;

        let answer = answer.trim();
        if answer.is_empty() {
            return Ok(None);
        }
        Ok(Some(expand_home(answer)))
    }

    fn confirm(&mut self, question: &str) -> Result<bool> {
        Confirm::new()
            .with_prompt(question)
            .default(false)
            .interact()
            .map_err(|e| Error::prompt(e.to_string()))
    }

    fn notify(&mut self, level: Notice, message: &str) {
        match level {
            Notice::Info => info!("{}", message),
            Notice::Warning => warn!("{}", message),
            Notice::Error => error!("{}", message),
        }
    }
}

/// Prompter for unattended runs: dismisses every chooser, declines every question
#[derive(Debug, Default)]
pub struct NonInteractivePrompter;

impl Prompter for NonInteractivePrompter {
    fn choose_path(&mut self, request: &ChooserRequest) -> Result<Option<Utf8PathBuf>> {
        debug!("Non-interactive: dismissing '{}'", request.label);
        Ok(None)
    }

    fn confirm(&mut self, question: &str) -> Result<bool> {
        debug!("Non-interactive: declining '{}'", question);
        Ok(false)
    }

    fn notify(&mut self, level: Notice, message: &str) {
        match level {
            Notice::Info => info!("{}", message),
            Notice::Warning => warn!("{}", message),
            Notice::Error => error!("{}", message),
        }
    }
}

fn expand_home(input: &str) -> Utf8PathBuf {
    if let Some(rest) = input.strip_prefix("~/") {
        if let Some(home) = crate::utils::get_home_dir()
            .ok()
            .and_then(|h| Utf8PathBuf::try_from(h).ok())
        {
            return home.join(rest);
        }
    }
    Utf8PathBuf::from(input)
}
