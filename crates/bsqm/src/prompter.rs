//! Prompter that reports notices with the CLI's output style

use bsqm_core::prompt::{NonInteractivePrompter, TerminalPrompter};
use bsqm_core::{ChooserRequest, Notice, Prompter};
use camino::Utf8PathBuf;

use crate::output;

/// Wraps a prompter, printing its notices through [`output`]
pub struct ConsolePrompter<P> {
    inner: P,
}

impl ConsolePrompter<TerminalPrompter> {
    pub fn interactive() -> Self {
        Self {
            inner: TerminalPrompter::new(),
        }
    }
}

impl ConsolePrompter<NonInteractivePrompter> {
    pub fn unattended() -> Self {
        Self {
            inner: NonInteractivePrompter,
        }
    }
}

impl<P: Prompter> Prompter for ConsolePrompter<P> {
    fn choose_path(&mut self, request: &ChooserRequest) -> bsqm_core::Result<Option<Utf8PathBuf>> {
        self.inner.choose_path(request)
    }

    fn confirm(&mut self, question: &str) -> bsqm_core::Result<bool> {
        self.inner.confirm(question)
    }

    fn notify(&mut self, level: Notice, message: &str) {
        match level {
            Notice::Info => output::info(message),
            Notice::Warning => output::warning(message),
            Notice::Error => output::error(message),
        }
    }
}
