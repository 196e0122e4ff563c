//! Scoped ownership of the terminal while a chain is being driven
//!
//! A [`Session`] is opened at the start of a drive and released by `Drop`,
//! so every exit path (completion, exhausted retries, interrupt, hook
//! failure) gives the terminal back exactly once.

use super::terminal::{ReadOutcome, Terminal};
use crate::error::Result;
use dialoguer::console::style;
use std::fmt;

/// Lifecycle of the chain being driven
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChainState {
    Idle,
    Questioning,
    Retrying,
    Answered,
    Failed,
    Interrupted,
    Closed,
}

impl ChainState {
    /// No further question can be asked from this state.
    pub fn is_terminal(self) -> bool {
        matches!(self, ChainState::Failed | ChainState::Interrupted | ChainState::Closed)
    }
}

pub struct Session<'t> {
    terminal: &'t mut dyn Terminal,
    suffix: &'t str,
    echo_off: bool,
    state: ChainState,
}

impl<'t> Session<'t> {
    pub(crate) fn open(terminal: &'t mut dyn Terminal, suffix: &'t str) -> Self {
        log::debug!("Terminal session opened");
        Self { terminal, suffix, echo_off: false, state: ChainState::Idle }
    }

    pub fn state(&self) -> ChainState {
        self.state
    }

    pub(crate) fn transition(&mut self, next: ChainState) {
        log::trace!("Chain state {:?} -> {:?}", self.state, next);
        self.state = next;
    }

    pub(crate) fn default_suffix(&self) -> &str {
        self.suffix
    }

    /// Writes the prompt line: question text, muted default hint, suffix.
    pub(crate) fn render_prompt(
        &mut self,
        text: &str,
        default: Option<&str>,
        suffix: &str,
    ) -> Result<()> {
        let hint = match default {
            Some(default) if !default.is_empty() => {
                style(format!(" ({default})")).dim().to_string()
            }
            _ => String::new(),
        };
        let line = format!("{}{}{}", style(text).green(), hint, style(suffix).green());
        self.terminal.write(&line)
    }

    pub(crate) fn render_choices(&mut self, choices: &[String]) -> Result<()> {
        let listing: String = choices
            .iter()
            .enumerate()
            .map(|(i, choice)| format!("  {}) {choice}\n", i + 1))
            .collect();
        self.terminal.write(&listing)
    }

    pub fn say(&mut self, text: &str) -> Result<()> {
        self.terminal.write(&format!("{text}\n"))
    }

    pub(crate) fn warn(&mut self, message: &str) -> Result<()> {
        self.say(&style(message).yellow().to_string())
    }

    pub(crate) fn error(&mut self, message: &str) -> Result<()> {
        self.say(&style(message).red().to_string())
    }

    /// Waits for one line, with echo disabled for the duration when `secret`.
    pub(crate) fn read_answer(&mut self, secret: bool) -> Result<ReadOutcome> {
        if secret {
            self.terminal.set_echo(false)?;
            self.echo_off = true;
        }

        let outcome = self.terminal.read_line();

        if secret {
            self.terminal.set_echo(true)?;
            self.echo_off = false;
        }
        outcome
    }
}

impl fmt::Debug for Session<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Session")
            .field("state", &self.state)
            .field("echo_off", &self.echo_off)
            .finish_non_exhaustive()
    }
}

impl Drop for Session<'_> {
    fn drop(&mut self) {
        if self.echo_off {
            if let Err(e) = self.terminal.set_echo(true) {
                log::warn!("Failed to restore terminal echo: {e}");
            }
        }
        self.terminal.close();
        log::debug!("Terminal session released in state {:?}", self.state);
    }
}
