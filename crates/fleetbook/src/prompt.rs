//! User interaction capability.
//!
//! Fleet operations never talk to a terminal directly. They ask a
//! [`Prompter`] to confirm, to collect a line of input, or to show a notice.

use std::collections::VecDeque;
use std::io::{BufRead, Write};

use tracing::trace;

use crate::error::{Error, Result};

/// Confirmation, input and notice channel to the user.
pub trait Prompter {
    /// Ask a yes/no question. `false` means the user declined.
    ///
    /// # Errors
    ///
    /// Returns an error if the user cannot be reached.
    fn confirm(&mut self, message: &str) -> Result<bool>;

    /// Ask for a line of text seeded with `initial`. `None` means cancelled.
    ///
    /// # Errors
    ///
    /// Returns an error if the user cannot be reached.
    fn input(&mut self, message: &str, initial: &str) -> Result<Option<String>>;

    /// Show a blocking notice.
    ///
    /// # Errors
    ///
    /// Returns an error if the user cannot be reached.
    fn notify(&mut self, message: &str) -> Result<()>;
}

/// Line-oriented prompter over any reader/writer pair.
///
/// `confirm` accepts `y` or `yes`. `input` shows the seeded value as a hint
/// and returns the line exactly as typed, so an empty line is an empty answer.
/// End of input is cancel.
#[derive(Debug)]
pub struct TerminalPrompter<R, W> {
    reader: R,
    writer: W,
}

impl TerminalPrompter<std::io::StdinLock<'static>, std::io::Stderr> {
    /// Prompter on the process's stdin, writing questions to stderr.
    #[must_use]
    pub fn stdio() -> Self {
        Self::new(std::io::stdin().lock(), std::io::stderr())
    }
}

impl<R: BufRead, W: Write> TerminalPrompter<R, W> {
    /// Create a prompter over the given streams.
    #[must_use]
    pub fn new(reader: R, writer: W) -> Self {
        Self { reader, writer }
    }

    fn read_line(&mut self) -> Result<Option<String>> {
        let mut line = String::new();
        let read = self
            .reader
            .read_line(&mut line)
            .map_err(|e| Error::prompt(format!("failed to read answer: {e}")))?;
        if read == 0 {
            return Ok(None);
        }
        Ok(Some(line.trim_end_matches(['\r', '\n']).to_string()))
    }

    fn ask(&mut self, text: &str) -> Result<()> {
        write!(self.writer, "{text}")
            .and_then(|()| self.writer.flush())
            .map_err(|e| Error::prompt(format!("failed to write prompt: {e}")))
    }
}

impl<R: BufRead, W: Write> Prompter for TerminalPrompter<R, W> {
    fn confirm(&mut self, message: &str) -> Result<bool> {
        self.ask(&format!("{message} [y/N] "))?;
        let answer = self.read_line()?.unwrap_or_default();
        let accepted = matches!(answer.trim().to_ascii_lowercase().as_str(), "y" | "yes");
        trace!("Confirmation '{}' answered {}", message, accepted);
        Ok(accepted)
    }

    fn input(&mut self, message: &str, initial: &str) -> Result<Option<String>> {
        self.ask(&format!("{message} (currently {initial}) "))?;
        self.read_line()
    }

    fn notify(&mut self, message: &str) -> Result<()> {
        writeln!(self.writer, "{message}")
            .map_err(|e| Error::prompt(format!("failed to write notice: {e}")))
    }
}

/// Prompter that answers from pre-recorded responses.
///
/// Confirmations and inputs are consumed in order. When a queue runs dry the
/// prompter declines (or cancels). Notices are collected for inspection.
#[derive(Debug, Default, Clone)]
pub struct ScriptedPrompter {
    confirmations: VecDeque<bool>,
    inputs: VecDeque<Option<String>>,
    notices: Vec<String>,
}

impl ScriptedPrompter {
    /// A prompter that declines and cancels everything.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// A prompter that confirms the next question.
    #[must_use]
    pub fn confirming() -> Self {
        Self::new().with_confirmation(true)
    }

    /// Queue a confirmation answer.
    #[must_use]
    pub fn with_confirmation(mut self, answer: bool) -> Self {
        self.confirmations.push_back(answer);
        self
    }

    /// Queue a typed input.
    #[must_use]
    pub fn with_input(mut self, text: impl Into<String>) -> Self {
        self.inputs.push_back(Some(text.into()));
        self
    }

    /// Queue a cancelled input.
    #[must_use]
    pub fn with_cancel(mut self) -> Self {
        self.inputs.push_back(None);
        self
    }

    /// Notices shown so far.
    #[must_use]
    pub fn notices(&self) -> &[String] {
        &self.notices
    }
}

impl Prompter for ScriptedPrompter {
    fn confirm(&mut self, _message: &str) -> Result<bool> {
        Ok(self.confirmations.pop_front().unwrap_or(false))
    }

    fn input(&mut self, _message: &str, _initial: &str) -> Result<Option<String>> {
        Ok(self.inputs.pop_front().flatten())
    }

    fn notify(&mut self, message: &str) -> Result<()> {
        self.notices.push(message.to_string());
        Ok(())
    }
}
