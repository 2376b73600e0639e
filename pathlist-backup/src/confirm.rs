//! Confirmation gate for large backups.

use crate::utils::errors::Result;
use std::io::{BufRead, Write};

/// Asks whether a backup of the given size should go ahead.
pub trait ConfirmationGate {
    /// `size` is already human-readable; `question` is shown as the prompt.
    fn confirm(&mut self, size: &str, question: &str) -> Result<bool>;
}

impl<G: ConfirmationGate + ?Sized> ConfirmationGate for Box<G> {
    fn confirm(&mut self, size: &str, question: &str) -> Result<bool> {
        (**self).confirm(size, question)
    }
}

/// `y` or `yes` in any case, surrounding whitespace ignored.
pub fn is_affirmative(answer: &str) -> bool {
    let answer = answer.trim();
    answer.eq_ignore_ascii_case("y") || answer.eq_ignore_ascii_case("yes")
}

/// Prompts on a writer and reads one line of answer.
pub struct TerminalGate<R, W> {
    input: R,
    output: W,
}

impl TerminalGate<std::io::StdinLock<'static>, std::io::Stdout> {
    pub fn stdio() -> Self {
        Self::new(std::io::stdin().lock(), std::io::stdout())
    }
}

impl<R: BufRead, W: Write> TerminalGate<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }
}

impl<R: BufRead, W: Write> ConfirmationGate for TerminalGate<R, W> {
    fn confirm(&mut self, size: &str, question: &str) -> Result<bool> {
        writeln!(self.output, "Total size is {size}")?;
        write!(self.output, "{question}")?;
        self.output.flush()?;

        let mut answer = String::new();
        if self.input.read_line(&mut answer)? == 0 {
            return Ok(false);
        }
        Ok(is_affirmative(&answer))
    }
}

/// Always answers yes, for unattended runs.
#[derive(Debug, Default, Clone, Copy)]
pub struct AssumeYes;

impl ConfirmationGate for AssumeYes {
    fn confirm(&mut self, size: &str, _question: &str) -> Result<bool> {
        tracing::info!("Total size is {}, continuing without confirmation", size);
        Ok(true)
    }
}
