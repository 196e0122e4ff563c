//! Scripted terminal that replays predefined input
//!
//! Useful for automation, testing, or CI/CD environments where nobody is
//! sitting at the keyboard.

use super::terminal::{ReadOutcome, Terminal};
use crate::error::{Error, Result};
use std::collections::VecDeque;
use std::io;

#[derive(Debug, Clone, PartialEq, Eq)]
enum Input {
    Line(String),
    Interrupt,
}

/// Terminal that answers from a fixed list of lines and records what was
/// written to it
#[derive(Debug)]
pub struct ScriptedTerminal {
    input: VecDeque<Input>,
    output: String,
    echo: bool,
    secret_reads: usize,
    reads: usize,
    closes: usize,
}

impl ScriptedTerminal {
    pub fn new<I, S>(lines: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            input: lines.into_iter().map(|line| Input::Line(line.into())).collect(),
            output: String::new(),
            echo: true,
            secret_reads: 0,
            reads: 0,
            closes: 0,
        }
    }

    /// Queue one more line of input.
    pub fn with_line(mut self, line: &str) -> Self {
        self.input.push_back(Input::Line(line.to_string()));
        self
    }

    /// Queue a Ctrl-C in place of the next line.
    pub fn with_interrupt(mut self) -> Self {
        self.input.push_back(Input::Interrupt);
        self
    }

    /// Everything written so far.
    pub fn output(&self) -> &str {
        &self.output
    }

    /// Number of times `text` appears in the output.
    pub fn count(&self, text: &str) -> usize {
        self.output.matches(text).count()
    }

    pub fn reads(&self) -> usize {
        self.reads
    }

    /// Reads that happened while echo was off.
    pub fn secret_reads(&self) -> usize {
        self.secret_reads
    }

    pub fn remaining(&self) -> usize {
        self.input.len()
    }

    pub fn is_echo_on(&self) -> bool {
        self.echo
    }

    pub fn close_count(&self) -> usize {
        self.closes
    }
}

impl Default for ScriptedTerminal {
    fn default() -> Self {
        Self::new(Vec::<String>::new())
    }
}

impl Terminal for ScriptedTerminal {
    fn write(&mut self, text: &str) -> Result<()> {
        self.output.push_str(text);
        Ok(())
    }

    fn read_line(&mut self) -> Result<ReadOutcome> {
        let input = self.input.pop_front().ok_or_else(|| {
            Error::IoError(io::Error::new(io::ErrorKind::UnexpectedEof, "input script exhausted"))
        })?;
        self.reads += 1;
        if !self.echo {
            self.secret_reads += 1;
        }

        match input {
            Input::Line(line) => {
                // Echo the typed line the way a terminal would
                if self.echo {
                    self.output.push_str(&line);
                }
                self.output.push('\n');
                Ok(ReadOutcome::Line(line))
            }
            Input::Interrupt => Ok(ReadOutcome::Interrupted),
        }
    }

    fn set_echo(&mut self, echo: bool) -> Result<()> {
        self.echo = echo;
        Ok(())
    }

    fn close(&mut self) {
        self.closes += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn replays_lines_then_interrupt() {
        let mut terminal = ScriptedTerminal::new(["one"]).with_line("two").with_interrupt();
        assert_eq!(terminal.read_line().unwrap(), ReadOutcome::Line("one".into()));
        assert_eq!(terminal.read_line().unwrap(), ReadOutcome::Line("two".into()));
        assert_eq!(terminal.read_line().unwrap(), ReadOutcome::Interrupted);
        assert_eq!(terminal.reads(), 3);
        assert!(matches!(terminal.read_line(), Err(Error::IoError(_))));
    }

    #[test]
    fn hides_secret_lines_from_output() {
        let mut terminal = ScriptedTerminal::new(["hunter2"]);
        terminal.set_echo(false).unwrap();
        terminal.read_line().unwrap();
        assert!(!terminal.output().contains("hunter2"));
        assert_eq!(terminal.secret_reads(), 1);
    }

    #[test]
    fn counts_writes_and_closes() {
        let mut terminal = ScriptedTerminal::default();
        terminal.write("Name: ").unwrap();
        terminal.write("Name: ").unwrap();
        terminal.close();
        assert_eq!(terminal.count("Name:"), 2);
        assert_eq!(terminal.close_count(), 1);
        assert_eq!(terminal.remaining(), 0);
    }
}
