//! Terminal I/O collaborator
//!
//! The chain driver only ever talks to a [`Terminal`]: it writes styled
//! text, reads one line at a time and toggles echo for secret answers.
//! [`ConsoleTerminal`] is the implementation used by the binary. Prompts go
//! to stderr so that stdout stays free for results. On a TTY, lines are
//! assembled from raw key presses, which turns Ctrl-C into
//! [`ReadOutcome::Interrupted`] instead of a signal. Otherwise lines are read
//! from stdin as they come.

use crate::error::{Error, Result};
use dialoguer::console::{Key, Term};
use std::fmt;
use std::io::{self, BufRead, BufReader, IsTerminal};

/// Result of waiting for one line of input
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReadOutcome {
    Line(String),
    /// The user pressed Ctrl-C while the line was pending
    Interrupted,
}

pub trait Terminal {
    fn write(&mut self, text: &str) -> Result<()>;

    /// Blocks until one line of input (without its line terminator) or an
    /// interrupt arrives.
    fn read_line(&mut self) -> Result<ReadOutcome>;

    fn set_echo(&mut self, echo: bool) -> Result<()>;

    /// Called once when the session using this terminal is released.
    fn close(&mut self) {}
}

impl<T: Terminal + ?Sized> Terminal for &mut T {
    fn write(&mut self, text: &str) -> Result<()> {
        (**self).write(text)
    }

    fn read_line(&mut self) -> Result<ReadOutcome> {
        (**self).read_line()
    }

    fn set_echo(&mut self, echo: bool) -> Result<()> {
        (**self).set_echo(echo)
    }

    fn close(&mut self) {
        (**self).close()
    }
}

impl<T: Terminal + ?Sized> Terminal for Box<T> {
    fn write(&mut self, text: &str) -> Result<()> {
        (**self).write(text)
    }

    fn read_line(&mut self) -> Result<ReadOutcome> {
        (**self).read_line()
    }

    fn set_echo(&mut self, echo: bool) -> Result<()> {
        (**self).set_echo(echo)
    }

    fn close(&mut self) {
        (**self).close()
    }
}

/// Source of raw key presses, and the place their echo goes
pub trait KeyInput {
    fn next_key(&mut self) -> io::Result<Key>;

    fn echo(&mut self, text: &str) -> io::Result<()>;

    /// Removes the last echoed character.
    fn erase(&mut self) -> io::Result<()>;
}

impl KeyInput for Term {
    fn next_key(&mut self) -> io::Result<Key> {
        self.read_key_raw()
    }

    fn echo(&mut self, text: &str) -> io::Result<()> {
        self.write_str(text)?;
        self.flush()
    }

    fn erase(&mut self) -> io::Result<()> {
        self.clear_chars(1)
    }
}

fn input_closed() -> Error {
    Error::IoError(io::Error::new(
        io::ErrorKind::UnexpectedEof,
        "input closed before the question was answered",
    ))
}

/// Builds one line out of key presses, echoing typed characters when `echo`.
///
/// Ctrl-C yields [`ReadOutcome::Interrupted`]; Ctrl-D on an empty line means
/// the input is gone.
pub fn read_key_line<K: KeyInput + ?Sized>(keys: &mut K, echo: bool) -> Result<ReadOutcome> {
    let mut line = String::new();
    loop {
        match keys.next_key()? {
            Key::Enter => {
                keys.echo("\n")?;
                return Ok(ReadOutcome::Line(line));
            }
            Key::CtrlC => return Ok(ReadOutcome::Interrupted),
            Key::Char('\u{4}') if line.is_empty() => return Err(input_closed()),
            Key::Backspace => {
                if line.pop().is_some() && echo {
                    keys.erase()?;
                }
            }
            Key::Char(c) if !c.is_control() => {
                line.push(c);
                if echo {
                    keys.echo(c.encode_utf8(&mut [0; 4]))?;
                }
            }
            _ => {}
        }
    }
}

/// Reads one line from a buffered source. End of input is an error, never an
/// empty answer.
pub fn read_buffered_line<R: BufRead + ?Sized>(reader: &mut R) -> Result<ReadOutcome> {
    let mut line = String::new();
    if reader.read_line(&mut line)? == 0 {
        return Err(input_closed());
    }
    Ok(ReadOutcome::Line(line.trim_end_matches(['\r', '\n']).to_string()))
}

enum Input {
    Keys(Box<dyn KeyInput>),
    Lines(Box<dyn BufRead>),
}

/// Terminal that prompts on stderr and reads the process's input
pub struct ConsoleTerminal {
    term: Term,
    input: Input,
    echo: bool,
}

impl ConsoleTerminal {
    /// Reads keys when both stdin and stderr are terminals, lines from stdin
    /// otherwise.
    pub fn new() -> Self {
        let term = Term::stderr();
        let input = if term.is_term() && io::stdin().is_terminal() {
            Input::Keys(Box::new(term.clone()))
        } else {
            log::debug!("stdin is not a terminal, reading answers line by line");
            Input::Lines(Box::new(BufReader::new(io::stdin())))
        };
        Self { term, input, echo: true }
    }

    /// Prompts on stderr and takes answers line by line from `reader`.
    pub fn with_reader(reader: impl BufRead + 'static) -> Self {
        Self { term: Term::stderr(), input: Input::Lines(Box::new(reader)), echo: true }
    }

    /// Prompts on stderr and assembles answers from `keys`.
    pub fn with_keys(keys: impl KeyInput + 'static) -> Self {
        Self { term: Term::stderr(), input: Input::Keys(Box::new(keys)), echo: true }
    }
}

impl Default for ConsoleTerminal {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for ConsoleTerminal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let input = match self.input {
            Input::Keys(_) => "keys",
            Input::Lines(_) => "lines",
        };
        f.debug_struct("ConsoleTerminal")
            .field("input", &input)
            .field("echo", &self.echo)
            .finish_non_exhaustive()
    }
}

impl Terminal for ConsoleTerminal {
    fn write(&mut self, text: &str) -> Result<()> {
        self.term.write_str(text)?;
        self.term.flush()?;
        Ok(())
    }

    fn read_line(&mut self) -> Result<ReadOutcome> {
        match &mut self.input {
            Input::Keys(keys) => read_key_line(keys.as_mut(), self.echo),
            Input::Lines(reader) => read_buffered_line(reader.as_mut()),
        }
    }

    fn set_echo(&mut self, echo: bool) -> Result<()> {
        self.echo = echo;
        Ok(())
    }

    fn close(&mut self) {
        if let Err(e) = self.term.flush() {
            log::warn!("Failed to flush terminal on release: {e}");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::prompt::{ChainState, Prompt, Question};
    use dialoguer::console::TermTarget;
    use std::collections::VecDeque;

    #[derive(Default)]
    struct KeyScript {
        keys: VecDeque<Key>,
        echoed: String,
    }

    impl KeyScript {
        fn new(keys: impl IntoIterator<Item = Key>) -> Self {
            Self { keys: keys.into_iter().collect(), echoed: String::new() }
        }

        fn typed(text: &str) -> Self {
            Self::new(text.chars().map(Key::Char).chain([Key::Enter]))
        }
    }

    impl KeyInput for KeyScript {
        fn next_key(&mut self) -> io::Result<Key> {
            self.keys
                .pop_front()
                .ok_or_else(|| io::Error::new(io::ErrorKind::UnexpectedEof, "no more keys"))
        }

        fn echo(&mut self, text: &str) -> io::Result<()> {
            self.echoed.push_str(text);
            Ok(())
        }

        fn erase(&mut self) -> io::Result<()> {
            self.echoed.pop();
            Ok(())
        }
    }

    #[test]
    fn assembles_line_from_keys() {
        let mut keys = KeyScript::new([
            Key::Char('e'),
            Key::Char('t'),
            Key::Backspace,
            Key::Char('t'),
            Key::Char('h'),
            Key::ArrowLeft,
            Key::Char('0'),
            Key::Enter,
        ]);
        assert_eq!(read_key_line(&mut keys, true).unwrap(), ReadOutcome::Line("eth0".into()));
        assert_eq!(keys.echoed, "eth0\n");
    }

    #[test]
    fn ctrl_c_interrupts_the_pending_line() {
        let mut keys = KeyScript::new([Key::Char('a'), Key::CtrlC, Key::Enter]);
        assert_eq!(read_key_line(&mut keys, true).unwrap(), ReadOutcome::Interrupted);
        assert_eq!(keys.keys.len(), 1);
    }

    #[test]
    fn secret_keys_are_not_echoed() {
        let mut keys = KeyScript::typed("hunter2");
        assert_eq!(read_key_line(&mut keys, false).unwrap(), ReadOutcome::Line("hunter2".into()));
        assert_eq!(keys.echoed, "\n");
    }

    #[test]
    fn ctrl_d_on_empty_line_is_end_of_input() {
        let mut keys = KeyScript::new([Key::Char('\u{4}')]);
        assert!(matches!(
            read_key_line(&mut keys, true),
            Err(Error::IoError(e)) if e.kind() == io::ErrorKind::UnexpectedEof
        ));
    }

    #[test]
    fn buffered_lines_strip_terminators_and_fail_at_eof() {
        let mut reader = "Alice\r\n9090".as_bytes();
        assert_eq!(read_buffered_line(&mut reader).unwrap(), ReadOutcome::Line("Alice".into()));
        assert_eq!(read_buffered_line(&mut reader).unwrap(), ReadOutcome::Line("9090".into()));
        assert!(matches!(
            read_buffered_line(&mut reader),
            Err(Error::IoError(e)) if e.kind() == io::ErrorKind::UnexpectedEof
        ));
    }

    #[test]
    fn console_prompts_on_stderr() {
        let terminal = ConsoleTerminal::with_reader(io::empty());
        assert!(matches!(terminal.term.target(), TermTarget::Stderr));
        assert!(matches!(ConsoleTerminal::new().term.target(), TermTarget::Stderr));
    }

    #[test]
    fn console_reads_piped_answers() {
        let mut prompt = Prompt::new(ConsoleTerminal::with_reader("Alice\n9090\n".as_bytes()));
        prompt
            .ask(Question::new("Name:").key("name"))
            .unwrap()
            .ask(Question::new("Port:").key("port").integer().default("8080"))
            .unwrap();
        let context = prompt.run().unwrap();
        assert_eq!(context.get_str("name"), Some("Alice"));
        assert_eq!(context.get_i64("port"), Some(9090));
    }

    #[test]
    fn console_fails_when_piped_answers_run_out() {
        let mut prompt = Prompt::new(ConsoleTerminal::with_reader("Alice\n".as_bytes()));
        prompt
            .ask(Question::new("Name:").key("name"))
            .unwrap()
            .ask(Question::new("Port:").key("port").default("8080"))
            .unwrap();
        assert!(matches!(prompt.run(), Err(Error::IoError(_))));
        assert_eq!(prompt.state(), ChainState::Failed);
        assert!(!prompt.context().contains_key("port"));
    }

    #[test]
    fn console_ctrl_c_interrupts_the_chain() {
        let keys = KeyScript::new(
            "eth0".chars().map(Key::Char).chain([Key::Enter, Key::Char('1'), Key::CtrlC]),
        );
        let mut prompt = Prompt::new(ConsoleTerminal::with_keys(keys));
        prompt
            .ask(Question::new("Interface:").key("iface"))
            .unwrap()
            .ask(Question::new("Subnet:").key("subnet"))
            .unwrap();

        assert!(matches!(prompt.run(), Err(Error::Interrupted)));
        assert_eq!(prompt.state(), ChainState::Interrupted);
        assert_eq!(prompt.context().get_str("iface"), Some("eth0"));
        assert!(matches!(prompt.run(), Err(Error::ChainClosed)));
    }

    #[test]
    fn console_password_is_read_without_echo() {
        let mut prompt = Prompt::new(ConsoleTerminal::with_keys(KeyScript::typed("s3cret")));
        prompt.ask(Question::new("Password:").key("pw").password()).unwrap();
        assert_eq!(prompt.run().unwrap().get_str("pw"), Some("s3cret"));
    }
}
