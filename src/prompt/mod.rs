//! Chained interactive prompts
//!
//! The module is structured in layers:
//! - `terminal`: the I/O collaborator, with a console implementation
//! - `scripted`: a terminal that replays predefined input
//! - `session`: scoped ownership of the terminal during a drive
//! - `question`, `kind`, `validator`: what gets asked and how answers are checked
//! - `chain`: the queue and the question/answer state machine

pub mod chain;
pub mod context;
pub mod kind;
pub mod question;
pub mod scripted;
pub mod session;
pub mod terminal;
pub mod validator;

pub use chain::{Prompt, Scope};
pub use context::ResultContext;
pub use kind::Kind;
pub use question::{AfterHook, BeforeHook, Question, Text, Tries};
pub use scripted::ScriptedTerminal;
pub use session::ChainState;
pub use terminal::{ConsoleTerminal, ReadOutcome, Terminal};
pub use validator::{Validator, Verdict};

/// Convenience function to create a chain on the process's terminal
pub fn console() -> Prompt<ConsoleTerminal> {
    Prompt::new(ConsoleTerminal::new())
}
