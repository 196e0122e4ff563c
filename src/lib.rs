/// Handles argument parsing and the command-line runner.
pub mod cli;

/// Chain files describing questions in YAML or JSON.
pub mod config;

/// Constants shared across the crate.
pub mod constants;

/// Defines custom error types.
pub mod error;

/// A set of helpers for reading input.
pub mod ioutils;

/// Chained interactive prompts: questions, validation, retries and hooks.
pub mod prompt;
