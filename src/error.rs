use crate::constants::exit_codes;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("IO error: {0}.")]
    IoError(#[from] std::io::Error),

    #[error("Failed to parse JSON. Original error: {0}")]
    JSONParseError(#[from] serde_json::Error),

    #[error("Failed to parse YAML. Original error: {0}")]
    YAMLParseError(#[from] serde_yaml::Error),

    #[error("Cannot load chain file '{path}': {reason}.")]
    ConfigError { path: String, reason: String },

    /// A question was submitted with neither prompt text nor a storage key.
    #[error("No question given.")]
    NoQuestionGiven,

    /// The retry budget ran out while the answer kept failing validation.
    #[error("{0}")]
    ValidationFailed(String),

    /// The answer stayed empty although the question requires a value.
    #[error("{0}")]
    RequiredMissing(String),

    /// The validator cannot be evaluated, so no answer is ever accepted.
    #[error("Invalid validator: {0}.")]
    InvalidValidatorShape(String),

    #[error("Interrupted.")]
    Interrupted,

    #[error("Prompt interface has been closed already.")]
    ChainClosed,

    /// Failure raised by a caller-supplied hook or continuation.
    #[error(transparent)]
    Other(#[from] anyhow::Error),

    /// A failure the prompt chain has already shown on its terminal.
    #[error(transparent)]
    Reported(Box<Error>),
}

impl Error {
    /// Process exit code reported by the binary for this error.
    pub fn exit_code(&self) -> i32 {
        match self {
            Error::Interrupted => exit_codes::INTERRUPTED,
            Error::Reported(inner) => inner.exit_code(),
            _ => exit_codes::FAILURE,
        }
    }

    /// Marks an error as already printed by the prompt.
    pub fn reported(self) -> Self {
        match self {
            Error::Reported(_) => self,
            other => Error::Reported(Box::new(other)),
        }
    }

    pub fn is_reported(&self) -> bool {
        matches!(self, Error::Reported(_))
    }
}

/// Convenience type alias for Results with askchain's Error as the error type.
pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Default error handler that prints the error and exits the program.
///
/// # Arguments
/// * `err` - The Error to handle
///
/// # Behavior
/// Prints the error message to stderr, unless the prompt already showed it,
/// and exits with the code mapped by [`Error::exit_code`].
pub fn default_error_handler(err: Error) {
    if !err.is_reported() {
        eprintln!("{err}");
    }
    std::process::exit(err.exit_code());
}
