//! Answer validators
//!
//! The shape of a validator is chosen when the question is built; nothing
//! inspects a value at runtime to guess what kind of check was meant.

use crate::{
    error::{Error, Result},
    prompt::ResultContext,
};
use regex::Regex;
use std::fmt;

pub type Predicate = Box<dyn Fn(&str, &ResultContext) -> bool>;

pub enum Validator {
    /// Caller-supplied check on the answer text
    Predicate(Predicate),
    /// Regular expression searched in the answer text
    Pattern(Regex),
    /// Exact membership in a fixed list
    AllowList(Vec<String>),
    /// Exact membership in the string list stored under a context key
    AllowFrom(String),
    /// A validator that could not be understood; rejects every answer
    Unrecognized(String),
}

/// Outcome of running a validator against one answer
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Verdict {
    Accepted,
    Rejected,
    /// The validator itself cannot be evaluated
    Unusable(String),
}

impl Validator {
    pub fn predicate<F>(check: F) -> Self
    where
        F: Fn(&str, &ResultContext) -> bool + 'static,
    {
        Validator::Predicate(Box::new(check))
    }

    pub fn pattern(pattern: &str) -> Result<Self> {
        Regex::new(pattern)
            .map(Validator::Pattern)
            .map_err(|e| Error::InvalidValidatorShape(format!("pattern '{pattern}': {e}")))
    }

    pub fn allow<I, S>(items: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Validator::AllowList(items.into_iter().map(Into::into).collect())
    }

    pub fn allow_from(key: impl Into<String>) -> Self {
        Validator::AllowFrom(key.into())
    }

    pub fn check(&self, answer: &str, context: &ResultContext) -> Verdict {
        let accepted = match self {
            Validator::Predicate(check) => check(answer, context),
            Validator::Pattern(regex) => regex.is_match(answer),
            Validator::AllowList(items) => items.iter().any(|item| item == answer),
            Validator::AllowFrom(key) => match context.get_strings(key) {
                Some(items) => items.iter().any(|item| item == answer),
                None => {
                    return Verdict::Unusable(format!(
                        "context key '{key}' does not hold a list of strings"
                    ))
                }
            },
            Validator::Unrecognized(reason) => return Verdict::Unusable(reason.clone()),
        };

        if accepted {
            Verdict::Accepted
        } else {
            Verdict::Rejected
        }
    }
}

impl fmt::Debug for Validator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Validator::Predicate(_) => f.write_str("Predicate(..)"),
            Validator::Pattern(regex) => f.debug_tuple("Pattern").field(&regex.as_str()).finish(),
            Validator::AllowList(items) => f.debug_tuple("AllowList").field(items).finish(),
            Validator::AllowFrom(key) => f.debug_tuple("AllowFrom").field(key).finish(),
            Validator::Unrecognized(reason) => {
                f.debug_tuple("Unrecognized").field(reason).finish()
            }
        }
    }
}
