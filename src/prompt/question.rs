//! Question descriptors and their builder

use super::{
    chain::Scope,
    kind::Kind,
    validator::{Validator, Verdict},
    ResultContext,
};
use crate::{
    constants::validation::INVALID_INPUT,
    error::{Error, Result},
};
use serde_json::Value;
use std::fmt;

/// Runs on the coerced answer before it is stored; its return value is what gets stored.
pub type BeforeHook = Box<dyn Fn(Value, &mut Scope<'_, '_>) -> Result<Value>>;

/// Runs once the answer is stored.
pub type AfterHook = Box<dyn Fn(&Value, &mut Scope<'_, '_>) -> Result<()>>;

/// Prompt text, either fixed or computed from the answers given so far
pub enum Text {
    Static(String),
    Dynamic(Box<dyn Fn(&ResultContext) -> String>),
}

impl From<&str> for Text {
    fn from(text: &str) -> Self {
        Text::Static(text.to_string())
    }
}

impl From<String> for Text {
    fn from(text: String) -> Self {
        Text::Static(text)
    }
}

impl fmt::Debug for Text {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Text::Static(text) => f.debug_tuple("Static").field(text).finish(),
            Text::Dynamic(_) => f.write_str("Dynamic(..)"),
        }
    }
}

/// How many times a question is re-asked after a rejected answer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tries {
    Limited(u32),
    Unlimited,
}

impl Default for Tries {
    fn default() -> Self {
        Tries::Limited(0)
    }
}

impl Tries {
    /// Spends one retry. Returns false when none is left.
    pub fn take(&mut self) -> bool {
        match self {
            Tries::Unlimited => true,
            Tries::Limited(0) => false,
            Tries::Limited(left) => {
                *left -= 1;
                true
            }
        }
    }
}

/// Why an answer was not accepted
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Rejection {
    Invalid,
    Required,
    Unusable(String),
}

impl Rejection {
    /// Warning shown before the question is asked again.
    pub(crate) fn warning(&self, message: &str) -> String {
        match self {
            Rejection::Unusable(reason) => format!("{message}: {reason}"),
            _ => message.to_string(),
        }
    }

    pub(crate) fn into_error(self, message: String) -> Error {
        match self {
            Rejection::Invalid => Error::ValidationFailed(message),
            Rejection::Required => Error::RequiredMissing(message),
            Rejection::Unusable(reason) => Error::InvalidValidatorShape(reason),
        }
    }
}

/// A single question submitted to a chain
///
/// ```
/// use askchain::prompt::{Question, Validator};
///
/// let question = Question::new("Env:")
///     .key("env")
///     .validate(Validator::allow(["dev", "prod"]))
///     .tries(2);
/// assert_eq!(question.storage_key(), Some("env"));
/// ```
#[derive(Default)]
pub struct Question {
    text: Option<Text>,
    key: Option<String>,
    default: Option<String>,
    required: bool,
    kind: Kind,
    validator: Option<Validator>,
    tries: Tries,
    message: Option<String>,
    suffix: Option<String>,
    before: Option<BeforeHook>,
    after: Option<AfterHook>,
    if_true: Option<AfterHook>,
    if_false: Option<AfterHook>,
}

impl Question {
    pub fn new(text: impl Into<Text>) -> Self {
        Self { text: Some(text.into()), ..Default::default() }
    }

    /// A question whose prompt is the storage key itself.
    pub fn keyed(key: impl Into<String>) -> Self {
        Self { key: Some(key.into()), ..Default::default() }
    }

    /// A question whose text is computed right before it is shown.
    pub fn dynamic<F>(text: F) -> Self
    where
        F: Fn(&ResultContext) -> String + 'static,
    {
        Self::new(Text::Dynamic(Box::new(text)))
    }

    pub fn key(mut self, key: impl Into<String>) -> Self {
        self.key = Some(key.into());
        self
    }

    pub fn default(mut self, default: impl Into<String>) -> Self {
        self.default = Some(default.into());
        self
    }

    pub fn required(mut self, required: bool) -> Self {
        self.required = required;
        self
    }

    pub fn kind(mut self, kind: Kind) -> Self {
        self.kind = kind;
        self
    }

    pub fn boolean(self) -> Self {
        self.kind(Kind::Boolean)
    }

    pub fn integer(self) -> Self {
        self.kind(Kind::Integer)
    }

    pub fn password(self) -> Self {
        self.kind(Kind::Password)
    }

    pub fn multi_choice<I, S>(self, choices: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.kind(Kind::MultiChoice(choices.into_iter().map(Into::into).collect()))
    }

    pub fn validate(mut self, validator: Validator) -> Self {
        self.validator = Some(validator);
        self
    }

    pub fn validate_with<F>(self, check: F) -> Self
    where
        F: Fn(&str, &ResultContext) -> bool + 'static,
    {
        self.validate(Validator::predicate(check))
    }

    pub fn tries(mut self, tries: u32) -> Self {
        self.tries = Tries::Limited(tries);
        self
    }

    pub fn unlimited_tries(mut self) -> Self {
        self.tries = Tries::Unlimited;
        self
    }

    pub fn retry_budget(mut self, tries: Tries) -> Self {
        self.tries = tries;
        self
    }

    /// Message shown when an answer is rejected.
    pub fn message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }

    pub fn suffix(mut self, suffix: impl Into<String>) -> Self {
        self.suffix = Some(suffix.into());
        self
    }

    pub fn before<F>(mut self, hook: F) -> Self
    where
        F: Fn(Value, &mut Scope<'_, '_>) -> Result<Value> + 'static,
    {
        self.before = Some(Box::new(hook));
        self
    }

    pub fn after<F>(mut self, hook: F) -> Self
    where
        F: Fn(&Value, &mut Scope<'_, '_>) -> Result<()> + 'static,
    {
        self.after = Some(Box::new(hook));
        self
    }

    /// Replaces `after` when a boolean answer is true.
    pub fn if_true<F>(mut self, hook: F) -> Self
    where
        F: Fn(&Value, &mut Scope<'_, '_>) -> Result<()> + 'static,
    {
        self.if_true = Some(Box::new(hook));
        self
    }

    /// Replaces `after` when a boolean answer is false.
    pub fn if_false<F>(mut self, hook: F) -> Self
    where
        F: Fn(&Value, &mut Scope<'_, '_>) -> Result<()> + 'static,
    {
        self.if_false = Some(Box::new(hook));
        self
    }

    pub fn storage_key(&self) -> Option<&str> {
        self.key.as_deref()
    }

    pub fn value_kind(&self) -> &Kind {
        &self.kind
    }

    pub fn default_value(&self) -> Option<&str> {
        self.default.as_deref()
    }

    pub fn tries_left(&self) -> Tries {
        self.tries
    }

    pub fn is_required(&self) -> bool {
        self.required
    }

    pub(crate) fn has_prompt(&self) -> bool {
        self.text.is_some() || self.key.is_some()
    }

    pub(crate) fn suffix_or<'a>(&'a self, fallback: &'a str) -> &'a str {
        self.suffix.as_deref().unwrap_or(fallback)
    }

    pub(crate) fn failure_message(&self) -> String {
        self.message.clone().unwrap_or_else(|| INVALID_INPUT.to_string())
    }

    /// Prompt text for display, falling back to the storage key.
    pub(crate) fn prompt_text(&self, context: &ResultContext) -> Result<String> {
        match (&self.text, &self.key) {
            (Some(Text::Static(text)), _) => Ok(text.clone()),
            (Some(Text::Dynamic(text)), _) => Ok(text(context)),
            (None, Some(key)) => Ok(key.clone()),
            (None, None) => Err(Error::NoQuestionGiven),
        }
    }

    /// Turns one line of input into the value to store, or says why it
    /// cannot be accepted.
    pub(crate) fn evaluate(
        &self,
        line: &str,
        context: &ResultContext,
    ) -> Result<Value, Rejection> {
        let text = match (line.is_empty(), &self.default) {
            (true, Some(default)) => default.as_str(),
            _ => line,
        };

        if text.is_empty() && self.required {
            return Err(Rejection::Required);
        }

        if let Some(validator) = &self.validator {
            match validator.check(text, context) {
                Verdict::Accepted => {}
                Verdict::Rejected => return Err(Rejection::Invalid),
                Verdict::Unusable(reason) => return Err(Rejection::Unusable(reason)),
            }
        }

        self.kind.coerce(text).ok_or(Rejection::Invalid)
    }

    /// The hook to run after storing `value`.
    pub(crate) fn after_hook(&self, value: &Value) -> Option<&AfterHook> {
        let branch = match (&self.kind, value.as_bool()) {
            (Kind::Boolean, Some(true)) => self.if_true.as_ref(),
            (Kind::Boolean, Some(false)) => self.if_false.as_ref(),
            _ => None,
        };
        branch.or(self.after.as_ref())
    }

    pub(crate) fn before_hook(&self) -> Option<&BeforeHook> {
        self.before.as_ref()
    }
}

impl fmt::Debug for Question {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Question")
            .field("text", &self.text)
            .field("key", &self.key)
            .field("default", &self.default)
            .field("required", &self.required)
            .field("kind", &self.kind)
            .field("validator", &self.validator)
            .field("tries", &self.tries)
            .field("message", &self.message)
            .finish_non_exhaustive()
    }
}
