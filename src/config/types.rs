//! Serialized forms of questions as they appear in chain files

use crate::{
    constants::validation,
    prompt::{Kind, Question, Tries, Validator},
};
use serde::Deserialize;
use serde_json::Value;

/// Type of question to be presented to the user
#[derive(Debug, Clone, Copy, Default, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Type {
    /// String input question type
    #[default]
    #[serde(alias = "string", alias = "plain")]
    Str,
    /// Boolean (yes/no) question type
    #[serde(alias = "boolean")]
    Bool,
    /// Integer question type
    #[serde(alias = "integer")]
    Int,
    /// Text read without echo
    Password,
    /// Several of the listed choices
    #[serde(alias = "multiselect")]
    Multi,
}

/// How a validator is written in a chain file
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum ValidatorConfig {
    Pattern { pattern: String },
    Allow { allow: Vec<String> },
    AllowFrom { allow_from: String },
    /// Anything else; loaded as a validator that rejects every answer
    Unknown(Value),
}

/// Retry budget as written in a chain file: a count or `unlimited`
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum TriesConfig {
    Count(u32),
    Keyword(String),
}

#[derive(Debug, Clone, Deserialize)]
pub struct QuestionConfig {
    /// Prompt text; the key is shown when absent
    #[serde(default)]
    pub question: Option<String>,
    #[serde(default)]
    pub key: Option<String>,
    #[serde(default, rename = "type")]
    pub r#type: Type,
    #[serde(default)]
    pub default: Value,
    #[serde(default)]
    pub required: bool,
    /// Available choices for multi questions
    #[serde(default)]
    pub choices: Vec<String>,
    #[serde(default)]
    pub validate: Option<ValidatorConfig>,
    #[serde(default)]
    pub tries: Option<TriesConfig>,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub suffix: Option<String>,
}

impl ValidatorConfig {
    pub fn into_validator(self) -> Validator {
        match self {
            ValidatorConfig::Pattern { pattern } => Validator::pattern(&pattern)
                .unwrap_or_else(|e| {
                    log::warn!("{e}; every answer will be rejected");
                    Validator::Unrecognized(e.to_string())
                }),
            ValidatorConfig::Allow { allow } => Validator::AllowList(allow),
            ValidatorConfig::AllowFrom { allow_from } => Validator::AllowFrom(allow_from),
            ValidatorConfig::Unknown(value) => {
                let reason = format!("unrecognized validator {value}");
                log::warn!("{reason}; every answer will be rejected");
                Validator::Unrecognized(reason)
            }
        }
    }
}

impl TriesConfig {
    pub fn to_tries(&self) -> Option<Tries> {
        match self {
            TriesConfig::Count(count) => Some(Tries::Limited(*count)),
            TriesConfig::Keyword(word) if word == validation::UNLIMITED_TRIES => {
                Some(Tries::Unlimited)
            }
            TriesConfig::Keyword(_) => None,
        }
    }
}

impl QuestionConfig {
    /// Label used in error messages.
    pub fn label(&self) -> &str {
        self.question.as_deref().or(self.key.as_deref()).unwrap_or("<unnamed>")
    }

    fn kind(&self) -> Kind {
        match self.r#type {
            Type::Str => Kind::Plain,
            Type::Bool => Kind::Boolean,
            Type::Int => Kind::Integer,
            Type::Password => Kind::Password,
            Type::Multi => Kind::MultiChoice(self.choices.clone()),
        }
    }

    /// Default answer text as it would be typed by the user.
    fn default_text(&self) -> Option<String> {
        match &self.default {
            Value::Null => None,
            Value::String(s) => Some(s.clone()),
            Value::Bool(true) => Some("Y".to_string()),
            Value::Bool(false) => Some("N".to_string()),
            Value::Array(items) => Some(
                items
                    .iter()
                    .map(|v| v.as_str().map_or_else(|| v.to_string(), str::to_string))
                    .collect::<Vec<_>>()
                    .join(", "),
            ),
            other => Some(other.to_string()),
        }
    }

    pub fn into_question(self) -> Question {
        let mut question = match (&self.question, &self.key) {
            (Some(text), _) => Question::new(text.as_str()),
            (None, Some(key)) => Question::keyed(key.as_str()),
            (None, None) => <Question as Default>::default(),
        };

        question = question.kind(self.kind()).required(self.required);
        if let Some(key) = &self.key {
            question = question.key(key.as_str());
        }
        if let Some(default) = self.default_text() {
            question = question.default(default);
        }
        if let Some(tries) = self.tries.as_ref().and_then(TriesConfig::to_tries) {
            question = question.retry_budget(tries);
        }
        if let Some(message) = self.message {
            question = question.message(message);
        }
        if let Some(suffix) = self.suffix {
            question = question.suffix(suffix);
        }
        if let Some(validate) = self.validate {
            question = question.validate(validate.into_validator());
        }
        question
    }
}
