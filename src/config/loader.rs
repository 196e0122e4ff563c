//! Chain file loading and validation

use crate::config::types::{QuestionConfig, Type};
use crate::constants::{JSON_EXTENSION, YAML_EXTENSIONS};
use crate::error::{Error, Result};
use crate::prompt::{Prompt, Question, ResultContext, Terminal};
use serde::Deserialize;
use serde_json::{Map, Value};
use std::path::Path;

/// Format of a chain file's content
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    Json,
    Yaml,
}

impl Format {
    /// Guesses the format from a file extension.
    pub fn from_path(path: &Path) -> Option<Self> {
        let extension = path.extension()?.to_str()?.to_ascii_lowercase();
        if extension == JSON_EXTENSION {
            Some(Format::Json)
        } else if YAML_EXTENSIONS.contains(&extension.as_str()) {
            Some(Format::Yaml)
        } else {
            None
        }
    }
}

/// A question chain described in a file
#[derive(Debug, Deserialize)]
pub struct ChainFile {
    /// Values the context starts with
    #[serde(default)]
    pub context: Map<String, Value>,
    #[serde(default)]
    pub questions: Vec<QuestionConfig>,
}

impl ChainFile {
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        log::debug!("Loading chain file {}", path.display());
        let content = std::fs::read_to_string(path)?;

        let chain = match Format::from_path(path) {
            Some(format) => Self::parse(&content, format)?,
            None => Self::parse(&content, Format::Json)
                .or_else(|_| Self::parse(&content, Format::Yaml))?,
        };
        chain.validate(&path.display().to_string())?;
        Ok(chain)
    }

    pub fn parse(content: &str, format: Format) -> Result<Self> {
        let chain = match format {
            Format::Json => serde_json::from_str(content)?,
            Format::Yaml => serde_yaml::from_str(content)?,
        };
        Ok(chain)
    }

    /// Checks what serde cannot: every question has something to show,
    /// multi questions have choices and retry keywords are known.
    pub fn validate(&self, source: &str) -> Result<()> {
        let fail = |reason: String| Error::ConfigError { path: source.to_string(), reason };

        if self.questions.is_empty() {
            return Err(fail("no questions defined".into()));
        }

        for (index, question) in self.questions.iter().enumerate() {
            let position = index + 1;
            if question.question.is_none() && question.key.is_none() {
                return Err(fail(format!("question #{position} has neither text nor key")));
            }
            if question.r#type == Type::Multi && question.choices.is_empty() {
                return Err(fail(format!(
                    "question '{}' is a multi question without choices",
                    question.label()
                )));
            }
            if question.r#type != Type::Multi && !question.choices.is_empty() {
                log::warn!(
                    "Question '{}' lists choices but is not a multi question; ignoring them",
                    question.label()
                );
            }
            if let Some(tries) = &question.tries {
                if tries.to_tries().is_none() {
                    return Err(fail(format!(
                        "question '{}' has an unknown retry budget {tries:?}",
                        question.label()
                    )));
                }
            }
        }
        Ok(())
    }

    /// Splits the file into the starting context and the questions to ask.
    pub fn into_parts(self) -> (ResultContext, Vec<Question>) {
        let context = ResultContext::from(self.context);
        let questions = self.questions.into_iter().map(QuestionConfig::into_question).collect();
        (context, questions)
    }

    /// Builds a chain with every question of the file queued.
    pub fn into_prompt<T: Terminal>(self, terminal: T) -> Result<Prompt<T>> {
        let (context, questions) = self.into_parts();
        let mut prompt = Prompt::new(terminal).with_context(context);
        for question in questions {
            prompt.ask(question)?;
        }
        Ok(prompt)
    }
}
