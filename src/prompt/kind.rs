//! Value kinds and the coercion from answer text to stored value

use serde_json::Value;

/// Semantic type of an answer, governing coercion and display
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Kind {
    /// Stored as typed
    #[default]
    Plain,
    /// `y`/`yes` (any case) is true, anything else false
    Boolean,
    /// Truncated integer, non-numeric text is rejected
    Integer,
    /// Plain text read with echo turned off
    Password,
    /// Comma-separated subset of the listed choices
    MultiChoice(Vec<String>),
}

impl Kind {
    /// Whether typed characters must not be echoed.
    pub fn is_secret(&self) -> bool {
        matches!(self, Kind::Password)
    }

    /// Whether the default value may be shown next to the prompt.
    pub fn shows_default(&self) -> bool {
        !self.is_secret()
    }

    pub fn choices(&self) -> &[String] {
        match self {
            Kind::MultiChoice(choices) => choices,
            _ => &[],
        }
    }

    /// Converts answer text (after default substitution) into the stored value.
    ///
    /// Returns `None` when the text cannot be represented in this kind.
    pub fn coerce(&self, text: &str) -> Option<Value> {
        match self {
            Kind::Plain | Kind::Password => {
                if text.is_empty() {
                    Some(Value::Null)
                } else {
                    Some(Value::String(text.to_string()))
                }
            }
            Kind::Boolean => Some(Value::Bool(is_affirmative(text))),
            Kind::Integer => {
                let trimmed = text.trim();
                if trimmed.is_empty() {
                    return Some(Value::Null);
                }
                parse_truncated(trimmed).map(Value::from)
            }
            Kind::MultiChoice(choices) => {
                select_choices(choices, text).map(|selected| {
                    Value::Array(selected.into_iter().map(Value::String).collect())
                })
            }
        }
    }
}

fn is_affirmative(text: &str) -> bool {
    let text = text.trim();
    text.eq_ignore_ascii_case("y") || text.eq_ignore_ascii_case("yes")
}

/// 2^63, the first value past `i64::MAX` that an `f64` can hold exactly
const I64_BOUND: f64 = 9_223_372_036_854_775_808.0;

fn parse_truncated(text: &str) -> Option<i64> {
    if let Ok(number) = text.parse::<i64>() {
        return Some(number);
    }
    // Whole numbers that missed i64 overflowed; only fractions and exponents go through f64
    if !text.contains(['.', 'e', 'E']) {
        return None;
    }
    let truncated = text.parse::<f64>().ok()?.trunc();
    if !truncated.is_finite() || truncated < -I64_BOUND || truncated >= I64_BOUND {
        return None;
    }
    Some(truncated as i64)
}

/// Each comma-separated item is either a choice label or its 1-based index.
fn select_choices(choices: &[String], text: &str) -> Option<Vec<String>> {
    let mut selected: Vec<String> = Vec::new();
    for item in text.split(',').map(str::trim).filter(|item| !item.is_empty()) {
        let choice = match choices.iter().find(|choice| choice.as_str() == item) {
            Some(choice) => choice,
            None => {
                let index = item.parse::<usize>().ok()?;
                choices.get(index.checked_sub(1)?)?
            }
        };
        if !selected.contains(choice) {
            selected.push(choice.clone());
        }
    }
    Some(selected)
}
