//! Validated adjuster question

use std::fmt;

use crate::error::AssistantError;

/// Longest question forwarded to the assistant, in characters
pub const MAX_QUESTION_CHARS: usize = 2000;

/// A trimmed, non-empty question of bounded length
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Question(String);

impl Question {
    /// # Errors
    ///
    /// `AssistantError::InvalidQuestion` when the text is blank or longer than
    /// [`MAX_QUESTION_CHARS`]
    pub fn parse(raw: impl AsRef<str>) -> Result<Self, AssistantError> {
        let text = raw.as_ref().trim();
        if text.is_empty() {
            return Err(AssistantError::InvalidQuestion(
                "question must not be empty".to_string(),
            ));
        }

        let chars = text.chars().count();
        if chars > MAX_QUESTION_CHARS {
            return Err(AssistantError::InvalidQuestion(format!(
                "question is {} characters, the limit is {}",
                chars, MAX_QUESTION_CHARS
            )));
        }

        Ok(Self(text.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Question {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for Question {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
