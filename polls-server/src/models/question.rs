//! Question text validation

use chrono::{DateTime, Utc};

use super::validation::bounded_text;
use super::{ChoiceText, ValidationError};

/// Maximum length for question text
pub const MAX_QUESTION_TEXT_LEN: usize = 200;

/// Validated question text
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuestionText(String);

impl QuestionText {
    /// Create new question text.
    ///
    /// # Rules
    /// - Non-empty (after trimming whitespace)
    /// - Max 200 characters
    ///
    /// # Example
    /// ```
    /// use polls_server::models::QuestionText;
    ///
    /// assert!(QuestionText::new("What's new?").is_ok());
    /// assert!(QuestionText::new("   ").is_err());
    /// ```
    pub fn new(s: &str) -> Result<Self, ValidationError> {
        bounded_text("question text", s, MAX_QUESTION_TEXT_LEN).map(Self)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl AsRef<str> for QuestionText {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// A question ready to be inserted together with its choices
#[derive(Debug, Clone)]
pub struct NewQuestion {
    pub question_text: QuestionText,
    pub pub_date: DateTime<Utc>,
    pub choices: Vec<ChoiceText>,
}

impl NewQuestion {
    /// Validate raw text and choices into an insertable question.
    ///
    /// At least one choice is required so the question can be voted on.
    pub fn new<S: AsRef<str>>(
        question_text: &str,
        pub_date: DateTime<Utc>,
        choices: &[S],
    ) -> Result<Self, ValidationError> {
        let question_text = QuestionText::new(question_text)?;

        if choices.is_empty() {
            return Err(ValidationError::TooFewChoices { min: 1 });
        }

        let choices = choices
            .iter()
            .map(|c| ChoiceText::new(c.as_ref()))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self {
            question_text,
            pub_date,
            choices,
        })
    }
}
