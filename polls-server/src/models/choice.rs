//! Choice text validation

use super::validation::bounded_text;
use super::ValidationError;

/// Maximum length for choice text
pub const MAX_CHOICE_TEXT_LEN: usize = 200;

/// Validated choice text
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChoiceText(String);

impl ChoiceText {
    pub fn new(s: &str) -> Result<Self, ValidationError> {
        bounded_text("choice text", s, MAX_CHOICE_TEXT_LEN).map(Self)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for ChoiceText {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
