//! Domain models with validation at construction
//!
//! All user input is validated when creating these types.
//! Invalid input returns ValidationError, not panic.

pub mod validation;
pub mod question;
pub mod choice;

pub use validation::ValidationError;
pub use question::{NewQuestion, QuestionText};
pub use choice::ChoiceText;
