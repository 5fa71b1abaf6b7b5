//! Repository implementations for database access
//!
//! Each repository borrows the pool and exposes explicit, parameterized
//! queries that return concrete rows.

pub mod questions;
pub mod choices;

pub use questions::{QuestionRepo, Question, QuestionWithChoices, DbError};
pub use choices::{ChoiceRepo, Choice};
