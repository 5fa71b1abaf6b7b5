//! PollStore port - storage capabilities consumed by the poll operations
//!
//! # Implementations
//! - **PgStore**: PostgreSQL via the sqlx repositories
//! - **MemoryStore**: in-process maps, for tests and `--in-memory` runs

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::db::{Choice, DbError, Question, QuestionWithChoices};
use crate::models::NewQuestion;

pub mod memory;
pub mod postgres;

pub use memory::MemoryStore;
pub use postgres::PgStore;

/// Storage operations for questions and choices.
///
/// Lookups that miss return `DbError::NotFound`. The store owns atomicity of
/// `record_vote`: the choice lookup and the increment are one operation.
#[async_trait]
pub trait PollStore: Send + Sync {
    /// Questions with `pub_date <= now`, newest first, at most `limit`.
    async fn recent_published(
        &self,
        now: DateTime<Utc>,
        limit: i64,
    ) -> Result<Vec<Question>, DbError>;

    /// A question that exists and is published at `now`.
    async fn published_question(&self, id: i64, now: DateTime<Utc>)
        -> Result<Question, DbError>;

    /// A question by id, published or not.
    async fn question(&self, id: i64) -> Result<Question, DbError>;

    /// Choices of a question, ordered by id.
    async fn choices(&self, question_id: i64) -> Result<Vec<Choice>, DbError>;

    /// Increment the votes of `choice_id` if it belongs to `question_id`.
    ///
    /// `Ok(None)` means no such choice on that question and no write happened.
    async fn record_vote(
        &self,
        question_id: i64,
        choice_id: i64,
    ) -> Result<Option<Choice>, DbError>;

    /// Insert a question with its choices.
    async fn create_question(&self, new: NewQuestion) -> Result<QuestionWithChoices, DbError>;
}
