//! PollStore backed by PostgreSQL

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;

use super::PollStore;
use crate::db::{Choice, ChoiceRepo, DbError, Question, QuestionRepo, QuestionWithChoices};
use crate::models::NewQuestion;

/// Store that delegates to the sqlx repositories
#[derive(Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

#[async_trait]
impl PollStore for PgStore {
    async fn recent_published(
        &self,
        now: DateTime<Utc>,
        limit: i64,
    ) -> Result<Vec<Question>, DbError> {
        QuestionRepo::new(&self.pool).recent_published(now, limit).await
    }

    async fn published_question(
        &self,
        id: i64,
        now: DateTime<Utc>,
    ) -> Result<Question, DbError> {
        QuestionRepo::new(&self.pool).get_published(id, now).await
    }

    async fn question(&self, id: i64) -> Result<Question, DbError> {
        QuestionRepo::new(&self.pool).get(id).await
    }

    async fn choices(&self, question_id: i64) -> Result<Vec<Choice>, DbError> {
        ChoiceRepo::new(&self.pool).list_for_question(question_id).await
    }

    async fn record_vote(
        &self,
        question_id: i64,
        choice_id: i64,
    ) -> Result<Option<Choice>, DbError> {
        ChoiceRepo::new(&self.pool)
            .increment_votes(question_id, choice_id)
            .await
    }

    async fn create_question(&self, new: NewQuestion) -> Result<QuestionWithChoices, DbError> {
        QuestionRepo::new(&self.pool).create_with_choices(&new).await
    }
}
