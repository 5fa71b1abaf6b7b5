//! Choice repository
//!
//! Vote counting happens entirely inside a single UPDATE so concurrent
//! votes on the same row never lose an increment.

use sqlx::{FromRow, PgPool};

use super::DbError;

/// Choice record from database
#[derive(Debug, Clone, PartialEq, Eq, FromRow)]
pub struct Choice {
    pub id: i64,
    pub question_id: i64,
    pub choice_text: String,
    pub votes: i32,
}

/// Choice repository
pub struct ChoiceRepo<'a> {
    pool: &'a PgPool,
}

impl<'a> ChoiceRepo<'a> {
    pub fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// All choices of a question, ordered by id.
    pub async fn list_for_question(&self, question_id: i64) -> Result<Vec<Choice>, DbError> {
        let choices = sqlx::query_as::<_, Choice>(
            r#"
            SELECT id, question_id, choice_text, votes
            FROM polls_choice
            WHERE question_id = $1
            ORDER BY id ASC
            "#,
        )
        .bind(question_id)
        .fetch_all(self.pool)
        .await?;

        Ok(choices)
    }

    /// Add one vote to `choice_id`, scoped to `question_id`.
    ///
    /// Returns `None` when the choice does not exist or belongs to a
    /// different question; nothing is written in that case.
    pub async fn increment_votes(
        &self,
        question_id: i64,
        choice_id: i64,
    ) -> Result<Option<Choice>, DbError> {
        let choice = sqlx::query_as::<_, Choice>(
            r#"
            UPDATE polls_choice
            SET votes = votes + 1
            WHERE id = $1 AND question_id = $2
            RETURNING id, question_id, choice_text, votes
            "#,
        )
        .bind(choice_id)
        .bind(question_id)
        .fetch_optional(self.pool)
        .await?;

        Ok(choice)
    }
}
