//! Question repository
//!
//! Published-ness is a `pub_date <= $now` predicate evaluated in SQL, with
//! `now` passed in by the caller so lookups are deterministic.

use chrono::{DateTime, Duration, Utc};
use sqlx::{FromRow, PgPool};

use super::choices::Choice;
use crate::models::{NewQuestion, ValidationError};

/// Question record from database
#[derive(Debug, Clone, PartialEq, Eq, FromRow)]
pub struct Question {
    pub id: i64,
    pub question_text: String,
    pub pub_date: DateTime<Utc>,
}

impl Question {
    /// Whether the question is visible at `now`.
    pub fn is_published(&self, now: DateTime<Utc>) -> bool {
        self.pub_date <= now
    }

    /// Published within the last day, and not in the future.
    pub fn was_published_recently(&self, now: DateTime<Utc>) -> bool {
        now - Duration::days(1) <= self.pub_date && self.pub_date <= now
    }
}

/// Question together with its choices, ordered by choice id
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuestionWithChoices {
    pub question: Question,
    pub choices: Vec<Choice>,
}

/// Database error type
#[derive(Debug, thiserror::Error)]
pub enum DbError {
    #[error("database error: {0}")]
    Sqlx(#[from] sqlx::Error),

    #[error("not found: {resource} '{id}'")]
    NotFound { resource: &'static str, id: String },

    #[error("invalid input: {0}")]
    Invalid(#[from] ValidationError),

    #[error("vote counter overflow on choice {choice_id}")]
    VoteOverflow { choice_id: i64 },
}

impl DbError {
    pub(crate) fn question_not_found(id: i64) -> Self {
        Self::NotFound {
            resource: "question",
            id: id.to_string(),
        }
    }
}

/// Question repository
pub struct QuestionRepo<'a> {
    pool: &'a PgPool,
}

impl<'a> QuestionRepo<'a> {
    pub fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Most recently published questions, newest first.
    ///
    /// Ties on `pub_date` fall back to id so the order is stable.
    pub async fn recent_published(
        &self,
        now: DateTime<Utc>,
        limit: i64,
    ) -> Result<Vec<Question>, DbError> {
        let questions = sqlx::query_as::<_, Question>(
            r#"
            SELECT id, question_text, pub_date
            FROM polls_question
            WHERE pub_date <= $1
            ORDER BY pub_date DESC, id DESC
            LIMIT $2
            "#,
        )
        .bind(now)
        .bind(limit)
        .fetch_all(self.pool)
        .await?;

        Ok(questions)
    }

    /// Get a question by id, only if it is published at `now`.
    ///
    /// Unpublished and missing questions both come back as `NotFound`.
    pub async fn get_published(&self, id: i64, now: DateTime<Utc>) -> Result<Question, DbError> {
        sqlx::query_as::<_, Question>(
            r#"
            SELECT id, question_text, pub_date
            FROM polls_question
            WHERE id = $1 AND pub_date <= $2
            "#,
        )
        .bind(id)
        .bind(now)
        .fetch_optional(self.pool)
        .await?
        .ok_or_else(|| DbError::question_not_found(id))
    }

    /// Get a question by id regardless of publication date.
    pub async fn get(&self, id: i64) -> Result<Question, DbError> {
        sqlx::query_as::<_, Question>(
            "SELECT id, question_text, pub_date FROM polls_question WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(self.pool)
        .await?
        .ok_or_else(|| DbError::question_not_found(id))
    }

    /// Insert a question and its choices (atomic).
    pub async fn create_with_choices(
        &self,
        new: &NewQuestion,
    ) -> Result<QuestionWithChoices, DbError> {
        let mut tx = self.pool.begin().await?;

        let question: Question = sqlx::query_as(
            r#"
            INSERT INTO polls_question (question_text, pub_date)
            VALUES ($1, $2)
            RETURNING id, question_text, pub_date
            "#,
        )
        .bind(new.question_text.as_str())
        .bind(new.pub_date)
        .fetch_one(&mut *tx)
        .await?;

        let mut choices = Vec::with_capacity(new.choices.len());
        for text in &new.choices {
            let choice: Choice = sqlx::query_as(
                r#"
                INSERT INTO polls_choice (question_id, choice_text)
                VALUES ($1, $2)
                RETURNING id, question_id, choice_text, votes
                "#,
            )
            .bind(question.id)
            .bind(text.as_str())
            .fetch_one(&mut *tx)
            .await?;
            choices.push(choice);
        }

        tx.commit().await?;
        Ok(QuestionWithChoices { question, choices })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn question_at(pub_date: DateTime<Utc>) -> Question {
        Question {
            id: 1,
            question_text: "What's new?".into(),
            pub_date,
        }
    }

    #[test]
    fn recent_excludes_future_questions() {
        let now = Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap();
        let q = question_at(now + Duration::days(30));
        assert!(!q.was_published_recently(now));
        assert!(!q.is_published(now));
    }

    #[test]
    fn recent_excludes_old_questions() {
        let now = Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap();
        let q = question_at(now - Duration::days(1) - Duration::seconds(1));
        assert!(!q.was_published_recently(now));
        assert!(q.is_published(now));
    }

    #[test]
    fn recent_includes_last_day() {
        let now = Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap();
        let q = question_at(now - Duration::hours(23) - Duration::minutes(59));
        assert!(q.was_published_recently(now));
    }

    #[test]
    fn not_found_names_the_question() {
        let err = DbError::question_not_found(42);
        assert_eq!(err.to_string(), "not found: question '42'");
    }
}
