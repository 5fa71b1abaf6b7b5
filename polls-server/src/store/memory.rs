//! MemoryStore - in-process PollStore
//!
//! Rows live in ordered maps behind one async mutex, so every operation,
//! including the vote increment, is atomic with respect to the others.

use std::collections::BTreeMap;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::Mutex;

use super::PollStore;
use crate::db::{Choice, DbError, Question, QuestionWithChoices};
use crate::models::NewQuestion;

#[derive(Default)]
struct Tables {
    questions: BTreeMap<i64, Question>,
    choices: BTreeMap<i64, Choice>,
    last_question_id: i64,
    last_choice_id: i64,
}

/// In-memory store; ids start at 1 like a fresh BIGSERIAL
#[derive(Default)]
pub struct MemoryStore {
    tables: Mutex<Tables>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl PollStore for MemoryStore {
    async fn recent_published(
        &self,
        now: DateTime<Utc>,
        limit: i64,
    ) -> Result<Vec<Question>, DbError> {
        let tables = self.tables.lock().await;

        let mut published: Vec<Question> = tables
            .questions
            .values()
            .filter(|q| q.is_published(now))
            .cloned()
            .collect();
        published.sort_by(|a, b| b.pub_date.cmp(&a.pub_date).then(b.id.cmp(&a.id)));
        published.truncate(usize::try_from(limit).unwrap_or(0));

        Ok(published)
    }

    async fn published_question(
        &self,
        id: i64,
        now: DateTime<Utc>,
    ) -> Result<Question, DbError> {
        let tables = self.tables.lock().await;
        tables
            .questions
            .get(&id)
            .filter(|q| q.is_published(now))
            .cloned()
            .ok_or_else(|| DbError::question_not_found(id))
    }

    async fn question(&self, id: i64) -> Result<Question, DbError> {
        let tables = self.tables.lock().await;
        tables
            .questions
            .get(&id)
            .cloned()
            .ok_or_else(|| DbError::question_not_found(id))
    }

    async fn choices(&self, question_id: i64) -> Result<Vec<Choice>, DbError> {
        let tables = self.tables.lock().await;
        Ok(tables
            .choices
            .values()
            .filter(|c| c.question_id == question_id)
            .cloned()
            .collect())
    }

    async fn record_vote(
        &self,
        question_id: i64,
        choice_id: i64,
    ) -> Result<Option<Choice>, DbError> {
        let mut tables = self.tables.lock().await;
        let Some(choice) = tables
            .choices
            .get_mut(&choice_id)
            .filter(|c| c.question_id == question_id)
        else {
            return Ok(None);
        };

        // Same failure as the INTEGER column; the count is left untouched
        choice.votes = choice
            .votes
            .checked_add(1)
            .ok_or(DbError::VoteOverflow { choice_id })?;

        Ok(Some(choice.clone()))
    }

    async fn create_question(&self, new: NewQuestion) -> Result<QuestionWithChoices, DbError> {
        let mut tables = self.tables.lock().await;

        tables.last_question_id += 1;
        let question = Question {
            id: tables.last_question_id,
            question_text: new.question_text.into_string(),
            pub_date: new.pub_date,
        };
        tables.questions.insert(question.id, question.clone());

        let mut choices = Vec::with_capacity(new.choices.len());
        for text in new.choices {
            tables.last_choice_id += 1;
            let choice = Choice {
                id: tables.last_choice_id,
                question_id: question.id,
                choice_text: text.as_str().to_owned(),
                votes: 0,
            };
            tables.choices.insert(choice.id, choice.clone());
            choices.push(choice);
        }

        Ok(QuestionWithChoices { question, choices })
    }
}
