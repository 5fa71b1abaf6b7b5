//! Poll operations - the read views and the vote
//!
//! Handlers stay thin: they pass the store and the current time in here and
//! translate the result into a response.

use chrono::{DateTime, Utc};

use crate::db::{Choice, DbError, Question, QuestionWithChoices};
use crate::models::NewQuestion;
use crate::store::PollStore;

/// How many questions the index shows
pub const LATEST_QUESTIONS_LIMIT: i64 = 5;

/// Message shown when a vote names no valid choice
pub const NO_CHOICE_MESSAGE: &str = "You didn't select a choice.";

/// Result of a vote that reached a known question
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VoteOutcome {
    /// The counter was incremented
    Recorded { question_id: i64, choice: Choice },

    /// Choice missing or not part of this question; nothing was written
    InvalidChoice {
        detail: QuestionWithChoices,
        message: &'static str,
    },
}

/// The most recent published questions, newest first.
pub async fn latest_questions(
    store: &dyn PollStore,
    now: DateTime<Utc>,
) -> Result<Vec<Question>, DbError> {
    store.recent_published(now, LATEST_QUESTIONS_LIMIT).await
}

/// A published question with its choices.
///
/// Missing and not-yet-published questions both fail with `NotFound`.
pub async fn published_question(
    store: &dyn PollStore,
    id: i64,
    now: DateTime<Utc>,
) -> Result<QuestionWithChoices, DbError> {
    let question = store.published_question(id, now).await?;
    let choices = store.choices(question.id).await?;
    Ok(QuestionWithChoices { question, choices })
}

/// Record one vote for `choice` on question `question_id`.
///
/// `choice` is the raw form value. An unknown question is `NotFound`; an
/// absent, malformed or foreign choice is `VoteOutcome::InvalidChoice`.
pub async fn vote(
    store: &dyn PollStore,
    question_id: i64,
    choice: Option<&str>,
    now: DateTime<Utc>,
) -> Result<VoteOutcome, DbError> {
    // Votes resolve the question without the publication filter
    let question = store.question(question_id).await?;
    if !question.is_published(now) {
        tracing::warn!(question_id, pub_date = %question.pub_date, "vote on unpublished question");
    }

    let recorded = match parse_choice_id(choice) {
        Some(choice_id) => store.record_vote(question.id, choice_id).await?,
        None => None,
    };

    match recorded {
        Some(choice) => {
            tracing::info!(question_id, choice_id = choice.id, votes = choice.votes, "vote recorded");
            Ok(VoteOutcome::Recorded {
                question_id: question.id,
                choice,
            })
        }
        None => {
            tracing::debug!(question_id, ?choice, "vote without a valid choice");
            let choices = store.choices(question.id).await?;
            Ok(VoteOutcome::InvalidChoice {
                detail: QuestionWithChoices { question, choices },
                message: NO_CHOICE_MESSAGE,
            })
        }
    }
}

/// Path of the results page for a question
pub fn results_path(question_id: i64) -> String {
    format!("/questions/{}/results/", question_id)
}

/// Insert the sample question used by `seed` and demo servers.
pub async fn seed_sample(
    store: &dyn PollStore,
    now: DateTime<Utc>,
) -> Result<QuestionWithChoices, DbError> {
    let new = NewQuestion::new("What's new?", now, &["Not much", "The sky"])?;
    store.create_question(new).await
}

fn parse_choice_id(raw: Option<&str>) -> Option<i64> {
    raw.map(str::trim)
        .filter(|s| !s.is_empty())
        .and_then(|s| s.parse().ok())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;
    use chrono::{Duration, TimeZone};

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, 14, 15, 9, 26).unwrap()
    }

    async fn create(
        store: &MemoryStore,
        text: &str,
        pub_date: DateTime<Utc>,
        choices: &[&str],
    ) -> QuestionWithChoices {
        let new = NewQuestion::new(text, pub_date, choices).unwrap();
        store.create_question(new).await.unwrap()
    }

    #[test]
    fn parse_choice_id_handles_junk() {
        assert_eq!(parse_choice_id(None), None);
        assert_eq!(parse_choice_id(Some("")), None);
        assert_eq!(parse_choice_id(Some("  ")), None);
        assert_eq!(parse_choice_id(Some("abc")), None);
        assert_eq!(parse_choice_id(Some(" 7 ")), Some(7));
    }

    #[test]
    fn results_path_encodes_question_id() {
        assert_eq!(results_path(3), "/questions/3/results/");
    }

    #[tokio::test]
    async fn latest_questions_empty_store() {
        let store = MemoryStore::new();
        let questions = latest_questions(&store, now()).await.unwrap();
        assert!(questions.is_empty());
    }

    #[tokio::test]
    async fn latest_questions_caps_at_five() {
        let store = MemoryStore::new();
        for i in 0..8 {
            create(&store, &format!("q{i}"), now() - Duration::minutes(i), &["x"]).await;
        }

        let questions = latest_questions(&store, now()).await.unwrap();
        assert_eq!(questions.len(), 5);
        assert!(questions.windows(2).all(|w| w[0].pub_date >= w[1].pub_date));
    }

    #[tokio::test]
    async fn published_question_hides_future() {
        let store = MemoryStore::new();
        let q = create(&store, "soon", now() + Duration::seconds(1), &["x"]).await;

        let err = published_question(&store, q.question.id, now())
            .await
            .unwrap_err();
        assert!(matches!(err, DbError::NotFound { .. }));

        // Same error shape as a question that never existed
        let missing = published_question(&store, 999, now()).await.unwrap_err();
        assert!(matches!(missing, DbError::NotFound { resource: "question", .. }));
        assert!(matches!(err, DbError::NotFound { resource: "question", .. }));
    }

    #[tokio::test]
    async fn vote_increments_only_selected_choice() {
        let store = MemoryStore::new();
        let q = create(&store, "pick", now(), &["A", "B"]).await;
        let (a, b) = (&q.choices[0], &q.choices[1]);

        let outcome = vote(&store, q.question.id, Some(&a.id.to_string()), now())
            .await
            .unwrap();
        assert!(matches!(outcome, VoteOutcome::Recorded { question_id, ref choice }
            if question_id == q.question.id && choice.votes == 1));

        let choices = store.choices(q.question.id).await.unwrap();
        assert_eq!(choices[0].votes, 1);
        assert_eq!(choices[1].id, b.id);
        assert_eq!(choices[1].votes, 0);
    }

    #[tokio::test]
    async fn vote_without_choice_is_invalid() {
        let store = MemoryStore::new();
        let q = create(&store, "pick", now(), &["A"]).await;

        let outcome = vote(&store, q.question.id, None, now()).await.unwrap();
        match outcome {
            VoteOutcome::InvalidChoice { detail, message } => {
                assert_eq!(message, NO_CHOICE_MESSAGE);
                assert_eq!(detail.question, q.question);
                assert_eq!(detail.choices[0].votes, 0);
            }
            other => panic!("expected InvalidChoice, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn vote_with_foreign_choice_is_invalid() {
        let store = MemoryStore::new();
        let q1 = create(&store, "one", now(), &["A"]).await;
        let q2 = create(&store, "two", now(), &["B"]).await;

        let outcome = vote(&store, q1.question.id, Some(&q2.choices[0].id.to_string()), now())
            .await
            .unwrap();
        assert!(matches!(outcome, VoteOutcome::InvalidChoice { .. }));
        assert_eq!(store.choices(q2.question.id).await.unwrap()[0].votes, 0);
    }

    #[tokio::test]
    async fn vote_on_missing_question_is_not_found() {
        let store = MemoryStore::new();
        let err = vote(&store, 42, Some("1"), now()).await.unwrap_err();
        assert!(matches!(err, DbError::NotFound { resource: "question", .. }));
    }

    #[tokio::test]
    async fn vote_on_unpublished_question_is_accepted() {
        let store = MemoryStore::new();
        let q = create(&store, "hidden", now() + Duration::days(2), &["A"]).await;

        let outcome = vote(&store, q.question.id, Some(&q.choices[0].id.to_string()), now())
            .await
            .unwrap();
        assert!(matches!(outcome, VoteOutcome::Recorded { .. }));
    }

    #[tokio::test]
    async fn seed_sample_is_published_now() {
        let store = MemoryStore::new();
        let seeded = seed_sample(&store, now()).await.unwrap();
        assert_eq!(seeded.question.question_text, "What's new?");
        assert_eq!(seeded.choices.len(), 2);

        let latest = latest_questions(&store, now()).await.unwrap();
        assert_eq!(latest, vec![seeded.question]);
    }
}
