//! Question endpoints - index, detail, results and vote

use std::sync::Arc;

use axum::{
    extract::{rejection::FormRejection, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Form, Json, Router,
};
use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::db::{Choice, Question, QuestionWithChoices};
use crate::http::error::ApiError;
use crate::http::extractors::QuestionIdPath;
use crate::http::server::AppState;
use crate::polls::{self, VoteOutcome};

/// Question response
#[derive(Debug, Serialize)]
pub struct QuestionResponse {
    pub id: i64,
    pub question_text: String,
    pub pub_date: String,
    pub was_published_recently: bool,
}

impl QuestionResponse {
    fn new(q: Question, now: DateTime<Utc>) -> Self {
        Self {
            was_published_recently: q.was_published_recently(now),
            id: q.id,
            question_text: q.question_text,
            pub_date: q.pub_date.to_rfc3339(),
        }
    }
}

/// Choice response; `votes` is only filled on the results page
#[derive(Debug, Serialize)]
pub struct ChoiceResponse {
    pub id: i64,
    pub choice_text: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub votes: Option<i32>,
}

impl ChoiceResponse {
    fn new(c: Choice, with_votes: bool) -> Self {
        Self {
            id: c.id,
            choice_text: c.choice_text,
            votes: with_votes.then_some(c.votes),
        }
    }
}

/// Index response
#[derive(Debug, Serialize)]
pub struct LatestQuestionsResponse {
    pub latest_question_list: Vec<QuestionResponse>,
}

/// Detail/results response
#[derive(Debug, Serialize)]
pub struct QuestionDetailResponse {
    pub question: QuestionResponse,
    pub choices: Vec<ChoiceResponse>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_message: Option<&'static str>,
}

impl QuestionDetailResponse {
    fn new(
        detail: QuestionWithChoices,
        now: DateTime<Utc>,
        with_votes: bool,
        error_message: Option<&'static str>,
    ) -> Self {
        Self {
            question: QuestionResponse::new(detail.question, now),
            choices: detail
                .choices
                .into_iter()
                .map(|c| ChoiceResponse::new(c, with_votes))
                .collect(),
            error_message,
        }
    }
}

/// Submitted vote form; `choice` may be missing
#[derive(Debug, Default)]
pub struct VoteForm {
    pub choice: Option<String>,
}

impl VoteForm {
    /// The last `choice` wins when the key repeats
    fn from_pairs(pairs: Vec<(String, String)>) -> Self {
        Self {
            choice: pairs
                .into_iter()
                .filter(|(key, _)| key == "choice")
                .map(|(_, value)| value)
                .last(),
        }
    }
}

/// GET /questions/ - the five most recent published questions
async fn index(
    State(state): State<Arc<AppState>>,
) -> Result<Json<LatestQuestionsResponse>, ApiError> {
    let now = state.clock.now();
    let questions = polls::latest_questions(state.store.as_ref(), now).await?;

    Ok(Json(LatestQuestionsResponse {
        latest_question_list: questions
            .into_iter()
            .map(|q| QuestionResponse::new(q, now))
            .collect(),
    }))
}

/// GET /questions/{id}/ - a published question and its choices
async fn detail(
    State(state): State<Arc<AppState>>,
    QuestionIdPath(id): QuestionIdPath,
) -> Result<Json<QuestionDetailResponse>, ApiError> {
    let now = state.clock.now();
    let detail = polls::published_question(state.store.as_ref(), id, now).await?;
    Ok(Json(QuestionDetailResponse::new(detail, now, false, None)))
}

/// GET /questions/{id}/results/ - a published question with vote counts
async fn results(
    State(state): State<Arc<AppState>>,
    QuestionIdPath(id): QuestionIdPath,
) -> Result<Json<QuestionDetailResponse>, ApiError> {
    let now = state.clock.now();
    let detail = polls::published_question(state.store.as_ref(), id, now).await?;
    Ok(Json(QuestionDetailResponse::new(detail, now, true, None)))
}

/// POST /questions/{id}/vote - record a vote and redirect to the results.
///
/// A missing or unusable form body counts as "no choice": the detail view
/// comes back with 200 and an error message instead of a redirect.
async fn vote(
    State(state): State<Arc<AppState>>,
    QuestionIdPath(id): QuestionIdPath,
    form: Result<Form<Vec<(String, String)>>, FormRejection>,
) -> Result<Response, ApiError> {
    let form = match form {
        Ok(Form(pairs)) => VoteForm::from_pairs(pairs),
        Err(rejection) => {
            tracing::debug!(question_id = id, "unreadable vote form: {}", rejection);
            VoteForm::default()
        }
    };

    let now = state.clock.now();
    let outcome = polls::vote(state.store.as_ref(), id, form.choice.as_deref(), now).await?;

    let response = match outcome {
        VoteOutcome::Recorded { question_id, .. } => (
            StatusCode::FOUND,
            [(header::LOCATION, polls::results_path(question_id))],
        )
            .into_response(),
        VoteOutcome::InvalidChoice { detail, message } => {
            Json(QuestionDetailResponse::new(detail, now, false, Some(message))).into_response()
        }
    };

    Ok(response)
}

/// Question routes
pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/questions/", get(index))
        .route("/questions/{id}/", get(detail))
        .route("/questions/{id}/results/", get(results))
        .route("/questions/{id}/vote", post(vote))
        .route("/questions/{id}/vote/", post(vote))
}
