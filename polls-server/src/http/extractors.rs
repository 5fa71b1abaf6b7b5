//! Custom Axum extractors

use axum::extract::{FromRequestParts, Path};
use axum::http::request::Parts;

use super::error::ApiError;

/// Question id taken from the `{id}` path segment.
///
/// Only plain ASCII digits name a question (no sign, no whitespace); any
/// other segment is rejected as not found rather than as a bad request.
pub struct QuestionIdPath(pub i64);

impl<S> FromRequestParts<S> for QuestionIdPath
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Path(raw): Path<String> = Path::from_request_parts(parts, state)
            .await
            .map_err(|_| not_found(String::new()))?;

        parse_question_id(&raw).map(Self).ok_or_else(|| not_found(raw))
    }
}

fn parse_question_id(raw: &str) -> Option<i64> {
    if raw.is_empty() || !raw.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    raw.parse().ok()
}

fn not_found(id: String) -> ApiError {
    ApiError::NotFound {
        resource: "question",
        id,
    }
}
