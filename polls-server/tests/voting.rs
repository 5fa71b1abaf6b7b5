//! End-to-end voting flow over the router with an in-memory store

use std::sync::Arc;

use axum::body::{to_bytes, Body};
use axum::http::{header, Request, StatusCode};
use axum::Router;
use chrono::{DateTime, Duration, TimeZone, Utc};
use polls_server::{
    build_router, AppState, FixedClock, MemoryStore, NewQuestion, PollStore, QuestionWithChoices,
    ServerConfig,
};
use serde_json::Value;
use tower::ServiceExt;

fn now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 5, 20, 12, 0, 0).unwrap()
}

fn app(store: &Arc<MemoryStore>) -> Router {
    let state = AppState::with_clock(store.clone(), Arc::new(FixedClock(now())));
    build_router(state, &ServerConfig::default())
}

async fn create(store: &MemoryStore, text: &str, pub_date: DateTime<Utc>, choices: &[&str]) -> QuestionWithChoices {
    let new = NewQuestion::new(text, pub_date, choices).unwrap();
    store.create_question(new).await.unwrap()
}

async fn send(app: Router, request: Request<Body>) -> (StatusCode, Option<String>, Value) {
    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let location = response
        .headers()
        .get(header::LOCATION)
        .map(|v| v.to_str().unwrap().to_owned());
    let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let json = if body.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&body).unwrap()
    };
    (status, location, json)
}

fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

fn vote(question_id: i64, body: &str) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(format!("/questions/{}/vote/", question_id))
        .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
        .body(Body::from(body.to_owned()))
        .unwrap()
}

fn votes_by_text(json: &Value) -> Vec<(String, i64)> {
    json["choices"]
        .as_array()
        .unwrap()
        .iter()
        .map(|c| {
            (
                c["choice_text"].as_str().unwrap().to_owned(),
                c["votes"].as_i64().unwrap(),
            )
        })
        .collect()
}

#[tokio::test]
async fn vote_then_results_then_bad_choice() {
    let store = Arc::new(MemoryStore::new());
    create(&store, "first", now() - Duration::days(3), &["x"]).await;
    create(&store, "second", now() - Duration::days(2), &["y"]).await;
    let q = create(&store, "Favourite letter?", now() - Duration::hours(1), &["A", "B"]).await;
    assert_eq!(q.question.id, 3);
    let choice_a = q.choices[0].id;

    let (status, location, _) = send(app(&store), vote(3, &format!("choice={}", choice_a))).await;
    assert_eq!(status, StatusCode::FOUND);
    assert_eq!(location.as_deref(), Some("/questions/3/results/"));

    let (status, _, json) = send(app(&store), get("/questions/3/results/")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        votes_by_text(&json),
        vec![("A".to_owned(), 1), ("B".to_owned(), 0)]
    );

    let (status, location, json) = send(app(&store), vote(3, "choice=999")).await;
    assert_eq!(status, StatusCode::OK);
    assert!(location.is_none());
    assert_eq!(json["error_message"], "You didn't select a choice.");
    assert_eq!(json["question"]["id"], 3);

    let (_, _, json) = send(app(&store), get("/questions/3/results/")).await;
    assert_eq!(
        votes_by_text(&json),
        vec![("A".to_owned(), 1), ("B".to_owned(), 0)]
    );
}

#[tokio::test]
async fn index_shows_five_newest_published() {
    let store = Arc::new(MemoryStore::new());
    for day in 1..=7 {
        create(&store, &format!("day {day}"), now() - Duration::days(day), &["ok"]).await;
    }
    create(&store, "tomorrow", now() + Duration::days(1), &["ok"]).await;

    let (status, _, json) = send(app(&store), get("/questions/")).await;
    assert_eq!(status, StatusCode::OK);

    let texts: Vec<&str> = json["latest_question_list"]
        .as_array()
        .unwrap()
        .iter()
        .map(|q| q["question_text"].as_str().unwrap())
        .collect();
    assert_eq!(texts, vec!["day 1", "day 2", "day 3", "day 4", "day 5"]);
}

#[tokio::test]
async fn future_question_is_invisible_until_published() {
    let store = Arc::new(MemoryStore::new());
    let q = create(&store, "later", now() + Duration::hours(2), &["ok"]).await;
    let id = q.question.id;

    let (status, _, _) = send(app(&store), get(&format!("/questions/{}/", id))).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    let (status, _, _) = send(app(&store), get(&format!("/questions/{}/results/", id))).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    // Same store, later clock
    let later = AppState::with_clock(store.clone(), Arc::new(FixedClock(now() + Duration::hours(3))));
    let (status, _, json) = send(
        build_router(later, &ServerConfig::default()),
        get(&format!("/questions/{}/", id)),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["question"]["question_text"], "later");
    assert_eq!(json["question"]["was_published_recently"], true);
}

#[tokio::test]
async fn concurrent_votes_are_all_counted() {
    let store = Arc::new(MemoryStore::new());
    let q = create(&store, "race", now(), &["only"]).await;
    let (question_id, choice_id) = (q.question.id, q.choices[0].id);

    let mut handles = Vec::new();
    for _ in 0..25 {
        let app = app(&store);
        handles.push(tokio::spawn(async move {
            send(app, vote(question_id, &format!("choice={}", choice_id))).await.0
        }));
    }
    for handle in handles {
        assert_eq!(handle.await.unwrap(), StatusCode::FOUND);
    }

    assert_eq!(store.choices(question_id).await.unwrap()[0].votes, 25);
}
