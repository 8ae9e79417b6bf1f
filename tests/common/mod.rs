//! In-process fake of the recommendation backend
#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use axum::{
    extract::{Query, State},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde_json::{json, Value};

pub const VALID_TOKEN: &str = "valid-token";
pub const BATCH_SIZE: usize = 3;

#[derive(Default)]
pub struct Recorded {
    /// `exclude` ids of every /survey/movies call, in call order
    pub exclude_history: Vec<Vec<String>>,
    /// `movie_ids` of every accepted /survey/submit call
    pub submissions: Vec<Vec<Value>>,
    /// `x-request-id` header of every request that carried one
    pub request_ids: Vec<String>,
    /// Every `content-type` header seen
    pub content_types: Vec<String>,
    pub fail_submit: bool,
    /// Accept submissions with an empty 204 reply
    pub submit_no_content: bool,
}

#[derive(Clone)]
pub struct FakeBackend {
    pub recorded: Arc<Mutex<Recorded>>,
    catalog: Arc<Vec<Value>>,
}

impl FakeBackend {
    fn new() -> Self {
        Self {
            recorded: Arc::new(Mutex::new(Recorded::default())),
            catalog: Arc::new(catalog()),
        }
    }

    pub fn exclude_history(&self) -> Vec<Vec<String>> {
        self.recorded.lock().unwrap().exclude_history.clone()
    }

    pub fn submissions(&self) -> Vec<Vec<Value>> {
        self.recorded.lock().unwrap().submissions.clone()
    }

    pub fn request_ids(&self) -> Vec<String> {
        self.recorded.lock().unwrap().request_ids.clone()
    }

    pub fn content_types(&self) -> Vec<String> {
        self.recorded.lock().unwrap().content_types.clone()
    }

    pub fn fail_next_submissions(&self) {
        self.recorded.lock().unwrap().fail_submit = true;
    }

    pub fn answer_submissions_with_no_content(&self) {
        self.recorded.lock().unwrap().submit_no_content = true;
    }

    fn observe(&self, headers: &HeaderMap) {
        let mut recorded = self.recorded.lock().unwrap();
        if let Some(id) = headers.get("x-request-id").and_then(|v| v.to_str().ok()) {
            recorded.request_ids.push(id.to_string());
        }
        if let Some(ct) = headers.get("content-type").and_then(|v| v.to_str().ok()) {
            recorded.content_types.push(ct.to_string());
        }
    }
}

/// Thirty movies with the release date forms the real backend mixes
fn catalog() -> Vec<Value> {
    (1..=30)
        .map(|id: i64| {
            let year = 1940 + id;
            let release_date = match id % 4 {
                0 => json!(year),
                1 => json!(format!("{}-01-01", year)),
                2 => json!(year.to_string()),
                _ => json!("N/A"),
            };
            let genre = if id % 2 == 0 { "Drama" } else { "N/A" };
            let rating = 6.0 + (id % 4) as f64 * 0.5;
            json!({
                "movie_id": id,
                "title": format!("Feature #{}", id),
                "genre": genre,
                "rating": rating,
                "release_date": release_date,
            })
        })
        .collect()
}

fn unauthorized() -> Response {
    (
        StatusCode::UNAUTHORIZED,
        Json(json!({"error": "Token is invalid or expired"})),
    )
        .into_response()
}

fn authorized(headers: &HeaderMap) -> bool {
    headers
        .get("authorization")
        .and_then(|v| v.to_str().ok())
        .map(|v| v == format!("Bearer {}", VALID_TOKEN))
        .unwrap_or(false)
}

async fn health() -> Json<Value> {
    Json(json!({"status": "healthy"}))
}

async fn signup(State(backend): State<FakeBackend>, headers: HeaderMap, Json(body): Json<Value>) -> Response {
    backend.observe(&headers);
    if body["username"] == "taken" {
        return (
            StatusCode::BAD_REQUEST,
            Json(json!({"error": "Username already exists"})),
        )
            .into_response();
    }
    (
        StatusCode::CREATED,
        Json(json!({
            "token": VALID_TOKEN,
            "user_id": "0b9f7c52-6a0e-4a53-8f1e-3d2b2a7c1e44",
            "username": body["username"],
        })),
    )
        .into_response()
}

async fn login(State(backend): State<FakeBackend>, headers: HeaderMap, Json(body): Json<Value>) -> Response {
    backend.observe(&headers);
    if body["password"] != "secret1" {
        return (
            StatusCode::UNAUTHORIZED,
            Json(json!({"error": "Invalid username or password"})),
        )
            .into_response();
    }
    Json(json!({
        "token": VALID_TOKEN,
        "user_id": 11,
        "username": body["username"],
        "has_embedding": false,
    }))
    .into_response()
}

async fn verify(State(backend): State<FakeBackend>, headers: HeaderMap) -> Response {
    backend.observe(&headers);
    if !authorized(&headers) {
        return unauthorized();
    }
    Json(json!({"user_id": 11, "username": "gloria"})).into_response()
}

async fn survey_movies(
    State(backend): State<FakeBackend>,
    headers: HeaderMap,
    Query(params): Query<HashMap<String, String>>,
) -> Response {
    backend.observe(&headers);
    if !authorized(&headers) {
        return unauthorized();
    }

    let excluded: Vec<String> = params
        .get("exclude")
        .map(|raw| {
            raw.split(',')
                .filter(|s| !s.is_empty())
                .map(str::to_string)
                .collect()
        })
        .unwrap_or_default();

    let movies: Vec<Value> = backend
        .catalog
        .iter()
        .filter(|m| !excluded.contains(&m["movie_id"].to_string()))
        .take(BATCH_SIZE)
        .cloned()
        .collect();

    backend.recorded.lock().unwrap().exclude_history.push(excluded);
    Json(json!({"movies": movies})).into_response()
}

async fn survey_submit(
    State(backend): State<FakeBackend>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Response {
    backend.observe(&headers);
    if !authorized(&headers) {
        return unauthorized();
    }
    let mut recorded = backend.recorded.lock().unwrap();
    if recorded.fail_submit {
        return (StatusCode::SERVICE_UNAVAILABLE, "upstream unavailable").into_response();
    }
    let ids = body["movie_ids"].as_array().cloned().unwrap_or_default();
    if ids.len() != 10 {
        return (
            StatusCode::BAD_REQUEST,
            Json(json!({"error": "Please select exactly 10 movies"})),
        )
            .into_response();
    }
    recorded.submissions.push(ids);
    if recorded.submit_no_content {
        return StatusCode::NO_CONTENT.into_response();
    }
    Json(json!({"message": "Survey completed successfully", "embedding_computed": true}))
        .into_response()
}

async fn wili_check(
    State(backend): State<FakeBackend>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Response {
    backend.observe(&headers);
    if !authorized(&headers) {
        return unauthorized();
    }
    let title = body["movie_title"].as_str().unwrap_or_default();
    if title != "Casablanca" {
        return (
            StatusCode::NOT_FOUND,
            Json(json!({"error": format!("Movie '{}' not found in database", title)})),
        )
            .into_response();
    }
    Json(json!({
        "movie_title": "Casablanca",
        "likelihood": 81.5,
        "movie_info": {
            "genre": "Romance",
            "rating": 8.5,
            "release_date": "1942-11-26",
            "runtime_min": "N/A"
        }
    }))
    .into_response()
}

async fn recommendations(
    State(backend): State<FakeBackend>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Response {
    backend.observe(&headers);
    if !authorized(&headers) {
        return unauthorized();
    }
    if body["prompt"] == "explode" {
        return (StatusCode::INTERNAL_SERVER_ERROR, "<html>Internal Server Error</html>")
            .into_response();
    }
    if body.get("genre").is_some() {
        return Json(json!({"recommendations": []})).into_response();
    }
    Json(json!({
        "recommendations": [
            {
                "movie_title": "Alien",
                "similarity_score": 91.2,
                "explanation": "Isolation and dread in deep space.",
                "movie_info": {"genre": "Sci-Fi", "rating": 8.5, "release_date": 1979, "runtime_min": 117}
            },
            {
                "movie_title": "The Thing",
                "similarity_score": 88.0,
                "explanation": "Paranoia in an Antarctic outpost.",
                "movie_info": {"genre": "Horror", "rating": "8.2", "release_date": "1982"}
            }
        ]
    }))
    .into_response()
}

/// Starts the fake on an ephemeral port and returns its `/api` base URL
pub async fn spawn_backend() -> (String, FakeBackend) {
    let backend = FakeBackend::new();

    let app = Router::new()
        .route("/api/health", get(health))
        .route("/api/auth/signup", post(signup))
        .route("/api/auth/login", post(login))
        .route("/api/auth/verify", get(verify))
        .route("/api/survey/movies", get(survey_movies))
        .route("/api/survey/submit", post(survey_submit))
        .route("/api/wili/check", post(wili_check))
        .route("/api/recommendations", post(recommendations))
        .with_state(backend.clone());

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    (format!("http://{}/api", addr), backend)
}
