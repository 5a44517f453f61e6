//! In-process fake of the Narrafied backend for client integration tests.
//!
//! The fake records every request it sees (method, path, query and the
//! auth/content-type headers) so tests can assert on what the client
//! actually sent.

#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use axum::extract::{Path, Query, Request, State};
use axum::http::{header, HeaderMap, StatusCode};
use axum::middleware::{self, Next};
use axum::response::{IntoResponse, Response};
use axum::routing::{delete, get, post};
use axum::{Json, Router};
use serde_json::{json, Value};

pub const USERNAME: &str = "ada";
pub const PASSWORD: &str = "correct-horse";
pub const TOKEN: &str = "tok-ada-1";

pub const OTHER_USERNAME: &str = "grace";
pub const OTHER_PASSWORD: &str = "hopper-cobol";
pub const OTHER_TOKEN: &str = "tok-grace-7";

/// (username, password, token) for every account the fake knows
const ACCOUNTS: [(&str, &str, &str); 2] = [
    (USERNAME, PASSWORD, TOKEN),
    (OTHER_USERNAME, OTHER_PASSWORD, OTHER_TOKEN),
];

#[derive(Debug, Clone)]
pub struct RecordedRequest {
    pub method: String,
    pub path: String,
    pub query: Option<String>,
    pub authorization: Option<String>,
    pub content_type: Option<String>,
}

#[derive(Default)]
pub struct FakeBackend {
    /// Make `/user/progress` fail with a 500
    pub fail_progress: bool,
    requests: Mutex<Vec<RecordedRequest>>,
    last_signup: Mutex<Option<Value>>,
}

impl FakeBackend {
    pub fn failing_progress() -> Self {
        Self {
            fail_progress: true,
            ..Default::default()
        }
    }

    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.requests.lock().unwrap().clone()
    }

    pub fn requests_to(&self, path: &str) -> Vec<RecordedRequest> {
        self.requests()
            .into_iter()
            .filter(|r| r.path == path)
            .collect()
    }

    pub fn last_signup(&self) -> Option<Value> {
        self.last_signup.lock().unwrap().clone()
    }
}

type Shared = Arc<FakeBackend>;
type Failure = (StatusCode, Json<Value>);

fn failure(status: StatusCode, error: &str) -> Failure {
    (status, Json(json!({ "error": error })))
}

/// Resolve the bearer token to the account it was issued to
fn authorize(headers: &HeaderMap) -> Result<&'static str, Failure> {
    let bearer = headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "));
    ACCOUNTS
        .iter()
        .find(|(_, _, token)| Some(*token) == bearer)
        .map(|(username, _, _)| *username)
        .ok_or_else(|| failure(StatusCode::UNAUTHORIZED, "Missing or invalid token"))
}

async fn record(State(state): State<Shared>, request: Request, next: Next) -> Response {
    let recorded = {
        let header_value = |name: header::HeaderName| {
            request
                .headers()
                .get(name)
                .and_then(|v| v.to_str().ok())
                .map(str::to_string)
        };
        RecordedRequest {
            method: request.method().to_string(),
            path: request.uri().path().to_string(),
            query: request.uri().query().map(str::to_string),
            authorization: header_value(header::AUTHORIZATION),
            content_type: header_value(header::CONTENT_TYPE),
        }
    };
    state.requests.lock().unwrap().push(recorded);
    next.run(request).await
}

async fn signup(State(state): State<Shared>, Json(body): Json<Value>) -> Result<Response, Failure> {
    *state.last_signup.lock().unwrap() = Some(body.clone());
    if body["username"] == "taken" {
        return Err((
            StatusCode::CONFLICT,
            Json(json!({
                "error": "Username already exists",
                "details": "duplicate key value violates unique constraint"
            })),
        ));
    }
    Ok((
        StatusCode::CREATED,
        Json(json!({ "message": "User created successfully", "user_id": 42 })),
    )
        .into_response())
}

async fn login(Json(body): Json<Value>) -> Result<Json<Value>, Failure> {
    ACCOUNTS
        .iter()
        .find(|(username, password, _)| body["username"] == *username && body["password"] == *password)
        .map(|(_, _, token)| Json(json!({ "token": token })))
        .ok_or_else(|| failure(StatusCode::UNAUTHORIZED, "Invalid username or password"))
}

async fn profile(headers: HeaderMap) -> Result<Json<Value>, Failure> {
    let username = authorize(&headers)?;
    Ok(Json(json!({
        "username": username,
        "email": format!("{}@example.com", username),
        "account_type": "premium",
        "is_public": false,
        "region": "CA",
        "books_read": 3,
        "created_at": "2024-01-15T09:30:00Z"
    })))
}

async fn account_type(headers: HeaderMap) -> Result<Json<Value>, Failure> {
    authorize(&headers)?;
    Ok(Json(json!({ "account_type": "premium" })))
}

async fn books(headers: HeaderMap) -> Result<Json<Value>, Failure> {
    authorize(&headers)?;
    Ok(Json(json!([
        {"id": 1, "title": "Dune", "author": "Frank Herbert", "genre": "Sci-Fi", "status": "reading",
         "cover_url": "https://cdn.example/dune.jpg", "stream_url": "https://cdn.example/dune.m3u8"},
        {"id": 2, "title": "Emma", "author": "Jane Austen", "genre": "Classics", "status": "finished"},
        {"id": 3, "title": "Field Notes"}
    ])))
}

async fn progress(State(state): State<Shared>, headers: HeaderMap) -> Result<Json<Value>, Failure> {
    authorize(&headers)?;
    if state.fail_progress {
        return Err(failure(StatusCode::INTERNAL_SERVER_ERROR, "progress service unavailable"));
    }
    Ok(Json(json!([
        {"total_listen_time": 3600},
        {"total_listen_time": 1800}
    ])))
}

async fn subscription_status(headers: HeaderMap) -> Result<Json<Value>, Failure> {
    authorize(&headers)?;
    Ok(Json(json!({
        "account_type": "premium",
        "has_subscription": true,
        "status": "active",
        "plan_name": "Premium Monthly",
        "current_period_start": "2024-05-01T00:00:00Z",
        "current_period_end": "2024-06-01T00:00:00Z",
        "cancel_at_period_end": false
    })))
}

async fn subscription_cancel(headers: HeaderMap) -> Result<Json<Value>, Failure> {
    authorize(&headers)?;
    Ok(Json(json!({
        "message": "Subscription will be canceled at the end of the billing period",
        "cancel_at_period_end": true,
        "period_end": "2024-06-01T00:00:00Z"
    })))
}

async fn most_played(
    headers: HeaderMap,
    Query(params): Query<HashMap<String, String>>,
) -> Result<Json<Value>, Failure> {
    authorize(&headers)?;
    let limit: usize = params
        .get("limit")
        .and_then(|l| l.parse().ok())
        .unwrap_or(10);
    let all = [
        json!({"book_id": 1, "title": "Dune", "play_count": 12, "total_listen_time": 40000}),
        json!({"book_id": 2, "title": "Emma", "play_count": 5, "total_listen_time": 9000}),
        json!({"book_id": 3, "title": "Field Notes", "play_count": 1, "total_listen_time": 600}),
    ];
    let books: Vec<Value> = all.into_iter().take(limit).collect();
    Ok(Json(json!({
        "books": books,
        "total_plays": 18,
        "total_listen_time": 49600
    })))
}

async fn genre_stats(headers: HeaderMap) -> Result<Json<Value>, Failure> {
    authorize(&headers)?;
    Ok(Json(json!({
        "genres": [
            {"genre": "Sci-Fi", "book_count": 1, "play_count": 12, "total_listen_time": 40000},
            {"genre": "Classics", "book_count": 1, "play_count": 5, "total_listen_time": 10000}
        ],
        "total_genres": 2,
        "total_listen_time": 50000
    })))
}

async fn delete_account(headers: HeaderMap, Json(body): Json<Value>) -> Result<Json<Value>, Failure> {
    authorize(&headers)?;
    if body["password"] != PASSWORD {
        return Err(failure(StatusCode::FORBIDDEN, "Incorrect password"));
    }
    Ok(Json(json!({ "message": "Account deleted" })))
}

async fn remove_book(headers: HeaderMap, Path(id): Path<i64>) -> Result<StatusCode, Failure> {
    authorize(&headers)?;
    if id == 404 {
        return Err(failure(StatusCode::NOT_FOUND, "Book not found"));
    }
    Ok(StatusCode::NO_CONTENT)
}

async fn broken() -> Response {
    (StatusCode::BAD_GATEWAY, "<html>upstream down</html>").into_response()
}

/// Start the fake backend on an ephemeral port.
/// Returns the base URL and a handle for inspecting recorded requests.
pub async fn spawn(backend: FakeBackend) -> (String, Shared) {
    let state: Shared = Arc::new(backend);
    let app = Router::new()
        .route("/signup", post(signup))
        .route("/login", post(login))
        .route("/user/profile", get(profile))
        .route("/user/account-type", get(account_type))
        .route("/user/books", get(books))
        .route("/user/books/{id}", delete(remove_book))
        .route("/user/progress", get(progress))
        .route("/user/subscription/status", get(subscription_status))
        .route("/user/subscription/cancel", post(subscription_cancel))
        .route("/user/stats/most-played", get(most_played))
        .route("/user/stats/by-genre", get(genre_stats))
        .route("/user/delete", post(delete_account))
        .route("/broken", get(broken))
        .layer(middleware::from_fn_with_state(state.clone(), record))
        .with_state(state.clone());

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind fake backend");
    let addr = listener.local_addr().expect("local addr");
    tokio::spawn(async move {
        axum::serve(listener, app).await.expect("fake backend crashed");
    });

    (format!("http://{}", addr), state)
}
