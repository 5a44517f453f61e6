//! API client for communicating with the Narrafied REST API.
//!
//! This module provides the `ApiClient` struct for signing up, logging in
//! and making authenticated requests for profile, library, subscription
//! and statistics data.
//!
//! Requests are sent exactly once. There is no retry, refresh or queueing;
//! a failed call returns the server's error to the caller unchanged.

use std::time::Duration;

use reqwest::{header, Client, Method, Response};
use serde::{de::DeserializeOwned, Serialize};
use tracing::{debug, info, warn};

use crate::auth::Session;
use crate::config::Config;
use crate::models::{
    AccountTypeResponse, Book, CancelSubscriptionResponse, DeleteAccountRequest, GenreStats,
    ListeningProgress, LogInRequest, LogInResponse, MessageResponse, MostPlayedStats,
    SignUpRequest, SignUpResponse, SubscriptionStatus, UserProfile,
};

use super::ApiError;

// ============================================================================
// Endpoints
// ============================================================================

const SIGNUP_PATH: &str = "/signup";
const LOGIN_PATH: &str = "/login";
const PROFILE_PATH: &str = "/user/profile";
const ACCOUNT_TYPE_PATH: &str = "/user/account-type";
const BOOKS_PATH: &str = "/user/books";
const PROGRESS_PATH: &str = "/user/progress";
const SUBSCRIPTION_STATUS_PATH: &str = "/user/subscription/status";
const SUBSCRIPTION_CANCEL_PATH: &str = "/user/subscription/cancel";
const MOST_PLAYED_PATH: &str = "/user/stats/most-played";
const GENRE_STATS_PATH: &str = "/user/stats/by-genre";
const DELETE_ACCOUNT_PATH: &str = "/user/delete";

/// Number of entries requested from the most-played endpoint by default
pub const DEFAULT_MOST_PLAYED_LIMIT: u32 = 5;

/// API client for the Narrafied backend.
/// Clone is cheap - reqwest::Client uses Arc internally for connection pooling.
#[derive(Clone, Debug)]
pub struct ApiClient {
    client: Client,
    base_url: String,
    session: Session,
}

impl ApiClient {
    /// Create a client for `base_url` using `session` for credentials.
    /// No request timeout is applied.
    pub fn new(base_url: impl Into<String>, session: Session) -> Result<Self, ApiError> {
        Self::build(base_url.into(), session, None)
    }

    /// Create a client from configuration: base URL and optional timeout
    pub fn from_config(config: &Config, session: Session) -> Result<Self, ApiError> {
        Self::build(
            config.api_base(),
            session,
            config.request_timeout_secs.map(Duration::from_secs),
        )
    }

    fn build(base_url: String, session: Session, timeout: Option<Duration>) -> Result<Self, ApiError> {
        let mut builder = Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder.build()?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            session,
        })
    }

    /// Create a new ApiClient with a different session, sharing the connection pool.
    pub fn with_session(&self, session: Session) -> Self {
        Self {
            client: self.client.clone(), // Cheap clone, shares connection pool
            base_url: self.base_url.clone(),
            session,
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    // ===== Session =====

    /// Load a previously persisted token into memory. No network call.
    pub fn initialize(&mut self) -> Result<bool, ApiError> {
        self.session.initialize().map_err(storage_error)
    }

    pub fn current_token(&self) -> Option<&str> {
        self.session.token()
    }

    /// Local missing-session check for flows that need a signed-in user
    pub fn require_session(&self) -> Result<(), ApiError> {
        if self.session.is_authenticated() {
            Ok(())
        } else {
            Err(ApiError::NotAuthenticated)
        }
    }

    /// Create an account. Does not sign in.
    pub async fn sign_up(
        &self,
        username: &str,
        email: &str,
        password: &str,
        region: &str,
    ) -> Result<SignUpResponse, ApiError> {
        let body = SignUpRequest {
            username: username.to_string(),
            email: email.to_string(),
            password: password.to_string(),
            region: region.to_string(),
        };
        let response: SignUpResponse = self
            .send(Method::POST, SIGNUP_PATH, Some(&body), false)
            .await?;
        info!(user_id = response.user_id, "Account created");
        Ok(response)
    }

    /// Authenticate and hold the returned token, persisting it for later runs
    pub async fn log_in(&mut self, username: &str, password: &str) -> Result<LogInResponse, ApiError> {
        let body = LogInRequest {
            username: username.to_string(),
            password: password.to_string(),
        };
        let response: LogInResponse = self
            .send(Method::POST, LOGIN_PATH, Some(&body), false)
            .await?;

        self.session
            .store_token(response.token.clone())
            .map_err(storage_error)?;
        info!(username = username, "Logged in");
        Ok(response)
    }

    /// Forget the token locally and in persisted storage. No network call.
    pub fn log_out(&mut self) -> Result<(), ApiError> {
        self.session.clear().map_err(storage_error)?;
        info!("Logged out");
        Ok(())
    }

    // ===== Generic authenticated calls =====

    pub async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        self.send::<T, ()>(Method::GET, path, None, true).await
    }

    pub async fn post<T: DeserializeOwned, B: Serialize + ?Sized>(
        &self,
        path: &str,
        body: Option<&B>,
    ) -> Result<T, ApiError> {
        self.send(Method::POST, path, body, true).await
    }

    pub async fn delete<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        self.send::<T, ()>(Method::DELETE, path, None, true).await
    }

    fn url(&self, path: &str) -> String {
        if path.starts_with('/') {
            format!("{}{}", self.base_url, path)
        } else {
            format!("{}/{}", self.base_url, path)
        }
    }

    async fn send<T: DeserializeOwned, B: Serialize + ?Sized>(
        &self,
        method: Method,
        path: &str,
        body: Option<&B>,
        authenticated: bool,
    ) -> Result<T, ApiError> {
        let url = self.url(path);
        let token = if authenticated { self.session.token() } else { None };
        debug!(method = %method, path = path, bearer = token.is_some(), "Sending request");

        let mut request = self
            .client
            .request(method.clone(), &url)
            .header(header::CONTENT_TYPE, "application/json");
        if let Some(token) = token {
            request = request.bearer_auth(token);
        }
        if let Some(body) = body {
            request = request.json(body);
        }

        let response = request.send().await?;
        let response = Self::check_response(response, &method, path).await?;
        Self::decode(response, path).await
    }

    /// Check if response is successful, returning the decoded server error if not.
    async fn check_response(response: Response, method: &Method, path: &str) -> Result<Response, ApiError> {
        if response.status().is_success() {
            Ok(response)
        } else {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            warn!(method = %method, path = path, status = %status, "Request failed");
            Err(ApiError::from_status(status, &body))
        }
    }

    /// Decode a success body. An empty body decodes as JSON `null`.
    async fn decode<T: DeserializeOwned>(response: Response, path: &str) -> Result<T, ApiError> {
        let bytes = response.bytes().await?;
        let text = if bytes.iter().all(u8::is_ascii_whitespace) {
            &b"null"[..]
        } else {
            &bytes[..]
        };
        serde_json::from_slice(text).map_err(|e| {
            ApiError::InvalidResponse(format!("Failed to parse JSON response from {}: {}", path, e))
        })
    }

    // ===== Data Fetching Methods =====

    pub async fn fetch_profile(&self) -> Result<UserProfile, ApiError> {
        self.get(PROFILE_PATH).await
    }

    pub async fn fetch_account_type(&self) -> Result<AccountTypeResponse, ApiError> {
        self.get(ACCOUNT_TYPE_PATH).await
    }

    pub async fn fetch_books(&self) -> Result<Vec<Book>, ApiError> {
        self.get(BOOKS_PATH).await
    }

    pub async fn fetch_progress(&self) -> Result<Vec<ListeningProgress>, ApiError> {
        self.get(PROGRESS_PATH).await
    }

    pub async fn fetch_subscription_status(&self) -> Result<SubscriptionStatus, ApiError> {
        self.get(SUBSCRIPTION_STATUS_PATH).await
    }

    pub async fn fetch_most_played(&self, limit: u32) -> Result<MostPlayedStats, ApiError> {
        self.get(&format!("{}?limit={}", MOST_PLAYED_PATH, limit)).await
    }

    pub async fn fetch_genre_stats(&self) -> Result<GenreStats, ApiError> {
        self.get(GENRE_STATS_PATH).await
    }

    // ===== Mutating Methods =====

    /// Cancel the subscription at the end of the current period.
    /// The response is returned as decoded, without interpretation.
    pub async fn cancel_subscription(&self) -> Result<CancelSubscriptionResponse, ApiError> {
        self.post::<_, ()>(SUBSCRIPTION_CANCEL_PATH, None).await
    }

    /// Remove a book from the user's library
    pub async fn remove_book(&self, book_id: i64) -> Result<MessageResponse, ApiError> {
        let confirmation: Option<MessageResponse> =
            self.delete(&format!("{}/{}", BOOKS_PATH, book_id)).await?;
        Ok(confirmation.unwrap_or_default())
    }

    /// Permanently delete the account. Clears the session on success.
    pub async fn delete_account(&mut self, password: &str, reason: &str) -> Result<MessageResponse, ApiError> {
        let body = DeleteAccountRequest {
            password: password.to_string(),
            reason: reason.to_string(),
        };
        let response: MessageResponse = self.post(DELETE_ACCOUNT_PATH, Some(&body)).await?;
        self.session.clear().map_err(storage_error)?;
        info!("Account deleted");
        Ok(response)
    }
}

fn storage_error(e: anyhow::Error) -> ApiError {
    ApiError::Storage(format!("{:#}", e))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client(base: &str) -> ApiClient {
        ApiClient::new(base, Session::in_memory()).expect("client should build")
    }

    #[test]
    fn test_url_joining() {
        let api = client("http://localhost:8080/");
        assert_eq!(api.base_url(), "http://localhost:8080");
        assert_eq!(api.url("/user/profile"), "http://localhost:8080/user/profile");
        assert_eq!(api.url("user/profile"), "http://localhost:8080/user/profile");
        assert_eq!(
            api.url(&format!("{}?limit={}", MOST_PLAYED_PATH, 3)),
            "http://localhost:8080/user/stats/most-played?limit=3"
        );
    }

    #[test]
    fn test_require_session() {
        let mut api = client("http://localhost:8080");
        assert!(matches!(api.require_session(), Err(ApiError::NotAuthenticated)));
        assert_eq!(api.current_token(), None);

        let mut session = Session::in_memory();
        session.store_token("tok".to_string()).unwrap();
        api = api.with_session(session);
        assert!(api.require_session().is_ok());
        assert_eq!(api.current_token(), Some("tok"));
    }

    #[test]
    fn test_from_config_uses_api_base() {
        let config = Config {
            api_base_url: Some("http://127.0.0.1:9999/".to_string()),
            request_timeout_secs: Some(5),
            ..Default::default()
        };
        let api = ApiClient::from_config(&config, Session::in_memory()).unwrap();
        assert_eq!(api.base_url(), "http://127.0.0.1:9999");
    }

    #[test]
    fn test_log_out_clears_session() {
        let mut session = Session::in_memory();
        session.store_token("tok".to_string()).unwrap();
        let store = session.store();
        let mut api = client("http://localhost:8080").with_session(session);

        api.log_out().unwrap();
        assert_eq!(api.current_token(), None);
        assert_eq!(store.load().unwrap(), None);
    }
}
