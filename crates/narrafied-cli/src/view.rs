//! Pure rendering of API data into terminal screens.
//!
//! Every function here takes a data snapshot and returns a `Screen`
//! describing what to show: body lines, an optional notice and an optional
//! route to continue to. Nothing in this module performs I/O.

use chrono::{DateTime, Utc};
use narrafied_core::models::{
    CancelSubscriptionResponse, GenreStats, MessageResponse, MostPlayedStats, SignUpResponse,
    SubscriptionStatus,
};
use narrafied_core::{ApiError, Dashboard, Environment, Library, TokenStorage};
use serde::Serialize;
use serde_json::Value;

use crate::format::{format_date, format_listen_time, format_optional, mask_token, truncate_string};

/// Titles longer than this are shortened in list views
const MAX_TITLE_WIDTH: usize = 40;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeKind {
    Success,
    Error,
}

/// Short status message shown alongside a screen
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub kind: NoticeKind,
    pub message: String,
}

/// Where the user goes next
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    /// Signed out; start from the beginning
    Entry,
    SignIn,
    Library,
}

impl Route {
    pub fn hint(&self) -> Option<&'static str> {
        match self {
            Route::Entry => Some("Run `narrafied login` to sign in, or `narrafied signup` to create an account."),
            Route::SignIn => Some("Run `narrafied login` to sign in."),
            Route::Library => None,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct Screen {
    pub lines: Vec<String>,
    pub notice: Option<Notice>,
    pub route: Option<Route>,
    /// Raw payload for `--json` output
    pub data: Option<Value>,
}

impl Screen {
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            notice: Some(Notice {
                kind: NoticeKind::Success,
                message: message.into(),
            }),
            ..Default::default()
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            notice: Some(Notice {
                kind: NoticeKind::Error,
                message: message.into(),
            }),
            ..Default::default()
        }
    }

    fn lines(lines: Vec<String>) -> Self {
        Self {
            lines,
            ..Default::default()
        }
    }

    pub fn routed(mut self, route: Route) -> Self {
        self.route = Some(route);
        self
    }

    fn with_data<T: Serialize>(mut self, data: &T) -> Self {
        self.data = serde_json::to_value(data).ok();
        self
    }

    pub fn is_error(&self) -> bool {
        matches!(self.notice, Some(Notice { kind: NoticeKind::Error, .. }))
    }

    /// Show `next` under this screen's notice
    pub fn then(self, next: Screen) -> Screen {
        Screen {
            lines: next.lines,
            notice: next.notice.or(self.notice),
            route: next.route,
            data: next.data,
        }
    }
}

// ===== Session =====

pub fn signed_out() -> Screen {
    Screen::error("Please sign in to continue.").routed(Route::Entry)
}

pub fn signed_up(response: &SignUpResponse) -> Screen {
    Screen::success("Account created! Sign in to start listening.")
        .routed(Route::SignIn)
        .with_data(response)
}

pub fn logged_in() -> Screen {
    Screen::success("Signed in! Redirecting to your library...").routed(Route::Library)
}

pub fn logged_out() -> Screen {
    Screen::success("Signed out.").routed(Route::Entry)
}

/// Render a failed call. Server messages are shown verbatim; `fallback`
/// covers failures without one.
pub fn api_error(err: &ApiError, fallback: &str) -> Screen {
    if matches!(err, ApiError::NotAuthenticated) {
        return signed_out();
    }

    let mut screen = Screen::error(err.user_message(fallback));
    if let Some(details) = err.request_error().and_then(|e| e.details.as_deref()) {
        screen.lines.push(format!("Details: {}", details));
    }
    if err.is_unauthorized() {
        screen.lines.push("Your session may have expired.".to_string());
        screen.route = Some(Route::SignIn);
    }
    screen
}

pub struct SessionInfo {
    pub environment: Environment,
    pub base_url: String,
    pub storage: Option<TokenStorage>,
    pub token: Option<String>,
    pub saved_at: Option<DateTime<Utc>>,
    pub last_username: Option<String>,
}

pub fn session_status(info: &SessionInfo) -> Screen {
    let storage = match info.storage {
        Some(TokenStorage::File) => "file",
        Some(TokenStorage::Keyring) => "keyring",
        None => "memory (ephemeral)",
    };
    let mut lines = vec![
        format!("Environment:  {}", info.environment),
        format!("API base:     {}", info.base_url),
        format!("Token store:  {}", storage),
    ];
    match info.token.as_deref() {
        Some(token) => lines.push(format!("Session:      signed in ({})", mask_token(token))),
        None => lines.push("Session:      signed out".to_string()),
    }
    if let Some(saved_at) = info.saved_at {
        lines.push(format!("Signed in at: {}", saved_at.format("%b %d, %Y %H:%M UTC")));
    }
    if let Some(ref username) = info.last_username {
        lines.push(format!("Last user:    {}", username));
    }

    let screen = Screen::lines(lines);
    if info.token.is_none() {
        screen.routed(Route::Entry)
    } else {
        screen
    }
}

// ===== Profile & Library =====

pub fn dashboard(dashboard: &Dashboard) -> Screen {
    let profile = &dashboard.profile;
    let mut lines = vec![
        format!("{} <{}>", profile.username, profile.email),
        format!("  Account:      {}", profile.account_type),
        format!("  Region:       {}", format_optional(profile.region.as_deref(), "-")),
        format!(
            "  Profile:      {}",
            if profile.is_public { "public" } else { "private" }
        ),
        format!("  Books read:   {}", profile.books_read),
    ];
    if let Some(ref created_at) = profile.created_at {
        lines.push(format!("  Member since: {}", format_date(created_at)));
    }

    lines.push(String::new());
    lines.extend(subscription_lines(&dashboard.subscription));

    lines.push(String::new());
    lines.push(format!(
        "Library: {} books, {} listened",
        dashboard.book_count(),
        format_listen_time(dashboard.total_listen_time())
    ));

    Screen::lines(lines).with_data(dashboard)
}

pub fn library(library: &Library) -> Screen {
    if library.books.is_empty() {
        return Screen::lines(vec!["Your library is empty.".to_string()]).with_data(library);
    }

    let mut lines = vec![format!(
        "Your library ({} books, {} listened)",
        library.books.len(),
        format_listen_time(library.total_listen_time())
    )];
    for book in &library.books {
        let mut line = format!(
            "  #{:<5} {} by {}",
            book.id,
            truncate_string(&book.title, MAX_TITLE_WIDTH),
            book.author_display()
        );
        if let Some(genre) = book.genre.as_deref().filter(|g| !g.is_empty()) {
            line.push_str(&format!(" [{}]", genre));
        }
        if let Some(status) = book.status.as_deref().filter(|s| !s.is_empty()) {
            line.push_str(&format!(" ({})", status));
        }
        lines.push(line);
    }

    let counts = library.status_counts();
    let summary: Vec<String> = counts
        .iter()
        .map(|(status, count)| format!("{} {}", count, status))
        .collect();
    lines.push(format!("Status: {}", summary.join(", ")));

    Screen::lines(lines).with_data(library)
}

pub fn book_removed(book_id: i64, response: &MessageResponse) -> Screen {
    let message = if response.message.is_empty() {
        format!("Book #{} removed from your library.", book_id)
    } else {
        response.message.clone()
    };
    Screen::success(message).with_data(response)
}

// ===== Subscription =====

fn subscription_lines(status: &SubscriptionStatus) -> Vec<String> {
    if !status.has_subscription {
        return vec![format!(
            "Subscription: none ({} account)",
            status.account_type
        )];
    }

    let mut lines = vec![format!(
        "Subscription: {} ({})",
        format_optional(status.plan_name.as_deref(), "Unnamed plan"),
        status.status
    )];
    if let (Some(start), Some(end)) = (
        status.current_period_start.as_deref(),
        status.current_period_end.as_deref(),
    ) {
        lines.push(format!(
            "  Period:       {} to {}",
            format_date(start),
            format_date(end)
        ));
    }
    if status.is_ending() {
        let end = status
            .current_period_end
            .as_deref()
            .map(format_date)
            .unwrap_or_else(|| "the end of the period".to_string());
        lines.push(format!("  Cancels on:   {}", end));
    }
    lines
}

pub fn subscription(status: &SubscriptionStatus) -> Screen {
    Screen::lines(subscription_lines(status)).with_data(status)
}

pub fn subscription_canceled(response: &CancelSubscriptionResponse) -> Screen {
    let mut screen = Screen::success(response.message.clone()).with_data(response);
    if response.cancel_at_period_end {
        if let Some(ref end) = response.period_end {
            screen
                .lines
                .push(format!("You keep access until {}.", format_date(end)));
        }
    }
    screen
}

// ===== Stats =====

pub fn most_played(stats: &MostPlayedStats) -> Screen {
    if stats.books.is_empty() {
        return Screen::lines(vec!["Nothing played yet.".to_string()]).with_data(stats);
    }

    let mut lines = vec!["Most played".to_string()];
    for (rank, book) in stats.books.iter().enumerate() {
        lines.push(format!(
            "  {:>2}. {:<width$} {:>4} plays  {}",
            rank + 1,
            truncate_string(&book.title, MAX_TITLE_WIDTH),
            book.play_count,
            format_listen_time(book.total_listen_time),
            width = MAX_TITLE_WIDTH
        ));
    }
    lines.push(format!(
        "Total: {} plays, {} listened",
        stats.total_plays,
        format_listen_time(stats.total_listen_time)
    ));
    Screen::lines(lines).with_data(stats)
}

pub fn genre_stats(stats: &GenreStats) -> Screen {
    if stats.genres.is_empty() {
        return Screen::lines(vec!["No listening history yet.".to_string()]).with_data(stats);
    }

    let mut lines = vec!["Listening by genre".to_string()];
    for genre in &stats.genres {
        lines.push(format!(
            "  {:<20} {:>3} books  {:>9}  {:>5.1}%",
            truncate_string(&genre.genre, 20),
            genre.book_count,
            format_listen_time(genre.total_listen_time),
            stats.share_percent(genre)
        ));
    }
    lines.push(format!(
        "Total: {} genres, {} listened",
        stats.total_genres,
        format_listen_time(stats.total_listen_time)
    ));
    Screen::lines(lines).with_data(stats)
}

// ===== Account =====

pub fn delete_unconfirmed() -> Screen {
    Screen::error("Account deletion is permanent. Re-run with --yes to confirm.")
}

pub fn account_deleted(response: &MessageResponse) -> Screen {
    let message = if response.message.is_empty() {
        "Your account has been deleted.".to_string()
    } else {
        response.message.clone()
    };
    Screen::success(message).routed(Route::Entry).with_data(response)
}

#[cfg(test)]
mod tests {
    use super::*;
    use narrafied_core::models::{Book, ListeningProgress, UserProfile};
    use narrafied_core::api::StatusCode;

    /// Build server errors through the same decoding path the client uses
    fn status(code: u16, body: &str) -> ApiError {
        ApiError::from_status(StatusCode::from_u16(code).unwrap(), body)
    }

    fn book(id: i64, title: &str, status: Option<&str>) -> Book {
        Book {
            id,
            title: title.to_string(),
            author: Some("Author".to_string()),
            genre: Some("Fiction".to_string()),
            status: status.map(str::to_string),
            cover_url: None,
            stream_url: None,
        }
    }

    fn subscription_status(has_subscription: bool, cancel: Option<bool>) -> SubscriptionStatus {
        SubscriptionStatus {
            account_type: if has_subscription { "premium" } else { "free" }.to_string(),
            has_subscription,
            status: if has_subscription { "active" } else { "none" }.to_string(),
            plan_name: has_subscription.then(|| "Premium Monthly".to_string()),
            current_period_start: Some("2024-05-01T00:00:00Z".to_string()),
            current_period_end: Some("2024-06-01T00:00:00Z".to_string()),
            cancel_at_period_end: cancel,
        }
    }

    #[test]
    fn test_api_error_shows_server_message_verbatim() {
        let err = status(409, r#"{"error":"Username already exists","details":"dup key"}"#);
        let screen = api_error(&err, "Unable to sign up. Please try again.");

        assert!(screen.is_error());
        assert_eq!(screen.notice.unwrap().message, "Username already exists");
        assert_eq!(screen.lines, vec!["Details: dup key".to_string()]);
        assert_eq!(screen.route, None);
    }

    #[test]
    fn test_api_error_fallback_and_unauthorized() {
        let err = status(401, r#"{"error":""}"#);
        let screen = api_error(&err, "Check your credentials and try again.");
        assert_eq!(
            screen.notice.as_ref().unwrap().message,
            "Check your credentials and try again."
        );
        assert_eq!(screen.route, Some(Route::SignIn));
    }

    #[test]
    fn test_not_authenticated_routes_to_entry() {
        let screen = api_error(&ApiError::NotAuthenticated, "ignored");
        assert_eq!(screen.route, Some(Route::Entry));
        assert_eq!(
            screen.notice.unwrap().message,
            "Please sign in to continue."
        );
    }

    #[test]
    fn test_logged_in_routes_to_library() {
        let screen = logged_in();
        assert_eq!(screen.route, Some(Route::Library));
        assert!(!screen.is_error());

        let lib = Library {
            books: vec![book(1, "Dune", Some("reading"))],
            progress: vec![],
        };
        let combined = screen.then(library(&lib));
        assert_eq!(
            combined.notice.unwrap().message,
            "Signed in! Redirecting to your library..."
        );
        assert_eq!(combined.route, None);
        assert!(combined.lines[0].starts_with("Your library (1 books"));
    }

    #[test]
    fn test_library_rendering() {
        let lib = Library {
            books: vec![
                book(1, "Dune", Some("reading")),
                book(2, "Emma", Some("finished")),
                book(3, "A Very Long Title That Goes On And On Past The Column Width", None),
            ],
            progress: vec![ListeningProgress { total_listen_time: 5400 }],
        };
        let screen = library(&lib);
        assert_eq!(screen.lines[0], "Your library (3 books, 1h 30m listened)");
        assert_eq!(screen.lines[1], "  #1     Dune by Author [Fiction] (reading)");
        assert!(screen.lines[3].contains("..."));
        assert_eq!(
            screen.lines.last().unwrap(),
            "Status: 1 finished, 1 reading, 1 unknown"
        );
        assert!(screen.data.is_some());
    }

    #[test]
    fn test_empty_library() {
        let lib = Library {
            books: vec![],
            progress: vec![],
        };
        assert_eq!(library(&lib).lines, vec!["Your library is empty.".to_string()]);
    }

    #[test]
    fn test_dashboard_rendering() {
        let dashboard = Dashboard {
            profile: UserProfile {
                username: "ada".to_string(),
                email: "ada@example.com".to_string(),
                account_type: "premium".to_string(),
                is_public: true,
                region: Some("CA".to_string()),
                books_read: 3,
                created_at: Some("2024-01-15T09:30:00Z".to_string()),
            },
            subscription: subscription_status(true, Some(true)),
            books: vec![book(1, "Dune", None)],
            progress: vec![ListeningProgress { total_listen_time: 720 }],
        };
        let screen = super::dashboard(&dashboard);

        assert_eq!(screen.lines[0], "ada <ada@example.com>");
        assert!(screen.lines.contains(&"  Member since: Jan 15, 2024".to_string()));
        assert!(screen.lines.contains(&"Subscription: Premium Monthly (active)".to_string()));
        assert!(screen.lines.contains(&"  Cancels on:   Jun 01, 2024".to_string()));
        assert_eq!(screen.lines.last().unwrap(), "Library: 1 books, 12m listened");
    }

    #[test]
    fn test_free_account_subscription() {
        let screen = subscription(&subscription_status(false, None));
        assert_eq!(screen.lines, vec!["Subscription: none (free account)".to_string()]);
    }

    #[test]
    fn test_subscription_canceled_uses_server_message() {
        let response = CancelSubscriptionResponse {
            message: "Subscription will be canceled".to_string(),
            cancel_at_period_end: true,
            period_end: Some("2024-06-01T00:00:00Z".to_string()),
        };
        let screen = subscription_canceled(&response);
        assert_eq!(screen.notice.unwrap().message, "Subscription will be canceled");
        assert_eq!(screen.lines, vec!["You keep access until Jun 01, 2024.".to_string()]);
        assert_eq!(screen.data.unwrap()["cancel_at_period_end"], true);
    }

    #[test]
    fn test_session_status_signed_out() {
        let info = SessionInfo {
            environment: Environment::Local,
            base_url: "http://localhost:8080".to_string(),
            storage: Some(TokenStorage::File),
            token: None,
            saved_at: None,
            last_username: None,
        };
        let screen = session_status(&info);
        assert!(screen.lines.contains(&"Session:      signed out".to_string()));
        assert_eq!(screen.route, Some(Route::Entry));
    }

    #[test]
    fn test_book_removed_and_account_deleted_defaults() {
        let empty = MessageResponse::default();
        assert_eq!(
            book_removed(7, &empty).notice.unwrap().message,
            "Book #7 removed from your library."
        );
        let deleted = account_deleted(&empty);
        assert_eq!(deleted.route, Some(Route::Entry));
        assert_eq!(deleted.notice.unwrap().message, "Your account has been deleted.");
    }
}
