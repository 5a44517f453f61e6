//! Page-level data loads.
//!
//! The profile dashboard and the library page each need several
//! independent reads. They are issued concurrently and joined; if any one
//! fails the whole load fails with that error and no partial snapshot is
//! produced.

use std::collections::BTreeMap;

use serde::Serialize;
use tracing::debug;

use crate::api::{ApiClient, ApiError};
use crate::models::{Book, ListeningProgress, SubscriptionStatus, UserProfile};

/// Status label used for books the backend reports without one
const UNKNOWN_STATUS: &str = "unknown";

/// Everything the profile dashboard shows.
#[derive(Debug, Clone, Serialize)]
pub struct Dashboard {
    pub profile: UserProfile,
    pub subscription: SubscriptionStatus,
    pub books: Vec<Book>,
    pub progress: Vec<ListeningProgress>,
}

impl Dashboard {
    /// Fetch profile, subscription status, books and progress concurrently
    pub async fn load(api: &ApiClient) -> Result<Self, ApiError> {
        let (profile, subscription, books, progress) = futures::try_join!(
            api.fetch_profile(),
            api.fetch_subscription_status(),
            api.fetch_books(),
            api.fetch_progress(),
        )?;
        debug!(books = books.len(), progress = progress.len(), "Dashboard loaded");

        Ok(Self {
            profile,
            subscription,
            books,
            progress,
        })
    }

    /// Total listen time in seconds
    pub fn total_listen_time(&self) -> u64 {
        ListeningProgress::total(&self.progress)
    }

    pub fn book_count(&self) -> usize {
        self.books.len()
    }
}

/// The user's library page: books plus listening progress.
#[derive(Debug, Clone, Serialize)]
pub struct Library {
    pub books: Vec<Book>,
    pub progress: Vec<ListeningProgress>,
}

impl Library {
    pub async fn load(api: &ApiClient) -> Result<Self, ApiError> {
        let (books, progress) = futures::try_join!(api.fetch_books(), api.fetch_progress())?;
        debug!(books = books.len(), "Library loaded");
        Ok(Self { books, progress })
    }

    pub fn total_listen_time(&self) -> u64 {
        ListeningProgress::total(&self.progress)
    }

    pub fn find(&self, book_id: i64) -> Option<&Book> {
        self.books.iter().find(|b| b.id == book_id)
    }

    /// Number of books per status, sorted by status label
    pub fn status_counts(&self) -> BTreeMap<String, usize> {
        let mut counts = BTreeMap::new();
        for book in &self.books {
            let status = match book.status.as_deref() {
                Some(s) if !s.is_empty() => s.to_ascii_lowercase(),
                _ => UNKNOWN_STATUS.to_string(),
            };
            *counts.entry(status).or_insert(0) += 1;
        }
        counts
    }
}
