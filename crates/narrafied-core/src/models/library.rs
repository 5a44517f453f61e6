//! Library models: the user's books and listening progress.

use serde::{Deserialize, Serialize};

/// A book in the user's library.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "ts", derive(ts_rs::TS), ts(export))]
pub struct Book {
    pub id: i64,
    pub title: String,
    #[serde(default)]
    pub author: Option<String>,
    #[serde(default)]
    pub genre: Option<String>,
    /// Reading status as reported by the backend (e.g. "reading", "finished")
    #[serde(default)]
    pub status: Option<String>,
    #[serde(alias = "coverUrl", default)]
    pub cover_url: Option<String>,
    #[serde(alias = "streamUrl", default)]
    pub stream_url: Option<String>,
}

impl Book {
    pub fn author_display(&self) -> &str {
        match self.author.as_deref() {
            Some(a) if !a.is_empty() => a,
            _ => "Unknown author",
        }
    }

    pub fn is_streamable(&self) -> bool {
        self.stream_url.as_deref().is_some_and(|u| !u.is_empty())
    }
}

/// One listening-progress record. Listen time is in seconds.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "ts", derive(ts_rs::TS), ts(export))]
pub struct ListeningProgress {
    #[serde(alias = "totalListenTime", default)]
    pub total_listen_time: u64,
}

impl ListeningProgress {
    /// Sum listen time across all progress records
    pub fn total(records: &[ListeningProgress]) -> u64 {
        records.iter().map(|p| p.total_listen_time).sum()
    }
}
