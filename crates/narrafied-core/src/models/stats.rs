//! Listening statistics models.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "ts", derive(ts_rs::TS), ts(export))]
pub struct PlayStat {
    #[serde(alias = "bookId")]
    pub book_id: i64,
    pub title: String,
    #[serde(default)]
    pub author: Option<String>,
    #[serde(default)]
    pub genre: Option<String>,
    #[serde(alias = "playCount", default)]
    pub play_count: u64,
    #[serde(alias = "totalListenTime", default)]
    pub total_listen_time: u64,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "ts", derive(ts_rs::TS), ts(export))]
pub struct MostPlayedStats {
    #[serde(default)]
    pub books: Vec<PlayStat>,
    #[serde(alias = "totalPlays", default)]
    pub total_plays: u64,
    #[serde(alias = "totalListenTime", default)]
    pub total_listen_time: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "ts", derive(ts_rs::TS), ts(export))]
pub struct GenreStat {
    pub genre: String,
    #[serde(alias = "bookCount", default)]
    pub book_count: u64,
    #[serde(alias = "playCount", default)]
    pub play_count: u64,
    #[serde(alias = "totalListenTime", default)]
    pub total_listen_time: u64,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "ts", derive(ts_rs::TS), ts(export))]
pub struct GenreStats {
    #[serde(default)]
    pub genres: Vec<GenreStat>,
    #[serde(alias = "totalGenres", default)]
    pub total_genres: u64,
    #[serde(alias = "totalListenTime", default)]
    pub total_listen_time: u64,
}

impl GenreStats {
    /// Share of total listen time spent in `genre`, as a percentage
    pub fn share_percent(&self, genre: &GenreStat) -> f64 {
        if self.total_listen_time == 0 {
            0.0
        } else {
            genre.total_listen_time as f64 * 100.0 / self.total_listen_time as f64
        }
    }
}
