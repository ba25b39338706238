use chrono::{Datelike, NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};

/// Movie summary as returned by list and search endpoints.
///
/// Every field is always populated. Values coming from the API must go through
/// the transform layer in `reelmark-sources` before they become a `Movie`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct Movie {
    pub id: u64,
    pub title: String,
    pub overview: String,
    pub poster_path: Option<String>,
    pub backdrop_path: Option<String>,
    pub release_date: String, // ISO date ("2025-07-20") or empty
    pub vote_average: f64,
    pub vote_count: u64,
    pub genre_ids: Vec<u64>,
    pub adult: bool,
    pub original_language: String,
    pub original_title: String,
    pub popularity: f64,
    pub video: bool,
}

impl Movie {
    /// Release date as a UTC millisecond timestamp, if the date parses.
    pub fn release_timestamp(&self) -> Option<i64> {
        NaiveDate::parse_from_str(&self.release_date, "%Y-%m-%d")
            .ok()
            .map(|date| date.and_time(NaiveTime::MIN).and_utc().timestamp_millis())
    }

    /// Four digit release year, if known.
    pub fn release_year(&self) -> Option<i32> {
        NaiveDate::parse_from_str(&self.release_date, "%Y-%m-%d")
            .ok()
            .map(|date| date.year())
    }
}
