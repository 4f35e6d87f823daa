//! Trending search counters kept in a remote document store.
//!
//! Every successful non-empty search bumps a counter for its normalized
//! search term; the trending list is the top-N terms by count. Both
//! operations are best-effort: callers log failures and carry on.

use std::sync::Arc;

use async_trait::async_trait;
use cinescope_search::MovieSummary;
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub mod appwrite;
pub mod memory;
pub mod optimistic;

pub use appwrite::AppwriteTrendingStore;
pub use memory::InMemoryTrendingStore;
pub use optimistic::OptimisticTrendingStore;

/// One search term with its counter and the top result it first matched.
///
/// Title and poster are copied from the movie when the entry is created so the
/// trending list renders without a catalog lookup.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrendingEntry {
    #[serde(rename = "$id")]
    pub id: String,
    #[serde(rename = "searchTerm")]
    pub search_term: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub movie_id: i64,
    #[serde(default)]
    pub poster_url: String,
    #[serde(default)]
    pub count: u64,
}

impl TrendingEntry {
    /// Fresh entry for a term searched for the first time.
    pub fn first_search(id: String, search_term: String, top_result: &MovieSummary) -> Self {
        Self {
            id,
            search_term,
            title: top_result.title.clone(),
            movie_id: top_result.id,
            poster_url: top_result.poster_url(),
            count: 1,
        }
    }
}

/// Trending store errors.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum StoreError {
    #[error("Store transport error: {reason}")]
    Transport { reason: String },

    #[error("Store rejected request with HTTP {status}: {message}")]
    Rejected { status: u16, message: String },

    #[error("Malformed store document: {reason}")]
    MalformedDocument { reason: String },
}

impl From<reqwest::Error> for StoreError {
    fn from(error: reqwest::Error) -> Self {
        StoreError::Transport {
            reason: error.to_string(),
        }
    }
}

/// Trait for trending counter backends.
#[async_trait]
pub trait TrendingStore: Send + Sync + std::fmt::Debug {
    /// Increments the counter for `query`, creating the entry on first use.
    ///
    /// # Errors
    /// - `StoreError::Transport` - Store unreachable
    /// - `StoreError::Rejected` - Store refused the read or write
    /// - `StoreError::MalformedDocument` - Stored document could not be decoded
    async fn record_search(
        &self,
        query: &str,
        top_result: &MovieSummary,
    ) -> Result<(), StoreError>;

    /// Top `limit` entries by descending count.
    ///
    /// # Errors
    /// - `StoreError::Transport` - Store unreachable
    /// - `StoreError::Rejected` - Store refused the query
    /// - `StoreError::MalformedDocument` - Stored document could not be decoded
    async fn fetch_trending(&self, limit: usize) -> Result<Vec<TrendingEntry>, StoreError>;
}

#[async_trait]
impl<T: TrendingStore + ?Sized> TrendingStore for Arc<T> {
    async fn record_search(
        &self,
        query: &str,
        top_result: &MovieSummary,
    ) -> Result<(), StoreError> {
        (**self).record_search(query, top_result).await
    }

    async fn fetch_trending(&self, limit: usize) -> Result<Vec<TrendingEntry>, StoreError> {
        (**self).fetch_trending(limit).await
    }
}

/// Key under which a query is counted: trimmed, lower-cased, single-spaced.
pub fn normalize_search_term(query: &str) -> String {
    query
        .split_whitespace()
        .map(str::to_lowercase)
        .collect::<Vec<_>>()
        .join(" ")
}

/// Orders entries by descending count, keeping insertion order among ties.
pub(crate) fn rank(mut entries: Vec<TrendingEntry>, limit: usize) -> Vec<TrendingEntry> {
    entries.sort_by(|a, b| b.count.cmp(&a.count));
    entries.truncate(limit);
    entries
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_search_term() {
        assert_eq!(normalize_search_term("  The   MATRIX "), "the matrix");
        assert_eq!(normalize_search_term("batman"), "batman");
        assert_eq!(normalize_search_term("   "), "");
    }

    #[test]
    fn test_entry_decodes_store_document() {
        let json = r#"{
            "$id": "abc",
            "$createdAt": "2025-01-01T00:00:00.000+00:00",
            "searchTerm": "batman",
            "count": 4,
            "movie_id": 268,
            "poster_url": "https://image.tmdb.org/t/p/w500/b.jpg"
        }"#;

        let entry: TrendingEntry = serde_json::from_str(json).unwrap();

        assert_eq!(entry.id, "abc");
        assert_eq!(entry.search_term, "batman");
        assert_eq!(entry.count, 4);
        assert!(entry.title.is_empty());
    }

    #[test]
    fn test_first_search_copies_display_fields() {
        let mut movie = MovieSummary::new(603, "The Matrix");
        movie.poster_path = Some("/m.jpg".to_string());

        let entry = TrendingEntry::first_search("id".into(), "matrix".into(), &movie);

        assert_eq!(entry.count, 1);
        assert_eq!(entry.movie_id, 603);
        assert_eq!(entry.title, "The Matrix");
        assert_eq!(entry.poster_url, "https://image.tmdb.org/t/p/w500/m.jpg");
    }
}
