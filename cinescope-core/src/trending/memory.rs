//! In-process trending store for demo mode and tests.

use async_trait::async_trait;
use cinescope_search::MovieSummary;
use parking_lot::Mutex;

use super::{StoreError, TrendingEntry, TrendingStore, normalize_search_term, rank};

/// Trending store that keeps its documents in memory.
///
/// Same keying and ranking as the remote store; nothing survives the process.
#[derive(Debug, Default)]
pub struct InMemoryTrendingStore {
    entries: Mutex<Vec<TrendingEntry>>,
}

impl InMemoryTrendingStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Counter for `query`, zero when never searched.
    pub fn count_for(&self, query: &str) -> u64 {
        let search_term = normalize_search_term(query);
        self.entries
            .lock()
            .iter()
            .find(|entry| entry.search_term == search_term)
            .map_or(0, |entry| entry.count)
    }
}

#[async_trait]
impl TrendingStore for InMemoryTrendingStore {
    async fn record_search(
        &self,
        query: &str,
        top_result: &MovieSummary,
    ) -> Result<(), StoreError> {
        let search_term = normalize_search_term(query);
        let mut entries = self.entries.lock();

        match entries
            .iter_mut()
            .find(|entry| entry.search_term == search_term)
        {
            Some(entry) => entry.count += 1,
            None => {
                let id = uuid::Uuid::new_v4().simple().to_string();
                entries.push(TrendingEntry::first_search(id, search_term, top_result));
            }
        }

        Ok(())
    }

    async fn fetch_trending(&self, limit: usize) -> Result<Vec<TrendingEntry>, StoreError> {
        Ok(rank(self.entries.lock().clone(), limit))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_counts_accumulate_per_normalized_term() {
        let store = InMemoryTrendingStore::new();
        let movie = MovieSummary::new(268, "Batman");

        store.record_search("batman", &movie).await.unwrap();
        store.record_search("  BATMAN", &movie).await.unwrap();
        store.record_search("dune", &MovieSummary::new(1, "Dune")).await.unwrap();

        assert_eq!(store.count_for("Batman"), 2);
        assert_eq!(store.count_for("dune"), 1);
        assert_eq!(store.count_for("heat"), 0);
    }

    #[tokio::test]
    async fn test_trending_is_ranked_and_limited() {
        let store = InMemoryTrendingStore::new();
        for (query, times) in [("heat", 1), ("dune", 3), ("alien", 2)] {
            for _ in 0..times {
                store
                    .record_search(query, &MovieSummary::new(1, query))
                    .await
                    .unwrap();
            }
        }

        let top = store.fetch_trending(2).await.unwrap();

        let terms: Vec<&str> = top.iter().map(|e| e.search_term.as_str()).collect();
        assert_eq!(terms, vec!["dune", "alien"]);
    }
}
