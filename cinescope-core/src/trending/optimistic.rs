//! Optimistic decorator for trending stores.
//!
//! While a `record_search` is in flight its +1 is already visible through
//! `fetch_trending`. The pending increment is dropped once the inner store
//! answers: on success the store itself now carries it, on failure it is
//! rolled back.

use std::collections::HashMap;

use async_trait::async_trait;
use cinescope_search::MovieSummary;
use parking_lot::Mutex;

use super::{StoreError, TrendingEntry, TrendingStore, normalize_search_term, rank};

#[derive(Debug, Clone)]
struct PendingIncrement {
    count: u64,
    preview: TrendingEntry,
}

/// Wraps a store so local readers see increments before the store confirms them.
#[derive(Debug)]
pub struct OptimisticTrendingStore<S> {
    inner: S,
    pending: Mutex<HashMap<String, PendingIncrement>>,
}

impl<S: TrendingStore> OptimisticTrendingStore<S> {
    pub fn new(inner: S) -> Self {
        Self {
            inner,
            pending: Mutex::new(HashMap::new()),
        }
    }

    /// Unconfirmed increments for `query`.
    pub fn pending_count(&self, query: &str) -> u64 {
        self.pending
            .lock()
            .get(&normalize_search_term(query))
            .map_or(0, |pending| pending.count)
    }

    pub fn inner(&self) -> &S {
        &self.inner
    }

    fn settle(&self, search_term: &str) {
        let mut pending = self.pending.lock();
        if let Some(increment) = pending.get_mut(search_term) {
            increment.count -= 1;
            if increment.count == 0 {
                pending.remove(search_term);
            }
        }
    }
}

#[async_trait]
impl<S: TrendingStore> TrendingStore for OptimisticTrendingStore<S> {
    async fn record_search(
        &self,
        query: &str,
        top_result: &MovieSummary,
    ) -> Result<(), StoreError> {
        let search_term = normalize_search_term(query);
        {
            let mut pending = self.pending.lock();
            pending
                .entry(search_term.clone())
                .or_insert_with(|| PendingIncrement {
                    count: 0,
                    preview: TrendingEntry::first_search(
                        format!("pending:{search_term}"),
                        search_term.clone(),
                        top_result,
                    ),
                })
                .count += 1;
        }

        let result = self.inner.record_search(query, top_result).await;
        self.settle(&search_term);

        if let Err(error) = &result {
            tracing::debug!(%search_term, %error, "Rolled back optimistic increment");
        }
        result
    }

    async fn fetch_trending(&self, limit: usize) -> Result<Vec<TrendingEntry>, StoreError> {
        let pending = self.pending.lock().clone();
        if pending.is_empty() {
            return self.inner.fetch_trending(limit).await;
        }

        // Over-fetch so a pending term can displace a confirmed one
        let mut entries = self.inner.fetch_trending(limit + pending.len()).await?;
        for (search_term, increment) in pending {
            match entries
                .iter_mut()
                .find(|entry| entry.search_term == search_term)
            {
                Some(entry) => entry.count += increment.count,
                None => entries.push(TrendingEntry {
                    count: increment.count,
                    ..increment.preview
                }),
            }
        }

        Ok(rank(entries, limit))
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use tokio::sync::Notify;

    use super::*;
    use crate::trending::InMemoryTrendingStore;

    /// Inner store that waits for a go-ahead before answering.
    #[derive(Debug)]
    struct GatedStore {
        inner: InMemoryTrendingStore,
        gate: Arc<Notify>,
        fail: bool,
    }

    #[async_trait]
    impl TrendingStore for GatedStore {
        async fn record_search(
            &self,
            query: &str,
            top_result: &MovieSummary,
        ) -> Result<(), StoreError> {
            self.gate.notified().await;
            if self.fail {
                return Err(StoreError::Transport {
                    reason: "offline".to_string(),
                });
            }
            self.inner.record_search(query, top_result).await
        }

        async fn fetch_trending(&self, limit: usize) -> Result<Vec<TrendingEntry>, StoreError> {
            self.inner.fetch_trending(limit).await
        }
    }

    fn gated(fail: bool) -> (Arc<OptimisticTrendingStore<GatedStore>>, Arc<Notify>) {
        let gate = Arc::new(Notify::new());
        let store = OptimisticTrendingStore::new(GatedStore {
            inner: InMemoryTrendingStore::new(),
            gate: Arc::clone(&gate),
            fail,
        });
        (Arc::new(store), gate)
    }

    #[tokio::test]
    async fn test_increment_visible_before_confirmation() {
        let (store, gate) = gated(false);
        let movie = MovieSummary::new(603, "The Matrix");

        let task = {
            let store = Arc::clone(&store);
            let movie = movie.clone();
            tokio::spawn(async move { store.record_search("matrix", &movie).await })
        };
        tokio::task::yield_now().await;

        let preview = store.fetch_trending(5).await.unwrap();
        assert_eq!(preview.len(), 1);
        assert_eq!(preview[0].count, 1);
        assert_eq!(preview[0].title, "The Matrix");
        assert_eq!(store.pending_count("Matrix"), 1);

        gate.notify_one();
        task.await.unwrap().unwrap();

        assert_eq!(store.pending_count("matrix"), 0);
        let confirmed = store.fetch_trending(5).await.unwrap();
        assert_eq!(confirmed[0].count, 1);
        assert_ne!(confirmed[0].id, "pending:matrix");
    }

    #[tokio::test]
    async fn test_failed_increment_is_rolled_back() {
        let (store, gate) = gated(true);
        let movie = MovieSummary::new(603, "The Matrix");

        let task = {
            let store = Arc::clone(&store);
            tokio::spawn(async move { store.record_search("matrix", &movie).await })
        };
        tokio::task::yield_now().await;
        assert_eq!(store.pending_count("matrix"), 1);

        gate.notify_one();
        assert!(task.await.unwrap().is_err());

        assert_eq!(store.pending_count("matrix"), 0);
        assert!(store.fetch_trending(5).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_pending_adds_to_confirmed_count() {
        let (store, gate) = gated(false);
        let movie = MovieSummary::new(1, "Dune");
        store
            .inner()
            .inner
            .record_search("dune", &movie)
            .await
            .unwrap();

        let task = {
            let store = Arc::clone(&store);
            tokio::spawn(async move { store.record_search("dune", &movie).await })
        };
        tokio::task::yield_now().await;

        assert_eq!(store.fetch_trending(5).await.unwrap()[0].count, 2);

        gate.notify_one();
        task.await.unwrap().unwrap();
        assert_eq!(store.fetch_trending(5).await.unwrap()[0].count, 2);
    }
}
