//! Test doubles shared across integration scenarios.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use cinescope_core::config::SearchConfig;
use cinescope_core::trending::{StoreError, TrendingEntry, TrendingStore};
use cinescope_core::{SearchPipelineHandle, spawn_search_pipeline};
use cinescope_search::{MockCatalog, MovieSummary};
use parking_lot::Mutex;

/// Debounce window used by the scripted scenarios.
pub const WINDOW: Duration = Duration::from_millis(500);

/// Trending store that only remembers which searches it was asked to record.
#[derive(Debug, Default)]
pub struct RecordingStore {
    calls: Mutex<Vec<(String, i64)>>,
    failing: bool,
}

impl RecordingStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store that records the call and then fails it.
    pub fn failing() -> Self {
        Self {
            failing: true,
            ..Self::default()
        }
    }

    /// `(query, top result id)` for every `record_search` call.
    pub fn calls(&self) -> Vec<(String, i64)> {
        self.calls.lock().clone()
    }
}

#[async_trait]
impl TrendingStore for RecordingStore {
    async fn record_search(
        &self,
        query: &str,
        top_result: &MovieSummary,
    ) -> Result<(), StoreError> {
        self.calls.lock().push((query.to_string(), top_result.id));

        if self.failing {
            return Err(StoreError::Transport {
                reason: "connection reset".to_string(),
            });
        }
        Ok(())
    }

    async fn fetch_trending(&self, _limit: usize) -> Result<Vec<TrendingEntry>, StoreError> {
        Ok(Vec::new())
    }
}

pub fn movies(entries: &[(i64, &str)]) -> Vec<MovieSummary> {
    entries
        .iter()
        .map(|(id, title)| MovieSummary::new(*id, *title))
        .collect()
}

pub struct Harness {
    pub handle: SearchPipelineHandle,
    pub catalog: Arc<MockCatalog>,
    pub store: Arc<RecordingStore>,
}

impl Harness {
    pub fn spawn(catalog: MockCatalog, store: RecordingStore) -> Self {
        let catalog = Arc::new(catalog);
        let store = Arc::new(store);
        let config = SearchConfig {
            debounce_window: WINDOW,
            ..Default::default()
        };
        let handle = spawn_search_pipeline(catalog.clone(), store.clone(), &config);

        Self {
            handle,
            catalog,
            store,
        }
    }

    /// Types each query with `gap` between keystrokes.
    pub async fn type_burst(&self, queries: &[&str], gap: Duration) -> anyhow::Result<()> {
        for query in queries {
            self.handle.type_query(*query).await?;
            tokio::time::sleep(gap).await;
        }
        Ok(())
    }
}
