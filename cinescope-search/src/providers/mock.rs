//! Scripted catalog for testing.

use std::collections::HashMap;
use std::time::Duration;

use async_trait::async_trait;
use parking_lot::Mutex;

use super::CatalogProvider;
use crate::errors::FetchError;
use crate::types::{CatalogRequest, MovieSummary};

/// Canned answer for one query.
#[derive(Debug, Clone)]
pub struct MockResponse {
    /// What the catalog returns
    pub outcome: Result<Vec<MovieSummary>, FetchError>,
    /// How long the catalog takes to answer
    pub delay: Duration,
}

impl MockResponse {
    /// Immediate successful response.
    pub fn movies(movies: Vec<MovieSummary>) -> Self {
        Self {
            outcome: Ok(movies),
            delay: Duration::ZERO,
        }
    }

    /// Immediate failed response.
    pub fn error(error: FetchError) -> Self {
        Self {
            outcome: Err(error),
            delay: Duration::ZERO,
        }
    }

    /// Answers after `delay`.
    pub fn delayed(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }
}

/// Mock catalog answering from a script and recording every request.
///
/// Queries without a scripted response return an empty list.
#[derive(Debug, Default)]
pub struct MockCatalog {
    responses: Mutex<HashMap<String, MockResponse>>,
    requests: Mutex<Vec<CatalogRequest>>,
}

impl MockCatalog {
    /// Creates a mock catalog with no scripted responses.
    pub fn new() -> Self {
        Self::default()
    }

    /// Scripts the answer for `query`.
    pub fn respond(self, query: &str, response: MockResponse) -> Self {
        self.responses.lock().insert(query.to_string(), response);
        self
    }

    /// Every request received so far, in arrival order.
    pub fn requests(&self) -> Vec<CatalogRequest> {
        self.requests.lock().clone()
    }
}

#[async_trait]
impl CatalogProvider for MockCatalog {
    async fn fetch_movies(&self, query: &str) -> Result<Vec<MovieSummary>, FetchError> {
        self.requests.lock().push(CatalogRequest::from_query(query));

        let response = self
            .responses
            .lock()
            .get(query)
            .cloned()
            .unwrap_or_else(|| MockResponse::movies(Vec::new()));

        if !response.delay.is_zero() {
            tokio::time::sleep(response.delay).await;
        }

        response.outcome
    }
}
