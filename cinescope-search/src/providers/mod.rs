//! Catalog provider implementations.

use std::time::Duration;

use async_trait::async_trait;

use crate::errors::FetchError;
use crate::types::MovieSummary;

pub mod demo;
#[cfg(any(test, feature = "test-utils"))]
pub mod mock;
pub mod tmdb;

pub use demo::DemoCatalog;
#[cfg(any(test, feature = "test-utils"))]
pub use mock::{MockCatalog, MockResponse};
pub use tmdb::TmdbCatalog;

/// Default catalog API root.
pub const DEFAULT_CATALOG_BASE_URL: &str = "https://api.themoviedb.org/3";

/// Trait for movie catalog backends.
///
/// Implementations turn a raw query into a normalized movie list: the hosted
/// catalog, an offline demo catalog, and scripted doubles for tests.
#[async_trait]
pub trait CatalogProvider: Send + Sync + std::fmt::Debug {
    /// Fetches movies for `query`. The empty query browses popular titles.
    ///
    /// # Errors
    /// - `FetchError::Transport` - Network failure, non-2xx status or bad body
    /// - `FetchError::ApiRejected` - Catalog returned its rejection sentinel
    async fn fetch_movies(&self, query: &str) -> Result<Vec<MovieSummary>, FetchError>;
}

/// Connection settings for the hosted catalog.
#[derive(Debug, Clone)]
pub struct CatalogConfig {
    /// API root, without trailing slash
    pub base_url: String,
    /// Bearer token sent on every request
    pub api_token: String,
    /// User agent for HTTP requests
    pub user_agent: &'static str,
    /// Per-request timeout; `None` leaves the transport default in place
    pub request_timeout: Option<Duration>,
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_CATALOG_BASE_URL.to_string(),
            api_token: String::new(),
            user_agent: "cinescope/0.1.0",
            request_timeout: None,
        }
    }
}
