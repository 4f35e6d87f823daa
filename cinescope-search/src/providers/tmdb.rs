//! Hosted catalog client speaking the TMDB v3 REST API.

use async_trait::async_trait;
use reqwest::header::ACCEPT;

use super::{CatalogConfig, CatalogProvider};
use crate::errors::{FetchError, GENERIC_REJECTION_MESSAGE};
use crate::types::{CatalogRequest, CatalogResponse, MovieSummary};

/// Catalog client issuing authenticated GET requests.
#[derive(Debug, Clone)]
pub struct TmdbCatalog {
    client: reqwest::Client,
    base_url: String,
    api_token: String,
}

impl TmdbCatalog {
    /// Creates a catalog client from connection settings.
    ///
    /// # Errors
    ///
    /// - `FetchError::Transport` - If the base URL is invalid or the HTTP client cannot be built
    pub fn new(config: &CatalogConfig) -> Result<Self, FetchError> {
        let base_url = config.base_url.trim_end_matches('/').to_string();
        url::Url::parse(&base_url)
            .map_err(|e| FetchError::transport(format!("invalid catalog URL '{base_url}': {e}")))?;

        let mut builder = reqwest::Client::builder().user_agent(config.user_agent);
        if let Some(timeout) = config.request_timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder
            .build()
            .map_err(|e| FetchError::transport(format!("HTTP client creation failed: {e}")))?;

        Ok(Self {
            client,
            base_url,
            api_token: config.api_token.clone(),
        })
    }

    /// Full request URL for a query.
    pub fn endpoint(&self, query: &str) -> String {
        format!(
            "{}{}",
            self.base_url,
            CatalogRequest::from_query(query).path_and_query()
        )
    }
}

#[async_trait]
impl CatalogProvider for TmdbCatalog {
    async fn fetch_movies(&self, query: &str) -> Result<Vec<MovieSummary>, FetchError> {
        let url = self.endpoint(query);
        tracing::debug!(%url, "Fetching movies from catalog");

        let response = self
            .client
            .get(&url)
            .bearer_auth(&self.api_token)
            .header(ACCEPT, "application/json")
            .send()
            .await
            .map_err(|e| FetchError::transport(format!("HTTP request failed: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::transport(format!(
                "catalog returned HTTP {status}"
            )));
        }

        let body: CatalogResponse = response
            .json()
            .await
            .map_err(|e| FetchError::transport(format!("JSON parsing failed: {e}")))?;

        if body.is_rejection() {
            let message = body
                .error
                .filter(|message| !message.trim().is_empty())
                .unwrap_or_else(|| GENERIC_REJECTION_MESSAGE.to_string());
            return Err(FetchError::ApiRejected(message));
        }

        let movies = body.results.unwrap_or_default();
        tracing::debug!(query, count = movies.len(), "Catalog returned movies");
        Ok(movies)
    }
}
