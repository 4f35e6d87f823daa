//! Trending store backed by an Appwrite document collection.
//!
//! One document per normalized search term:
//! `{ searchTerm, count, movie_id, poster_url, title }`.

use async_trait::async_trait;
use cinescope_search::MovieSummary;
use reqwest::header::{CONTENT_TYPE, HeaderMap, HeaderValue};
use serde::Deserialize;
use serde_json::{Value, json};

use super::{StoreError, TrendingEntry, TrendingStore, normalize_search_term};
use crate::config::TrendingConfig;

/// Appwrite REST client scoped to the trending collection.
#[derive(Debug, Clone)]
pub struct AppwriteTrendingStore {
    client: reqwest::Client,
    documents_url: String,
}

#[derive(Debug, Deserialize)]
struct DocumentList {
    #[serde(default)]
    documents: Vec<Value>,
}

impl AppwriteTrendingStore {
    /// Creates a store client from connection settings.
    ///
    /// # Errors
    ///
    /// - `StoreError::Transport` - If the endpoint is invalid, a credential is not a valid
    ///   header value, or the HTTP client cannot be built
    pub fn new(config: &TrendingConfig) -> Result<Self, StoreError> {
        let endpoint = config.endpoint.trim_end_matches('/');
        url::Url::parse(endpoint).map_err(|e| StoreError::Transport {
            reason: format!("invalid store endpoint '{endpoint}': {e}"),
        })?;

        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        headers.insert("x-appwrite-project", header_value(&config.project_id)?);
        if let Some(api_key) = &config.api_key {
            headers.insert("x-appwrite-key", header_value(api_key)?);
        }

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .build()?;

        let documents_url = format!(
            "{endpoint}/databases/{}/collections/{}/documents",
            urlencoding::encode(&config.database_id),
            urlencoding::encode(&config.collection_id),
        );

        Ok(Self {
            client,
            documents_url,
        })
    }

    async fn list_documents(&self, queries: &[String]) -> Result<Vec<TrendingEntry>, StoreError> {
        let params: Vec<(&str, &str)> = queries
            .iter()
            .map(|query| ("queries[]", query.as_str()))
            .collect();

        let response = self
            .client
            .get(&self.documents_url)
            .query(&params)
            .send()
            .await?;
        let list: DocumentList = decode(response).await?;

        list.documents
            .into_iter()
            .map(|document| {
                serde_json::from_value(document).map_err(|e| StoreError::MalformedDocument {
                    reason: e.to_string(),
                })
            })
            .collect()
    }

    async fn create_document(&self, entry: &TrendingEntry) -> Result<(), StoreError> {
        let body = json!({
            "documentId": entry.id,
            "data": {
                "searchTerm": entry.search_term,
                "count": entry.count,
                "movie_id": entry.movie_id,
                "poster_url": entry.poster_url,
                "title": entry.title,
            }
        });

        let response = self
            .client
            .post(&self.documents_url)
            .json(&body)
            .send()
            .await?;
        decode::<Value>(response).await.map(|_| ())
    }

    async fn update_count(&self, document_id: &str, count: u64) -> Result<(), StoreError> {
        let url = format!("{}/{}", self.documents_url, urlencoding::encode(document_id));
        let body = json!({ "data": { "count": count } });

        let response = self.client.patch(&url).json(&body).send().await?;
        decode::<Value>(response).await.map(|_| ())
    }
}

#[async_trait]
impl TrendingStore for AppwriteTrendingStore {
    async fn record_search(
        &self,
        query: &str,
        top_result: &MovieSummary,
    ) -> Result<(), StoreError> {
        let search_term = normalize_search_term(query);
        let existing = self
            .list_documents(&[equal_query("searchTerm", &search_term), limit_query(1)])
            .await?;

        // Read-then-write: two concurrent first searches may both create
        match existing.into_iter().next() {
            Some(entry) => {
                tracing::debug!(%search_term, count = entry.count + 1, "Incrementing search count");
                self.update_count(&entry.id, entry.count + 1).await
            }
            None => {
                tracing::debug!(%search_term, movie_id = top_result.id, "Creating trending entry");
                let id = uuid::Uuid::new_v4().simple().to_string();
                self.create_document(&TrendingEntry::first_search(id, search_term, top_result))
                    .await
            }
        }
    }

    async fn fetch_trending(&self, limit: usize) -> Result<Vec<TrendingEntry>, StoreError> {
        self.list_documents(&[order_desc_query("count"), limit_query(limit)])
            .await
    }
}

fn header_value(value: &str) -> Result<HeaderValue, StoreError> {
    HeaderValue::from_str(value).map_err(|e| StoreError::Transport {
        reason: format!("invalid credential header: {e}"),
    })
}

fn equal_query(attribute: &str, value: &str) -> String {
    format!(
        r#"{{"method":"equal","attribute":{},"values":[{}]}}"#,
        Value::from(attribute),
        Value::from(value)
    )
}

fn order_desc_query(attribute: &str) -> String {
    format!(
        r#"{{"method":"orderDesc","attribute":{}}}"#,
        Value::from(attribute)
    )
}

fn limit_query(limit: usize) -> String {
    format!(r#"{{"method":"limit","values":[{limit}]}}"#)
}

/// Maps non-2xx responses to `Rejected`, preferring the store's own message.
async fn decode<T: serde::de::DeserializeOwned>(
    response: reqwest::Response,
) -> Result<T, StoreError> {
    let status = response.status();
    if !status.is_success() {
        let text = response.text().await.unwrap_or_default();
        let message = serde_json::from_str::<Value>(&text)
            .ok()
            .and_then(|body| body.get("message").and_then(Value::as_str).map(str::to_string))
            .unwrap_or(text);
        return Err(StoreError::Rejected {
            status: status.as_u16(),
            message,
        });
    }

    response
        .json()
        .await
        .map_err(|e| StoreError::MalformedDocument {
            reason: e.to_string(),
        })
}
