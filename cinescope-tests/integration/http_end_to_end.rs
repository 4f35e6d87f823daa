//! Full wire path: TMDB and Appwrite clients against mock HTTP servers.

use std::sync::Arc;

use cinescope_core::config::{CatalogConfig, SearchConfig, TrendingConfig};
use cinescope_core::spawn_search_pipeline;
use cinescope_core::trending::AppwriteTrendingStore;
use cinescope_search::TmdbCatalog;
use mockito::{Matcher, Server};
use serde_json::json;

const DOCUMENTS_PATH: &str = "/v1/databases/movies/collections/metrics/documents";

fn catalog_for(server: &Server) -> anyhow::Result<TmdbCatalog> {
    let config = CatalogConfig {
        base_url: format!("{}/3", server.url()),
        api_token: "test-token".to_string(),
        ..Default::default()
    };
    Ok(TmdbCatalog::new(&config)?)
}

fn store_for(server: &Server) -> anyhow::Result<AppwriteTrendingStore> {
    let config = TrendingConfig {
        endpoint: format!("{}/v1", server.url()),
        project_id: "cinescope".to_string(),
        api_key: None,
        database_id: "movies".to_string(),
        collection_id: "metrics".to_string(),
        limit: 5,
    };
    Ok(AppwriteTrendingStore::new(&config)?)
}

#[tokio::test]
async fn test_search_fetches_and_records_first_result() -> anyhow::Result<()> {
    let mut server = Server::new_async().await;
    let search = server
        .mock("GET", "/3/search/movie")
        .match_query(Matcher::UrlEncoded("query".into(), "batman begins".into()))
        .match_header("authorization", "Bearer test-token")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(
            json!({
                "page": 1,
                "results": [
                    {"id": 272, "title": "Batman Begins", "poster_path": "/bb.jpg", "vote_average": 7.7},
                    {"id": 268, "title": "Batman", "poster_path": null, "vote_average": 7.2}
                ]
            })
            .to_string(),
        )
        .expect(1)
        .create_async()
        .await;
    let lookup = server
        .mock("GET", DOCUMENTS_PATH)
        .match_query(Matcher::Any)
        .match_header("x-appwrite-project", "cinescope")
        .with_status(200)
        .with_body(r#"{"total":0,"documents":[]}"#)
        .expect(1)
        .create_async()
        .await;
    let create = server
        .mock("POST", DOCUMENTS_PATH)
        .match_body(Matcher::PartialJson(json!({
            "data": {
                "searchTerm": "batman begins",
                "count": 1,
                "movie_id": 272,
                "poster_url": "https://image.tmdb.org/t/p/w500/bb.jpg"
            }
        })))
        .with_status(201)
        .with_body(r#"{"$id":"created"}"#)
        .expect(1)
        .create_async()
        .await;

    let handle = spawn_search_pipeline(
        Arc::new(catalog_for(&server)?),
        Arc::new(store_for(&server)?),
        &SearchConfig::default(),
    );
    let state = handle.search("batman begins").await?;
    handle.shutdown().await?;

    assert_eq!(state.movies.len(), 2);
    assert_eq!(state.movies[0].id, 272);
    assert_eq!(state.error_message, None);
    search.assert_async().await;
    lookup.assert_async().await;
    create.assert_async().await;
    Ok(())
}

#[tokio::test]
async fn test_rejected_key_is_shown_and_nothing_recorded() -> anyhow::Result<()> {
    let mut server = Server::new_async().await;
    server
        .mock("GET", "/3/search/movie")
        .match_query(Matcher::Any)
        .with_status(200)
        .with_body(r#"{"Response":"False","Error":"Invalid API key"}"#)
        .create_async()
        .await;
    let store_calls = server
        .mock("GET", Matcher::Regex("^/v1/".to_string()))
        .expect(0)
        .create_async()
        .await;

    let handle = spawn_search_pipeline(
        Arc::new(catalog_for(&server)?),
        Arc::new(store_for(&server)?),
        &SearchConfig::default(),
    );
    let state = handle.search("batman").await?;
    handle.shutdown().await?;

    assert!(state.movies.is_empty());
    assert_eq!(state.error_message.as_deref(), Some("Invalid API key"));
    store_calls.assert_async().await;
    Ok(())
}

#[tokio::test]
async fn test_server_error_shows_generic_message() -> anyhow::Result<()> {
    let mut server = Server::new_async().await;
    server
        .mock("GET", "/3/discover/movie")
        .match_query(Matcher::UrlEncoded("sort_by".into(), "popularity.desc".into()))
        .with_status(503)
        .create_async()
        .await;

    let handle = spawn_search_pipeline(
        Arc::new(catalog_for(&server)?),
        Arc::new(store_for(&server)?),
        &SearchConfig::default(),
    );
    let state = handle.search("").await?;
    handle.shutdown().await?;

    assert_eq!(
        state.error_message.as_deref(),
        Some("Error fetching movies. Please try again later.")
    );
    Ok(())
}

#[tokio::test]
async fn test_store_outage_keeps_results() -> anyhow::Result<()> {
    let mut server = Server::new_async().await;
    server
        .mock("GET", "/3/search/movie")
        .match_query(Matcher::Any)
        .with_status(200)
        .with_body(r#"{"results":[{"id":603,"title":"The Matrix"}]}"#)
        .create_async()
        .await;
    server
        .mock("GET", DOCUMENTS_PATH)
        .match_query(Matcher::Any)
        .with_status(500)
        .with_body(r#"{"message":"Server Error","code":500}"#)
        .create_async()
        .await;

    let handle = spawn_search_pipeline(
        Arc::new(catalog_for(&server)?),
        Arc::new(store_for(&server)?),
        &SearchConfig::default(),
    );
    let state = handle.search("matrix").await?;
    handle.shutdown().await?;

    assert_eq!(state.movies.len(), 1);
    assert_eq!(state.error_message, None);
    Ok(())
}
