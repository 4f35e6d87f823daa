//! Searches flowing into the trending list through the real store adapters.

use std::sync::Arc;

use cinescope_core::config::SearchConfig;
use cinescope_core::spawn_search_pipeline;
use cinescope_core::trending::{InMemoryTrendingStore, OptimisticTrendingStore, TrendingStore};
use cinescope_search::{DemoCatalog, MockCatalog, MockResponse};

use crate::doubles::movies;

#[tokio::test(start_paused = true)]
async fn test_repeated_searches_rank_by_count() -> anyhow::Result<()> {
    let catalog = Arc::new(
        MockCatalog::new()
            .respond("matrix", MockResponse::movies(movies(&[(603, "The Matrix")])))
            .respond("Matrix ", MockResponse::movies(movies(&[(603, "The Matrix")])))
            .respond("batman", MockResponse::movies(movies(&[(272, "Batman Begins")]))),
    );
    let store = Arc::new(InMemoryTrendingStore::new());
    let handle = spawn_search_pipeline(catalog, store.clone(), &SearchConfig::default());

    for query in ["matrix", "batman", "Matrix "] {
        handle.search(query).await?;
    }
    handle.shutdown().await?;

    let trending = store.fetch_trending(5).await?;
    let summary: Vec<(&str, u64)> = trending
        .iter()
        .map(|entry| (entry.search_term.as_str(), entry.count))
        .collect();
    assert_eq!(summary, vec![("matrix", 2), ("batman", 1)]);
    assert_eq!(trending[0].title, "The Matrix");
    assert_eq!(trending[1].movie_id, 272);
    Ok(())
}

#[tokio::test(start_paused = true)]
async fn test_trending_limit_truncates() -> anyhow::Result<()> {
    let store = Arc::new(InMemoryTrendingStore::new());
    let handle = spawn_search_pipeline(
        Arc::new(DemoCatalog::new()),
        store.clone(),
        &SearchConfig::default(),
    );

    for query in ["matrix", "dune", "inception", "batman"] {
        handle.search(query).await?;
    }
    handle.shutdown().await?;

    assert_eq!(store.fetch_trending(2).await?.len(), 2);
    assert_eq!(store.fetch_trending(10).await?.len(), 4);
    Ok(())
}

#[tokio::test(start_paused = true)]
async fn test_demo_catalog_records_most_popular_match() -> anyhow::Result<()> {
    let store = Arc::new(InMemoryTrendingStore::new());
    let handle = spawn_search_pipeline(
        Arc::new(DemoCatalog::new()),
        store.clone(),
        &SearchConfig::default(),
    );

    let discover = handle.search("").await?;
    let state = handle.search("batman").await?;
    handle.shutdown().await?;

    assert_eq!(discover.movies[0].title, "Interstellar");
    assert_eq!(state.movies.len(), 2);

    let trending = store.fetch_trending(5).await?;
    assert_eq!(trending.len(), 1);
    assert_eq!(trending[0].title, "Batman Begins");
    Ok(())
}

#[tokio::test(start_paused = true)]
async fn test_optimistic_store_settles_into_inner_counts() -> anyhow::Result<()> {
    let store = Arc::new(OptimisticTrendingStore::new(InMemoryTrendingStore::new()));
    let handle = spawn_search_pipeline(
        Arc::new(DemoCatalog::new()),
        store.clone(),
        &SearchConfig::default(),
    );

    handle.search("dune").await?;
    handle.shutdown().await?;

    assert_eq!(store.pending_count("dune"), 0);
    assert_eq!(store.inner().count_for("dune"), 1);

    let trending = store.fetch_trending(5).await?;
    assert_eq!(trending.len(), 1);
    assert_eq!(trending[0].count, 1);
    Ok(())
}

#[tokio::test(start_paused = true)]
async fn test_whitespace_only_search_leaves_trending_empty() -> anyhow::Result<()> {
    let store = Arc::new(InMemoryTrendingStore::new());
    let handle = spawn_search_pipeline(
        Arc::new(DemoCatalog::new()),
        store.clone(),
        &SearchConfig::default(),
    );

    let state = handle.search("   ").await?;
    handle.shutdown().await?;

    assert_eq!(state.error_message, None);
    assert!(store.fetch_trending(5).await?.is_empty());
    Ok(())
}
