//! Keystroke-to-render scenarios against scripted doubles on a paused clock.

use std::time::Duration;

use cinescope_search::{CatalogRequest, MockCatalog, MockResponse};
use proptest::prelude::*;

use crate::doubles::{Harness, RecordingStore, WINDOW, movies};

fn search(query: &str) -> CatalogRequest {
    CatalogRequest::Search(query.to_string())
}

#[tokio::test(start_paused = true)]
async fn test_each_typing_pause_dispatches_once() -> anyhow::Result<()> {
    let catalog = MockCatalog::new()
        .respond("bat", MockResponse::movies(movies(&[(1, "Bat Thing")])))
        .respond(
            "batman",
            MockResponse::movies(movies(&[(272, "Batman Begins"), (268, "Batman")])),
        );
    let harness = Harness::spawn(catalog, RecordingStore::new());

    harness
        .type_burst(&["b", "ba", "bat"], Duration::from_millis(100))
        .await?;
    harness.handle.wait_for_generation(1).await?;

    harness
        .type_burst(&["batm", "batma", "batman"], Duration::from_millis(100))
        .await?;
    let state = harness.handle.wait_for_generation(2).await?;
    harness.handle.shutdown().await?;

    assert_eq!(state.query, "batman");
    assert_eq!(state.movies[0].id, 272);
    assert_eq!(harness.catalog.requests(), vec![search("bat"), search("batman")]);
    assert_eq!(
        harness.store.calls(),
        vec![("bat".to_string(), 1), ("batman".to_string(), 272)]
    );
    Ok(())
}

#[tokio::test(start_paused = true)]
async fn test_retyping_the_same_query_does_not_refetch() -> anyhow::Result<()> {
    let catalog = MockCatalog::new()
        .respond("matrix", MockResponse::movies(movies(&[(603, "The Matrix")])));
    let harness = Harness::spawn(catalog, RecordingStore::new());

    harness.type_burst(&["matrix"], Duration::ZERO).await?;
    harness.handle.wait_for_generation(1).await?;

    harness
        .type_burst(&["matri", "matrix"], Duration::from_millis(50))
        .await?;
    tokio::time::sleep(WINDOW * 3).await;
    harness.handle.shutdown().await?;

    assert_eq!(harness.handle.state().generation, 1);
    assert_eq!(harness.catalog.requests(), vec![search("matrix")]);
    assert_eq!(harness.store.calls().len(), 1);
    Ok(())
}

#[tokio::test(start_paused = true)]
async fn test_typed_query_superseded_while_in_flight() -> anyhow::Result<()> {
    let catalog = MockCatalog::new()
        .respond(
            "batman",
            MockResponse::movies(movies(&[(268, "Batman")])).delayed(Duration::from_secs(3)),
        )
        .respond(
            "matrix",
            MockResponse::movies(movies(&[(603, "The Matrix")])).delayed(Duration::from_millis(200)),
        );
    let harness = Harness::spawn(catalog, RecordingStore::new());

    harness.type_burst(&["batman"], WINDOW * 2).await?;
    assert!(harness.handle.state().is_loading);

    harness.type_burst(&["matrix"], Duration::ZERO).await?;
    harness.handle.wait_for_generation(2).await?;

    // Long enough for the batman response to land.
    tokio::time::sleep(Duration::from_secs(5)).await;
    harness.handle.shutdown().await?;

    let state = harness.handle.state();
    assert_eq!(state.query, "matrix");
    assert_eq!(state.movies[0].id, 603);
    assert!(!state.is_loading);
    assert_eq!(harness.store.calls(), vec![("matrix".to_string(), 603)]);
    Ok(())
}

#[tokio::test(start_paused = true)]
async fn test_store_failure_is_not_shown_to_the_user() -> anyhow::Result<()> {
    let catalog = MockCatalog::new()
        .respond("matrix", MockResponse::movies(movies(&[(603, "The Matrix")])));
    let harness = Harness::spawn(catalog, RecordingStore::failing());

    let state = harness.handle.search("matrix").await?;
    harness.handle.shutdown().await?;

    assert_eq!(state.movies.len(), 1);
    assert_eq!(state.error_message, None);
    assert_eq!(harness.store.calls().len(), 1);
    Ok(())
}

#[tokio::test(start_paused = true)]
async fn test_clearing_the_query_returns_to_discover() -> anyhow::Result<()> {
    let catalog = MockCatalog::new()
        .respond("", MockResponse::movies(movies(&[(157336, "Interstellar")])))
        .respond("dune", MockResponse::movies(movies(&[(438631, "Dune")])));
    let harness = Harness::spawn(catalog, RecordingStore::new());

    harness.handle.search("").await?;
    harness.type_burst(&["d", "du", "dune"], Duration::from_millis(10)).await?;
    harness.handle.wait_for_generation(2).await?;
    harness.type_burst(&["dun", "du", "d", ""], Duration::from_millis(10)).await?;
    let state = harness.handle.wait_for_generation(3).await?;
    harness.handle.shutdown().await?;

    assert_eq!(state.movies[0].id, 157336);
    assert_eq!(
        harness.catalog.requests(),
        vec![CatalogRequest::Discover, search("dune"), CatalogRequest::Discover]
    );
    assert_eq!(harness.store.calls(), vec![("dune".to_string(), 438631)]);
    Ok(())
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(32))]

    #[test]
    fn test_bursts_inside_the_window_fetch_only_the_last_query(
        queries in prop::collection::vec("[a-z]{1,8}", 1..8),
        gaps in prop::collection::vec(0u64..400, 8),
    ) {
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_time()
            .start_paused(true)
            .build()?;

        let requests = runtime.block_on(async {
            let harness = Harness::spawn(MockCatalog::new(), RecordingStore::new());

            for (query, gap) in queries.iter().zip(&gaps) {
                harness.handle.type_query(query.as_str()).await?;
                tokio::time::sleep(Duration::from_millis(*gap)).await;
            }
            tokio::time::sleep(WINDOW * 2).await;
            harness.handle.shutdown().await?;

            anyhow::Ok(harness.catalog.requests())
        });

        let requests = requests.map_err(|e| TestCaseError::fail(e.to_string()))?;
        let last = queries.last().cloned().unwrap_or_default();
        prop_assert_eq!(requests, vec![search(&last)]);
    }
}
