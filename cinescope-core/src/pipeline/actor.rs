//! Actor implementation for the search pipeline.

use std::collections::HashMap;
use std::sync::Arc;

use cinescope_search::{CatalogProvider, FetchError};
use tokio::sync::{mpsc, watch};
use tokio::task::{self, JoinError, JoinSet};

use super::commands::PipelineCommand;
use super::handle::SearchPipelineHandle;
use super::state::{Effect, SearchEvent, SearchState};
use crate::config::SearchConfig;
use crate::debounce::Debouncer;
use crate::trending::TrendingStore;

/// Spawns the search pipeline actor and returns its handle.
///
/// The actor owns the [`SearchState`], the debounce stage and every
/// in-flight request. Catalog fetches and trending writes run as child
/// tasks so a slow response never blocks new keystrokes.
///
/// # Examples
/// ```rust,no_run
/// # #[tokio::main]
/// # async fn main() {
/// use std::sync::Arc;
///
/// use cinescope_core::config::SearchConfig;
/// use cinescope_core::spawn_search_pipeline;
/// use cinescope_core::trending::InMemoryTrendingStore;
/// use cinescope_search::DemoCatalog;
///
/// let handle = spawn_search_pipeline(
///     Arc::new(DemoCatalog::new()),
///     Arc::new(InMemoryTrendingStore::new()),
///     &SearchConfig::default(),
/// );
/// let state = handle.search("matrix").await.unwrap();
/// assert!(!state.movies.is_empty());
/// # }
/// ```
pub fn spawn_search_pipeline(
    catalog: Arc<dyn CatalogProvider>,
    store: Arc<dyn TrendingStore>,
    config: &SearchConfig,
) -> SearchPipelineHandle {
    let (sender, receiver) = mpsc::channel(config.command_buffer);
    let (state_sender, state_receiver) = watch::channel(SearchState::default());
    let (debounced_sender, debounced_receiver) = mpsc::channel(config.command_buffer);
    let debouncer = Debouncer::spawn(config.debounce_window, debounced_sender);

    let actor = PipelineActor {
        state: SearchState::default(),
        state_sender,
        catalog,
        store,
        debouncer,
        fetches: JoinSet::new(),
        fetch_generations: HashMap::new(),
        recordings: JoinSet::new(),
    };

    tokio::spawn(actor.run(receiver, debounced_receiver));

    SearchPipelineHandle::new(sender, state_receiver)
}

struct PipelineActor {
    state: SearchState,
    state_sender: watch::Sender<SearchState>,
    catalog: Arc<dyn CatalogProvider>,
    store: Arc<dyn TrendingStore>,
    debouncer: Debouncer<String>,
    fetches: JoinSet<SearchEvent>,
    /// Generation of every in-flight fetch task, so a panicked task still settles
    fetch_generations: HashMap<task::Id, u64>,
    recordings: JoinSet<()>,
}

impl PipelineActor {
    /// Processes commands, debounced queries and fetch completions one at a
    /// time until shutdown or until every handle is dropped.
    async fn run(
        mut self,
        mut receiver: mpsc::Receiver<PipelineCommand>,
        mut debounced: mpsc::Receiver<String>,
    ) {
        tracing::debug!(
            window_ms = self.debouncer.window().as_millis() as u64,
            "Search pipeline actor started"
        );

        loop {
            tokio::select! {
                command = receiver.recv() => match command {
                    Some(PipelineCommand::Keystroke { query }) => {
                        tracing::trace!(%query, "Keystroke");
                        self.debouncer.push(query);
                    }
                    Some(PipelineCommand::Submit { query, responder }) => {
                        let dispatched = self.handle_event(SearchEvent::QueryDebounced(query));
                        let _ = responder.send(dispatched);
                    }
                    Some(PipelineCommand::Shutdown { responder }) => {
                        self.drain_recordings().await;
                        let _ = responder.send(());
                        break;
                    }
                    None => break,
                },
                Some(query) = debounced.recv() => {
                    self.handle_event(SearchEvent::QueryDebounced(query));
                }
                Some(joined) = self.fetches.join_next() => {
                    let event = self.settle_fetch(joined);
                    self.handle_event(event);
                }
                Some(joined) = self.recordings.join_next() => {
                    if let Err(error) = joined {
                        tracing::error!(%error, "Trending write task failed");
                    }
                }
            }
        }

        tracing::debug!("Search pipeline actor stopped");
    }

    /// Applies an event, publishes the new state and runs the resulting effect.
    ///
    /// Returns the generation dispatched, if the event started a fetch.
    fn handle_event(&mut self, event: SearchEvent) -> Option<u64> {
        let effect = self.state.apply(event);
        self.publish();

        match effect? {
            Effect::FetchMovies { generation, query } => {
                tracing::debug!(generation, %query, "Dispatching catalog fetch");
                let catalog = Arc::clone(&self.catalog);
                let task = self.fetches.spawn(async move {
                    let outcome = catalog.fetch_movies(&query).await;
                    SearchEvent::FetchCompleted {
                        generation,
                        outcome,
                    }
                });
                self.fetch_generations.insert(task.id(), generation);
                Some(generation)
            }
            Effect::RecordSearch { query, top_result } => {
                let store = Arc::clone(&self.store);
                self.recordings.spawn(async move {
                    match store.record_search(&query, &top_result).await {
                        Ok(()) => tracing::debug!(%query, movie_id = top_result.id, "Search recorded"),
                        Err(error) => {
                            tracing::warn!(%query, %error, "Failed to record trending search");
                        }
                    }
                });
                None
            }
        }
    }

    /// Turns a joined fetch task into its completion event. A panicked task
    /// completes its generation as a transport failure.
    fn settle_fetch(&mut self, joined: Result<SearchEvent, JoinError>) -> SearchEvent {
        match joined {
            Ok(event) => {
                if let SearchEvent::FetchCompleted { generation, .. } = &event {
                    self.fetch_generations
                        .retain(|_, in_flight| in_flight != generation);
                }
                event
            }
            Err(error) => {
                let generation = self.fetch_generations.remove(&error.id()).unwrap_or(0);
                tracing::error!(generation, %error, "Catalog fetch task failed");
                SearchEvent::FetchCompleted {
                    generation,
                    outcome: Err(FetchError::transport("catalog task failed")),
                }
            }
        }
    }

    fn publish(&self) {
        let state = &self.state;
        self.state_sender.send_if_modified(|published| {
            if published == state {
                false
            } else {
                *published = state.clone();
                true
            }
        });
    }

    async fn drain_recordings(&mut self) {
        while let Some(joined) = self.recordings.join_next().await {
            if let Err(error) = joined {
                tracing::error!(%error, "Trending write task failed");
            }
        }
    }
}
