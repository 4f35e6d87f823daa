//! Search pipeline state machine.
//!
//! `SearchState::apply` is the only place search state changes. It never
//! performs I/O; it returns the side effect the actor must run next.

use cinescope_search::{FetchError, MovieSummary};
use serde::Serialize;

use crate::trending::normalize_search_term;

/// Which interpretation of [`SearchState`] is active.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum SearchStatus {
    /// No query dispatched yet
    Idle,
    /// A catalog fetch for the current generation is in flight
    Loading,
    /// Movies for the current query are available (possibly none)
    Success,
    /// The current query failed; `error_message` is set
    Failure,
}

/// State shared with the presentation layer.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SearchState {
    /// Query the current generation was dispatched for
    pub query: String,
    /// Results of the last successful fetch for `query`
    pub movies: Vec<MovieSummary>,
    /// True only while the current generation's fetch is outstanding
    pub is_loading: bool,
    /// Message to show instead of results
    pub error_message: Option<String>,
    /// Incremented on every dispatch; zero until the first query
    pub generation: u64,
}

/// Inputs to the state machine.
#[derive(Debug, Clone)]
pub enum SearchEvent {
    /// The debounce stage (or a direct submit) produced a query.
    QueryDebounced(String),
    /// A catalog fetch finished.
    FetchCompleted {
        generation: u64,
        outcome: Result<Vec<MovieSummary>, FetchError>,
    },
}

/// Side effects requested by a transition.
#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    /// Fetch movies for `query`, tagging the completion with `generation`.
    FetchMovies { generation: u64, query: String },
    /// Bump the trending counter for `query`. Best-effort.
    RecordSearch {
        query: String,
        top_result: MovieSummary,
    },
}

impl SearchState {
    pub fn status(&self) -> SearchStatus {
        if self.is_loading {
            SearchStatus::Loading
        } else if self.error_message.is_some() {
            SearchStatus::Failure
        } else if self.generation == 0 {
            SearchStatus::Idle
        } else {
            SearchStatus::Success
        }
    }

    /// Applies one event and returns the effect to run, if any.
    pub fn apply(&mut self, event: SearchEvent) -> Option<Effect> {
        match event {
            SearchEvent::QueryDebounced(query) => self.dispatch(query),
            SearchEvent::FetchCompleted {
                generation,
                outcome,
            } => self.complete(generation, outcome),
        }
    }

    fn dispatch(&mut self, query: String) -> Option<Effect> {
        if self.generation > 0 && self.query == query {
            return None;
        }

        self.generation += 1;
        self.query = query.clone();
        self.is_loading = true;
        self.error_message = None;

        Some(Effect::FetchMovies {
            generation: self.generation,
            query,
        })
    }

    fn complete(
        &mut self,
        generation: u64,
        outcome: Result<Vec<MovieSummary>, FetchError>,
    ) -> Option<Effect> {
        if generation != self.generation {
            tracing::debug!(
                stale = generation,
                current = self.generation,
                "Discarding superseded catalog response"
            );
            return None;
        }

        self.is_loading = false;
        match outcome {
            Ok(movies) => {
                self.error_message = None;
                self.movies = movies;

                // Discover and whitespace-only searches have no trending key
                if normalize_search_term(&self.query).is_empty() {
                    return None;
                }
                self.movies.first().map(|top| Effect::RecordSearch {
                    query: self.query.clone(),
                    top_result: top.clone(),
                })
            }
            Err(error) => {
                tracing::warn!(query = %self.query, %error, "Catalog fetch failed");
                self.movies.clear();
                self.error_message = Some(error.user_message());
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn movies(ids: &[i64]) -> Vec<MovieSummary> {
        ids.iter()
            .map(|id| MovieSummary::new(*id, format!("Movie {id}")))
            .collect()
    }

    fn completed(generation: u64, outcome: Result<Vec<MovieSummary>, FetchError>) -> SearchEvent {
        SearchEvent::FetchCompleted {
            generation,
            outcome,
        }
    }

    #[test]
    fn test_initial_state_is_idle() {
        assert_eq!(SearchState::default().status(), SearchStatus::Idle);
    }

    #[test]
    fn test_first_empty_query_dispatches_discover() {
        let mut state = SearchState::default();

        let effect = state.apply(SearchEvent::QueryDebounced(String::new()));

        assert_eq!(
            effect,
            Some(Effect::FetchMovies {
                generation: 1,
                query: String::new()
            })
        );
        assert_eq!(state.status(), SearchStatus::Loading);
    }

    #[test]
    fn test_unchanged_query_does_not_refetch() {
        let mut state = SearchState::default();
        state.apply(SearchEvent::QueryDebounced("dune".into()));
        state.apply(completed(1, Ok(movies(&[1]))));

        assert_eq!(state.apply(SearchEvent::QueryDebounced("dune".into())), None);
        assert_eq!(state.generation, 1);
    }

    #[test]
    fn test_success_records_top_result_once() {
        let mut state = SearchState::default();
        state.apply(SearchEvent::QueryDebounced("batman".into()));

        let effect = state.apply(completed(1, Ok(movies(&[268, 272]))));

        assert_eq!(
            effect,
            Some(Effect::RecordSearch {
                query: "batman".into(),
                top_result: MovieSummary::new(268, "Movie 268"),
            })
        );
        assert_eq!(state.status(), SearchStatus::Success);
        assert_eq!(state.movies.len(), 2);
    }

    #[test]
    fn test_empty_result_list_records_nothing() {
        let mut state = SearchState::default();
        state.apply(SearchEvent::QueryDebounced("zzz".into()));

        assert_eq!(state.apply(completed(1, Ok(Vec::new()))), None);
        assert_eq!(state.status(), SearchStatus::Success);
    }

    #[test]
    fn test_discover_results_never_recorded() {
        let mut state = SearchState::default();
        state.apply(SearchEvent::QueryDebounced("dune".into()));
        state.apply(completed(1, Ok(movies(&[1]))));
        state.apply(SearchEvent::QueryDebounced(String::new()));

        assert_eq!(state.apply(completed(2, Ok(movies(&[5, 6])))), None);
        assert_eq!(state.movies.len(), 2);
    }

    #[test]
    fn test_whitespace_only_search_is_not_recorded() {
        let mut state = SearchState::default();

        let effect = state.apply(SearchEvent::QueryDebounced("   ".into()));
        assert_eq!(
            effect,
            Some(Effect::FetchMovies {
                generation: 1,
                query: "   ".into()
            })
        );

        assert_eq!(state.apply(completed(1, Ok(movies(&[157336])))), None);
        assert_eq!(state.movies.len(), 1);
    }

    #[test]
    fn test_stale_completion_is_discarded() {
        let mut state = SearchState::default();
        state.apply(SearchEvent::QueryDebounced("q1".into()));
        state.apply(SearchEvent::QueryDebounced("q2".into()));

        assert!(state.apply(completed(2, Ok(movies(&[2])))).is_some());
        let before = state.clone();
        assert_eq!(state.apply(completed(1, Ok(movies(&[1])))), None);

        assert_eq!(state, before);
        assert_eq!(state.movies[0].id, 2);
    }

    #[test]
    fn test_stale_completion_does_not_clear_loading() {
        let mut state = SearchState::default();
        state.apply(SearchEvent::QueryDebounced("q1".into()));
        state.apply(SearchEvent::QueryDebounced("q2".into()));

        state.apply(completed(1, Err(FetchError::transport("late"))));

        assert!(state.is_loading);
        assert!(state.error_message.is_none());
    }

    #[test]
    fn test_rejection_shows_server_message_and_clears_results() {
        let mut state = SearchState::default();
        state.apply(SearchEvent::QueryDebounced("a".into()));
        state.apply(completed(1, Ok(movies(&[1]))));
        state.apply(SearchEvent::QueryDebounced("ab".into()));

        let effect = state.apply(completed(
            2,
            Err(FetchError::ApiRejected("Invalid API key".into())),
        ));

        assert_eq!(effect, None);
        assert_eq!(state.status(), SearchStatus::Failure);
        assert_eq!(state.error_message.as_deref(), Some("Invalid API key"));
        assert!(state.movies.is_empty());
    }

    #[test]
    fn test_new_query_after_failure_clears_error() {
        let mut state = SearchState::default();
        state.apply(SearchEvent::QueryDebounced("a".into()));
        state.apply(completed(1, Err(FetchError::transport("down"))));

        state.apply(SearchEvent::QueryDebounced("b".into()));

        assert_eq!(state.status(), SearchStatus::Loading);
        assert!(state.error_message.is_none());
    }
}
