//! Debounced search pipeline.
//!
//! Keystrokes flow through the debounce stage into a pure state machine
//! ([`SearchState::apply`]); an actor runs the effects it asks for and
//! publishes every new state on a watch channel. Each catalog fetch is tagged
//! with a generation so a slow response for an old query can never overwrite
//! the results of a newer one.

pub mod actor;
pub mod commands;
pub mod handle;
pub mod state;

pub use actor::spawn_search_pipeline;
pub use commands::PipelineCommand;
pub use handle::SearchPipelineHandle;
pub use state::{Effect, SearchEvent, SearchState, SearchStatus};
