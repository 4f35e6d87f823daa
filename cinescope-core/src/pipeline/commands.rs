//! Command definitions for the search pipeline actor.

use tokio::sync::oneshot;

/// Commands that can be sent to the search pipeline actor.
#[derive(Debug)]
pub enum PipelineCommand {
    /// Raw input changed; goes through the debounce stage.
    Keystroke { query: String },
    /// Dispatch a query immediately, bypassing the debounce stage.
    ///
    /// Answers with the generation dispatched, or `None` when the query
    /// equals the current one.
    Submit {
        query: String,
        responder: oneshot::Sender<Option<u64>>,
    },
    /// Stop accepting input, let trending writes finish, then exit.
    Shutdown { responder: oneshot::Sender<()> },
}
