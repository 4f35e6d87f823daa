//! Handle for communicating with the search pipeline actor.

use tokio::sync::{mpsc, oneshot, watch};

use super::commands::PipelineCommand;
use super::state::SearchState;
use crate::CinescopeError;

/// Handle for communicating with the search pipeline actor.
///
/// Cheap to clone. State is observed through a watch channel, so readers
/// never block the actor.
#[derive(Debug, Clone)]
pub struct SearchPipelineHandle {
    sender: mpsc::Sender<PipelineCommand>,
    state: watch::Receiver<SearchState>,
}

impl SearchPipelineHandle {
    pub(crate) fn new(
        sender: mpsc::Sender<PipelineCommand>,
        state: watch::Receiver<SearchState>,
    ) -> Self {
        Self { sender, state }
    }

    /// Replaces the raw query, as on every keystroke.
    ///
    /// The query is dispatched once input has been quiet for the debounce window.
    ///
    /// # Errors
    /// - `CinescopeError::PipelineShutdown` - The actor has stopped
    pub async fn type_query(&self, query: impl Into<String>) -> Result<(), CinescopeError> {
        self.sender
            .send(PipelineCommand::Keystroke {
                query: query.into(),
            })
            .await
            .map_err(|_| CinescopeError::PipelineShutdown)
    }

    /// Dispatches a query immediately and returns its generation.
    ///
    /// Returns `None` when the query equals the one already dispatched.
    ///
    /// # Errors
    /// - `CinescopeError::PipelineShutdown` - The actor has stopped
    pub async fn submit_query(
        &self,
        query: impl Into<String>,
    ) -> Result<Option<u64>, CinescopeError> {
        let (responder, rx) = oneshot::channel();
        let cmd = PipelineCommand::Submit {
            query: query.into(),
            responder,
        };

        self.sender
            .send(cmd)
            .await
            .map_err(|_| CinescopeError::PipelineShutdown)?;

        rx.await.map_err(|_| CinescopeError::PipelineShutdown)
    }

    /// Submits `query` and waits until its fetch (or a newer one) has settled.
    ///
    /// # Errors
    /// - `CinescopeError::PipelineShutdown` - The actor stopped before settling
    pub async fn search(&self, query: impl Into<String>) -> Result<SearchState, CinescopeError> {
        match self.submit_query(query).await? {
            Some(generation) => self.wait_for_generation(generation).await,
            None => Ok(self.state()),
        }
    }

    /// Waits until a generation at or after `generation` is no longer loading.
    ///
    /// # Errors
    /// - `CinescopeError::PipelineShutdown` - The actor stopped before settling
    pub async fn wait_for_generation(&self, generation: u64) -> Result<SearchState, CinescopeError> {
        let mut state = self.state.clone();
        state
            .wait_for(|current| current.generation >= generation && !current.is_loading)
            .await
            .map(|current| current.clone())
            .map_err(|_| CinescopeError::PipelineShutdown)
    }

    /// Snapshot of the current state.
    pub fn state(&self) -> SearchState {
        self.state.borrow().clone()
    }

    /// Receiver that wakes on every state change.
    pub fn subscribe(&self) -> watch::Receiver<SearchState> {
        self.state.clone()
    }

    /// Shuts down the actor after outstanding trending writes complete.
    ///
    /// # Errors
    /// - `CinescopeError::PipelineShutdown` - The actor had already stopped
    pub async fn shutdown(&self) -> Result<(), CinescopeError> {
        let (responder, rx) = oneshot::channel();

        self.sender
            .send(PipelineCommand::Shutdown { responder })
            .await
            .map_err(|_| CinescopeError::PipelineShutdown)?;

        rx.await.map_err(|_| CinescopeError::PipelineShutdown)
    }
}
