//! Cinescope Core - Debounced movie search pipeline
//!
//! This crate provides the moving parts between a keystroke and a rendered
//! result list: the debounce stage, the search pipeline state machine and its
//! actor, the trending search store, and configuration and tracing setup.

pub mod config;
pub mod debounce;
pub mod pipeline;
pub mod tracing_setup;
pub mod trending;

// Re-export main types for convenient access
pub use cinescope_search::{FetchError, MovieSummary};
pub use config::CinescopeConfig;
pub use debounce::Debouncer;
pub use pipeline::{SearchPipelineHandle, SearchState, SearchStatus, spawn_search_pipeline};
pub use trending::{StoreError, TrendingEntry, TrendingStore};

/// Core errors that can bubble up from any Cinescope subsystem.
#[derive(Debug, thiserror::Error)]
pub enum CinescopeError {
    #[error("Catalog error: {0}")]
    Fetch(#[from] FetchError),

    #[error("Trending store error: {0}")]
    Store(#[from] StoreError),

    #[error("Configuration error: {reason}")]
    Configuration { reason: String },

    #[error("Search pipeline stopped")]
    PipelineShutdown,

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl CinescopeError {
    /// Returns a user-friendly error message suitable for display.
    pub fn user_message(&self) -> String {
        match self {
            CinescopeError::Fetch(e) => e.user_message(),
            CinescopeError::Store(_) => "Trending movies are unavailable right now".to_string(),
            CinescopeError::Configuration { reason } => format!("Configuration error: {reason}"),
            CinescopeError::PipelineShutdown => "Search is no longer running".to_string(),
            CinescopeError::Io(_) => "Terminal I/O error occurred".to_string(),
        }
    }

    /// Checks if this error is due to missing or invalid user configuration.
    pub fn is_user_error(&self) -> bool {
        matches!(
            self,
            CinescopeError::Configuration { .. }
                | CinescopeError::Fetch(FetchError::ApiRejected(_))
        )
    }
}

pub type Result<T> = std::result::Result<T, CinescopeError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_messages() {
        let rejected = CinescopeError::from(FetchError::ApiRejected("Invalid API key".into()));
        assert_eq!(rejected.user_message(), "Invalid API key");
        assert!(rejected.is_user_error());

        let transport = CinescopeError::from(FetchError::transport("timeout"));
        assert!(!transport.is_user_error());
        assert!(transport.user_message().contains("try again"));
    }
}
