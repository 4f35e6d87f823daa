//! Error types for catalog requests.

use thiserror::Error;

/// Message shown when the catalog rejects a request without explaining why.
pub const GENERIC_REJECTION_MESSAGE: &str = "Failed to fetch movies";

/// Message shown for any network or HTTP level failure.
pub const TRANSPORT_FAILURE_MESSAGE: &str = "Error fetching movies. Please try again later.";

/// Errors that can occur while fetching movies from the catalog.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum FetchError {
    /// Network failure, non-2xx status or an undecodable body.
    #[error("Transport error: {reason}")]
    Transport {
        /// The reason for the transport failure
        reason: String,
    },

    /// The catalog answered with a well-formed negative response.
    #[error("Catalog rejected request: {0}")]
    ApiRejected(String),
}

impl FetchError {
    /// Creates a transport error from anything displayable.
    pub fn transport(reason: impl std::fmt::Display) -> Self {
        FetchError::Transport {
            reason: reason.to_string(),
        }
    }

    /// Returns the message to show in place of the result list.
    ///
    /// Rejections carry the server's own wording; transport failures are
    /// collapsed into one generic sentence.
    pub fn user_message(&self) -> String {
        match self {
            FetchError::ApiRejected(message) if !message.trim().is_empty() => message.clone(),
            FetchError::ApiRejected(_) => GENERIC_REJECTION_MESSAGE.to_string(),
            FetchError::Transport { .. } => TRANSPORT_FAILURE_MESSAGE.to_string(),
        }
    }

    /// Whether re-issuing the same request could plausibly succeed.
    pub fn is_retryable(&self) -> bool {
        matches!(self, FetchError::Transport { .. })
    }
}

impl From<reqwest::Error> for FetchError {
    fn from(error: reqwest::Error) -> Self {
        FetchError::transport(error)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rejection_prefers_server_message() {
        let error = FetchError::ApiRejected("Invalid API key".to_string());
        assert_eq!(error.user_message(), "Invalid API key");
        assert!(!error.is_retryable());
    }

    #[test]
    fn test_blank_rejection_falls_back() {
        let error = FetchError::ApiRejected("  ".to_string());
        assert_eq!(error.user_message(), GENERIC_REJECTION_MESSAGE);
    }

    #[test]
    fn test_transport_hides_details() {
        let error = FetchError::transport("connection refused");
        assert_eq!(error.user_message(), TRANSPORT_FAILURE_MESSAGE);
        assert!(error.is_retryable());
        assert!(error.to_string().contains("connection refused"));
    }
}
