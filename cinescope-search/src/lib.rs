//! Cinescope Search - Movie catalog search and discovery

#![deny(missing_docs)]
#![deny(clippy::missing_errors_doc)]
#![deny(clippy::missing_panics_doc)]
#![warn(clippy::too_many_lines)]
//!
//! Talks to a hosted movie catalog (TMDB) and normalizes its responses into
//! [`MovieSummary`] lists. Empty queries browse popular titles, anything else
//! runs a title search.

pub mod errors;
pub mod providers;
pub mod types;

// Re-export main types
pub use errors::FetchError;
pub use providers::{CatalogConfig, CatalogProvider, DemoCatalog, TmdbCatalog};
#[cfg(any(test, feature = "test-utils"))]
pub use providers::{MockCatalog, MockResponse};
pub use types::{CatalogRequest, MovieSummary};

/// Convenience type alias for Results with FetchError.
pub type Result<T> = std::result::Result<T, FetchError>;
