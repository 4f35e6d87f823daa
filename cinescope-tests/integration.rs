//! Integration tests for Cinescope
//!
//! These tests drive the search pipeline end to end: scripted catalogs and
//! stores for timing and ordering scenarios, and mock HTTP servers for the
//! full TMDB and Appwrite wire path.

#[path = "integration/doubles.rs"]
mod doubles;

#[path = "integration/pipeline_scenarios.rs"]
mod pipeline_scenarios;

#[path = "integration/http_end_to_end.rs"]
mod http_end_to_end;

#[path = "integration/trending_flow.rs"]
mod trending_flow;
