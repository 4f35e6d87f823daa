//! Offline catalog for development and demos.

use std::time::Duration;

use async_trait::async_trait;

use super::CatalogProvider;
use crate::errors::FetchError;
use crate::types::MovieSummary;

/// Demo catalog backed by a fixed list of well-known films.
///
/// Discover returns the whole list by descending popularity; searches match
/// titles case-insensitively. An optional latency makes the loading state
/// visible in the terminal UI.
#[derive(Debug)]
pub struct DemoCatalog {
    movies: Vec<MovieSummary>,
    latency: Duration,
}

impl Default for DemoCatalog {
    fn default() -> Self {
        Self::new()
    }
}

impl DemoCatalog {
    /// Creates the demo catalog with no artificial latency.
    pub fn new() -> Self {
        Self {
            movies: demo_movies(),
            latency: Duration::ZERO,
        }
    }

    /// Delays every response by `latency`.
    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = latency;
        self
    }
}

#[async_trait]
impl CatalogProvider for DemoCatalog {
    async fn fetch_movies(&self, query: &str) -> Result<Vec<MovieSummary>, FetchError> {
        if !self.latency.is_zero() {
            tokio::time::sleep(self.latency).await;
        }

        let needle = query.trim().to_lowercase();
        let mut movies: Vec<MovieSummary> = self
            .movies
            .iter()
            .filter(|movie| query.is_empty() || movie.title.to_lowercase().contains(&needle))
            .cloned()
            .collect();

        movies.sort_by(|a, b| b.popularity.total_cmp(&a.popularity));
        Ok(movies)
    }
}

fn demo_movie(
    id: i64,
    title: &str,
    release_date: &str,
    popularity: f64,
    vote_average: f64,
    overview: &str,
) -> MovieSummary {
    MovieSummary {
        id,
        title: title.to_string(),
        poster_path: None,
        popularity,
        vote_average,
        original_language: Some("en".to_string()),
        release_date: Some(release_date.to_string()),
        overview: Some(overview.to_string()),
    }
}

fn demo_movies() -> Vec<MovieSummary> {
    vec![
        demo_movie(
            603,
            "The Matrix",
            "1999-03-30",
            88.4,
            8.2,
            "A hacker learns the true nature of his reality.",
        ),
        demo_movie(
            157336,
            "Interstellar",
            "2014-11-05",
            140.2,
            8.4,
            "Explorers travel through a wormhole to save humanity.",
        ),
        demo_movie(
            27205,
            "Inception",
            "2010-07-15",
            95.7,
            8.4,
            "A thief plants an idea inside a target's mind.",
        ),
        demo_movie(
            438631,
            "Dune",
            "2021-09-15",
            120.9,
            7.8,
            "A noble family becomes embroiled in a war for a desert planet.",
        ),
        demo_movie(
            78,
            "Blade Runner",
            "1982-06-25",
            45.3,
            7.9,
            "A blade runner hunts replicants in a rain-soaked Los Angeles.",
        ),
        demo_movie(
            268,
            "Batman",
            "1989-06-21",
            41.5,
            7.2,
            "The Dark Knight faces the Joker in Gotham City.",
        ),
        demo_movie(
            272,
            "Batman Begins",
            "2005-06-10",
            60.1,
            7.7,
            "Bruce Wayne becomes the protector of Gotham.",
        ),
    ]
}
