//! Data types for catalog search.

use serde::{Deserialize, Serialize};

/// Base URL for catalog poster images at display width.
pub const POSTER_BASE_URL: &str = "https://image.tmdb.org/t/p/w500";

/// Poster shown when the catalog has no artwork for a title.
pub const PLACEHOLDER_POSTER: &str = "no-movie.png";

/// Read-only projection of one catalog movie.
///
/// Identity is `id`. Fields the catalog omits fall back to their defaults and
/// unknown fields are ignored.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MovieSummary {
    /// Catalog identifier
    pub id: i64,
    /// Display title
    #[serde(default)]
    pub title: String,
    /// Poster path relative to the image base URL
    #[serde(default)]
    pub poster_path: Option<String>,
    /// Catalog popularity score
    #[serde(default)]
    pub popularity: f64,
    /// Average user rating (0.0-10.0)
    #[serde(default)]
    pub vote_average: f64,
    /// ISO 639-1 language code
    #[serde(default)]
    pub original_language: Option<String>,
    /// Release date as `YYYY-MM-DD`
    #[serde(default)]
    pub release_date: Option<String>,
    /// Plot summary
    #[serde(default)]
    pub overview: Option<String>,
}

impl MovieSummary {
    /// Creates a summary with only identity and title set.
    pub fn new(id: i64, title: impl Into<String>) -> Self {
        Self {
            id,
            title: title.into(),
            poster_path: None,
            popularity: 0.0,
            vote_average: 0.0,
            original_language: None,
            release_date: None,
            overview: None,
        }
    }

    /// Full poster URL, or the placeholder when the catalog has none.
    pub fn poster_url(&self) -> String {
        match self.poster_path.as_deref() {
            Some(path) if !path.is_empty() => format!("{POSTER_BASE_URL}{path}"),
            _ => PLACEHOLDER_POSTER.to_string(),
        }
    }

    /// Rating with one decimal, "N/A" for unrated titles.
    pub fn rating_label(&self) -> String {
        if self.vote_average > 0.0 {
            format!("{:.1}", self.vote_average)
        } else {
            "N/A".to_string()
        }
    }

    /// Release year taken from the `YYYY-MM-DD` release date.
    pub fn release_year(&self) -> Option<&str> {
        self.release_date
            .as_deref()
            .and_then(|date| date.get(..4))
            .filter(|year| year.chars().all(|c| c.is_ascii_digit()))
    }
}

/// The two request shapes the catalog supports.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CatalogRequest {
    /// Popular titles, sorted by descending popularity.
    Discover,
    /// Title search for a non-empty query.
    Search(String),
}

impl CatalogRequest {
    /// Maps a raw query to its request shape. Only the empty string discovers.
    pub fn from_query(query: &str) -> Self {
        if query.is_empty() {
            CatalogRequest::Discover
        } else {
            CatalogRequest::Search(query.to_string())
        }
    }

    /// Path and query string relative to the catalog base URL.
    pub fn path_and_query(&self) -> String {
        match self {
            CatalogRequest::Discover => "/discover/movie?sort_by=popularity.desc".to_string(),
            CatalogRequest::Search(query) => {
                format!("/search/movie?query={}", urlencoding::encode(query))
            }
        }
    }
}

/// Raw catalog response body.
#[derive(Debug, Clone, Default, Deserialize)]
pub(crate) struct CatalogResponse {
    #[serde(default)]
    pub results: Option<Vec<MovieSummary>>,
    /// Negative-response sentinel, `"False"` on rejection
    #[serde(rename = "Response", default)]
    pub response: Option<String>,
    /// Rejection message accompanying the sentinel
    #[serde(rename = "Error", default)]
    pub error: Option<String>,
}

impl CatalogResponse {
    pub(crate) fn is_rejection(&self) -> bool {
        self.response.as_deref() == Some("False")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_shape_from_query() {
        assert_eq!(CatalogRequest::from_query(""), CatalogRequest::Discover);
        assert_eq!(
            CatalogRequest::from_query(" "),
            CatalogRequest::Search(" ".to_string())
        );
    }

    #[test]
    fn test_search_query_is_percent_encoded() {
        let request = CatalogRequest::from_query("star wars & co");
        assert_eq!(
            request.path_and_query(),
            "/search/movie?query=star%20wars%20%26%20co"
        );
        assert_eq!(
            CatalogRequest::Discover.path_and_query(),
            "/discover/movie?sort_by=popularity.desc"
        );
    }

    #[test]
    fn test_movie_card_labels() {
        let mut movie = MovieSummary::new(1, "Heat");
        assert_eq!(movie.rating_label(), "N/A");
        assert_eq!(movie.release_year(), None);
        assert_eq!(movie.poster_url(), PLACEHOLDER_POSTER);

        movie.vote_average = 8.26;
        movie.release_date = Some("1995-12-15".to_string());
        movie.poster_path = Some("/heat.jpg".to_string());
        assert_eq!(movie.rating_label(), "8.3");
        assert_eq!(movie.release_year(), Some("1995"));
        assert_eq!(movie.poster_url(), "https://image.tmdb.org/t/p/w500/heat.jpg");
    }

    #[test]
    fn test_response_tolerates_missing_fields() {
        let body: CatalogResponse =
            serde_json::from_str(r#"{"results":[{"id":7,"adult":false}]}"#).unwrap();
        let results = body.results.unwrap();
        assert_eq!(results[0].id, 7);
        assert!(results[0].title.is_empty());

        let rejected: CatalogResponse =
            serde_json::from_str(r#"{"Response":"False","Error":"Invalid API key"}"#).unwrap();
        assert!(rejected.is_rejection());
        assert!(rejected.results.is_none());
    }
}
