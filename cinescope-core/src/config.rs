//! Centralized configuration for Cinescope.
//!
//! All tunable parameters and settings are defined here to avoid
//! hard-coded values scattered throughout the codebase.

use std::time::Duration;

pub use cinescope_search::CatalogConfig;

use crate::CinescopeError;

/// Central configuration for all Cinescope components.
///
/// Groups related configuration settings into logical sections.
/// Supports environment variable overrides for runtime customization.
#[derive(Debug, Clone, Default)]
pub struct CinescopeConfig {
    pub catalog: CatalogConfig,
    pub trending: TrendingConfig,
    pub search: SearchConfig,
}

/// Remote document store holding trending search counters.
#[derive(Debug, Clone)]
pub struct TrendingConfig {
    /// Appwrite REST endpoint, e.g. `https://cloud.appwrite.io/v1`
    pub endpoint: String,
    /// Project the collection belongs to
    pub project_id: String,
    /// Server API key; browser-style sessions work without one
    pub api_key: Option<String>,
    /// Database identifier
    pub database_id: String,
    /// Collection holding one document per search term
    pub collection_id: String,
    /// Number of entries shown in the trending list
    pub limit: usize,
}

impl Default for TrendingConfig {
    fn default() -> Self {
        Self {
            endpoint: "https://cloud.appwrite.io/v1".to_string(),
            project_id: String::new(),
            api_key: None,
            database_id: String::new(),
            collection_id: String::new(),
            limit: 5,
        }
    }
}

/// Search pipeline tuning.
#[derive(Debug, Clone)]
pub struct SearchConfig {
    /// Quiescence window before a typed query is dispatched
    pub debounce_window: Duration,
    /// Capacity of the pipeline command channel
    pub command_buffer: usize,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            debounce_window: Duration::from_millis(500),
            command_buffer: 64,
        }
    }
}

impl CinescopeConfig {
    /// Creates configuration with environment variable overrides.
    ///
    /// Allows runtime configuration via environment variables while
    /// maintaining sensible defaults.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds configuration from an arbitrary key lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut config = Self::default();

        // Catalog overrides
        if let Some(token) = lookup("CINESCOPE_TMDB_TOKEN").or_else(|| lookup("TMDB_API_KEY")) {
            config.catalog.api_token = token;
        }

        if let Some(base_url) = lookup("CINESCOPE_TMDB_BASE_URL") {
            config.catalog.base_url = base_url;
        }

        if let Some(seconds) = lookup("CINESCOPE_REQUEST_TIMEOUT").and_then(|v| v.parse().ok()) {
            config.catalog.request_timeout = Some(Duration::from_secs(seconds));
        }

        // Trending store overrides
        if let Some(endpoint) = lookup("CINESCOPE_APPWRITE_ENDPOINT") {
            config.trending.endpoint = endpoint;
        }

        if let Some(project_id) = lookup("CINESCOPE_APPWRITE_PROJECT_ID") {
            config.trending.project_id = project_id;
        }

        config.trending.api_key = lookup("CINESCOPE_APPWRITE_API_KEY").filter(|key| !key.is_empty());

        if let Some(database_id) = lookup("CINESCOPE_APPWRITE_DATABASE_ID") {
            config.trending.database_id = database_id;
        }

        if let Some(collection_id) = lookup("CINESCOPE_APPWRITE_COLLECTION_ID") {
            config.trending.collection_id = collection_id;
        }

        if let Some(limit) = lookup("CINESCOPE_TRENDING_LIMIT").and_then(|v| v.parse().ok()) {
            config.trending.limit = limit;
        }

        // Search overrides
        if let Some(millis) = lookup("CINESCOPE_DEBOUNCE_MS").and_then(|v| v.parse().ok()) {
            config.search.debounce_window = Duration::from_millis(millis);
        }

        config
    }

    /// Checks that credentials for the hosted services are present.
    ///
    /// # Errors
    ///
    /// - `CinescopeError::Configuration` - If a required credential or identifier is empty
    pub fn validate(&self) -> Result<(), CinescopeError> {
        let required = [
            ("CINESCOPE_TMDB_TOKEN", &self.catalog.api_token),
            ("CINESCOPE_APPWRITE_PROJECT_ID", &self.trending.project_id),
            ("CINESCOPE_APPWRITE_DATABASE_ID", &self.trending.database_id),
            ("CINESCOPE_APPWRITE_COLLECTION_ID", &self.trending.collection_id),
        ];

        let missing: Vec<&str> = required
            .iter()
            .filter(|(_, value)| value.trim().is_empty())
            .map(|(name, _)| *name)
            .collect();

        if missing.is_empty() {
            Ok(())
        } else {
            Err(CinescopeError::Configuration {
                reason: format!("missing {}", missing.join(", ")),
            })
        }
    }

    /// Creates a configuration for tests: short debounce, small trending list.
    pub fn for_testing() -> Self {
        Self {
            search: SearchConfig {
                debounce_window: Duration::from_millis(50),
                ..Default::default()
            },
            ..Default::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    #[test]
    fn test_default_config_values() {
        let config = CinescopeConfig::default();

        assert_eq!(config.catalog.base_url, "https://api.themoviedb.org/3");
        assert_eq!(config.catalog.request_timeout, None);
        assert_eq!(config.search.debounce_window, Duration::from_millis(500));
        assert_eq!(config.trending.limit, 5);
        assert!(config.trending.api_key.is_none());
    }

    #[test]
    fn test_lookup_overrides() {
        let vars: HashMap<&str, &str> = HashMap::from([
            ("TMDB_API_KEY", "fallback"),
            ("CINESCOPE_TMDB_TOKEN", "primary"),
            ("CINESCOPE_REQUEST_TIMEOUT", "15"),
            ("CINESCOPE_APPWRITE_PROJECT_ID", "proj"),
            ("CINESCOPE_APPWRITE_API_KEY", ""),
            ("CINESCOPE_TRENDING_LIMIT", "10"),
            ("CINESCOPE_DEBOUNCE_MS", "250"),
        ]);

        let config = CinescopeConfig::from_lookup(|key| vars.get(key).map(|v| v.to_string()));

        assert_eq!(config.catalog.api_token, "primary");
        assert_eq!(config.catalog.request_timeout, Some(Duration::from_secs(15)));
        assert_eq!(config.trending.project_id, "proj");
        assert!(config.trending.api_key.is_none());
        assert_eq!(config.trending.limit, 10);
        assert_eq!(config.search.debounce_window, Duration::from_millis(250));
    }

    #[test]
    fn test_unparseable_values_keep_defaults() {
        let config = CinescopeConfig::from_lookup(|key| match key {
            "CINESCOPE_TRENDING_LIMIT" | "CINESCOPE_DEBOUNCE_MS" => Some("soon".to_string()),
            _ => None,
        });

        assert_eq!(config.trending.limit, 5);
        assert_eq!(config.search.debounce_window, Duration::from_millis(500));
    }

    #[test]
    fn test_validate_lists_missing_credentials() {
        let error = CinescopeConfig::default().validate().unwrap_err();
        let message = error.to_string();
        assert!(message.contains("CINESCOPE_TMDB_TOKEN"));
        assert!(message.contains("CINESCOPE_APPWRITE_COLLECTION_ID"));

        let mut config = CinescopeConfig::default();
        config.catalog.api_token = "t".to_string();
        config.trending.project_id = "p".to_string();
        config.trending.database_id = "d".to_string();
        config.trending.collection_id = "c".to_string();
        assert!(config.validate().is_ok());
    }
}
