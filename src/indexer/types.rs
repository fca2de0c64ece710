//! Core types for the indexer request planner
//!
//! These types are modeled after the Newznab API: a search type (`t=`), the
//! per-indexer connection settings and the logical query a tier is made of.

use serde::{Deserialize, Serialize};

use super::categories::DEFAULT_MOVIE_CATEGORIES;

/// Default API path appended to the base URL
pub const DEFAULT_API_PATH: &str = "/api";

/// Newznab search function (`t=` parameter)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum SearchType {
    /// General text search
    #[default]
    Search,
    /// Movie search (supports external ids)
    Movie,
}

impl SearchType {
    pub fn as_str(&self) -> &'static str {
        match self {
            SearchType::Search => "search",
            SearchType::Movie => "movie",
        }
    }
}

impl std::fmt::Display for SearchType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for SearchType {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "search" => Ok(SearchType::Search),
            "movie" => Ok(SearchType::Movie),
            _ => Err(anyhow::anyhow!("Unknown search type: {}", s)),
        }
    }
}

/// Connection settings of one Newznab indexer
///
/// Loaded and validated elsewhere; the planner never checks that the URL
/// parts are well formed.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(default)]
pub struct IndexerSettings {
    /// Indexer base URL (e.g., "https://api.nzbgeek.info")
    pub base_url: String,
    /// API path appended to the base URL (e.g., "/api")
    pub api_path: String,
    /// API key, appended as `apikey=` when non-blank
    pub api_key: Option<String>,
    /// Newznab categories to search in; empty means no requests at all
    pub categories: Vec<i32>,
    /// Raw query string appended verbatim to every request (e.g., "&dl=1")
    pub additional_parameters: String,
    /// Per-indexer override of the maximum number of pages per query
    pub max_pages: Option<u32>,
    /// Per-indexer override of the page size (0 disables paging)
    pub page_size: Option<u32>,
}

impl Default for IndexerSettings {
    fn default() -> Self {
        Self {
            base_url: String::new(),
            api_path: DEFAULT_API_PATH.to_string(),
            api_key: None,
            categories: DEFAULT_MOVIE_CATEGORIES.to_vec(),
            additional_parameters: String::new(),
            max_pages: None,
            page_size: None,
        }
    }
}

impl IndexerSettings {
    /// Create settings for an indexer with the default API path and categories
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            ..Default::default()
        }
    }

    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(api_key.into());
        self
    }

    pub fn with_api_path(mut self, api_path: impl Into<String>) -> Self {
        self.api_path = api_path.into();
        self
    }

    pub fn with_categories(mut self, categories: Vec<i32>) -> Self {
        self.categories = categories;
        self
    }

    pub fn with_additional_parameters(mut self, parameters: impl Into<String>) -> Self {
        self.additional_parameters = parameters.into();
        self
    }

    /// The API key, if one is set and not blank
    pub fn api_key(&self) -> Option<&str> {
        self.api_key
            .as_deref()
            .filter(|key| !key.trim().is_empty())
    }

    /// Stable identity of these settings, used to key the capabilities cache
    pub fn cache_key(&self) -> String {
        use sha2::{Digest, Sha256};
        let json = serde_json::to_string(self).unwrap_or_default();
        let hash = Sha256::digest(json.as_bytes());
        format!("{:x}", hash)
    }
}

/// One logical query before pagination: a search type plus the raw query
/// string fragment appended after the paging parameters
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogicalQuery {
    pub search_type: SearchType,
    pub parameters: String,
}

impl LogicalQuery {
    pub fn new(search_type: SearchType, parameters: impl Into<String>) -> Self {
        Self {
            search_type,
            parameters: parameters.into(),
        }
    }
}
