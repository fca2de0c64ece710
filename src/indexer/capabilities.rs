//! Indexer capabilities
//!
//! A [`NewznabCapabilities`] describes which search functions and parameters
//! an indexer supports. Every optional field means "unsupported" when absent;
//! nothing is ever assumed to work because it wasn't ruled out.
//!
//! Capabilities are obtained through a [`CapabilitiesProvider`]. Fetching the
//! `t=caps` document is the provider's business; [`CachedCapabilitiesProvider`]
//! memoizes any provider per settings identity.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};

use parking_lot::RwLock;
use quick_xml::Reader;
use quick_xml::events::{BytesStart, Event};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use super::types::IndexerSettings;
use crate::config::Config;
use crate::error::{IndexerError, Result};

/// Search parameter enabling free-text search
pub const PARAM_QUERY: &str = "q";
/// Movie search parameter enabling TMDB id search
pub const PARAM_TMDB_ID: &str = "tmdbid";

/// How an indexer matches free-text queries
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum TextSearchEngine {
    /// Indexer-side tokenizing; send cleaned titles
    #[default]
    Default,
    /// Raw substring matching; send the scene titles unchanged
    Raw,
}

impl From<&str> for TextSearchEngine {
    fn from(value: &str) -> Self {
        if value.trim().eq_ignore_ascii_case("raw") {
            TextSearchEngine::Raw
        } else {
            TextSearchEngine::Default
        }
    }
}

impl std::fmt::Display for TextSearchEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TextSearchEngine::Default => write!(f, "default"),
            TextSearchEngine::Raw => write!(f, "raw"),
        }
    }
}

/// Capabilities of a Newznab indexer
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct NewznabCapabilities {
    /// Parameters of the generic `t=search` function; `None` if unavailable
    pub supported_search_parameters: Option<Vec<String>>,
    /// Parameters of the `t=movie` function; `None` if unavailable
    pub supported_movie_search_parameters: Option<Vec<String>>,
    /// Whether several id filters may be combined in one request
    pub supports_aggregate_id_search: bool,
    /// Engine behind `t=search`
    pub text_search_engine: TextSearchEngine,
    /// Engine behind `q` on `t=movie`
    pub movie_text_search_engine: TextSearchEngine,
}

impl NewznabCapabilities {
    /// Whether the generic search function is declared at all
    pub fn search_available(&self) -> bool {
        self.supported_search_parameters.is_some()
    }

    /// Whether the movie search function is declared at all
    pub fn movie_search_available(&self) -> bool {
        self.supported_movie_search_parameters.is_some()
    }

    /// Whether free-text search (`q`) is supported
    pub fn supports_search(&self) -> bool {
        has_param(&self.supported_search_parameters, PARAM_QUERY)
    }

    /// Whether movie search by TMDB id is supported
    pub fn supports_tmdb_search(&self) -> bool {
        has_param(&self.supported_movie_search_parameters, PARAM_TMDB_ID)
    }

    /// Read the XML document returned by `t=caps`
    pub fn from_caps_xml(xml: &str) -> Result<Self> {
        let mut reader = Reader::from_str(xml);
        reader.config_mut().trim_text(true);

        let mut caps = Self::default();
        let mut saw_root = false;
        let mut in_searching = false;

        loop {
            match reader.read_event() {
                Ok(Event::Start(ref e)) => {
                    let tag_name = tag_name(e);
                    match tag_name.as_str() {
                        "caps" => saw_root = true,
                        "error" => return Err(error_document(e)),
                        "searching" => {
                            in_searching = true;
                            caps.read_searching(e);
                        }
                        _ if in_searching => caps.read_search_function(&tag_name, e),
                        _ => {}
                    }
                }
                Ok(Event::Empty(ref e)) => {
                    let tag_name = tag_name(e);
                    match tag_name.as_str() {
                        "caps" => saw_root = true,
                        "error" => return Err(error_document(e)),
                        "searching" => caps.read_searching(e),
                        _ if in_searching => caps.read_search_function(&tag_name, e),
                        _ => {}
                    }
                }
                Ok(Event::End(ref e)) => {
                    if e.name().as_ref() == b"searching" {
                        in_searching = false;
                    }
                }
                Ok(Event::Eof) => break,
                Err(e) => {
                    return Err(IndexerError::InvalidCapabilities(format!(
                        "XML parse error: {}",
                        e
                    )));
                }
                _ => {}
            }
        }

        if !saw_root {
            return Err(IndexerError::InvalidCapabilities(
                "missing <caps> root element".to_string(),
            ));
        }

        Ok(caps)
    }

    fn read_searching(&mut self, e: &BytesStart) {
        if let Some(value) = attributes(e).get("supportsaggregateidsearch") {
            self.supports_aggregate_id_search = is_truthy(value);
        }
    }

    fn read_search_function(&mut self, tag_name: &str, e: &BytesStart) {
        let attrs = attributes(e);
        let available = attrs.get("available").is_some_and(|v| is_truthy(v));

        match tag_name {
            "search" => {
                if !available {
                    return;
                }
                self.supported_search_parameters = Some(supported_params(&attrs));
                if let Some(engine) = attrs.get("searchengine") {
                    self.text_search_engine = TextSearchEngine::from(engine.as_str());
                }
            }
            "movie-search" => {
                if !available {
                    return;
                }
                self.supported_movie_search_parameters = Some(supported_params(&attrs));
                if let Some(engine) = attrs.get("searchengine") {
                    self.movie_text_search_engine = TextSearchEngine::from(engine.as_str());
                }
                if let Some(value) = attrs.get("supportsaggregateidsearch") {
                    self.supports_aggregate_id_search = is_truthy(value);
                }
            }
            _ => {
                debug!(function = tag_name, "Ignoring search function");
            }
        }
    }
}

fn has_param(params: &Option<Vec<String>>, name: &str) -> bool {
    params
        .as_ref()
        .is_some_and(|params| params.iter().any(|p| p.eq_ignore_ascii_case(name)))
}

fn tag_name(e: &BytesStart) -> String {
    String::from_utf8_lossy(e.name().as_ref()).to_string()
}

/// Attributes of an element, keyed by lowercased name
fn attributes(e: &BytesStart) -> HashMap<String, String> {
    e.attributes()
        .flatten()
        .map(|attr| {
            let key = String::from_utf8_lossy(attr.key.as_ref()).to_lowercase();
            let val = String::from_utf8_lossy(&attr.value).to_string();
            (key, val)
        })
        .collect()
}

fn supported_params(attrs: &HashMap<String, String>) -> Vec<String> {
    match attrs.get("supportedparams") {
        Some(params) => params
            .split(',')
            .map(|p| p.trim().to_lowercase())
            .filter(|p| !p.is_empty())
            .collect(),
        // An available function without a parameter list only takes `q`
        None => vec![PARAM_QUERY.to_string()],
    }
}

fn is_truthy(value: &str) -> bool {
    matches!(value.trim().to_lowercase().as_str(), "yes" | "true" | "1")
}

fn error_document(e: &BytesStart) -> IndexerError {
    let attrs = attributes(e);
    let description = attrs
        .get("description")
        .cloned()
        .unwrap_or_else(|| "unknown error".to_string());

    match attrs.get("code") {
        Some(code) => IndexerError::InvalidCapabilities(format!("API error {}: {}", code, description)),
        None => IndexerError::InvalidCapabilities(format!("API error: {}", description)),
    }
}

/// Source of indexer capabilities
///
/// Implementations may perform I/O and are expected to memoize per settings
/// identity; see [`CachedCapabilitiesProvider`].
pub trait CapabilitiesProvider: Send + Sync {
    fn get_capabilities(&self, settings: &IndexerSettings) -> Result<NewznabCapabilities>;
}

impl<P: CapabilitiesProvider + ?Sized> CapabilitiesProvider for Arc<P> {
    fn get_capabilities(&self, settings: &IndexerSettings) -> Result<NewznabCapabilities> {
        (**self).get_capabilities(settings)
    }
}

/// Provider returning the same capabilities for every indexer
#[derive(Debug, Clone, Default)]
pub struct StaticCapabilitiesProvider {
    capabilities: NewznabCapabilities,
}

impl StaticCapabilitiesProvider {
    pub fn new(capabilities: NewznabCapabilities) -> Self {
        Self { capabilities }
    }
}

impl CapabilitiesProvider for StaticCapabilitiesProvider {
    fn get_capabilities(&self, _settings: &IndexerSettings) -> Result<NewznabCapabilities> {
        Ok(self.capabilities.clone())
    }
}

struct CacheEntry {
    capabilities: NewznabCapabilities,
    /// `None` when the lifetime reaches past what `Instant` can represent
    expires_at: Option<Instant>,
}

impl CacheEntry {
    fn is_live(&self, now: Instant) -> bool {
        self.expires_at.is_none_or(|expires_at| now < expires_at)
    }
}

/// TTL cache in front of another provider, keyed by [`IndexerSettings::cache_key`]
///
/// Expired entries are pruned whenever a fresh lookup is stored, so the map
/// only outgrows the set of live indexers between two misses.
pub struct CachedCapabilitiesProvider<P> {
    inner: P,
    entries: RwLock<HashMap<String, CacheEntry>>,
    ttl: Duration,
}

impl<P: CapabilitiesProvider> CachedCapabilitiesProvider<P> {
    pub fn new(inner: P, ttl: Duration) -> Self {
        Self {
            inner,
            entries: RwLock::new(HashMap::new()),
            ttl,
        }
    }

    /// Cache with the lifetime from the configuration
    pub fn from_config(inner: P, config: &Config) -> Self {
        Self::new(inner, config.capabilities_cache_ttl)
    }

    /// Drop the cached capabilities of one indexer
    pub fn invalidate(&self, settings: &IndexerSettings) {
        self.entries.write().remove(&settings.cache_key());
    }

    /// Remove all expired entries
    pub fn cleanup_expired(&self) {
        let now = Instant::now();
        self.entries.write().retain(|_, entry| entry.is_live(now));
    }

    fn cached(&self, key: &str) -> Option<NewznabCapabilities> {
        let entries = self.entries.read();
        entries
            .get(key)
            .filter(|entry| entry.is_live(Instant::now()))
            .map(|entry| entry.capabilities.clone())
    }
}

impl<P: CapabilitiesProvider> CapabilitiesProvider for CachedCapabilitiesProvider<P> {
    fn get_capabilities(&self, settings: &IndexerSettings) -> Result<NewznabCapabilities> {
        let key = settings.cache_key();

        if let Some(capabilities) = self.cached(&key) {
            return Ok(capabilities);
        }

        let capabilities = self.inner.get_capabilities(settings).map_err(|e| {
            warn!(
                base_url = %settings.base_url,
                error = %e,
                "Failed to fetch indexer capabilities"
            );
            e
        })?;

        let now = Instant::now();
        let mut entries = self.entries.write();
        entries.retain(|_, entry| entry.is_live(now));
        entries.insert(
            key,
            CacheEntry {
                capabilities: capabilities.clone(),
                expires_at: now.checked_add(self.ttl),
            },
        );

        Ok(capabilities)
    }
}
