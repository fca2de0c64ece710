//! Request planning configuration

use std::env;
use std::time::Duration;

use anyhow::{Context, Result};

use crate::indexer::newznab::{DEFAULT_MAX_PAGES, DEFAULT_PAGE_SIZE};

/// Default cap on results collected per query
pub const DEFAULT_MAX_RESULTS_PER_QUERY: usize = 1000;
/// Default lifetime of cached indexer capabilities (7 days)
pub const DEFAULT_CAPS_CACHE_TTL: Duration = Duration::from_secs(7 * 24 * 60 * 60);

/// Configuration loaded from environment variables
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Maximum pages requested per query (`NEWZNAB_MAX_PAGES`)
    pub max_pages: u32,

    /// Results requested per page, 0 disables paging (`NEWZNAB_PAGE_SIZE`)
    pub page_size: u32,

    /// Total requests allowed per chain run (`NEWZNAB_REQUEST_BUDGET`)
    pub request_budget: Option<usize>,

    /// Stop paging a query after this many results (`NEWZNAB_MAX_RESULTS_PER_QUERY`)
    pub max_results_per_query: usize,

    /// Capabilities cache lifetime (`NEWZNAB_CAPS_CACHE_TTL_SECS`)
    pub capabilities_cache_ttl: Duration,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            max_pages: DEFAULT_MAX_PAGES,
            page_size: DEFAULT_PAGE_SIZE,
            request_budget: None,
            max_results_per_query: DEFAULT_MAX_RESULTS_PER_QUERY,
            capabilities_cache_ttl: DEFAULT_CAPS_CACHE_TTL,
        }
    }
}

impl Config {
    /// Load a `.env` file if present, then read the environment
    pub fn load() -> Result<Self> {
        dotenvy::dotenv().ok();
        Self::from_env()
    }

    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load configuration from any key/value source
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        Ok(Self {
            max_pages: parse_or(&lookup, "NEWZNAB_MAX_PAGES", defaults.max_pages)?,

            page_size: parse_or(&lookup, "NEWZNAB_PAGE_SIZE", defaults.page_size)?,

            request_budget: match lookup("NEWZNAB_REQUEST_BUDGET") {
                Some(value) => Some(
                    value
                        .trim()
                        .parse()
                        .context("Invalid NEWZNAB_REQUEST_BUDGET")?,
                ),
                None => None,
            },

            max_results_per_query: parse_or(
                &lookup,
                "NEWZNAB_MAX_RESULTS_PER_QUERY",
                defaults.max_results_per_query,
            )?,

            capabilities_cache_ttl: Duration::from_secs(parse_or(
                &lookup,
                "NEWZNAB_CAPS_CACHE_TTL_SECS",
                defaults.capabilities_cache_ttl.as_secs(),
            )?),
        })
    }
}

fn parse_or<F, T>(lookup: &F, key: &str, default: T) -> Result<T>
where
    F: Fn(&str) -> Option<String>,
    T: std::str::FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match lookup(key) {
        Some(value) => value
            .trim()
            .parse()
            .with_context(|| format!("Invalid {}", key)),
        None => Ok(default),
    }
}
