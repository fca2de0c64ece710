//! Capability-aware search request planning for Newznab indexers
//!
//! Given an indexer's settings and declared capabilities, plans the tiered,
//! paginated chain of requests for a movie search: exact TMDB id search
//! first, free-text scene title search as the fallback, and nothing the
//! indexer didn't declare support for.

pub mod config;
pub mod error;
pub mod indexer;

pub use config::Config;
pub use error::{IndexerError, Result};
