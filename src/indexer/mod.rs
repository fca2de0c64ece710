//! Indexer search request planning
//!
//! Turns a movie search into the requests to send to a Newznab indexer,
//! using only the search functions the indexer declares in its capabilities.
//!
//! # Architecture
//!
//! - `types`: settings, search types and logical queries
//! - `capabilities`: what an indexer supports, and how it is looked up
//! - `criteria`: what is being searched for
//! - `request`: concrete requests and the tiered, pageable request chain
//! - `newznab`: planning of Newznab request chains
//! - `runner`: reference consumer of a request chain
//!
//! # Example
//!
//! ```ignore
//! use crate::indexer::{IndexerRequestGenerator, MovieSearchCriteria, NewznabRequestGenerator};
//!
//! let generator = NewznabRequestGenerator::new(provider, settings);
//! let criteria = MovieSearchCriteria::new(Some(603), 1999).with_scene_title("The Matrix");
//! let chain = generator.get_search_requests(&criteria)?;
//! let outcome = ChainRunner::new().run(&chain, &sender).await?;
//! ```

pub mod capabilities;
pub mod categories;
pub mod criteria;
pub mod newznab;
pub mod request;
pub mod runner;
pub mod types;

// Re-export commonly used types
pub use capabilities::{
    CachedCapabilitiesProvider, CapabilitiesProvider, NewznabCapabilities,
    StaticCapabilitiesProvider, TextSearchEngine,
};
pub use criteria::{MovieSearchCriteria, clean_scene_title};
pub use newznab::{IndexerRequestGenerator, NewznabRequestGenerator};
pub use request::{HttpAccept, IndexerRequest, PageableRequests, RequestChain, RequestTier};
pub use runner::{ChainOutcome, ChainRunner, RequestSender};
pub use types::{IndexerSettings, LogicalQuery, SearchType};
