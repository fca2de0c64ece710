//! Newznab request planning
//!
//! Newznab is the standard API of Usenet indexers (NZBGeek, DrunkenSlug,
//! etc.). Searches are plain GET requests against `{base}/api` with the
//! search function in `t=` and filters as query parameters, e.g.
//!
//! ```text
//! https://api.example/api?t=movie&cat=2000,2040&extended=1&apikey=...&offset=0&limit=100&tmdbid=603
//! ```
//!
//! - `sanitize`: free-text query encoding
//! - `pages`: expansion of one query into paginated requests
//! - `strategy`: which queries an indexer can answer, grouped into tiers
//! - `generator`: the request chain for a search or a recent-releases sync

pub mod generator;
pub mod pages;
pub mod sanitize;
pub mod strategy;

pub use generator::{
    DEFAULT_MAX_PAGES, DEFAULT_PAGE_SIZE, IndexerRequestGenerator, NewznabRequestGenerator, build,
    build_recent,
};
pub use pages::page_requests;
pub use sanitize::newznabify_title;
pub use strategy::{SearchPlan, select_recent, select_tiers};
