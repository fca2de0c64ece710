//! Newznab request generator
//!
//! Turns a movie search into a [`RequestChain`] for one indexer. The
//! capability lookup is the only step that can fail; planning itself is pure
//! and describes requests without sending them.

use std::collections::HashMap;
use std::sync::Arc;

use tracing::debug;

use super::pages::page_requests;
use super::strategy::{SearchPlan, select_recent, select_tiers};
use crate::config::Config;
use crate::error::Result;
use crate::indexer::capabilities::{CapabilitiesProvider, NewznabCapabilities};
use crate::indexer::criteria::MovieSearchCriteria;
use crate::indexer::request::RequestChain;
use crate::indexer::types::IndexerSettings;

/// Default maximum number of pages requested per query
pub const DEFAULT_MAX_PAGES: u32 = 30;
/// Default number of results requested per page
pub const DEFAULT_PAGE_SIZE: u32 = 100;

/// Produces request chains for one configured indexer
pub trait IndexerRequestGenerator: Send + Sync {
    /// Requests for syncing the newest releases, not driven by a search
    fn get_recent_requests(&self) -> Result<RequestChain>;

    /// Requests for a targeted movie search
    fn get_search_requests(&self, criteria: &MovieSearchCriteria) -> Result<RequestChain>;
}

/// Build the request chain of a movie search from known capabilities
pub fn build(
    settings: &IndexerSettings,
    capabilities: &NewznabCapabilities,
    criteria: &MovieSearchCriteria,
    max_pages: u32,
    page_size: u32,
) -> RequestChain {
    let plan = select_tiers(capabilities, criteria);
    chain_from_plan(settings, plan, max_pages, page_size, None)
}

/// Build the request chain of a recent-releases sync from known capabilities
pub fn build_recent(
    settings: &IndexerSettings,
    capabilities: &NewznabCapabilities,
    max_pages: u32,
    page_size: u32,
) -> RequestChain {
    let plan: SearchPlan = select_recent(capabilities).into_iter().map(|q| vec![q]).collect();
    chain_from_plan(settings, plan, max_pages, page_size, None)
}

fn chain_from_plan(
    settings: &IndexerSettings,
    plan: SearchPlan,
    max_pages: u32,
    page_size: u32,
    cookies: Option<&HashMap<String, String>>,
) -> RequestChain {
    let mut chain = RequestChain::new();

    for tier in plan {
        chain.add_tier();
        for query in tier {
            let requests = page_requests(
                settings,
                query.search_type,
                &query.parameters,
                max_pages,
                page_size,
            );
            chain.add(requests.with_cookies(cookies.cloned()));
        }
    }

    chain
}

/// Request generator for a Newznab indexer
pub struct NewznabRequestGenerator {
    provider: Arc<dyn CapabilitiesProvider>,
    settings: IndexerSettings,
    max_pages: u32,
    page_size: u32,
    cookies: Option<HashMap<String, String>>,
}

impl NewznabRequestGenerator {
    /// Create a generator with the default paging limits, unless the
    /// indexer settings override them
    pub fn new(provider: Arc<dyn CapabilitiesProvider>, settings: IndexerSettings) -> Self {
        Self::with_defaults(provider, settings, DEFAULT_MAX_PAGES, DEFAULT_PAGE_SIZE)
    }

    /// Create a generator using the paging limits of the configuration,
    /// unless the indexer settings override them
    pub fn from_config(
        provider: Arc<dyn CapabilitiesProvider>,
        settings: IndexerSettings,
        config: &Config,
    ) -> Self {
        Self::with_defaults(provider, settings, config.max_pages, config.page_size)
    }

    fn with_defaults(
        provider: Arc<dyn CapabilitiesProvider>,
        settings: IndexerSettings,
        max_pages: u32,
        page_size: u32,
    ) -> Self {
        Self {
            max_pages: settings.max_pages.unwrap_or(max_pages),
            page_size: settings.page_size.unwrap_or(page_size),
            provider,
            settings,
            cookies: None,
        }
    }

    /// Send these cookies with every request
    pub fn with_cookies(mut self, cookies: HashMap<String, String>) -> Self {
        self.cookies = Some(cookies);
        self
    }

    pub fn settings(&self) -> &IndexerSettings {
        &self.settings
    }

    pub fn max_pages(&self) -> u32 {
        self.max_pages
    }

    pub fn page_size(&self) -> u32 {
        self.page_size
    }

    fn capabilities(&self) -> Result<NewznabCapabilities> {
        self.provider.get_capabilities(&self.settings)
    }

    fn chain(&self, plan: SearchPlan) -> RequestChain {
        chain_from_plan(
            &self.settings,
            plan,
            self.max_pages,
            self.page_size,
            self.cookies.as_ref(),
        )
    }
}

impl IndexerRequestGenerator for NewznabRequestGenerator {
    fn get_recent_requests(&self) -> Result<RequestChain> {
        let capabilities = self.capabilities()?;
        let plan: SearchPlan = select_recent(&capabilities).into_iter().map(|q| vec![q]).collect();
        let chain = self.chain(plan);

        debug!(
            base_url = %self.settings.base_url,
            tiers = chain.tier_count(),
            "Planned recent releases requests"
        );

        Ok(chain)
    }

    fn get_search_requests(&self, criteria: &MovieSearchCriteria) -> Result<RequestChain> {
        let capabilities = self.capabilities()?;
        let chain = self.chain(select_tiers(&capabilities, criteria));

        debug!(
            base_url = %self.settings.base_url,
            tmdb_id = ?criteria.tmdb_id,
            titles = criteria.scene_titles.len(),
            tiers = chain.tier_count(),
            queries = chain.all_groups().count(),
            "Planned movie search requests"
        );

        Ok(chain)
    }
}

impl std::fmt::Debug for NewznabRequestGenerator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NewznabRequestGenerator")
            .field("base_url", &self.settings.base_url)
            .field("max_pages", &self.max_pages)
            .field("page_size", &self.page_size)
            .finish()
    }
}
