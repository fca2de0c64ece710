//! Request chain runner
//!
//! Reference consumer of a [`RequestChain`]. Tiers are tried in order and the
//! first tier returning any result wins; later tiers are never requested.
//! Within a tier every query is paged until a page comes back empty or short,
//! or the per-query result cap is reached. An optional request budget bounds
//! the total number of requests sent across the whole chain.
//!
//! Sending is delegated to a [`RequestSender`], so transport, retries and
//! result parsing stay with the caller.

use anyhow::{Context, Result};
use async_trait::async_trait;
use tracing::{debug, info, warn};

use super::request::{IndexerRequest, RequestChain};
use crate::config::{Config, DEFAULT_MAX_RESULTS_PER_QUERY};

/// Executes indexer requests on behalf of the runner
#[async_trait]
pub trait RequestSender: Send + Sync {
    /// Parsed result type, e.g. a release
    type Item: Send;

    /// Send one request and return the results of that page
    async fn send(&self, request: &IndexerRequest) -> Result<Vec<Self::Item>>;
}

/// Result of running a request chain
#[derive(Debug)]
pub struct ChainOutcome<T> {
    /// Results of the winning tier
    pub items: Vec<T>,
    /// Index of the tier the results came from
    pub tier: Option<usize>,
    /// Number of requests sent
    pub requests_sent: usize,
    /// Whether the request budget stopped the run early
    pub budget_exhausted: bool,
}

impl<T> ChainOutcome<T> {
    fn new(items: Vec<T>, tier: usize, requests_sent: usize, budget_exhausted: bool) -> Self {
        let tier = (!items.is_empty()).then_some(tier);
        Self {
            items,
            tier,
            requests_sent,
            budget_exhausted,
        }
    }
}

/// Runs request chains with first-success-wins tier fallback
#[derive(Debug, Clone)]
pub struct ChainRunner {
    request_budget: Option<usize>,
    max_results_per_query: usize,
}

impl Default for ChainRunner {
    fn default() -> Self {
        Self {
            request_budget: None,
            max_results_per_query: DEFAULT_MAX_RESULTS_PER_QUERY,
        }
    }
}

impl ChainRunner {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_config(config: &Config) -> Self {
        Self {
            request_budget: config.request_budget,
            max_results_per_query: config.max_results_per_query,
        }
    }

    /// Stop after sending this many requests in total
    pub fn with_request_budget(mut self, budget: usize) -> Self {
        self.request_budget = Some(budget);
        self
    }

    /// Stop paging a query once it returned this many results
    pub fn with_max_results_per_query(mut self, max: usize) -> Self {
        self.max_results_per_query = max;
        self
    }

    pub async fn run<S: RequestSender>(
        &self,
        chain: &RequestChain,
        sender: &S,
    ) -> Result<ChainOutcome<S::Item>> {
        let mut requests_sent = 0;

        for (index, tier) in chain.tiers().iter().enumerate() {
            let mut items = Vec::new();

            for group in tier.groups() {
                let page_size = group.page_size() as usize;
                let mut query_results = 0;

                for request in group {
                    if self.request_budget.is_some_and(|budget| requests_sent >= budget) {
                        warn!(
                            tier = index,
                            requests_sent,
                            "Request budget exhausted, stopping search"
                        );
                        return Ok(ChainOutcome::new(items, index, requests_sent, true));
                    }

                    let page = sender
                        .send(&request)
                        .await
                        .with_context(|| format!("Request failed: {}", request.redacted_url()))?;
                    requests_sent += 1;

                    let count = page.len();
                    query_results += count;
                    items.extend(page);

                    debug!(
                        url = %request.redacted_url(),
                        accept = %request.accept(),
                        results = count,
                        "Fetched page"
                    );

                    // A short page is the last one
                    if count == 0 || count < page_size {
                        break;
                    }
                    if query_results >= self.max_results_per_query {
                        break;
                    }
                }
            }

            if !items.is_empty() {
                info!(
                    tier = index,
                    results = items.len(),
                    requests_sent,
                    "Search tier returned results"
                );
                return Ok(ChainOutcome::new(items, index, requests_sent, false));
            }

            debug!(tier = index, "Search tier returned nothing, falling back");
        }

        Ok(ChainOutcome {
            items: Vec::new(),
            tier: None,
            requests_sent,
            budget_exhausted: false,
        })
    }
}
