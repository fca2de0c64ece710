//! Indexer requests and the pageable request chain
//!
//! A [`RequestChain`] is an ordered list of [`RequestTier`]s. Each tier holds
//! one or more [`PageableRequests`], a lazily produced run of paginated
//! requests for a single logical query. Nothing here performs I/O: a request
//! only comes into existence when the consumer pulls it from an iterator.
//!
//! Consumers are expected to walk the tiers in order and stop at the first
//! tier that yields results; see [`crate::indexer::runner::ChainRunner`].

use std::collections::HashMap;

use once_cell::sync::Lazy;
use regex::Regex;

static API_KEY_PARAM: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)([?&]apikey=)[^&]+").expect("valid regex"));

/// Accept type sent with a request
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HttpAccept {
    Rss,
    Json,
}

impl std::fmt::Display for HttpAccept {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            HttpAccept::Rss => write!(f, "rss"),
            HttpAccept::Json => write!(f, "json"),
        }
    }
}

/// A fully formed request against an indexer
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndexerRequest {
    url: String,
    accept: HttpAccept,
    cookies: Option<HashMap<String, String>>,
}

impl IndexerRequest {
    pub fn new(url: impl Into<String>, accept: HttpAccept) -> Self {
        Self {
            url: url.into(),
            accept,
            cookies: None,
        }
    }

    pub fn with_cookies(mut self, cookies: HashMap<String, String>) -> Self {
        self.cookies = Some(cookies);
        self
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn accept(&self) -> HttpAccept {
        self.accept
    }

    pub fn cookies(&self) -> Option<&HashMap<String, String>> {
        self.cookies.as_ref()
    }

    /// The URL with the API key masked, safe to log
    pub fn redacted_url(&self) -> String {
        API_KEY_PARAM
            .replace_all(&self.url, "${1}(removed)")
            .into_owned()
    }
}

/// Lazily produced paginated requests for one logical query
///
/// With a page size of zero a single unpaginated request is produced;
/// otherwise exactly `max_pages` requests with increasing offsets. A run
/// without a base URL produces nothing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageableRequests {
    base_url: Option<String>,
    parameters: String,
    max_pages: u32,
    page_size: u32,
    accept: HttpAccept,
    cookies: Option<HashMap<String, String>>,
}

impl PageableRequests {
    pub fn new(
        base_url: impl Into<String>,
        parameters: impl Into<String>,
        max_pages: u32,
        page_size: u32,
        accept: HttpAccept,
    ) -> Self {
        Self {
            base_url: Some(base_url.into()),
            parameters: parameters.into(),
            max_pages,
            page_size,
            accept,
            cookies: None,
        }
    }

    /// A run that produces no requests
    pub fn empty() -> Self {
        Self {
            base_url: None,
            parameters: String::new(),
            max_pages: 0,
            page_size: 0,
            accept: HttpAccept::Rss,
            cookies: None,
        }
    }

    /// Attach cookies to every produced request
    pub fn with_cookies(mut self, cookies: Option<HashMap<String, String>>) -> Self {
        self.cookies = cookies;
        self
    }

    /// Page size, 0 when unpaginated
    pub fn page_size(&self) -> u32 {
        self.page_size
    }

    /// Number of requests this run produces
    pub fn len(&self) -> usize {
        match self.base_url {
            None => 0,
            Some(_) if self.page_size == 0 => 1,
            Some(_) => self.max_pages as usize,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn iter(&self) -> PageIter<'_> {
        PageIter {
            requests: self,
            page: 0,
            remaining: self.len(),
        }
    }

    fn request(&self, base_url: &str, page: u32) -> IndexerRequest {
        let url = if self.page_size == 0 {
            format!("{}{}", base_url, self.parameters)
        } else {
            let offset = u64::from(page) * u64::from(self.page_size);
            format!(
                "{}&offset={}&limit={}{}",
                base_url, offset, self.page_size, self.parameters
            )
        };

        let request = IndexerRequest::new(url, self.accept);
        match self.cookies {
            Some(ref cookies) => request.with_cookies(cookies.clone()),
            None => request,
        }
    }
}

impl<'a> IntoIterator for &'a PageableRequests {
    type Item = IndexerRequest;
    type IntoIter = PageIter<'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Iterator over the pages of a [`PageableRequests`]
#[derive(Debug, Clone)]
pub struct PageIter<'a> {
    requests: &'a PageableRequests,
    page: u32,
    remaining: usize,
}

impl Iterator for PageIter<'_> {
    type Item = IndexerRequest;

    fn next(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }
        let base_url = self.requests.base_url.as_deref()?;

        let request = self.requests.request(base_url, self.page);
        self.page += 1;
        self.remaining -= 1;
        Some(request)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl ExactSizeIterator for PageIter<'_> {}

/// One fallback level of a request chain
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RequestTier {
    groups: Vec<PageableRequests>,
}

impl RequestTier {
    /// The request runs of this tier, one per logical query
    pub fn groups(&self) -> &[PageableRequests] {
        &self.groups
    }

    /// All requests of this tier, produced lazily in order
    pub fn requests(&self) -> impl Iterator<Item = IndexerRequest> + '_ {
        self.groups.iter().flat_map(PageableRequests::iter)
    }

    pub fn len(&self) -> usize {
        self.groups.len()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }
}

/// Ordered tiers of pageable requests; earlier tiers are preferred
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestChain {
    tiers: Vec<RequestTier>,
}

impl Default for RequestChain {
    fn default() -> Self {
        Self::new()
    }
}

impl RequestChain {
    pub fn new() -> Self {
        Self {
            tiers: vec![RequestTier::default()],
        }
    }

    /// Add a request run to the current tier
    pub fn add(&mut self, requests: PageableRequests) {
        if let Some(tier) = self.tiers.last_mut() {
            tier.groups.push(requests);
        }
    }

    /// Start a new tier; does nothing while the current tier is empty
    pub fn add_tier(&mut self) {
        if self.tiers.last().is_some_and(RequestTier::is_empty) {
            return;
        }
        self.tiers.push(RequestTier::default());
    }

    /// Non-empty tiers in order of preference
    pub fn tiers(&self) -> &[RequestTier] {
        match self.tiers.last() {
            Some(last) if last.is_empty() => &self.tiers[..self.tiers.len() - 1],
            _ => &self.tiers,
        }
    }

    pub fn tier(&self, index: usize) -> Option<&RequestTier> {
        self.tiers().get(index)
    }

    pub fn tier_count(&self) -> usize {
        self.tiers().len()
    }

    pub fn is_empty(&self) -> bool {
        self.tier_count() == 0
    }

    /// Every request run across all tiers, in order
    pub fn all_groups(&self) -> impl Iterator<Item = &PageableRequests> {
        self.tiers().iter().flat_map(|tier| tier.groups.iter())
    }
}

impl<'a> IntoIterator for &'a RequestChain {
    type Item = &'a RequestTier;
    type IntoIter = std::slice::Iter<'a, RequestTier>;

    fn into_iter(self) -> Self::IntoIter {
        self.tiers().iter()
    }
}
