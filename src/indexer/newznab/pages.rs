//! Pagination of logical queries into concrete requests

use crate::indexer::categories::categories_query;
use crate::indexer::request::{HttpAccept, PageableRequests};
use crate::indexer::types::{IndexerSettings, SearchType};

/// Build the URL shared by every page of a query
///
/// `{base_url}{api_path}?t={type}&cat={categories}&extended=1{additional}[&apikey={key}]`
pub fn base_url(settings: &IndexerSettings, search_type: SearchType) -> String {
    let mut url = format!(
        "{}{}?t={}&cat={}&extended=1{}",
        settings.base_url.trim_end_matches('/'),
        settings.api_path.trim_end_matches('/'),
        search_type,
        categories_query(&settings.categories),
        settings.additional_parameters
    );

    if let Some(api_key) = settings.api_key() {
        url.push_str("&apikey=");
        url.push_str(api_key);
    }

    url
}

/// Expand one logical query into its paginated requests
///
/// An indexer configured without categories gets no requests at all.
pub fn page_requests(
    settings: &IndexerSettings,
    search_type: SearchType,
    parameters: &str,
    max_pages: u32,
    page_size: u32,
) -> PageableRequests {
    if settings.categories.is_empty() {
        return PageableRequests::empty();
    }

    PageableRequests::new(
        base_url(settings, search_type),
        parameters,
        max_pages,
        page_size,
        HttpAccept::Rss,
    )
}
