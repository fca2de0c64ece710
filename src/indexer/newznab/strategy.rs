//! Search strategy selection
//!
//! Decides which logical queries an indexer can legally answer and groups
//! them into tiers, most precise first:
//!
//! 1. movie search by TMDB id, when `tmdbid` is supported and the id is known
//! 2. one free-text search per scene title, when `q` is supported
//!
//! Only declared capabilities are used. An indexer supporting neither gets an
//! empty plan.

use crate::indexer::capabilities::{NewznabCapabilities, PARAM_TMDB_ID, TextSearchEngine};
use crate::indexer::criteria::MovieSearchCriteria;
use crate::indexer::types::{LogicalQuery, SearchType};

use super::sanitize::newznabify_title;

/// Logical queries grouped into tiers, in order of preference
pub type SearchPlan = Vec<Vec<LogicalQuery>>;

/// Plan the tiers of a targeted movie search
pub fn select_tiers(
    capabilities: &NewznabCapabilities,
    criteria: &MovieSearchCriteria,
) -> SearchPlan {
    let mut plan = SearchPlan::new();

    if let Some(tier) = id_tier(capabilities, criteria) {
        plan.push(tier);
    }

    if let Some(tier) = text_tier(capabilities, criteria) {
        plan.push(tier);
    }

    plan
}

/// Plan the single query used to sync recent releases
///
/// Some indexers forget to declare movie search parameters while generic
/// search still works, so the movie function is used whenever it is declared
/// and generic search otherwise.
pub fn select_recent(capabilities: &NewznabCapabilities) -> Option<LogicalQuery> {
    if capabilities.movie_search_available() {
        Some(LogicalQuery::new(SearchType::Movie, ""))
    } else if capabilities.search_available() {
        Some(LogicalQuery::new(SearchType::Search, ""))
    } else {
        None
    }
}

fn id_tier(
    capabilities: &NewznabCapabilities,
    criteria: &MovieSearchCriteria,
) -> Option<Vec<LogicalQuery>> {
    if !capabilities.supports_tmdb_search() {
        return None;
    }
    let tmdb_id = criteria.known_tmdb_id()?;

    Some(vec![LogicalQuery::new(
        SearchType::Movie,
        format!("&{}={}", PARAM_TMDB_ID, tmdb_id),
    )])
}

fn text_tier(
    capabilities: &NewznabCapabilities,
    criteria: &MovieSearchCriteria,
) -> Option<Vec<LogicalQuery>> {
    if !capabilities.supports_search() {
        return None;
    }

    let titles = match capabilities.text_search_engine {
        TextSearchEngine::Raw => &criteria.scene_titles,
        TextSearchEngine::Default => &criteria.clean_scene_titles,
    };

    let queries: Vec<LogicalQuery> = titles
        .iter()
        .map(|title| {
            let search_query = format!("{} {}", title, criteria.year);
            LogicalQuery::new(
                SearchType::Search,
                format!("&q={}", newznabify_title(&search_query)),
            )
        })
        .collect();

    if queries.is_empty() {
        None
    } else {
        Some(queries)
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn params(values: &[&str]) -> Option<Vec<String>> {
        Some(values.iter().map(|v| v.to_string()).collect())
    }

    fn criteria(tmdb_id: Option<i32>) -> MovieSearchCriteria {
        MovieSearchCriteria::new(tmdb_id, 2012)
            .with_scene_title("The Avengers")
            .with_scene_title("Marvel's The Avengers")
    }

    fn full_caps() -> NewznabCapabilities {
        NewznabCapabilities {
            supported_search_parameters: params(&["q"]),
            supported_movie_search_parameters: params(&["q", "imdbid", "tmdbid"]),
            supports_aggregate_id_search: true,
            ..Default::default()
        }
    }

    #[test]
    fn test_id_tier_then_text_tier() {
        let plan = select_tiers(&full_caps(), &criteria(Some(123)));

        assert_eq!(plan.len(), 2);
        assert_eq!(plan[0], vec![LogicalQuery::new(SearchType::Movie, "&tmdbid=123")]);
        assert_eq!(
            plan[1],
            vec![
                LogicalQuery::new(SearchType::Search, "&q=Avengers%202012"),
                LogicalQuery::new(SearchType::Search, "&q=Marvels%20The%20Avengers%202012"),
            ]
        );
    }

    #[test]
    fn test_id_tier_without_aggregate_support() {
        let caps = NewznabCapabilities {
            supports_aggregate_id_search: false,
            supported_search_parameters: None,
            ..full_caps()
        };
        let plan = select_tiers(&caps, &criteria(Some(123)));

        assert_eq!(plan, vec![vec![LogicalQuery::new(SearchType::Movie, "&tmdbid=123")]]);
    }

    #[test]
    fn test_unknown_id_skips_id_tier() {
        for tmdb_id in [None, Some(0), Some(-5)] {
            let plan = select_tiers(&full_caps(), &criteria(tmdb_id));

            assert_eq!(plan.len(), 1);
            assert!(plan[0].iter().all(|q| q.search_type == SearchType::Search));
        }
    }

    #[test]
    fn test_raw_engine_uses_scene_titles() {
        let caps = NewznabCapabilities {
            text_search_engine: TextSearchEngine::Raw,
            ..full_caps()
        };
        let plan = select_tiers(&caps, &criteria(None));

        assert_eq!(
            plan[0],
            vec![
                LogicalQuery::new(SearchType::Search, "&q=The%20Avengers%202012"),
                LogicalQuery::new(SearchType::Search, "&q=Marvel%27s%20The%20Avengers%202012"),
            ]
        );
    }

    #[test]
    fn test_movie_search_without_tmdbid_param() {
        let caps = NewznabCapabilities {
            supported_movie_search_parameters: params(&["q", "imdbid"]),
            ..full_caps()
        };
        let plan = select_tiers(&caps, &criteria(Some(123)));

        assert_eq!(plan.len(), 1);
        assert_eq!(plan[0].len(), 2);
        assert_eq!(plan[0][0].search_type, SearchType::Search);
    }

    #[test]
    fn test_no_capabilities_no_plan() {
        let plan = select_tiers(&NewznabCapabilities::default(), &criteria(Some(123)));
        assert!(plan.is_empty());
    }

    #[test]
    fn test_search_without_titles_has_no_text_tier() {
        let plan = select_tiers(&full_caps(), &MovieSearchCriteria::new(Some(123), 2012));
        assert_eq!(plan.len(), 1);
        assert_eq!(plan[0][0].search_type, SearchType::Movie);
    }

    #[test]
    fn test_select_recent() {
        assert_eq!(
            select_recent(&full_caps()),
            Some(LogicalQuery::new(SearchType::Movie, ""))
        );

        // Declared movie search is enough, even without tmdbid
        let caps = NewznabCapabilities {
            supported_movie_search_parameters: Some(vec![]),
            ..Default::default()
        };
        assert_eq!(select_recent(&caps), Some(LogicalQuery::new(SearchType::Movie, "")));

        let caps = NewznabCapabilities {
            supported_search_parameters: params(&["q"]),
            ..Default::default()
        };
        assert_eq!(select_recent(&caps), Some(LogicalQuery::new(SearchType::Search, "")));

        assert_eq!(select_recent(&NewznabCapabilities::default()), None);
    }
}
