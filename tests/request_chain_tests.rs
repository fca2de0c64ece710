//! Integration tests for request chain planning
//!
//! These tests verify the complete flow from capabilities to requests:
//! - Caps document -> capabilities -> tiered request chain
//! - Exact URL grammar of produced requests
//! - Tier fallback when consuming the chain
//! - Concurrent planning across many indexers

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use anyhow::Result;
use async_trait::async_trait;

use newznab_planner::IndexerError;
use newznab_planner::indexer::newznab::{build, page_requests};
use newznab_planner::indexer::{
    CachedCapabilitiesProvider, CapabilitiesProvider, ChainRunner, IndexerRequest,
    IndexerRequestGenerator, IndexerSettings, MovieSearchCriteria, NewznabCapabilities,
    NewznabRequestGenerator, RequestSender, SearchType,
};

const CAPS_XML: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<caps>
  <limits max="100" default="100"/>
  <searching>
    <search available="yes" supportedParams="q"/>
    <movie-search available="yes" supportedParams="q,imdbid,tmdbid" supportsAggregateIdSearch="true"/>
  </searching>
</caps>"#;

fn settings() -> IndexerSettings {
    IndexerSettings::new("http://idx.example")
        .with_api_path("/api")
        .with_api_key("k1")
        .with_categories(vec![2010, 2000])
}

fn criteria() -> MovieSearchCriteria {
    MovieSearchCriteria::new(Some(123), 2012)
        .with_scene_title("The Avengers")
        .with_scene_title("Avengers Assemble")
}

/// Serves the caps document and counts lookups
struct CapsDocumentProvider {
    lookups: AtomicUsize,
}

impl CapabilitiesProvider for CapsDocumentProvider {
    fn get_capabilities(
        &self,
        _settings: &IndexerSettings,
    ) -> newznab_planner::Result<NewznabCapabilities> {
        self.lookups.fetch_add(1, Ordering::SeqCst);
        NewznabCapabilities::from_caps_xml(CAPS_XML)
    }
}

// ============================================================================
// URL Grammar
// ============================================================================

mod url_grammar {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn test_end_to_end_movie_id_pages() {
        let requests = page_requests(&settings(), SearchType::Movie, "&tmdbid=123", 2, 50);
        let urls: Vec<String> = requests.iter().map(|r| r.url().to_string()).collect();

        assert_eq!(
            urls,
            vec![
                "http://idx.example/api?t=movie&cat=2000,2010&extended=1&apikey=k1&offset=0&limit=50&tmdbid=123",
                "http://idx.example/api?t=movie&cat=2000,2010&extended=1&apikey=k1&offset=50&limit=50&tmdbid=123",
            ]
        );
    }

    #[test]
    fn test_all_requests_share_base() {
        let capabilities = NewznabCapabilities::from_caps_xml(CAPS_XML).unwrap();
        let chain = build(&settings(), &capabilities, &criteria(), 3, 100);

        for tier in &chain {
            for request in tier.requests() {
                assert!(request.url().starts_with("http://idx.example/api?t="));
                assert!(request.url().contains("&cat=2000,2010&extended=1&apikey=k1&offset="));
                assert_eq!(request.url().matches("apikey").count(), 1);
            }
        }
    }
}

// ============================================================================
// Planning
// ============================================================================

mod planning {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn test_caps_document_to_chain() {
        let provider = Arc::new(CapsDocumentProvider {
            lookups: AtomicUsize::new(0),
        });
        let generator = NewznabRequestGenerator::new(provider, settings());

        let chain = generator.get_search_requests(&criteria()).unwrap();

        assert_eq!(chain.tier_count(), 2);

        let id_tier = chain.tier(0).unwrap();
        assert_eq!(id_tier.len(), 1);
        assert_eq!(id_tier.requests().count(), 30);
        assert!(id_tier.requests().all(|r| r.url().ends_with("&tmdbid=123")));

        let text_tier = chain.tier(1).unwrap();
        assert_eq!(text_tier.len(), 2);
        let first_pages: Vec<String> = text_tier
            .groups()
            .iter()
            .filter_map(|group| group.iter().next())
            .map(|r| r.url().to_string())
            .collect();
        assert_eq!(
            first_pages,
            vec![
                "http://idx.example/api?t=search&cat=2000,2010&extended=1&apikey=k1&offset=0&limit=100&q=Avengers%202012",
                "http://idx.example/api?t=search&cat=2000,2010&extended=1&apikey=k1&offset=0&limit=100&q=Avengers%20Assemble%202012",
            ]
        );
    }

    #[test]
    fn test_capabilities_are_looked_up_once_per_indexer() {
        let source = Arc::new(CapsDocumentProvider {
            lookups: AtomicUsize::new(0),
        });
        let cached = Arc::new(CachedCapabilitiesProvider::new(
            source.clone(),
            Duration::from_secs(60),
        ));

        let generator = NewznabRequestGenerator::new(cached.clone(), settings());
        generator.get_search_requests(&criteria()).unwrap();
        generator.get_recent_requests().unwrap();
        assert_eq!(source.lookups.load(Ordering::SeqCst), 1);

        let other = NewznabRequestGenerator::new(cached.clone(), settings().with_api_key("k2"));
        other.get_recent_requests().unwrap();
        assert_eq!(source.lookups.load(Ordering::SeqCst), 2);

        cached.invalidate(&settings());
        generator.get_recent_requests().unwrap();
        assert_eq!(source.lookups.load(Ordering::SeqCst), 3);
    }

    #[test]
    fn test_failed_lookup_is_not_swallowed() {
        struct Offline;

        impl CapabilitiesProvider for Offline {
            fn get_capabilities(
                &self,
                settings: &IndexerSettings,
            ) -> newznab_planner::Result<NewznabCapabilities> {
                Err(IndexerError::unavailable(&settings.base_url, "timed out"))
            }
        }

        let generator = NewznabRequestGenerator::new(Arc::new(Offline), settings());
        let err = generator.get_search_requests(&criteria()).unwrap_err();
        assert!(err.to_string().contains("timed out"));
    }

    #[tokio::test]
    async fn test_concurrent_planning_across_indexers() {
        let provider: Arc<dyn CapabilitiesProvider> = Arc::new(CachedCapabilitiesProvider::new(
            CapsDocumentProvider {
                lookups: AtomicUsize::new(0),
            },
            Duration::from_secs(60),
        ));

        let mut handles = vec![];
        for i in 0..8 {
            let generator = Arc::new(NewznabRequestGenerator::new(
                provider.clone(),
                IndexerSettings::new(format!("http://idx{}.example", i)).with_categories(vec![2000]),
            ));
            handles.push(tokio::spawn(async move {
                generator.get_search_requests(&criteria()).map(|chain| chain.tier_count())
            }));
        }

        for handle in handles {
            assert_eq!(handle.await.unwrap().unwrap(), 2);
        }
    }
}

// ============================================================================
// Consuming the chain
// ============================================================================

mod consuming {
    use pretty_assertions::assert_eq;

    use super::*;

    /// Indexer without any match for the TMDB id, but with title matches
    struct TitleOnlyIndexer {
        sent: AtomicUsize,
    }

    #[async_trait]
    impl RequestSender for TitleOnlyIndexer {
        type Item = String;

        async fn send(&self, request: &IndexerRequest) -> Result<Vec<String>> {
            self.sent.fetch_add(1, Ordering::SeqCst);
            if request.url().contains("t=movie") {
                return Ok(vec![]);
            }
            Ok(vec![format!("release for {}", request.url())])
        }
    }

    #[tokio::test]
    async fn test_falls_back_to_text_tier() {
        let capabilities = NewznabCapabilities::from_caps_xml(CAPS_XML).unwrap();
        let chain = build(&settings(), &capabilities, &criteria(), 30, 100);
        let indexer = TitleOnlyIndexer {
            sent: AtomicUsize::new(0),
        };

        let outcome = ChainRunner::new().run(&chain, &indexer).await.unwrap();

        // One empty id page, then one short page per title
        assert_eq!(outcome.tier, Some(1));
        assert_eq!(outcome.items.len(), 2);
        assert_eq!(outcome.requests_sent, 3);
        assert_eq!(indexer.sent.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn test_budget_limits_unconsumed_requests() {
        let capabilities = NewznabCapabilities::from_caps_xml(CAPS_XML).unwrap();
        let chain = build(&settings(), &capabilities, &criteria(), 30, 100);
        let indexer = TitleOnlyIndexer {
            sent: AtomicUsize::new(0),
        };

        let outcome = ChainRunner::new()
            .with_request_budget(1)
            .run(&chain, &indexer)
            .await
            .unwrap();

        assert!(outcome.budget_exhausted);
        assert!(outcome.items.is_empty());
        assert_eq!(outcome.tier, None);
        assert_eq!(indexer.sent.load(Ordering::SeqCst), 1);
    }
}
