//! End-to-end tests for the recommendation engine over the in-memory
//! collaborators and a filesystem snapshot store.

use std::sync::Arc;

use tempfile::TempDir;

use scholaris_core::models::{Publication, QueryKind, SourceOrigin};
use scholaris_engine::{
    EngineConfig, ModelCache, Recommender, RequesterIdentity,
};
use scholaris_store::{
    FsSnapshotStore, InMemoryHistorySink, InMemoryResearcherDirectory, StaticPublicationSource,
};

fn publication(id: &str, title: &str, abstract_text: &str, keywords: &[&str]) -> Publication {
    let mut p = Publication::new(id, title, SourceOrigin::Hal);
    p.set_abstract(abstract_text);
    p.set_keywords(keywords.iter().map(|k| k.to_string()).collect());
    p
}

fn sample_corpus() -> Vec<Publication> {
    vec![
        publication(
            "p1",
            "Intro to Machine Learning",
            "We study supervised learning models.",
            &["machine learning", "supervised"],
        ),
        publication(
            "p2",
            "Cooking Pasta",
            "How to boil pasta al dente.",
            &["cooking"],
        ),
    ]
}

struct Harness {
    _cache_dir: TempDir,
    source: Arc<StaticPublicationSource>,
    snapshots: Arc<FsSnapshotStore>,
    directory: Arc<InMemoryResearcherDirectory>,
    history: Arc<InMemoryHistorySink>,
    engine: Recommender,
}

fn harness(records: Vec<Publication>) -> Harness {
    let cache_dir = TempDir::new().unwrap();
    harness_with_dir(records, cache_dir)
}

fn harness_with_dir(records: Vec<Publication>, cache_dir: TempDir) -> Harness {
    let source = Arc::new(StaticPublicationSource::new(records));
    let snapshots = Arc::new(FsSnapshotStore::new(cache_dir.path()));
    let directory = Arc::new(InMemoryResearcherDirectory::new());
    let history = Arc::new(InMemoryHistorySink::new());
    let engine = Recommender::new(
        source.clone(),
        snapshots.clone(),
        directory.clone(),
        history.clone(),
        EngineConfig::default(),
    );
    Harness {
        _cache_dir: cache_dir,
        source,
        snapshots,
        directory,
        history,
        engine,
    }
}

// -----------------------------------------------------------------------------
// Scenario A: relevant record ranked first, irrelevant record excluded
// -----------------------------------------------------------------------------

#[tokio::test]
async fn domain_query_ranks_relevant_record_and_drops_unrelated() {
    let h = harness(sample_corpus());
    let requester = RequesterIdentity::named("Alan Turing");

    let response = h
        .engine
        .recommend_by_domain(&requester, "machine learning", None)
        .await
        .unwrap();

    assert!(!response.degraded);
    assert_eq!(response.recommendations.len(), 1);
    let top = &response.recommendations[0];
    assert_eq!(top.publication_id, "p1");
    assert!(top.score > 0.0);
    assert!(response
        .recommendations
        .iter()
        .all(|r| r.publication_id != "p2"));
}

// -----------------------------------------------------------------------------
// Scenario B: repeated queries do not duplicate interests, history grows
// -----------------------------------------------------------------------------

#[tokio::test]
async fn repeated_domain_query_records_interest_once_and_history_twice() {
    let h = harness(sample_corpus());
    let alice = RequesterIdentity::named("Alice");

    h.engine
        .recommend_by_domain(&alice, "data science", None)
        .await
        .unwrap();
    h.engine
        .recommend_by_domain(&alice, "data science", None)
        .await
        .unwrap();

    let profiles = h.directory.profiles().await;
    assert_eq!(profiles.len(), 1, "same name must not create two profiles");
    let interests: Vec<&String> = profiles[0]
        .interests
        .iter()
        .filter(|i| i.as_str() == "data science")
        .collect();
    assert_eq!(interests.len(), 1);

    let records = h.history.records().await;
    assert_eq!(records.len(), 2);
    assert!(records
        .iter()
        .all(|r| r.researcher_id == profiles[0].id));
}

// -----------------------------------------------------------------------------
// Scenario C: refresh after corpus growth rebuilds index and snapshot
// -----------------------------------------------------------------------------

#[tokio::test]
async fn refresh_after_source_growth_rebuilds_snapshot() {
    let cache_dir = TempDir::new().unwrap();

    // First engine fits and persists a 2-record snapshot.
    {
        let h = harness_with_dir(sample_corpus(), cache_dir);
        let requester = RequesterIdentity::named("Grace Hopper");
        h.engine
            .recommend_by_domain(&requester, "machine learning", None)
            .await
            .unwrap();

        // Second engine over the same snapshot store sees a source that
        // grew by five records; an explicit refresh must rebuild.
        let mut grown = sample_corpus();
        for i in 0..5 {
            grown.push(publication(
                &format!("g{i}"),
                &format!("Growth Paper {i}"),
                "Fresh results on incremental corpus growth.",
                &["growth"],
            ));
        }
        let h2 = harness_with_dir(grown, h._cache_dir);

        let summary = h2.engine.refresh().await;
        assert_eq!(summary.corpus_size, 7);
        assert!(!summary.degraded);

        let snapshot = ModelCache::new(h2.snapshots.clone())
            .load()
            .await
            .expect("refresh must persist a loadable snapshot");
        assert_eq!(snapshot.vectors.len(), 7);
        assert_eq!(snapshot.corpus.len(), 7);
    }
}

#[tokio::test]
async fn stale_snapshot_triggers_refit_on_demand() {
    let cache_dir = TempDir::new().unwrap();
    let h = harness_with_dir(sample_corpus(), cache_dir);
    h.engine.refresh().await;

    // New engine, same snapshot dir, larger source. Fit-on-demand must
    // notice the growth instead of serving the stale snapshot.
    let mut grown = sample_corpus();
    grown.push(publication(
        "p3",
        "Machine Learning for Pasta Quality",
        "Supervised models predicting pasta texture.",
        &["machine learning", "cooking"],
    ));
    let h2 = harness_with_dir(grown, h._cache_dir);

    let response = h2
        .engine
        .recommend_by_domain(&RequesterIdentity::named("Bob"), "machine learning", None)
        .await
        .unwrap();
    let ids: Vec<&str> = response
        .recommendations
        .iter()
        .map(|r| r.publication_id.as_str())
        .collect();
    assert!(ids.contains(&"p3"), "refit must include the new record");
}

// -----------------------------------------------------------------------------
// Scenario D: clear cache, then degraded recommendation when source is down
// -----------------------------------------------------------------------------

#[tokio::test]
async fn clear_cache_then_unavailable_source_serves_fixture_data() {
    let h = harness(sample_corpus());
    let requester = RequesterIdentity::named("Ada Lovelace");

    let first = h
        .engine
        .recommend_by_domain(&requester, "machine learning", None)
        .await
        .unwrap();
    assert!(!first.degraded);

    h.engine.clear_cache().await;
    h.source.set_failing(true);

    let second = h
        .engine
        .recommend_by_domain(&requester, "machine learning", None)
        .await
        .unwrap();
    assert!(second.degraded, "fixture fallback must be observable");
}

#[tokio::test]
async fn snapshot_survives_engine_restart_without_source() {
    let cache_dir = TempDir::new().unwrap();
    let h = harness_with_dir(sample_corpus(), cache_dir);
    h.engine.refresh().await;

    // Fresh engine, same snapshot store, dead source: the persisted
    // snapshot still serves real (non-degraded) recommendations.
    let h2 = harness_with_dir(Vec::new(), h._cache_dir);
    h2.source.set_failing(true);

    let response = h2
        .engine
        .recommend_by_domain(&RequesterIdentity::named("Eve"), "machine learning", None)
        .await
        .unwrap();
    assert!(!response.degraded);
    assert_eq!(response.recommendations[0].publication_id, "p1");
}

// -----------------------------------------------------------------------------
// Partial-failure isolation
// -----------------------------------------------------------------------------

#[tokio::test]
async fn persistence_failures_do_not_mask_a_successful_ranking() {
    let h = harness(sample_corpus());
    h.directory.set_failing(true);
    h.history.set_failing(true);

    let response = h
        .engine
        .recommend_by_domain(&RequesterIdentity::named("Carol"), "machine learning", None)
        .await
        .unwrap();
    assert_eq!(response.recommendations.len(), 1);
    assert!(h.history.records().await.is_empty());
}

#[tokio::test]
async fn history_failure_alone_still_updates_interests() {
    let h = harness(sample_corpus());
    h.history.set_failing(true);

    h.engine
        .recommend_by_domain(&RequesterIdentity::named("Dan"), "machine learning", None)
        .await
        .unwrap();

    let profiles = h.directory.profiles().await;
    assert_eq!(profiles.len(), 1);
    assert!(profiles[0].interests.contains(&"machine learning".to_string()));
}

// -----------------------------------------------------------------------------
// Abstract variant: pseudo-domain and query truncation
// -----------------------------------------------------------------------------

#[tokio::test]
async fn abstract_query_records_pseudo_domain_interest() {
    let h = harness(sample_corpus());
    let requester = RequesterIdentity::named("Frank");

    let abstract_text = "We study supervised learning models for classification.";
    let response = h
        .engine
        .recommend_by_abstract(&requester, abstract_text, None)
        .await
        .unwrap();
    assert!(!response.recommendations.is_empty());

    let profiles = h.directory.profiles().await;
    assert_eq!(profiles.len(), 1);
    // Interest is a pseudo-domain, not the raw abstract.
    assert_eq!(profiles[0].interests.len(), 1);
    assert!(profiles[0].interests[0].len() < abstract_text.len());

    let records = h.history.records().await;
    assert_eq!(records.len(), 1);
    assert!(matches!(records[0].query, QueryKind::Abstract(_)));
}

#[tokio::test]
async fn long_abstract_is_truncated_in_history() {
    let h = harness(sample_corpus());
    let long_abstract = format!("machine learning {}", "filler ".repeat(100));

    h.engine
        .recommend_by_abstract(&RequesterIdentity::named("Gus"), &long_abstract, None)
        .await
        .unwrap();

    let records = h.history.records().await;
    let stored = records[0].query.text();
    assert!(stored.len() < long_abstract.len());
    assert!(stored.ends_with("..."));
}

// -----------------------------------------------------------------------------
// Validation and boundaries
// -----------------------------------------------------------------------------

#[tokio::test]
async fn blank_query_is_rejected() {
    let h = harness(sample_corpus());
    let err = h
        .engine
        .recommend_by_domain(&RequesterIdentity::named("Hal"), "   ", None)
        .await
        .unwrap_err();
    assert!(err.is_caller_visible());
}

#[tokio::test]
async fn zero_top_n_is_rejected() {
    let h = harness(sample_corpus());
    let err = h
        .engine
        .recommend_by_domain(&RequesterIdentity::named("Ivy"), "machine learning", Some(0))
        .await
        .unwrap_err();
    assert!(err.is_caller_visible());
}

#[tokio::test]
async fn blank_requester_name_is_rejected() {
    let h = harness(sample_corpus());
    let err = h
        .engine
        .recommend_by_domain(&RequesterIdentity::named(""), "machine learning", None)
        .await
        .unwrap_err();
    assert!(err.is_caller_visible());
}

#[tokio::test]
async fn zero_overlap_query_yields_empty_list() {
    let h = harness(sample_corpus());
    let response = h
        .engine
        .recommend_by_domain(
            &RequesterIdentity::named("Joe"),
            "quantum chromodynamics lattice",
            None,
        )
        .await
        .unwrap();
    assert!(response.recommendations.is_empty());
}

#[tokio::test]
async fn top_n_truncates_results() {
    let mut records = sample_corpus();
    for i in 0..10 {
        records.push(publication(
            &format!("m{i}"),
            &format!("Machine Learning Study {i}"),
            "Machine learning applied to various problems.",
            &["machine learning"],
        ));
    }
    let h = harness(records);

    let response = h
        .engine
        .recommend_by_domain(&RequesterIdentity::named("Kim"), "machine learning", Some(3))
        .await
        .unwrap();
    assert_eq!(response.recommendations.len(), 3);
}

#[tokio::test]
async fn repeated_query_is_deterministic() {
    let h = harness(sample_corpus());
    let requester = RequesterIdentity::named("Lee");

    let a = h
        .engine
        .recommend_by_domain(&requester, "supervised learning", None)
        .await
        .unwrap();
    let b = h
        .engine
        .recommend_by_domain(&requester, "supervised learning", None)
        .await
        .unwrap();

    let ids_a: Vec<&str> = a.recommendations.iter().map(|r| r.publication_id.as_str()).collect();
    let ids_b: Vec<&str> = b.recommendations.iter().map(|r| r.publication_id.as_str()).collect();
    assert_eq!(ids_a, ids_b);
}

// -----------------------------------------------------------------------------
// Identity matching
// -----------------------------------------------------------------------------

#[tokio::test]
async fn permuted_name_resolves_to_existing_profile() {
    let h = harness(sample_corpus());

    h.engine
        .recommend_by_domain(&RequesterIdentity::named("Marie Curie"), "machine learning", None)
        .await
        .unwrap();
    h.engine
        .recommend_by_domain(&RequesterIdentity::named("Curie Marie"), "machine learning", None)
        .await
        .unwrap();

    assert_eq!(h.directory.profiles().await.len(), 1);
}

#[tokio::test]
async fn email_fallback_resolves_renamed_requester() {
    let h = harness(sample_corpus());

    h.engine
        .recommend_by_domain(
            &RequesterIdentity::with_email("M. Curie", "marie@example.org"),
            "machine learning",
            None,
        )
        .await
        .unwrap();
    h.engine
        .recommend_by_domain(
            &RequesterIdentity::with_email("Marie Sklodowska", "marie@example.org"),
            "machine learning",
            None,
        )
        .await
        .unwrap();

    assert_eq!(h.directory.profiles().await.len(), 1);
}
