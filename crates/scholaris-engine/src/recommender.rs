//! The composite recommendation service.
//!
//! `Recommender` owns the shared model state (corpus, fitted vectorizer,
//! row vectors) behind a `tokio::sync::RwLock`: recommendation requests
//! take the read guard for projection and ranking, while refresh and
//! fit-on-demand take the write guard for the whole
//! load+prepare+fit+save cycle so readers never observe a half-replaced
//! index.
//!
//! Public surface: `recommend_by_domain`, `recommend_by_abstract`,
//! `refresh`, `clear_cache`. The only error these ever return is
//! `InvalidRequest`; every other failure mode degrades to fixture data,
//! a zero query vector, or an empty result.

use std::sync::Arc;

use tokio::sync::RwLock;
use tracing::{debug, info, warn};

use scholaris_core::defaults::{
    ENV_MAX_FEATURES, ENV_TOP_N, DEFAULT_TOP_N, HISTORY_QUERY_MAX, MAX_FEATURES,
    PSEUDO_DOMAIN_TOKENS,
};
use scholaris_core::error::{Error, Result};
use scholaris_core::models::{QueryKind, Recommendation};
use scholaris_core::normalizer::TextNormalizer;
use scholaris_core::traits::{HistorySink, PublicationSource, ResearcherDirectory, SnapshotStore};
use scholaris_index::{load_corpus, rank, Corpus, TfidfVectorizer};

use crate::cache::{ModelCache, ModelSnapshot};
use crate::session::{RequesterIdentity, SessionManager};

// =============================================================================
// CONFIGURATION
// =============================================================================

/// Engine tunables, environment-overridable.
#[derive(Debug, Clone)]
pub struct EngineConfig {
    /// TF-IDF vocabulary cap.
    pub max_features: usize,
    /// Result count used when the caller does not supply one.
    pub default_top_n: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            max_features: MAX_FEATURES,
            default_top_n: DEFAULT_TOP_N,
        }
    }
}

impl EngineConfig {
    /// Read configuration from the environment, falling back to the
    /// centralized defaults. Unparseable values fall back too, with a
    /// WARN rather than a startup failure.
    pub fn from_env() -> Self {
        Self {
            max_features: env_usize(ENV_MAX_FEATURES, MAX_FEATURES),
            default_top_n: env_usize(ENV_TOP_N, DEFAULT_TOP_N),
        }
    }
}

fn env_usize(var: &str, default: usize) -> usize {
    match std::env::var(var) {
        Ok(raw) => match raw.parse::<usize>() {
            Ok(value) if value > 0 => value,
            _ => {
                warn!(var, value = %raw, default, "ignoring unparseable configuration value");
                default
            }
        },
        Err(_) => default,
    }
}

// =============================================================================
// RESPONSES
// =============================================================================

/// A ranked recommendation list plus the degraded-mode flag, so callers
/// can tell fixture-backed results from real ones.
#[derive(Debug, Clone)]
pub struct RecommendationResponse {
    pub recommendations: Vec<Recommendation>,
    pub degraded: bool,
}

/// Outcome of a manual refresh.
#[derive(Debug, Clone)]
pub struct RefreshSummary {
    pub corpus_size: usize,
    pub feature_count: usize,
    pub degraded: bool,
}

// =============================================================================
// RECOMMENDER
// =============================================================================

/// Fitted model state shared across requests. Replaced wholesale under
/// the write lock; row `i` of `vectors` always describes `corpus`
/// record `i`.
struct ModelState {
    corpus: Corpus,
    vectorizer: TfidfVectorizer,
    vectors: Vec<Vec<f32>>,
}

impl ModelState {
    fn from_snapshot(snapshot: ModelSnapshot) -> Self {
        Self {
            corpus: snapshot.corpus,
            vectorizer: snapshot.vectorizer,
            vectors: snapshot.vectors,
        }
    }

    fn to_snapshot(&self) -> ModelSnapshot {
        ModelSnapshot {
            vectorizer: self.vectorizer.clone(),
            vectors: self.vectors.clone(),
            corpus: self.corpus.clone(),
        }
    }
}

/// The content-based recommendation engine.
pub struct Recommender {
    source: Arc<dyn PublicationSource>,
    cache: ModelCache,
    session: SessionManager,
    normalizer: TextNormalizer,
    config: EngineConfig,
    state: RwLock<Option<ModelState>>,
}

impl Recommender {
    pub fn new(
        source: Arc<dyn PublicationSource>,
        snapshots: Arc<dyn SnapshotStore>,
        directory: Arc<dyn ResearcherDirectory>,
        history: Arc<dyn HistorySink>,
        config: EngineConfig,
    ) -> Self {
        Self {
            source,
            cache: ModelCache::new(snapshots),
            session: SessionManager::new(directory, history),
            normalizer: TextNormalizer::new(),
            config,
            state: RwLock::new(None),
        }
    }

    /// Result count used when the caller passes `None`.
    pub fn default_top_n(&self) -> usize {
        self.config.default_top_n
    }

    /// Recommend publications for an explicit research-domain phrase.
    pub async fn recommend_by_domain(
        &self,
        requester: &RequesterIdentity,
        domain: &str,
        top_n: Option<usize>,
    ) -> Result<RecommendationResponse> {
        let top_n = self.validate(requester, domain, top_n)?;
        let domain = domain.trim();

        let response = self.rank_query(domain, top_n).await?;
        self.session
            .record_outcome(
                requester,
                domain,
                QueryKind::Domain(domain.to_string()),
                response.recommendations.clone(),
            )
            .await;
        Ok(response)
    }

    /// Recommend publications for a free-text abstract. The interest
    /// signal recorded for the requester is a pseudo-domain derived from
    /// the leading normalized tokens, and the stored query is truncated.
    pub async fn recommend_by_abstract(
        &self,
        requester: &RequesterIdentity,
        abstract_text: &str,
        top_n: Option<usize>,
    ) -> Result<RecommendationResponse> {
        let top_n = self.validate(requester, abstract_text, top_n)?;

        let response = self.rank_query(abstract_text, top_n).await?;
        let pseudo_domain = pseudo_domain(&self.normalizer.normalize(abstract_text));
        self.session
            .record_outcome(
                requester,
                &pseudo_domain,
                QueryKind::Abstract(truncate_query(abstract_text)),
                response.recommendations.clone(),
            )
            .await;
        Ok(response)
    }

    /// Force a full load+prepare+fit+save cycle, regardless of cache or
    /// in-memory state. Readers are excluded for the duration.
    pub async fn refresh(&self) -> RefreshSummary {
        let mut guard = self.state.write().await;
        let state = self.build_model().await;
        let summary = match &state {
            Some(s) => RefreshSummary {
                corpus_size: s.corpus.len(),
                feature_count: s.vectorizer.dimension(),
                degraded: s.corpus.degraded(),
            },
            None => RefreshSummary {
                corpus_size: 0,
                feature_count: 0,
                degraded: true,
            },
        };
        if let Some(s) = &state {
            if let Err(e) = self.cache.save(&s.to_snapshot()).await {
                warn!(error = %e, "failed to persist refreshed model snapshot");
            }
        }
        *guard = state;
        info!(
            corpus_size = summary.corpus_size,
            feature_count = summary.feature_count,
            degraded = summary.degraded,
            "model refreshed"
        );
        summary
    }

    /// Delete the persisted snapshot and drop the in-memory model, so
    /// the next recommendation runs a full load+prepare+fit.
    pub async fn clear_cache(&self) {
        let mut guard = self.state.write().await;
        if let Err(e) = self.cache.invalidate().await {
            warn!(error = %e, "failed to delete model snapshot");
        }
        *guard = None;
        info!("model cache cleared");
    }

    fn validate(
        &self,
        requester: &RequesterIdentity,
        query: &str,
        top_n: Option<usize>,
    ) -> Result<usize> {
        if requester.name.trim().is_empty() {
            return Err(Error::InvalidRequest("requester name is required".to_string()));
        }
        if query.trim().is_empty() {
            return Err(Error::InvalidRequest("query text is required".to_string()));
        }
        match top_n {
            Some(0) => Err(Error::InvalidRequest(
                "top_n must be a positive integer".to_string(),
            )),
            Some(n) => Ok(n),
            None => Ok(self.config.default_top_n),
        }
    }

    /// Shared projection+ranking path for both query variants.
    async fn rank_query(&self, query: &str, top_n: usize) -> Result<RecommendationResponse> {
        self.ensure_model().await;

        let guard = self.state.read().await;
        let state = match guard.as_ref() {
            Some(state) => state,
            // Nothing fit (empty corpus): empty result, never an error.
            None => {
                return Ok(RecommendationResponse {
                    recommendations: Vec::new(),
                    degraded: true,
                })
            }
        };

        let normalized = self.normalizer.normalize(query);
        let query_vector = state.vectorizer.transform(&normalized);
        let hits = rank(&query_vector, &state.vectors, top_n);

        let recommendations: Vec<Recommendation> = hits
            .iter()
            .filter_map(|hit| {
                state.corpus.get(hit.index).map(|record| Recommendation {
                    publication_id: record.id.clone(),
                    title: record.title.clone(),
                    abstract_short: record.abstract_short.clone(),
                    score: hit.score,
                    keywords: record.keywords.clone(),
                    url: record.url.clone(),
                })
            })
            .collect();

        debug!(
            result_count = recommendations.len(),
            top_n,
            corpus_size = state.corpus.len(),
            "recommendation ranked"
        );

        Ok(RecommendationResponse {
            degraded: state.corpus.degraded(),
            recommendations,
        })
    }

    /// Make sure a fitted model is in place: reuse the in-memory one,
    /// else the persisted snapshot (unless the source has visibly grown
    /// past it), else a fresh load+prepare+fit+save.
    async fn ensure_model(&self) {
        if self.state.read().await.is_some() {
            return;
        }

        let mut guard = self.state.write().await;
        // Another request may have fit while this one waited.
        if guard.is_some() {
            return;
        }

        if let Some(snapshot) = self.cache.load().await {
            let grown = match self.source.count().await {
                Ok(count) => count > snapshot.corpus.len(),
                // Unreachable source: the snapshot is the best data we have.
                Err(_) => false,
            };
            if grown {
                warn!(
                    cached = snapshot.corpus.len(),
                    "corpus grew past cached snapshot, re-fitting"
                );
            } else {
                *guard = Some(ModelState::from_snapshot(snapshot));
                return;
            }
        }

        let state = self.build_model().await;
        if let Some(s) = &state {
            if let Err(e) = self.cache.save(&s.to_snapshot()).await {
                warn!(error = %e, "failed to persist fitted model snapshot");
            }
        }
        *guard = state;
    }

    /// Full load+prepare+fit cycle. `None` only for an empty corpus,
    /// which short-circuits recommendations to empty results.
    async fn build_model(&self) -> Option<ModelState> {
        let mut corpus = load_corpus(self.source.as_ref()).await;
        corpus.prepare(&self.normalizer);

        let texts = corpus.canonical_texts();
        let vectorizer = match TfidfVectorizer::fit(&texts, self.config.max_features) {
            Ok(vectorizer) => vectorizer,
            Err(e) => {
                warn!(error = %e, "model fit skipped");
                return None;
            }
        };
        let vectors: Vec<Vec<f32>> = texts.iter().map(|t| vectorizer.transform(t)).collect();

        info!(
            corpus_size = corpus.len(),
            feature_count = vectorizer.dimension(),
            degraded = corpus.degraded(),
            "model fitted"
        );
        Some(ModelState {
            corpus,
            vectorizer,
            vectors,
        })
    }
}

// =============================================================================
// QUERY DERIVATION HELPERS
// =============================================================================

/// Pseudo-domain: the first few normalized tokens of a free-text query,
/// used as the interest signal when no explicit domain was given.
fn pseudo_domain(normalized: &str) -> String {
    normalized
        .split_whitespace()
        .take(PSEUDO_DOMAIN_TOKENS)
        .collect::<Vec<_>>()
        .join(" ")
}

/// Truncate a free-text query for history storage.
fn truncate_query(query: &str) -> String {
    if query.chars().count() <= HISTORY_QUERY_MAX {
        return query.to_string();
    }
    let mut truncated: String = query.chars().take(HISTORY_QUERY_MAX).collect();
    truncated.push_str("...");
    truncated
}
