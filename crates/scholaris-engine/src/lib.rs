//! # scholaris-engine
//!
//! The composite recommendation service: model cache, recommendation
//! session manager, and the `Recommender` that ties corpus loading,
//! TF-IDF fitting, similarity ranking, and requester bookkeeping
//! together behind three public operations: recommend (two variants),
//! refresh, and clear-cache.
//!
//! Failure philosophy: the only errors callers ever see are invalid
//! requests. Source outages fall back to fixture data, a corrupt cache
//! falls through to a fresh fit, projection trouble becomes a zero
//! vector, and profile/history persistence failures are logged without
//! failing the recommendation that triggered them.

pub mod cache;
pub mod recommender;
pub mod session;

pub use cache::{ModelCache, ModelSnapshot};
pub use recommender::{
    EngineConfig, RecommendationResponse, Recommender, RefreshSummary,
};
pub use session::{DefaultIdentityMatcher, IdentityMatcher, RequesterIdentity, SessionManager};
