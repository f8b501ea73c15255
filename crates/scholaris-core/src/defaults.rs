//! Centralized default constants for the scholaris system.
//!
//! **This module is the single source of truth** for all shared default
//! values. All crates reference these constants instead of defining their
//! own magic numbers.

// =============================================================================
// VECTOR SPACE MODEL
// =============================================================================

/// Maximum vocabulary size for the TF-IDF model. Terms beyond the cap are
/// dropped by global frequency ranking.
pub const MAX_FEATURES: usize = 5000;

// =============================================================================
// CORPUS LOADING
// =============================================================================

/// Batch size for paged corpus loading from the publication source.
/// Bounds peak memory when the source holds tens of thousands of records.
pub const LOAD_BATCH_SIZE: usize = 2500;

/// Maximum length of a derived short abstract in characters. Truncation
/// happens at a sentence boundary where possible.
pub const SHORT_ABSTRACT_MAX: usize = 250;

/// Title prefix length used for best-effort duplicate detection.
pub const DEDUP_TITLE_PREFIX: usize = 50;

// =============================================================================
// RECOMMENDATION
// =============================================================================

/// Default number of recommendations returned per request.
pub const DEFAULT_TOP_N: usize = 10;

/// Number of leading normalized tokens used to derive a pseudo-domain
/// from a free-text query.
pub const PSEUDO_DOMAIN_TOKENS: usize = 5;

/// Maximum length of a free-text query stored in a history record.
/// Longer queries are truncated with an ellipsis.
pub const HISTORY_QUERY_MAX: usize = 200;

// =============================================================================
// MODEL CACHE
// =============================================================================

/// Snapshot format version. Bumped whenever the serialized layout of the
/// vectorizer, vectors, or corpus snapshot changes incompatibly.
pub const CACHE_VERSION: u32 = 1;

/// Environment variable for the snapshot directory.
pub const ENV_CACHE_DIR: &str = "SCHOLARIS_CACHE_DIR";

/// Default snapshot directory.
pub const DEFAULT_CACHE_DIR: &str = "./model_cache";

// =============================================================================
// ENGINE CONFIGURATION
// =============================================================================

/// Environment variable overriding the TF-IDF vocabulary cap.
pub const ENV_MAX_FEATURES: &str = "SCHOLARIS_MAX_FEATURES";

/// Environment variable overriding the default result count.
pub const ENV_TOP_N: &str = "SCHOLARIS_TOP_N";
