//! Structured logging schema and field name constants for scholaris.
//!
//! All crates use these constants for consistent structured logging fields
//! so log aggregation tools can query by standardized names across every
//! subsystem.
//!
//! ## Log Level Contract
//!
//! | Level | Usage |
//! |-------|-------|
//! | ERROR | Degraded service, requires operator attention |
//! | WARN  | Recoverable issue, automatic fallback applied |
//! | INFO  | Lifecycle events (startup, refresh), operation completions |
//! | DEBUG | Decision points, intermediate values, config choices |
//! | TRACE | Per-item iteration, high-volume data (similarity rows) |

// ─── Identity fields ───────────────────────────────────────────────────────

/// Subsystem originating the log event.
/// Values: "corpus", "index", "ranker", "cache", "session", "engine"
pub const SUBSYSTEM: &str = "subsystem";

/// Logical operation name.
/// Examples: "recommend", "refresh", "fit", "load", "resolve_identity"
pub const OPERATION: &str = "op";

// ─── Entity fields ─────────────────────────────────────────────────────────

/// Researcher profile UUID being operated on.
pub const RESEARCHER_ID: &str = "researcher_id";

/// Query text (domain phrase or truncated abstract).
pub const QUERY: &str = "query";

/// Publication identifier.
pub const PUBLICATION_ID: &str = "publication_id";

// ─── Measurement fields ────────────────────────────────────────────────────

/// Wall-clock duration in milliseconds.
pub const DURATION_MS: &str = "duration_ms";

/// Number of recommendations returned.
pub const RESULT_COUNT: &str = "result_count";

/// Number of records in the corpus.
pub const CORPUS_SIZE: &str = "corpus_size";

/// Number of features (vocabulary size) in the fitted model.
pub const FEATURE_COUNT: &str = "feature_count";

/// Number of records fetched in a source batch.
pub const BATCH_COUNT: &str = "batch_count";

// ─── Outcome fields ────────────────────────────────────────────────────────

/// Whether fixture data was substituted for the real source.
pub const DEGRADED: &str = "degraded";

/// Whether the fitted model was restored from the snapshot cache.
pub const CACHE_HIT: &str = "cache_hit";

/// Error message when an operation fails.
pub const ERROR_MSG: &str = "error";
