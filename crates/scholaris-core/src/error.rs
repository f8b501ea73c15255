//! Error types for scholaris.

use thiserror::Error;

/// Result type alias using scholaris' Error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Core error type for scholaris operations.
///
/// Only `InvalidRequest` is ever surfaced to callers of the public
/// recommendation operations; every other variant is absorbed internally
/// by a fallback (fixture corpus, fit-on-demand, zero-vector substitution,
/// cache discard, isolated persistence).
#[derive(Error, Debug)]
pub enum Error {
    /// Publication source could not be reached or returned nothing
    #[error("Source error: {0}")]
    Source(String),

    /// Researcher directory operation failed
    #[error("Directory error: {0}")]
    Directory(String),

    /// History sink operation failed
    #[error("History error: {0}")]
    History(String),

    /// Snapshot store / model cache operation failed
    #[error("Cache error: {0}")]
    Cache(String),

    /// Attempted to fit a vector space model over an empty corpus
    #[error("Cannot fit model: corpus is empty")]
    EmptyCorpus,

    /// Request rejected before any work was done
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// Serialization/deserialization error
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// File I/O operation failed
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Internal error
    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<serde_json::Error> for Error {
    fn from(e: serde_json::Error) -> Self {
        Error::Serialization(e.to_string())
    }
}

impl Error {
    /// Whether this error may escape the public recommendation surface.
    pub fn is_caller_visible(&self) -> bool {
        matches!(self, Error::InvalidRequest(_))
    }
}
