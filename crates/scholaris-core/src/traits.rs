//! Collaborator traits for scholaris abstractions.
//!
//! The recommendation core never talks to a database, a scraping layer, or
//! the filesystem directly; it goes through these interfaces. Every method
//! returns an explicit `Result` so that fallback decisions (fixture
//! substitution, cache discard, isolated persistence) are made visibly at
//! the call site instead of inside a catch-all.

use async_trait::async_trait;
use uuid::Uuid;

use crate::error::Result;
use crate::models::{Publication, ResearcherProfile, SearchHistoryRecord};

// =============================================================================
// PUBLICATION SOURCE
// =============================================================================

/// Source of publication records (database, bibliographic API, or an
/// in-memory substitute).
///
/// The corpus store pages through the source in batches to bound peak
/// memory. A failing or empty source triggers the fixture fallback at the
/// corpus store boundary.
#[async_trait]
pub trait PublicationSource: Send + Sync {
    /// Total number of records currently available.
    async fn count(&self) -> Result<usize>;

    /// Fetch up to `limit` records starting at offset `skip`.
    async fn fetch_batch(&self, skip: usize, limit: usize) -> Result<Vec<Publication>>;
}

// =============================================================================
// RESEARCHER DIRECTORY
// =============================================================================

/// Directory of researcher profiles.
#[async_trait]
pub trait ResearcherDirectory: Send + Sync {
    /// Look up a profile by exact name.
    async fn find_by_name(&self, name: &str) -> Result<Option<ResearcherProfile>>;

    /// Look up a profile by email.
    async fn find_by_email(&self, email: &str) -> Result<Option<ResearcherProfile>>;

    /// Create a new profile, returning its identifier.
    async fn create(&self, profile: ResearcherProfile) -> Result<Uuid>;

    /// Replace the interest set of an existing profile.
    async fn update_interests(&self, id: Uuid, interests: Vec<String>) -> Result<()>;
}

// =============================================================================
// HISTORY SINK
// =============================================================================

/// Append-only sink for search history records. The core never reads
/// history back; retention is an external concern.
#[async_trait]
pub trait HistorySink: Send + Sync {
    async fn append(&self, record: SearchHistoryRecord) -> Result<()>;
}

// =============================================================================
// SNAPSHOT STORE
// =============================================================================

/// The three blobs that make up a persisted model snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SnapshotKind {
    Vectorizer,
    Vectors,
    Corpus,
}

impl SnapshotKind {
    /// All snapshot kinds, in the order they are written.
    pub const ALL: [SnapshotKind; 3] = [
        SnapshotKind::Vectorizer,
        SnapshotKind::Vectors,
        SnapshotKind::Corpus,
    ];

    /// Stable key name used by stores (e.g. as a file stem).
    pub fn key(&self) -> &'static str {
        match self {
            Self::Vectorizer => "vectorizer",
            Self::Vectors => "publication_vectors",
            Self::Corpus => "publications",
        }
    }
}

/// Persistence mirror for fitted model state. Blobs are opaque to the
/// store; validation happens in the model cache layer.
#[async_trait]
pub trait SnapshotStore: Send + Sync {
    /// Read a blob, `None` if absent.
    async fn read(&self, kind: SnapshotKind) -> Result<Option<Vec<u8>>>;

    /// Write a blob, replacing any existing one.
    async fn write(&self, kind: SnapshotKind, data: &[u8]) -> Result<()>;

    /// Delete a blob if present.
    async fn delete(&self, kind: SnapshotKind) -> Result<()>;

    /// Whether a blob exists.
    async fn exists(&self, kind: SnapshotKind) -> Result<bool>;
}
