//! Core data models for scholaris.
//!
//! These types are shared across all scholaris crates and represent the
//! core domain entities. Records are fully typed with defined defaults;
//! missing-field handling is a compile-time-visible contract rather than
//! optional-key lookups.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

// =============================================================================
// PUBLICATION TYPES
// =============================================================================

/// Which extraction source produced a publication record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SourceOrigin {
    GoogleScholar,
    Hal,
    SemanticScholar,
    /// Built-in fallback data used when no real source is reachable.
    Fixture,
}

impl std::fmt::Display for SourceOrigin {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::GoogleScholar => write!(f, "google_scholar"),
            Self::Hal => write!(f, "hal"),
            Self::SemanticScholar => write!(f, "semantic_scholar"),
            Self::Fixture => write!(f, "fixture"),
        }
    }
}

/// A publication record as held by the corpus store.
///
/// `canonical_text` is a derived field: the normalized concatenation of
/// title, full abstract, and keywords. It is `None` until `prepare()` has
/// run, and any mutation of the source fields clears it so it can never be
/// persisted stale.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Publication {
    /// Stable identifier (source-assigned or generated).
    pub id: String,
    pub title: String,
    /// Full abstract text. May be empty for sources that only expose titles.
    #[serde(default)]
    pub abstract_full: String,
    /// Truncated summary shown in recommendation results.
    #[serde(default)]
    pub abstract_short: String,
    #[serde(default)]
    pub keywords: Vec<String>,
    #[serde(default)]
    pub url: String,
    pub origin: SourceOrigin,
    /// Publication year, when the source provides one. Used only for
    /// best-effort duplicate detection.
    #[serde(default)]
    pub year: Option<i32>,
    /// Derived normalized text; recomputed by `prepare()` when `None`.
    #[serde(default)]
    pub canonical_text: Option<String>,
}

impl Publication {
    /// Create a record with no derived fields computed yet.
    pub fn new(id: impl Into<String>, title: impl Into<String>, origin: SourceOrigin) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            abstract_full: String::new(),
            abstract_short: String::new(),
            keywords: Vec::new(),
            url: String::new(),
            origin,
            year: None,
            canonical_text: None,
        }
    }

    /// Replace the title, invalidating the derived canonical text.
    pub fn set_title(&mut self, title: impl Into<String>) {
        self.title = title.into();
        self.canonical_text = None;
    }

    /// Replace the full abstract, invalidating the derived canonical text.
    pub fn set_abstract(&mut self, abstract_full: impl Into<String>) {
        self.abstract_full = abstract_full.into();
        self.canonical_text = None;
    }

    /// Replace the keyword list, invalidating the derived canonical text.
    pub fn set_keywords(&mut self, keywords: Vec<String>) {
        self.keywords = keywords;
        self.canonical_text = None;
    }
}

/// A single ranked recommendation returned to the caller.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Recommendation {
    pub publication_id: String,
    pub title: String,
    pub abstract_short: String,
    /// Cosine similarity against the query vector, strictly positive.
    pub score: f32,
    pub keywords: Vec<String>,
    pub url: String,
}

// =============================================================================
// RESEARCHER TYPES
// =============================================================================

/// A researcher profile held by the requester directory.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResearcherProfile {
    pub id: Uuid,
    pub name: String,
    pub email: Option<String>,
    /// Accumulated interest domains. Set semantics: no duplicates.
    pub interests: Vec<String>,
    pub h_index: i32,
    pub i10_index: i32,
    pub citations_total: i64,
    pub publication_count: i64,
    pub created_at: DateTime<Utc>,
}

impl ResearcherProfile {
    /// Create a fresh profile with zeroed bibliometric counters.
    pub fn new(name: impl Into<String>, email: Option<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            email,
            interests: Vec::new(),
            h_index: 0,
            i10_index: 0,
            citations_total: 0,
            publication_count: 0,
            created_at: Utc::now(),
        }
    }

    /// Append an interest if not already present. Returns `true` if added.
    pub fn add_interest(&mut self, domain: &str) -> bool {
        if self.interests.iter().any(|d| d == domain) {
            return false;
        }
        self.interests.push(domain.to_string());
        true
    }

    /// Average citations per publication. Zero publications yields 0.0;
    /// the division is guarded unconditionally.
    pub fn average_citations(&self) -> f64 {
        if self.publication_count == 0 {
            return 0.0;
        }
        self.citations_total as f64 / self.publication_count as f64
    }
}

// =============================================================================
// HISTORY TYPES
// =============================================================================

/// The query variant that produced a recommendation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "text", rename_all = "snake_case")]
pub enum QueryKind {
    /// An explicit research-domain phrase.
    Domain(String),
    /// A free-text abstract, truncated for storage.
    Abstract(String),
}

impl QueryKind {
    /// The stored query text, regardless of variant.
    pub fn text(&self) -> &str {
        match self {
            Self::Domain(s) | Self::Abstract(s) => s,
        }
    }
}

/// An append-only search history record. Never mutated or deleted by the
/// core.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchHistoryRecord {
    pub id: Uuid,
    pub researcher_id: Uuid,
    pub query: QueryKind,
    /// Snapshot of the ranked result returned for this query.
    pub recommendations: Vec<Recommendation>,
    pub timestamp: DateTime<Utc>,
}

impl SearchHistoryRecord {
    pub fn new(researcher_id: Uuid, query: QueryKind, recommendations: Vec<Recommendation>) -> Self {
        Self {
            id: Uuid::new_v4(),
            researcher_id,
            query,
            recommendations,
            timestamp: Utc::now(),
        }
    }
}
