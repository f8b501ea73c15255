//! Recommendation session manager.
//!
//! Resolves the requester behind a recommendation call to a researcher
//! profile, then records the outcome: the queried domain joins the
//! profile's interest set and a history record captures the query and
//! the ranked result. Both side effects are best-effort; a directory or
//! sink failure is logged and the recommendation the caller already has
//! is never retracted because of it.

use std::sync::Arc;

use tracing::{debug, warn};

use scholaris_core::error::Result;
use scholaris_core::models::{QueryKind, Recommendation, ResearcherProfile, SearchHistoryRecord};
use scholaris_core::traits::{HistorySink, ResearcherDirectory};

// =============================================================================
// REQUESTER IDENTITY
// =============================================================================

/// The identity a caller supplies with a recommendation request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequesterIdentity {
    pub name: String,
    pub email: Option<String>,
}

impl RequesterIdentity {
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            email: None,
        }
    }

    pub fn with_email(name: impl Into<String>, email: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            email: Some(email.into()),
        }
    }
}

// =============================================================================
// IDENTITY MATCHING
// =============================================================================

/// Produces the ordered list of name candidates tried against the
/// directory before falling back to email lookup and creation. The order
/// must be deterministic so that repeated requests resolve to the same
/// profile.
pub trait IdentityMatcher: Send + Sync {
    fn candidates(&self, name: &str) -> Vec<String>;
}

/// Default matcher: exact name, trimmed name, and the "Last First"
/// permutation for two-part names. Duplicates are collapsed while
/// preserving first occurrence order.
pub struct DefaultIdentityMatcher;

impl IdentityMatcher for DefaultIdentityMatcher {
    fn candidates(&self, name: &str) -> Vec<String> {
        let mut candidates = vec![name.to_string()];

        let trimmed = name.trim();
        candidates.push(trimmed.to_string());

        let parts: Vec<&str> = trimmed.split_whitespace().collect();
        if parts.len() == 2 {
            candidates.push(format!("{} {}", parts[1], parts[0]));
        }

        let mut seen = Vec::with_capacity(candidates.len());
        for candidate in candidates {
            if !candidate.is_empty() && !seen.contains(&candidate) {
                seen.push(candidate);
            }
        }
        seen
    }
}

// =============================================================================
// SESSION MANAGER
// =============================================================================

/// Owns requester resolution and per-recommendation bookkeeping.
pub struct SessionManager {
    directory: Arc<dyn ResearcherDirectory>,
    history: Arc<dyn HistorySink>,
    matcher: Box<dyn IdentityMatcher>,
}

impl SessionManager {
    pub fn new(directory: Arc<dyn ResearcherDirectory>, history: Arc<dyn HistorySink>) -> Self {
        Self {
            directory,
            history,
            matcher: Box::new(DefaultIdentityMatcher),
        }
    }

    pub fn with_matcher(mut self, matcher: Box<dyn IdentityMatcher>) -> Self {
        self.matcher = matcher;
        self
    }

    /// Resolve a requester to a profile: name candidates in matcher
    /// order, then email, then create. An existing match is reused,
    /// never duplicated.
    pub async fn resolve(&self, requester: &RequesterIdentity) -> Result<ResearcherProfile> {
        for candidate in self.matcher.candidates(&requester.name) {
            if let Some(profile) = self.directory.find_by_name(&candidate).await? {
                debug!(researcher_id = %profile.id, candidate = %candidate, "requester matched by name");
                return Ok(profile);
            }
        }

        if let Some(email) = requester.email.as_deref() {
            if let Some(profile) = self.directory.find_by_email(email).await? {
                debug!(researcher_id = %profile.id, "requester matched by email");
                return Ok(profile);
            }
        }

        let profile = ResearcherProfile::new(requester.name.trim(), requester.email.clone());
        self.directory.create(profile.clone()).await?;
        Ok(profile)
    }

    /// Record the outcome of a successful recommendation: interest
    /// append (set semantics) and a history entry. Every failure in here
    /// is logged at WARN and swallowed; the ranking already happened.
    pub async fn record_outcome(
        &self,
        requester: &RequesterIdentity,
        interest: &str,
        query: QueryKind,
        recommendations: Vec<Recommendation>,
    ) {
        let mut profile = match self.resolve(requester).await {
            Ok(profile) => profile,
            Err(e) => {
                warn!(error = %e, requester = %requester.name, "requester resolution failed, skipping bookkeeping");
                return;
            }
        };

        if !interest.is_empty() && profile.add_interest(interest) {
            if let Err(e) = self
                .directory
                .update_interests(profile.id, profile.interests.clone())
                .await
            {
                warn!(error = %e, researcher_id = %profile.id, "interest update failed");
            }
        }

        let record = SearchHistoryRecord::new(profile.id, query, recommendations);
        if let Err(e) = self.history.append(record).await {
            warn!(error = %e, researcher_id = %profile.id, "history append failed");
        }
    }
}
