//! In-memory collaborator implementations.
//!
//! These back the offline/demo deployment and the test suites. Each type
//! has a `set_failing` switch that makes every subsequent call return an
//! error, so callers' fallback and isolation behavior can be driven from
//! tests without a real backend.

use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use tokio::sync::RwLock;
use tracing::debug;
use uuid::Uuid;

use scholaris_core::error::{Error, Result};
use scholaris_core::models::{Publication, ResearcherProfile, SearchHistoryRecord};
use scholaris_core::traits::{HistorySink, PublicationSource, ResearcherDirectory};

// =============================================================================
// PUBLICATION SOURCE
// =============================================================================

/// A publication source over a fixed record list.
pub struct StaticPublicationSource {
    records: Vec<Publication>,
    failing: AtomicBool,
}

impl StaticPublicationSource {
    pub fn new(records: Vec<Publication>) -> Self {
        Self {
            records,
            failing: AtomicBool::new(false),
        }
    }

    /// A source with no records at all. Loading from it triggers the
    /// fixture fallback.
    pub fn empty() -> Self {
        Self::new(Vec::new())
    }

    /// Make every subsequent call fail (or succeed again).
    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    fn check(&self) -> Result<()> {
        if self.failing.load(Ordering::SeqCst) {
            return Err(Error::Source("publication source unavailable".to_string()));
        }
        Ok(())
    }
}

#[async_trait]
impl PublicationSource for StaticPublicationSource {
    async fn count(&self) -> Result<usize> {
        self.check()?;
        Ok(self.records.len())
    }

    async fn fetch_batch(&self, skip: usize, limit: usize) -> Result<Vec<Publication>> {
        self.check()?;
        Ok(self
            .records
            .iter()
            .skip(skip)
            .take(limit)
            .cloned()
            .collect())
    }
}

// =============================================================================
// RESEARCHER DIRECTORY
// =============================================================================

/// A researcher directory held in process memory.
pub struct InMemoryResearcherDirectory {
    profiles: RwLock<Vec<ResearcherProfile>>,
    failing: AtomicBool,
}

impl InMemoryResearcherDirectory {
    pub fn new() -> Self {
        Self {
            profiles: RwLock::new(Vec::new()),
            failing: AtomicBool::new(false),
        }
    }

    pub fn with_profiles(profiles: Vec<ResearcherProfile>) -> Self {
        Self {
            profiles: RwLock::new(profiles),
            failing: AtomicBool::new(false),
        }
    }

    /// Make every subsequent call fail (or succeed again).
    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    /// Snapshot of all stored profiles, for assertions.
    pub async fn profiles(&self) -> Vec<ResearcherProfile> {
        self.profiles.read().await.clone()
    }

    fn check(&self) -> Result<()> {
        if self.failing.load(Ordering::SeqCst) {
            return Err(Error::Directory("researcher directory unavailable".to_string()));
        }
        Ok(())
    }
}

impl Default for InMemoryResearcherDirectory {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ResearcherDirectory for InMemoryResearcherDirectory {
    async fn find_by_name(&self, name: &str) -> Result<Option<ResearcherProfile>> {
        self.check()?;
        Ok(self
            .profiles
            .read()
            .await
            .iter()
            .find(|p| p.name == name)
            .cloned())
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<ResearcherProfile>> {
        self.check()?;
        Ok(self
            .profiles
            .read()
            .await
            .iter()
            .find(|p| p.email.as_deref() == Some(email))
            .cloned())
    }

    async fn create(&self, profile: ResearcherProfile) -> Result<Uuid> {
        self.check()?;
        let id = profile.id;
        debug!(researcher_id = %id, name = %profile.name, "researcher profile created");
        self.profiles.write().await.push(profile);
        Ok(id)
    }

    async fn update_interests(&self, id: Uuid, interests: Vec<String>) -> Result<()> {
        self.check()?;
        let mut profiles = self.profiles.write().await;
        match profiles.iter_mut().find(|p| p.id == id) {
            Some(profile) => {
                profile.interests = interests;
                Ok(())
            }
            None => Err(Error::Directory(format!("no researcher profile {id}"))),
        }
    }
}

// =============================================================================
// HISTORY SINK
// =============================================================================

/// An append-only history sink held in process memory.
pub struct InMemoryHistorySink {
    records: RwLock<Vec<SearchHistoryRecord>>,
    failing: AtomicBool,
}

impl InMemoryHistorySink {
    pub fn new() -> Self {
        Self {
            records: RwLock::new(Vec::new()),
            failing: AtomicBool::new(false),
        }
    }

    /// Make every subsequent call fail (or succeed again).
    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    /// Snapshot of all appended records, for assertions.
    pub async fn records(&self) -> Vec<SearchHistoryRecord> {
        self.records.read().await.clone()
    }
}

impl Default for InMemoryHistorySink {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl HistorySink for InMemoryHistorySink {
    async fn append(&self, record: SearchHistoryRecord) -> Result<()> {
        if self.failing.load(Ordering::SeqCst) {
            return Err(Error::History("history sink unavailable".to_string()));
        }
        self.records.write().await.push(record);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use scholaris_core::models::{QueryKind, SourceOrigin};

    fn publication(id: &str, title: &str) -> Publication {
        Publication::new(id, title, SourceOrigin::Hal)
    }

    #[tokio::test]
    async fn test_static_source_paging() {
        let source = StaticPublicationSource::new(vec![
            publication("p1", "One"),
            publication("p2", "Two"),
            publication("p3", "Three"),
        ]);
        assert_eq!(source.count().await.unwrap(), 3);

        let batch = source.fetch_batch(1, 2).await.unwrap();
        assert_eq!(batch.len(), 2);
        assert_eq!(batch[0].id, "p2");
        assert_eq!(batch[1].id, "p3");

        let past_end = source.fetch_batch(10, 5).await.unwrap();
        assert!(past_end.is_empty());
    }

    #[tokio::test]
    async fn test_static_source_failure_switch() {
        let source = StaticPublicationSource::new(vec![publication("p1", "One")]);
        source.set_failing(true);
        assert!(source.count().await.is_err());
        assert!(source.fetch_batch(0, 10).await.is_err());

        source.set_failing(false);
        assert_eq!(source.count().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_directory_find_by_name_and_email() {
        let directory = InMemoryResearcherDirectory::new();
        let profile = ResearcherProfile::new("Marie Curie", Some("marie@example.org".to_string()));
        let id = directory.create(profile).await.unwrap();

        let by_name = directory.find_by_name("Marie Curie").await.unwrap().unwrap();
        assert_eq!(by_name.id, id);

        let by_email = directory
            .find_by_email("marie@example.org")
            .await
            .unwrap()
            .unwrap();
        assert_eq!(by_email.id, id);

        assert!(directory.find_by_name("Nobody").await.unwrap().is_none());
        assert!(directory
            .find_by_email("nobody@example.org")
            .await
            .unwrap()
            .is_none());
    }

    #[tokio::test]
    async fn test_directory_update_interests() {
        let directory = InMemoryResearcherDirectory::new();
        let id = directory
            .create(ResearcherProfile::new("Ada", None))
            .await
            .unwrap();

        directory
            .update_interests(id, vec!["compilers".to_string()])
            .await
            .unwrap();
        let stored = directory.find_by_name("Ada").await.unwrap().unwrap();
        assert_eq!(stored.interests, vec!["compilers".to_string()]);

        let missing = directory
            .update_interests(Uuid::new_v4(), vec![])
            .await;
        assert!(missing.is_err());
    }

    #[tokio::test]
    async fn test_history_sink_appends_in_order() {
        let sink = InMemoryHistorySink::new();
        let researcher = Uuid::new_v4();
        sink.append(SearchHistoryRecord::new(
            researcher,
            QueryKind::Domain("first".to_string()),
            vec![],
        ))
        .await
        .unwrap();
        sink.append(SearchHistoryRecord::new(
            researcher,
            QueryKind::Domain("second".to_string()),
            vec![],
        ))
        .await
        .unwrap();

        let records = sink.records().await;
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].query.text(), "first");
        assert_eq!(records[1].query.text(), "second");
    }

    #[tokio::test]
    async fn test_history_sink_failure_switch() {
        let sink = InMemoryHistorySink::new();
        sink.set_failing(true);
        let result = sink
            .append(SearchHistoryRecord::new(
                Uuid::new_v4(),
                QueryKind::Domain("q".to_string()),
                vec![],
            ))
            .await;
        assert!(result.is_err());
        assert!(sink.records().await.is_empty());
    }
}
