//! Model cache: persistence mirror for fitted model state.
//!
//! A snapshot is three versioned JSON blobs (vectorizer, row vectors,
//! corpus) behind a `SnapshotStore`. The cache never owns live state;
//! `load` hands back a snapshot only when all three blobs are present,
//! carry the current format version, and pass structural validation
//! (row count matches corpus length, every row matches the vectorizer
//! dimensionality). Anything less is discarded with a WARN so the engine
//! falls through to a fresh fit instead of crashing on stale data.

use serde::{de::DeserializeOwned, Deserialize, Serialize};
use std::sync::Arc;
use tracing::{debug, info, warn};

use scholaris_core::defaults::CACHE_VERSION;
use scholaris_core::error::{Error, Result};
use scholaris_core::traits::{SnapshotKind, SnapshotStore};
use scholaris_index::{Corpus, TfidfVectorizer};

/// The live state a snapshot captures: one row vector per corpus record,
/// projected by the fitted vectorizer.
#[derive(Debug, Clone)]
pub struct ModelSnapshot {
    pub vectorizer: TfidfVectorizer,
    pub vectors: Vec<Vec<f32>>,
    pub corpus: Corpus,
}

/// Version envelope around each persisted blob. A version mismatch means
/// the serialized layout changed; the blob is unusable.
#[derive(Serialize, Deserialize)]
struct VersionedBlob<T> {
    version: u32,
    payload: T,
}

/// Cache over a snapshot store.
pub struct ModelCache {
    store: Arc<dyn SnapshotStore>,
}

impl ModelCache {
    pub fn new(store: Arc<dyn SnapshotStore>) -> Self {
        Self { store }
    }

    /// Persist a snapshot, replacing any existing one. All three blobs
    /// are written; a failure part-way leaves the store in a state that
    /// `load` will reject, which is the safe outcome.
    pub async fn save(&self, snapshot: &ModelSnapshot) -> Result<()> {
        self.write_blob(SnapshotKind::Vectorizer, &snapshot.vectorizer)
            .await?;
        self.write_blob(SnapshotKind::Vectors, &snapshot.vectors)
            .await?;
        self.write_blob(SnapshotKind::Corpus, &snapshot.corpus)
            .await?;
        info!(
            corpus_size = snapshot.corpus.len(),
            feature_count = snapshot.vectorizer.dimension(),
            "model snapshot saved"
        );
        Ok(())
    }

    /// Load the persisted snapshot, or `None` when there is nothing
    /// usable. Corrupt, stale, or partial snapshots are treated as a
    /// miss, never an error.
    pub async fn load(&self) -> Option<ModelSnapshot> {
        match self.try_load().await {
            Ok(Some(snapshot)) => {
                info!(
                    cache_hit = true,
                    corpus_size = snapshot.corpus.len(),
                    feature_count = snapshot.vectorizer.dimension(),
                    "model snapshot loaded"
                );
                Some(snapshot)
            }
            Ok(None) => {
                debug!(cache_hit = false, "no usable model snapshot");
                None
            }
            Err(e) => {
                warn!(error = %e, "discarding unusable model snapshot");
                None
            }
        }
    }

    /// Delete all snapshot blobs.
    pub async fn invalidate(&self) -> Result<()> {
        for kind in SnapshotKind::ALL {
            self.store.delete(kind).await?;
        }
        info!("model snapshot invalidated");
        Ok(())
    }

    async fn try_load(&self) -> Result<Option<ModelSnapshot>> {
        for kind in SnapshotKind::ALL {
            if !self.store.exists(kind).await? {
                return Ok(None);
            }
        }

        let vectorizer: TfidfVectorizer = match self.read_blob(SnapshotKind::Vectorizer).await? {
            Some(v) => v,
            None => return Ok(None),
        };
        let vectors: Vec<Vec<f32>> = match self.read_blob(SnapshotKind::Vectors).await? {
            Some(v) => v,
            None => return Ok(None),
        };
        let corpus: Corpus = match self.read_blob(SnapshotKind::Corpus).await? {
            Some(c) => c,
            None => return Ok(None),
        };

        let snapshot = ModelSnapshot {
            vectorizer,
            vectors,
            corpus,
        };
        validate(&snapshot)?;
        Ok(Some(snapshot))
    }

    async fn write_blob<T: Serialize>(&self, kind: SnapshotKind, payload: &T) -> Result<()> {
        let blob = VersionedBlob {
            version: CACHE_VERSION,
            payload,
        };
        let data = serde_json::to_vec(&blob)?;
        self.store.write(kind, &data).await
    }

    async fn read_blob<T: DeserializeOwned>(&self, kind: SnapshotKind) -> Result<Option<T>> {
        let data = match self.store.read(kind).await? {
            Some(data) => data,
            None => return Ok(None),
        };
        let blob: VersionedBlob<T> = serde_json::from_slice(&data).map_err(|e| {
            Error::Cache(format!("malformed {} snapshot: {e}", kind.key()))
        })?;
        if blob.version != CACHE_VERSION {
            return Err(Error::Cache(format!(
                "{} snapshot has version {}, expected {}",
                kind.key(),
                blob.version,
                CACHE_VERSION
            )));
        }
        Ok(Some(blob.payload))
    }
}

/// Structural compatibility check: row alignment and dimensionality must
/// hold or ranked indices would map to the wrong records.
fn validate(snapshot: &ModelSnapshot) -> Result<()> {
    if snapshot.vectors.len() != snapshot.corpus.len() {
        return Err(Error::Cache(format!(
            "snapshot has {} vectors for {} records",
            snapshot.vectors.len(),
            snapshot.corpus.len()
        )));
    }
    let dimension = snapshot.vectorizer.dimension();
    if let Some(row) = snapshot.vectors.iter().find(|row| row.len() != dimension) {
        return Err(Error::Cache(format!(
            "snapshot row has dimension {}, vectorizer expects {}",
            row.len(),
            dimension
        )));
    }
    Ok(())
}
