//! # scholaris-store
//!
//! Concrete collaborators behind the `scholaris-core` traits: in-memory
//! implementations of the publication source, researcher directory, and
//! history sink, plus the filesystem-backed snapshot store used by the
//! model cache.
//!
//! The in-memory types double as the offline/demo backend and as test
//! fixtures; each carries a failure switch so degraded-path behavior can
//! be exercised deterministically.

pub mod memory;
pub mod snapshot;

pub use memory::{InMemoryHistorySink, InMemoryResearcherDirectory, StaticPublicationSource};
pub use snapshot::FsSnapshotStore;
