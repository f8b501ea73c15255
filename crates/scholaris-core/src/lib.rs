//! # scholaris-core
//!
//! Core types, traits, and abstractions for the scholaris recommendation
//! engine.
//!
//! This crate provides the foundational data structures, the text
//! normalization pipeline, and the collaborator trait definitions that the
//! other scholaris crates depend on.

pub mod defaults;
pub mod error;
pub mod logging;
pub mod models;
pub mod normalizer;
pub mod traits;

// Re-export commonly used types at crate root
pub use error::{Error, Result};
pub use models::*;
pub use normalizer::TextNormalizer;
pub use traits::*;
