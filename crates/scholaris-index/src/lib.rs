//! # scholaris-index
//!
//! Content-based indexing for scholaris: the corpus store, the TF-IDF
//! vector space model, and the cosine similarity ranker.
//!
//! This crate provides:
//! - Batched corpus loading with an observable fixture fallback
//! - Canonical-text preparation with positional row alignment
//! - A fit/transform TF-IDF vectorizer with a capped vocabulary
//! - Deterministic cosine ranking with stable tie-breaks
//!
//! ## Example
//!
//! ```ignore
//! use scholaris_core::TextNormalizer;
//! use scholaris_index::{load_corpus, similarity, TfidfVectorizer};
//!
//! let normalizer = TextNormalizer::new();
//! let mut corpus = load_corpus(source.as_ref()).await;
//! corpus.prepare(&normalizer);
//!
//! let vectorizer = TfidfVectorizer::fit(&corpus.canonical_texts(), 5000)?;
//! let rows: Vec<_> = corpus
//!     .canonical_texts()
//!     .iter()
//!     .map(|t| vectorizer.transform(t))
//!     .collect();
//!
//! let query = vectorizer.transform(&normalizer.normalize("machine learning"));
//! let hits = similarity::rank(&query, &rows, 10);
//! ```

pub mod corpus;
pub mod similarity;
pub mod tfidf;

pub use corpus::{load_corpus, Corpus};
pub use similarity::{cosine_similarity, rank, RankedHit};
pub use tfidf::TfidfVectorizer;
