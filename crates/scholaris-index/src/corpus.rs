//! Corpus store: the ordered collection of publication records and their
//! derived canonical text.
//!
//! Position is the contract here: row `i` of the vector index and entry
//! `i` of any persisted snapshot must refer to `records[i]`. Everything
//! that mutates the record list goes through this module so that
//! alignment never silently drifts.

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use scholaris_core::defaults::{DEDUP_TITLE_PREFIX, LOAD_BATCH_SIZE, SHORT_ABSTRACT_MAX};
use scholaris_core::error::Result;
use scholaris_core::models::{Publication, SourceOrigin};
use scholaris_core::normalizer::TextNormalizer;
use scholaris_core::traits::PublicationSource;

/// An ordered collection of publication records.
///
/// `degraded` is set when the records are the built-in fixture data rather
/// than real source output, so callers can distinguish the two.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Corpus {
    records: Vec<Publication>,
    degraded: bool,
}

impl Corpus {
    /// Wrap an already-loaded record list.
    pub fn from_records(records: Vec<Publication>, degraded: bool) -> Self {
        Self { records, degraded }
    }

    /// The built-in fixture corpus used when no real source is reachable.
    /// Small but thematically varied, so the rest of the pipeline stays
    /// exercisable offline.
    pub fn fixture() -> Self {
        let mut one = Publication::new(
            "fixture-1",
            "Introduction to Machine Learning",
            SourceOrigin::Fixture,
        );
        one.set_abstract(
            "This article presents the fundamental concepts of machine learning \
             and its applications to supervised prediction problems.",
        );
        one.set_keywords(vec![
            "machine learning".to_string(),
            "ai".to_string(),
            "data science".to_string(),
        ]);
        one.year = Some(2023);

        let mut two = Publication::new(
            "fixture-2",
            "Content-Based Recommendation Systems",
            SourceOrigin::Fixture,
        );
        two.set_abstract(
            "A study of recommendation systems that use content similarity \
             to suggest relevant items to users.",
        );
        two.set_keywords(vec![
            "recommendation systems".to_string(),
            "content-based filtering".to_string(),
            "similarity measures".to_string(),
        ]);
        two.year = Some(2022);

        let mut three = Publication::new(
            "fixture-3",
            "Applications of Neural Networks",
            SourceOrigin::Fixture,
        );
        three.set_abstract(
            "An analysis of practical applications of neural networks across \
             industrial domains.",
        );
        three.set_keywords(vec![
            "neural networks".to_string(),
            "deep learning".to_string(),
            "applications".to_string(),
        ]);
        three.year = Some(2024);

        Self {
            records: vec![one, two, three],
            degraded: true,
        }
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Whether this corpus is fixture data rather than real source output.
    pub fn degraded(&self) -> bool {
        self.degraded
    }

    pub fn records(&self) -> &[Publication] {
        &self.records
    }

    /// Record at corpus position `index`.
    pub fn get(&self, index: usize) -> Option<&Publication> {
        self.records.get(index)
    }

    /// Append a record unless it duplicates an existing one. Duplicate
    /// detection is best-effort: case-insensitive match on the first 50
    /// title characters, constrained by year when the incoming record has
    /// one. Matches are skipped, never merged.
    pub fn push_deduplicated(&mut self, record: Publication) -> bool {
        if self.is_duplicate(&record) {
            debug!(publication_id = %record.id, title = %record.title, "skipping duplicate record");
            return false;
        }
        self.records.push(record);
        true
    }

    /// Append a batch of records through duplicate detection. Returns the
    /// number actually added.
    pub fn append(&mut self, records: Vec<Publication>) -> usize {
        records
            .into_iter()
            .map(|r| self.push_deduplicated(r))
            .filter(|added| *added)
            .count()
    }

    fn is_duplicate(&self, candidate: &Publication) -> bool {
        let prefix: String = candidate
            .title
            .trim()
            .to_lowercase()
            .chars()
            .take(DEDUP_TITLE_PREFIX)
            .collect();
        if prefix.is_empty() {
            return false;
        }
        self.records.iter().any(|existing| {
            let title_match = existing.title.to_lowercase().contains(&prefix);
            match candidate.year {
                Some(year) => title_match && existing.year == Some(year),
                None => title_match,
            }
        })
    }

    /// Compute derived fields for every record that is missing them:
    /// the short abstract and the canonical text. Records whose source
    /// fields were mutated have had their canonical text cleared, so a
    /// second call only touches those. Idempotent on a prepared corpus.
    pub fn prepare(&mut self, normalizer: &TextNormalizer) {
        let mut prepared = 0usize;
        for record in &mut self.records {
            if record.abstract_short.is_empty() && !record.abstract_full.is_empty() {
                record.abstract_short = short_summary(&record.abstract_full, SHORT_ABSTRACT_MAX);
            }
            if record.canonical_text.is_none() {
                record.canonical_text = Some(normalizer.canonical_text(
                    &record.title,
                    &record.abstract_full,
                    &record.keywords,
                ));
                prepared += 1;
            }
        }
        debug!(corpus_size = self.records.len(), prepared, "corpus prepared");
    }

    /// Canonical texts in corpus order, for fitting and row projection.
    /// Unprepared records contribute empty strings.
    pub fn canonical_texts(&self) -> Vec<String> {
        self.records
            .iter()
            .map(|r| r.canonical_text.clone().unwrap_or_default())
            .collect()
    }
}

/// Load the corpus from the publication source, batching to bound peak
/// memory. Any failure — count, a mid-load batch error — or an empty
/// result substitutes the fixture corpus with the degraded flag set,
/// never a partially-loaded corpus.
pub async fn load_corpus(source: &dyn PublicationSource) -> Corpus {
    match try_load(source).await {
        Ok(corpus) if !corpus.is_empty() => {
            info!(corpus_size = corpus.len(), "publications loaded");
            corpus
        }
        Ok(_) => {
            warn!(degraded = true, "publication source returned no records, using fixture corpus");
            Corpus::fixture()
        }
        Err(e) => {
            warn!(error = %e, degraded = true, "publication source unavailable, using fixture corpus");
            Corpus::fixture()
        }
    }
}

async fn try_load(source: &dyn PublicationSource) -> Result<Corpus> {
    let total = source.count().await?;
    let mut corpus = Corpus::default();
    let mut skip = 0usize;
    while skip < total {
        let batch = source.fetch_batch(skip, LOAD_BATCH_SIZE).await?;
        if batch.is_empty() {
            break;
        }
        let fetched = batch.len();
        corpus.append(batch);
        debug!(
            batch_count = fetched,
            loaded = corpus.len(),
            total,
            "corpus batch loaded"
        );
        skip += fetched;
    }
    Ok(corpus)
}

/// Derive a short summary from a full abstract: whole leading sentences up
/// to the length cap, falling back to a word-boundary cut with an ellipsis
/// when even the first sentence is too long.
fn short_summary(abstract_full: &str, max_len: usize) -> String {
    let text = abstract_full.trim();
    if text.chars().count() <= max_len {
        return text.to_string();
    }

    let mut out = String::new();
    let mut out_chars = 0usize;
    for sentence in text.split_inclusive(['.', '!', '?']) {
        let sentence_chars = sentence.chars().count();
        if out_chars + sentence_chars > max_len {
            break;
        }
        out.push_str(sentence);
        out_chars += sentence_chars;
    }
    let out = out.trim();
    if !out.is_empty() {
        return out.to_string();
    }

    let truncated: String = text.chars().take(max_len.saturating_sub(3)).collect();
    let cut = match truncated.rsplit_once(' ') {
        Some((head, _)) => head.trim_end().to_string(),
        None => truncated,
    };
    format!("{}...", cut)
}
