//! TF-IDF vector space model over corpus canonical texts.
//!
//! Weighting follows the standard scheme: raw term frequency times
//! smoothed inverse document frequency `ln((1 + n) / (1 + df)) + 1`, with
//! L2 normalization per vector. The vocabulary is capped at a maximum
//! feature count; terms beyond the cap are dropped by global frequency
//! ranking with alphabetical tie-breaks, so fitting the same corpus twice
//! always produces the same model.
//!
//! A fitted model is immutable. Growing the corpus requires a full re-fit;
//! there is no incremental vocabulary update.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use tracing::debug;

use scholaris_core::error::{Error, Result};

/// A fitted TF-IDF vectorizer: vocabulary, term index, and IDF weights.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TfidfVectorizer {
    /// Feature index → term, alphabetically ordered.
    vocabulary: Vec<String>,
    /// Term → feature index.
    vocab_index: HashMap<String, usize>,
    /// Smoothed IDF weight per feature.
    idf: Vec<f32>,
    /// Cap the model was fit with.
    max_features: usize,
}

impl TfidfVectorizer {
    /// Fit a model over corpus canonical texts.
    ///
    /// Texts are expected to be pre-normalized (the vectorizer only splits
    /// on whitespace). Returns `Error::EmptyCorpus` for an empty slice; a
    /// corpus whose texts are all empty fits to a zero-feature model, which
    /// transforms everything to the empty vector.
    pub fn fit(texts: &[String], max_features: usize) -> Result<Self> {
        if texts.is_empty() {
            return Err(Error::EmptyCorpus);
        }

        let n_docs = texts.len();

        // Global term counts (for the cap) and document frequencies (for IDF).
        let mut term_counts: HashMap<&str, usize> = HashMap::new();
        let mut doc_freq: HashMap<&str, usize> = HashMap::new();
        for text in texts {
            let mut seen: HashMap<&str, ()> = HashMap::new();
            for term in text.split_whitespace() {
                *term_counts.entry(term).or_insert(0) += 1;
                seen.entry(term).or_insert(());
            }
            for term in seen.keys() {
                *doc_freq.entry(term).or_insert(0) += 1;
            }
        }

        // Cap by global frequency, ties broken alphabetically, then assign
        // feature indices in alphabetical order.
        let mut ranked: Vec<(&str, usize)> = term_counts.into_iter().collect();
        ranked.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(b.0)));
        ranked.truncate(max_features);

        let mut vocabulary: Vec<String> = ranked.into_iter().map(|(t, _)| t.to_string()).collect();
        vocabulary.sort();

        let vocab_index: HashMap<String, usize> = vocabulary
            .iter()
            .enumerate()
            .map(|(i, term)| (term.clone(), i))
            .collect();

        let idf: Vec<f32> = vocabulary
            .iter()
            .map(|term| {
                let df = *doc_freq.get(term.as_str()).unwrap_or(&0);
                (((1 + n_docs) as f32) / ((1 + df) as f32)).ln() + 1.0
            })
            .collect();

        debug!(
            corpus_size = n_docs,
            feature_count = vocabulary.len(),
            max_features,
            "TF-IDF model fitted"
        );

        Ok(Self {
            vocabulary,
            vocab_index,
            idf,
            max_features,
        })
    }

    /// Project normalized text into the fitted space.
    ///
    /// Unknown terms are ignored; text with no vocabulary overlap yields a
    /// valid all-zero vector of matching dimensionality. This function
    /// never fails.
    pub fn transform(&self, text: &str) -> Vec<f32> {
        let mut vector = vec![0.0f32; self.vocabulary.len()];
        for term in text.split_whitespace() {
            if let Some(&i) = self.vocab_index.get(term) {
                vector[i] += 1.0;
            }
        }

        let mut norm_sq = 0.0f32;
        for (i, value) in vector.iter_mut().enumerate() {
            *value *= self.idf[i];
            norm_sq += *value * *value;
        }
        if norm_sq > 0.0 {
            let norm = norm_sq.sqrt();
            for value in vector.iter_mut() {
                *value /= norm;
            }
        }
        vector
    }

    /// Number of features in the fitted vocabulary.
    pub fn dimension(&self) -> usize {
        self.vocabulary.len()
    }

    /// The cap this model was fit with.
    pub fn max_features(&self) -> usize {
        self.max_features
    }

    /// Whether `term` is in the fitted vocabulary.
    pub fn contains_term(&self, term: &str) -> bool {
        self.vocab_index.contains_key(term)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn texts(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_fit_empty_corpus_rejected() {
        let err = TfidfVectorizer::fit(&[], 100).unwrap_err();
        assert!(matches!(err, Error::EmptyCorpus));
    }

    #[test]
    fn test_fit_builds_sorted_vocabulary() {
        let model =
            TfidfVectorizer::fit(&texts(&["zebra apple", "apple mango"]), 100).unwrap();
        assert_eq!(model.dimension(), 3);
        assert!(model.contains_term("apple"));
        assert!(model.contains_term("mango"));
        assert!(model.contains_term("zebra"));
    }

    #[test]
    fn test_transform_dimensionality_matches() {
        let model = TfidfVectorizer::fit(&texts(&["alpha beta", "beta gamma"]), 100).unwrap();
        let v = model.transform("alpha");
        assert_eq!(v.len(), model.dimension());
    }

    #[test]
    fn test_transform_unknown_terms_yield_zero_vector() {
        let model = TfidfVectorizer::fit(&texts(&["alpha beta", "beta gamma"]), 100).unwrap();
        let v = model.transform("completely unrelated words");
        assert!(v.iter().all(|&x| x == 0.0));
    }

    #[test]
    fn test_transform_is_l2_normalized() {
        let model =
            TfidfVectorizer::fit(&texts(&["alpha beta gamma", "beta gamma delta"]), 100).unwrap();
        let v = model.transform("alpha beta beta");
        let norm: f32 = v.iter().map(|x| x * x).sum::<f32>().sqrt();
        assert!((norm - 1.0).abs() < 1e-5, "norm was {}", norm);
    }

    #[test]
    fn test_transform_deterministic_across_instances() {
        let corpus = texts(&["alpha beta gamma", "beta gamma delta", "delta epsilon"]);
        let a = TfidfVectorizer::fit(&corpus, 100).unwrap();
        let b = TfidfVectorizer::fit(&corpus, 100).unwrap();
        assert_eq!(a.transform("beta delta"), b.transform("beta delta"));
    }

    #[test]
    fn test_max_features_caps_by_global_frequency() {
        // "common" appears 3 times, "mid" twice, the rest once.
        let corpus = texts(&["common mid rare", "common mid", "common unique"]);
        let model = TfidfVectorizer::fit(&corpus, 2).unwrap();
        assert_eq!(model.dimension(), 2);
        assert!(model.contains_term("common"));
        assert!(model.contains_term("mid"));
        assert!(!model.contains_term("rare"));
        assert!(!model.contains_term("unique"));
    }

    #[test]
    fn test_max_features_ties_broken_alphabetically() {
        // All terms appear once; the cap keeps the alphabetically first.
        let corpus = texts(&["delta charlie bravo alpha"]);
        let model = TfidfVectorizer::fit(&corpus, 2).unwrap();
        assert!(model.contains_term("alpha"));
        assert!(model.contains_term("bravo"));
        assert!(!model.contains_term("charlie"));
        assert!(!model.contains_term("delta"));
    }

    #[test]
    fn test_rare_terms_weigh_more_than_common_ones() {
        let corpus = texts(&["shared rare", "shared other", "shared third"]);
        let model = TfidfVectorizer::fit(&corpus, 100).unwrap();
        let v = model.transform("shared rare");
        let shared_idx = model.vocab_index["shared"];
        let rare_idx = model.vocab_index["rare"];
        assert!(
            v[rare_idx] > v[shared_idx],
            "rare {} should outweigh shared {}",
            v[rare_idx],
            v[shared_idx]
        );
    }

    #[test]
    fn test_all_empty_texts_fit_to_zero_features() {
        let model = TfidfVectorizer::fit(&texts(&["", ""]), 100).unwrap();
        assert_eq!(model.dimension(), 0);
        assert!(model.transform("anything").is_empty());
    }

    #[test]
    fn test_serde_roundtrip_preserves_projection() {
        let corpus = texts(&["alpha beta gamma", "beta gamma delta"]);
        let model = TfidfVectorizer::fit(&corpus, 100).unwrap();
        let json = serde_json::to_string(&model).unwrap();
        let restored: TfidfVectorizer = serde_json::from_str(&json).unwrap();
        assert_eq!(restored.dimension(), model.dimension());
        assert_eq!(restored.transform("beta gamma"), model.transform("beta gamma"));
    }
}
