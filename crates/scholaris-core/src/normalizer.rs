//! Text normalization pipeline producing canonical text for vectorization.
//!
//! Full pipeline per input string:
//!   lowercase → whitespace split → strip non-alphabetic characters
//!   → drop empties → FR+EN stop-word filter → Snowball stemming
//!   → rejoin with single spaces
//!
//! The pipeline is pure: no I/O, no randomness. Identical input always
//! yields identical output, which is what makes canonical text and the
//! fitted vector space reproducible across process restarts.

use std::collections::HashSet;

use once_cell::sync::Lazy;
use rust_stemmers::{Algorithm, Stemmer};

/// French stop words. Covers articles, prepositions, pronouns,
/// conjunctions, common auxiliaries, and elision residue.
const FRENCH_STOP_WORDS: &[&str] = &[
    // Articles
    "le", "la", "les", "un", "une", "des", "du", "de", "au", "aux",
    // Prepositions
    "a", "dans", "sur", "pour", "avec", "sans", "entre", "vers", "par", "en",
    "chez", "contre", "sous", "devant", "depuis", "pendant", "avant", "apres",
    // Pronouns
    "je", "tu", "il", "elle", "nous", "vous", "ils", "elles", "on",
    "ce", "cette", "ces", "celui", "celle", "ceux", "celles",
    "se", "me", "te", "lui", "leur", "y", "moi", "toi", "soi",
    "qui", "que", "quoi", "dont", "ou",
    // Conjunctions
    "et", "mais", "donc", "car", "ni", "si", "comme", "quand", "lorsque",
    "parce", "puisque",
    // Auxiliaries / common verbs
    "est", "sont", "ai", "ont", "etait", "ete", "eu", "fait", "faire",
    "etre", "avoir", "peut", "doit", "va", "vont", "sera", "seront",
    // Adverbs
    "ne", "pas", "plus", "tres", "bien", "aussi", "encore", "meme",
    "tout", "tous", "toute", "toutes", "autre", "autres",
    "trop", "peu", "beaucoup", "deja", "alors", "ainsi", "ici", "jamais",
    "toujours",
    // Elision residue (also caught by the length filter)
    "l", "d", "n", "s", "c", "qu", "j", "m", "t",
];

/// English stop words.
const ENGLISH_STOP_WORDS: &[&str] = &[
    "the", "a", "an", "of", "to", "in", "is", "and", "that", "for", "are",
    "was", "were", "be", "been", "being", "by", "at", "this", "these",
    "those", "from", "as", "we", "our", "their", "his", "her", "its",
    "they", "he", "she", "it", "you", "your", "i", "my", "me", "us",
    "has", "have", "had", "having", "will", "would", "could", "should",
    "shall", "may", "might", "must", "can", "do", "does", "did", "doing",
    "not", "no", "nor", "but", "or", "if", "then", "else", "so", "than",
    "too", "very", "on", "with", "about", "against", "between", "into",
    "through", "during", "before", "after", "above", "below", "up",
    "down", "out", "over", "under", "again", "further", "once", "here",
    "there", "when", "where", "why", "how", "all", "any", "both", "each",
    "few", "more", "most", "other", "some", "such", "only", "own", "same",
    "also", "what", "which", "who", "whom", "while", "because", "until",
];

/// Combined stop-word set used by the normalizer.
static STOP_WORDS: Lazy<HashSet<&'static str>> = Lazy::new(|| {
    FRENCH_STOP_WORDS
        .iter()
        .chain(ENGLISH_STOP_WORDS.iter())
        .copied()
        .collect()
});

/// Normalizer turning arbitrary text into canonical form.
///
/// Thread-safe and cheap to share; the stemmer holds no mutable state.
pub struct TextNormalizer {
    stemmer: Stemmer,
}

impl Default for TextNormalizer {
    fn default() -> Self {
        Self::new()
    }
}

impl TextNormalizer {
    /// Create a normalizer with the English Snowball stemmer.
    ///
    /// The corpus mixes French and English records but French tokens pass
    /// through the English stemmer mostly unchanged, which keeps the
    /// reduction deterministic without per-record language detection.
    pub fn new() -> Self {
        Self {
            stemmer: Stemmer::create(Algorithm::English),
        }
    }

    /// Normalize free text into canonical form.
    ///
    /// Empty or whitespace-only input yields an empty string; this function
    /// never fails.
    pub fn normalize(&self, text: &str) -> String {
        let mut tokens: Vec<String> = Vec::new();
        for raw in text.to_lowercase().split_whitespace() {
            let word: String = raw.chars().filter(|c| c.is_alphabetic()).collect();
            if word.is_empty() {
                continue;
            }
            if STOP_WORDS.contains(word.as_str()) {
                continue;
            }
            tokens.push(self.stemmer.stem(&word).into_owned());
        }
        tokens.join(" ")
    }

    /// Normalize a keyword list by joining elements with spaces and running
    /// the result through the same pipeline.
    pub fn normalize_keywords(&self, keywords: &[String]) -> String {
        self.normalize(&keywords.join(" "))
    }

    /// Canonical text for a publication: normalized title, abstract, and
    /// keywords concatenated with single spaces.
    pub fn canonical_text(&self, title: &str, abstract_full: &str, keywords: &[String]) -> String {
        let parts = [
            self.normalize(title),
            self.normalize(abstract_full),
            self.normalize_keywords(keywords),
        ];
        parts
            .iter()
            .filter(|p| !p.is_empty())
            .cloned()
            .collect::<Vec<_>>()
            .join(" ")
    }
}
