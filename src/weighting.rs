//! # Term Weighting
//! TF-IDF vectorization against a trained document-frequency table.
//!
//! The table and its IDF memo live behind one mutex: `train` rebuilds
//! both while holding the lock, so readers see either the old statistics
//! or the new ones, never a half-rebuilt table. Vectorization is pure
//! given a trained table and safe to call from multiple tasks.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Mutex;
use tracing::info;

/// Immutable TF-IDF embedding of one text.
///
/// `norm` is the Euclidean norm of `weights`; it is zero exactly when
/// every weight is zero (empty text, or all terms shared by the whole
/// corpus so their IDF vanishes).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TermVector {
    pub tokens: Vec<String>,
    pub weights: HashMap<String, f64>,
    pub norm: f64,
}

impl TermVector {
    /// Vector of the empty text: no tokens, no weights, zero norm.
    pub fn empty() -> Self {
        Self {
            tokens: Vec::new(),
            weights: HashMap::new(),
            norm: 0.0,
        }
    }
}

/// Lowercased alphanumeric tokens; punctuation separates, never survives.
pub fn tokenize(text: &str) -> Vec<String> {
    text.split(|c: char| !c.is_alphanumeric())
        .filter(|t| !t.is_empty())
        .map(|t| t.to_lowercase())
        .collect()
}

/// Relative term frequency: occurrences / total tokens.
/// Empty token list yields an empty map (no division by zero).
pub fn term_frequency(tokens: &[String]) -> HashMap<String, f64> {
    let mut tf = HashMap::new();
    if tokens.is_empty() {
        return tf;
    }
    let inv_total = 1.0 / tokens.len() as f64;
    for t in tokens {
        *tf.entry(t.clone()).or_insert(0.0) += inv_total;
    }
    tf
}

#[derive(Debug, Default)]
struct DfState {
    /// term -> number of corpus documents containing it.
    doc_freq: HashMap<String, u64>,
    doc_count: u64,
    /// Memoized ln(doc_count / df); cleared together with `doc_freq`.
    idf_memo: HashMap<String, f64>,
}

impl DfState {
    fn idf(&mut self, term: &str) -> f64 {
        if let Some(&v) = self.idf_memo.get(term) {
            return v;
        }
        let df = self.doc_freq.get(term).copied().unwrap_or(0);
        // Unseen term or untrained table contributes nothing.
        if df == 0 || self.doc_count == 0 {
            return 0.0;
        }
        let idf = (self.doc_count as f64 / df as f64).ln();
        self.idf_memo.insert(term.to_string(), idf);
        idf
    }
}

/// Trained corpus statistic plus the vectorizer over it.
#[derive(Debug, Default)]
pub struct TermWeighting {
    inner: Mutex<DfState>,
}

impl TermWeighting {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuild the document-frequency table wholesale from `documents`.
    ///
    /// Each document increments a term's count at most once, no matter
    /// how often the term repeats inside it. Holds the lock for the
    /// whole rebuild; vectors computed under the previous table are
    /// stale afterwards (the embedding engine purges its cache).
    pub fn train<S: AsRef<str>>(&self, documents: &[S]) {
        let mut fresh = DfState {
            doc_count: documents.len() as u64,
            ..Default::default()
        };
        for doc in documents {
            let mut seen: Vec<String> = tokenize(doc.as_ref());
            seen.sort_unstable();
            seen.dedup();
            for term in seen {
                *fresh.doc_freq.entry(term).or_insert(0) += 1;
            }
        }

        let mut state = self.inner.lock().expect("df table mutex poisoned");
        *state = fresh;
        info!(
            documents = state.doc_count,
            terms = state.doc_freq.len(),
            "trained document-frequency table"
        );
    }

    /// Inverse document frequency of a single term under the current
    /// table. Unseen terms and an untrained table both yield 0.
    pub fn idf(&self, term: &str) -> f64 {
        self.inner.lock().expect("df table mutex poisoned").idf(term)
    }

    /// TF-IDF vector of `text`. Only terms present in the tokenized
    /// text appear in the weight map.
    pub fn vectorize(&self, text: &str) -> TermVector {
        let tokens = tokenize(text);
        let tf = term_frequency(&tokens);

        let mut weights = HashMap::with_capacity(tf.len());
        let mut norm_sq = 0.0;
        let mut state = self.inner.lock().expect("df table mutex poisoned");
        for (term, tf_value) in tf {
            let w = tf_value * state.idf(&term);
            norm_sq += w * w;
            weights.insert(term, w);
        }
        drop(state);

        TermVector {
            tokens,
            weights,
            norm: norm_sq.sqrt(),
        }
    }

    /// Number of documents in the trained corpus.
    pub fn doc_count(&self) -> u64 {
        self.inner.lock().expect("df table mutex poisoned").doc_count
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tokenize_splits_on_punctuation_and_lowercases() {
        let toks = tokenize("Tariff-Act, of 1990! (Section 2)");
        assert_eq!(toks, vec!["tariff", "act", "of", "1990", "section", "2"]);
    }

    #[test]
    fn term_frequency_of_empty_text_is_empty() {
        assert!(term_frequency(&tokenize("  ...  ")).is_empty());
    }

    #[test]
    fn term_frequency_sums_repeats() {
        let tf = term_frequency(&tokenize("tax tax reform"));
        assert!((tf["tax"] - 2.0 / 3.0).abs() < 1e-12);
        assert!((tf["reform"] - 1.0 / 3.0).abs() < 1e-12);
    }

    #[test]
    fn df_counts_each_document_once() {
        let w = TermWeighting::new();
        // "tax" repeats inside one document but df must be 1.
        w.train(&["tax tax tax", "trade policy"]);
        let expected = (2.0f64 / 1.0).ln();
        assert!((w.idf("tax") - expected).abs() < 1e-12);
    }

    #[test]
    fn unseen_term_and_untrained_table_yield_zero_idf() {
        let w = TermWeighting::new();
        assert_eq!(w.idf("anything"), 0.0);
        w.train(&["alpha beta"]);
        assert_eq!(w.idf("gamma"), 0.0);
    }

    #[test]
    fn degenerate_corpus_vectorizes_to_zero_norm() {
        // Every document shares the exact term set, so df == doc_count
        // and every IDF is ln(1) == 0.
        let w = TermWeighting::new();
        w.train(&["same words here", "here same words"]);
        let v = w.vectorize("same words here");
        assert_eq!(v.norm, 0.0);
        assert!(v.weights.values().all(|&x| x == 0.0));
        assert!(!v.tokens.is_empty());
    }

    #[test]
    fn vectorize_covers_only_present_terms() {
        let w = TermWeighting::new();
        w.train(&["tariff on steel", "subsidy for farms"]);
        let v = w.vectorize("tariff tariff");
        assert_eq!(v.weights.len(), 1);
        assert!(v.weights.contains_key("tariff"));
        assert!(v.norm > 0.0);
    }

    #[test]
    fn retrain_replaces_table() {
        let w = TermWeighting::new();
        w.train(&["one two", "one three"]);
        assert!(w.idf("two") > 0.0);
        w.train(&["four five"]);
        assert_eq!(w.idf("two"), 0.0);
        assert_eq!(w.doc_count(), 1);
    }
}
