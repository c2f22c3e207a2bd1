//! # Similarity Search
//! Cosine-similarity ranking of a query text against the historical
//! corpus. Pure functions over the embedding engine; no I/O.
//!
//! Ordering contract: results are sorted descending by score and ties
//! keep the original corpus order. Callers may rely on that tie-break.

use crate::corpus::PolicyRecord;
use crate::embedding::EmbeddingEngine;
use crate::error::EngineError;
use crate::weighting::TermVector;
use serde::Serialize;
use std::cmp::Ordering;
use std::collections::HashMap;
use tracing::debug;

/// One corpus record that scored at or above the query threshold.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SimilarityMatch {
    pub record: PolicyRecord,
    /// Cosine similarity in `[0, 1]` (TF-IDF weights are non-negative).
    pub score: f64,
}

/// Cosine similarity of two term vectors. Zero if either norm is zero.
///
/// The dot product runs over the union of keys with missing keys
/// reading as 0, so iterating only the smaller map is exact.
pub fn cosine_similarity(a: &TermVector, b: &TermVector) -> f64 {
    if a.norm == 0.0 || b.norm == 0.0 {
        return 0.0;
    }

    let (small, large) = if a.weights.len() <= b.weights.len() {
        (&a.weights, &b.weights)
    } else {
        (&b.weights, &a.weights)
    };

    let mut dot = 0.0;
    for (term, w) in small {
        if let Some(other) = large.get(term) {
            dot += w * other;
        }
    }
    dot / (a.norm * b.norm)
}

/// Similarity of two raw texts under the engine's trained table.
pub fn text_similarity(engine: &EmbeddingEngine, text1: &str, text2: &str) -> f64 {
    cosine_similarity(&engine.embed(text1), &engine.embed(text2))
}

/// Rank `corpus` against `query_text`, keeping records whose similarity
/// reaches `threshold`.
///
/// Corpus vectors come from `precomputed` when supplied and present for
/// a record's text, otherwise through the engine's cache. An empty
/// corpus is not an error; an empty or whitespace-only query is.
pub fn find_similar(
    engine: &EmbeddingEngine,
    query_text: &str,
    corpus: &[PolicyRecord],
    threshold: f64,
    precomputed: Option<&HashMap<String, TermVector>>,
) -> Result<Vec<SimilarityMatch>, EngineError> {
    if query_text.trim().is_empty() {
        return Err(EngineError::InvalidInput(
            "query text must not be empty".into(),
        ));
    }

    let query = engine.embed(query_text);
    let mut matches = Vec::new();

    for record in corpus {
        let score = match precomputed.and_then(|m| m.get(&record.text)) {
            Some(vector) => cosine_similarity(&query, vector),
            None => cosine_similarity(&query, &engine.embed(&record.text)),
        };
        if score >= threshold {
            matches.push(SimilarityMatch {
                record: record.clone(),
                score,
            });
        }
    }

    // Stable: equal scores keep corpus order.
    matches.sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap_or(Ordering::Equal));

    debug!(
        corpus = corpus.len(),
        kept = matches.len(),
        threshold,
        "similarity query ranked"
    );
    Ok(matches)
}
