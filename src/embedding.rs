//! # Embedding Engine
//! Memoizing front-end over [`TermWeighting`]: a bounded LRU cache of
//! computed vectors keyed by the exact input text, plus batch helpers.
//!
//! The engine owns both the weighting state and the cache so that
//! `train` can retire them together: every vector computed under the
//! previous frequency table is purged before `train` returns.

use crate::weighting::{TermVector, TermWeighting};
use serde::Serialize;
use std::collections::{HashMap, VecDeque};
use std::sync::Mutex;
use tracing::debug;

/// Default cache capacity, matching a few thousand distinct policy texts.
pub const DEFAULT_CACHE_CAPACITY: usize = 2048;
/// Default internal chunk size for batch embedding.
pub const DEFAULT_BATCH_SIZE: usize = 50;

/// Snapshot of the diagnostic counters. Observational only; nothing in
/// the engine keys behavior off these numbers.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct CacheStats {
    pub hits: u64,
    pub misses: u64,
    pub computed: u64,
}

#[derive(Debug, Default)]
struct CacheInner {
    map: HashMap<String, TermVector>,
    /// Keys in least-recently-used order (front = coldest).
    order: VecDeque<String>,
    stats: CacheStats,
}

impl CacheInner {
    fn touch(&mut self, key: &str) {
        if let Some(pos) = self.order.iter().position(|k| k == key) {
            if let Some(k) = self.order.remove(pos) {
                self.order.push_back(k);
            }
        }
    }
}

/// Bounded LRU cache of [`TermVector`]s keyed by raw text.
#[derive(Debug)]
pub struct EmbeddingCache {
    inner: Mutex<CacheInner>,
    capacity: usize,
}

impl EmbeddingCache {
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            inner: Mutex::new(CacheInner::default()),
            capacity: capacity.max(1),
        }
    }

    /// Hit/miss is a direct presence check; a hit marks the entry as
    /// most recently used.
    fn get(&self, text: &str) -> Option<TermVector> {
        let mut inner = self.inner.lock().expect("embedding cache mutex poisoned");
        if let Some(v) = inner.map.get(text).cloned() {
            inner.touch(text);
            inner.stats.hits += 1;
            Some(v)
        } else {
            inner.stats.misses += 1;
            None
        }
    }

    fn insert(&self, text: String, vector: TermVector) {
        let mut inner = self.inner.lock().expect("embedding cache mutex poisoned");
        if inner.map.insert(text.clone(), vector).is_none() {
            inner.order.push_back(text);
        } else {
            inner.touch(&text);
        }
        inner.stats.computed += 1;
        while inner.map.len() > self.capacity {
            match inner.order.pop_front() {
                Some(coldest) => {
                    inner.map.remove(&coldest);
                }
                None => break,
            }
        }
    }

    fn clear(&self) {
        let mut inner = self.inner.lock().expect("embedding cache mutex poisoned");
        inner.map.clear();
        inner.order.clear();
    }

    pub fn len(&self) -> usize {
        self.inner
            .lock()
            .expect("embedding cache mutex poisoned")
            .map
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn stats(&self) -> CacheStats {
        self.inner
            .lock()
            .expect("embedding cache mutex poisoned")
            .stats
    }
}

/// TF-IDF vectorizer with caching and batch processing.
#[derive(Debug)]
pub struct EmbeddingEngine {
    weighting: TermWeighting,
    cache: EmbeddingCache,
    batch_size: usize,
}

impl Default for EmbeddingEngine {
    fn default() -> Self {
        Self::new(DEFAULT_CACHE_CAPACITY)
    }
}

impl EmbeddingEngine {
    pub fn new(cache_capacity: usize) -> Self {
        Self {
            weighting: TermWeighting::new(),
            cache: EmbeddingCache::with_capacity(cache_capacity),
            batch_size: DEFAULT_BATCH_SIZE,
        }
    }

    /// Tune the internal chunk size used by [`embed_batch`] and
    /// [`precompute`]. Throughput knob only; output is unaffected.
    ///
    /// [`embed_batch`]: EmbeddingEngine::embed_batch
    /// [`precompute`]: EmbeddingEngine::precompute
    pub fn batch_size(mut self, size: usize) -> Self {
        self.batch_size = size.max(1);
        self
    }

    /// Rebuild the frequency table from `documents` and purge every
    /// cached vector, synchronously. Vectors handed out earlier stay
    /// valid as values but no longer reflect the corpus statistics.
    pub fn train<S: AsRef<str>>(&self, documents: &[S]) {
        self.weighting.train(documents);
        self.cache.clear();
        debug!("embedding cache purged after retrain");
    }

    /// Cached vectorization: returns the cached vector if present,
    /// otherwise computes, stores, and returns a fresh one.
    pub fn embed(&self, text: &str) -> TermVector {
        if let Some(v) = self.cache.get(text) {
            return v;
        }
        let v = self.weighting.vectorize(text);
        self.cache.insert(text.to_string(), v.clone());
        v
    }

    /// Embed many texts; output order equals input order. Chunking by
    /// `batch_size` is internal and behaviorally identical to calling
    /// [`embed`](EmbeddingEngine::embed) once per text.
    pub fn embed_batch<S: AsRef<str>>(&self, texts: &[S]) -> Vec<TermVector> {
        let mut out = Vec::with_capacity(texts.len());
        for chunk in texts.chunks(self.batch_size) {
            out.extend(chunk.iter().map(|t| self.embed(t.as_ref())));
        }
        out
    }

    /// Bulk precomputation for later use as `find_similar`'s
    /// precomputed map.
    pub fn precompute<S: AsRef<str>>(&self, texts: &[S]) -> HashMap<String, TermVector> {
        let vectors = self.embed_batch(texts);
        texts
            .iter()
            .map(|t| t.as_ref().to_string())
            .zip(vectors)
            .collect()
    }

    pub fn stats(&self) -> CacheStats {
        self.cache.stats()
    }

    pub fn weighting(&self) -> &TermWeighting {
        &self.weighting
    }
}
