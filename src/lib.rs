// src/lib.rs
// Public library surface for integration tests (and potential reuse).

pub mod alert;
pub mod corpus;
pub mod embedding;
pub mod error;
pub mod monitor;
pub mod risk;
pub mod similarity;
pub mod weighting;

// ---- Re-exports for stable public API ----
pub use crate::alert::{
    Alert, AlertKind, AlertSeverity, AlertThresholdEngine, AlertThresholds, IndicatorDelta,
    IndicatorSnapshot, NewsSource, SeverityBands,
};
pub use crate::corpus::PolicyRecord;
pub use crate::embedding::{CacheStats, EmbeddingEngine};
pub use crate::error::EngineError;
pub use crate::monitor::{
    DynAnalysisClient, DynIndicatorFeed, IndicatorFeed, NewsAnalysis, PolicyAnalysisClient,
    PolicyMonitor,
};
pub use crate::risk::{assess_risk, OutcomeClass, RiskAssessment, RiskFactor, RiskLevel};
pub use crate::similarity::{cosine_similarity, find_similar, text_similarity, SimilarityMatch};
pub use crate::weighting::{TermVector, TermWeighting};
