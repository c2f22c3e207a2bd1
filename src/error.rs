//! Error kinds shared across the engine. Empty results are not errors:
//! an empty corpus, zero matches, or no crossed thresholds all yield
//! empty values, never an `Err`.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum EngineError {
    /// Query text was empty or whitespace-only where a non-empty
    /// embedding is required.
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// A collaborator call failed (non-2xx, malformed payload, timeout).
    /// Propagated as-is; retry policy belongs to the caller.
    #[error("external service failure: {0}")]
    ExternalService(String),
}
