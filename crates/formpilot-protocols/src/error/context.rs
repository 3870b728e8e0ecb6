//! Context store errors.
//!
//! Searching an empty store is not an error - it returns an empty result.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ContextError {
    #[error("Embedding failed: {0}")]
    Embedding(String),

    #[error("Context storage error: {0}")]
    Storage(String),
}
