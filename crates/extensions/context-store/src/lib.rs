//! Semantic context store for FormPilot.
//!
//! Persists short user-supplied text fragments and answers nearest-neighbor
//! similarity queries against them. A flat store with on-the-fly query
//! embedding is sufficient at the expected scale (personal facts, not a
//! corpus).

mod embedding;
mod index;
mod store;

pub use embedding::{Embedding, EmbeddingProvider, HashEmbedding};
pub use index::{ScoredId, VectorIndex};
pub use store::{ContextFragment, ContextStore, CHUNK_BOUND};
