//! Brute-force cosine similarity index.

use std::collections::HashMap;

use parking_lot::RwLock;

use crate::embedding::Embedding;

/// An index hit.
#[derive(Debug, Clone)]
pub struct ScoredId {
    pub id: String,
    pub score: f32,
}

/// In-memory vector index. Brute force is fine at this scale.
pub struct VectorIndex {
    vectors: RwLock<HashMap<String, Embedding>>,
}

impl VectorIndex {
    pub fn new() -> Self {
        Self {
            vectors: RwLock::new(HashMap::new()),
        }
    }

    pub fn insert(&self, id: String, embedding: Embedding) {
        self.vectors.write().insert(id, embedding);
    }

    pub fn remove(&self, id: &str) -> Option<Embedding> {
        self.vectors.write().remove(id)
    }

    /// Nearest neighbors, best first. Equal scores tie-break on id so an
    /// unchanged index always returns the same ranking.
    pub fn search(&self, query: &Embedding, limit: usize) -> Vec<ScoredId> {
        let vectors = self.vectors.read();
        let mut results: Vec<ScoredId> = vectors
            .iter()
            .map(|(id, emb)| ScoredId {
                id: id.clone(),
                score: query.cosine_similarity(emb),
            })
            .collect();

        results.sort_by(|a, b| {
            b.score
                .partial_cmp(&a.score)
                .unwrap_or(std::cmp::Ordering::Equal)
                .then_with(|| a.id.cmp(&b.id))
        });

        results.truncate(limit);
        results
    }

    pub fn len(&self) -> usize {
        self.vectors.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.vectors.read().is_empty()
    }

    pub fn clear(&self) {
        self.vectors.write().clear();
    }
}

impl Default for VectorIndex {
    fn default() -> Self {
        Self::new()
    }
}
