//! Fragment store: chunked ingestion, similarity search, destructive reset.

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use formpilot_protocols::ContextError;

use crate::embedding::{Embedding, EmbeddingProvider};
use crate::index::VectorIndex;

/// Upper bound on fragment length, in characters.
///
/// Ingested text longer than this is split into fixed-size chunks to keep
/// each stored unit semantically narrow. The split is by character count,
/// not token or sentence boundaries - documented behavior carried over
/// as-is, mid-word splits included.
pub const CHUNK_BOUND: usize = 50;

/// A stored unit of user context. Immutable once stored; removed only by
/// a whole-store reset.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContextFragment {
    pub id: String,
    pub text: String,
    pub embedding: Embedding,
}

/// Flat store of context fragments with best-effort file persistence.
/// Durability is explicitly "may be cleared".
pub struct ContextStore {
    embedder: Arc<dyn EmbeddingProvider>,
    index: VectorIndex,
    fragments: RwLock<HashMap<String, ContextFragment>>,
    path: Option<PathBuf>,
}

impl ContextStore {
    /// Open a store persisted under `dir/<namespace>.json`, loading any
    /// prior fragments. A load failure starts empty rather than erroring.
    pub fn open(
        dir: impl AsRef<Path>,
        namespace: &str,
        embedder: Arc<dyn EmbeddingProvider>,
    ) -> Self {
        let path = dir.as_ref().join(format!("{namespace}.json"));
        let store = Self {
            embedder,
            index: VectorIndex::new(),
            fragments: RwLock::new(HashMap::new()),
            path: Some(path.clone()),
        };
        if path.exists() {
            match fs::read_to_string(&path)
                .map_err(|e| e.to_string())
                .and_then(|s| {
                    serde_json::from_str::<Vec<ContextFragment>>(&s).map_err(|e| e.to_string())
                }) {
                Ok(loaded) => {
                    let mut fragments = store.fragments.write();
                    for fragment in loaded {
                        store
                            .index
                            .insert(fragment.id.clone(), fragment.embedding.clone());
                        fragments.insert(fragment.id.clone(), fragment);
                    }
                }
                Err(e) => warn!("context store at {} not loadable: {}", path.display(), e),
            }
        }
        store
    }

    /// Store that lives only in memory.
    pub fn in_memory(embedder: Arc<dyn EmbeddingProvider>) -> Self {
        Self {
            embedder,
            index: VectorIndex::new(),
            fragments: RwLock::new(HashMap::new()),
            path: None,
        }
    }

    /// Split text into bounded fragments, embed, and store each. Returns
    /// the ids of the stored fragments. Ingestion order is irrelevant to
    /// later retrieval.
    pub async fn ingest(&self, text: &str) -> Result<Vec<String>, ContextError> {
        let mut ids = Vec::new();
        for chunk in chunk_text(text) {
            let embedding = self.embedder.embed(&chunk).await?;
            let id = uuid::Uuid::new_v4().to_string();
            let fragment = ContextFragment {
                id: id.clone(),
                text: chunk,
                embedding: embedding.clone(),
            };
            self.index.insert(id.clone(), embedding);
            self.fragments.write().insert(id.clone(), fragment);
            ids.push(id);
        }
        debug!("ingested {} fragment(s)", ids.len());
        self.persist();
        Ok(ids)
    }

    /// Nearest fragments to the query, best first, at most `limit`. An
    /// empty store yields an empty result, never an error.
    pub async fn search(
        &self,
        query: &str,
        limit: usize,
    ) -> Result<Vec<ContextFragment>, ContextError> {
        if self.fragments.read().is_empty() {
            return Ok(Vec::new());
        }
        let query_embedding = self.embedder.embed(query).await?;
        let hits = self.index.search(&query_embedding, limit);
        let fragments = self.fragments.read();
        Ok(hits
            .into_iter()
            .filter_map(|hit| fragments.get(&hit.id).cloned())
            .collect())
    }

    /// Irreversibly clear the store. Safe to call on a store that was
    /// never initialized or already reset.
    pub fn reset(&self) {
        self.index.clear();
        self.fragments.write().clear();
        if let Some(ref path) = self.path {
            if path.exists() {
                if let Err(e) = fs::remove_file(path) {
                    warn!("context store file {} not removed: {}", path.display(), e);
                }
            }
        }
        debug!("context store reset");
    }

    pub fn len(&self) -> usize {
        self.fragments.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.fragments.read().is_empty()
    }

    fn persist(&self) {
        let Some(ref path) = self.path else { return };
        let snapshot: Vec<ContextFragment> = self.fragments.read().values().cloned().collect();
        let result = serde_json::to_string(&snapshot)
            .map_err(std::io::Error::other)
            .and_then(|json| {
                if let Some(dir) = path.parent() {
                    fs::create_dir_all(dir)?;
                }
                fs::write(path, json)
            });
        if let Err(e) = result {
            warn!("context store flush to {} failed: {}", path.display(), e);
        }
    }
}

/// Fixed-size character chunking.
fn chunk_text(text: &str) -> Vec<String> {
    let chars: Vec<char> = text.chars().collect();
    chars
        .chunks(CHUNK_BOUND)
        .map(|chunk| chunk.iter().collect::<String>())
        .filter(|chunk| !chunk.trim().is_empty())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::embedding::HashEmbedding;
    use tempfile::TempDir;

    fn store() -> ContextStore {
        ContextStore::in_memory(Arc::new(HashEmbedding::default()))
    }

    #[test]
    fn test_chunk_short_text() {
        let chunks = chunk_text("works at Acme");
        assert_eq!(chunks, vec!["works at Acme".to_string()]);
    }

    #[test]
    fn test_chunk_120_chars_yields_three() {
        let text = "a".repeat(120);
        let chunks = chunk_text(&text);
        assert_eq!(chunks.len(), 3);
        assert_eq!(chunks[0].len(), 50);
        assert_eq!(chunks[1].len(), 50);
        assert_eq!(chunks[2].len(), 20);
    }

    #[test]
    fn test_chunk_empty_text() {
        assert!(chunk_text("").is_empty());
        assert!(chunk_text("   ").is_empty());
    }

    #[test]
    fn test_chunk_respects_char_boundaries() {
        // Multibyte characters count as one character each.
        let text = "é".repeat(60);
        let chunks = chunk_text(&text);
        assert_eq!(chunks.len(), 2);
        assert_eq!(chunks[0].chars().count(), 50);
    }

    #[tokio::test]
    async fn test_ingest_long_text_fragments() {
        let store = store();
        let ids = store.ingest(&"x".repeat(120)).await.unwrap();
        assert_eq!(ids.len(), 3);
        assert_eq!(store.len(), 3);
    }

    #[tokio::test]
    async fn test_search_empty_store_returns_empty() {
        let store = store();
        let results = store.search("anything", 10).await.unwrap();
        assert!(results.is_empty());
    }

    #[tokio::test]
    async fn test_search_finds_related_fragment() {
        let store = store();
        store.ingest("works at Acme").await.unwrap();
        store.ingest("favorite color green").await.unwrap();

        let results = store.search("works at Acme", 1).await.unwrap();
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].text, "works at Acme");
    }

    #[tokio::test]
    async fn test_repeated_search_is_stable() {
        let store = store();
        store.ingest("first fact").await.unwrap();
        store.ingest("second fact").await.unwrap();
        store.ingest("third fact").await.unwrap();

        let a = store.search("fact", 3).await.unwrap();
        let b = store.search("fact", 3).await.unwrap();
        let ids_a: Vec<&str> = a.iter().map(|f| f.id.as_str()).collect();
        let ids_b: Vec<&str> = b.iter().map(|f| f.id.as_str()).collect();
        assert_eq!(ids_a, ids_b);
    }

    #[tokio::test]
    async fn test_reset_clears_everything() {
        let store = store();
        store.ingest("something").await.unwrap();
        store.reset();
        assert!(store.is_empty());
        assert!(store.search("something", 10).await.unwrap().is_empty());
    }

    #[test]
    fn test_reset_on_fresh_store_is_safe() {
        store().reset();
    }

    #[tokio::test]
    async fn test_persistence_round_trip() {
        let dir = TempDir::new().unwrap();
        let embedder: Arc<dyn EmbeddingProvider> = Arc::new(HashEmbedding::default());

        {
            let store = ContextStore::open(dir.path(), "test", embedder.clone());
            store.ingest("works at Acme").await.unwrap();
        }

        let reopened = ContextStore::open(dir.path(), "test", embedder);
        assert_eq!(reopened.len(), 1);
        let results = reopened.search("Acme", 1).await.unwrap();
        assert_eq!(results[0].text, "works at Acme");
    }

    #[tokio::test]
    async fn test_reset_removes_persisted_file() {
        let dir = TempDir::new().unwrap();
        let embedder: Arc<dyn EmbeddingProvider> = Arc::new(HashEmbedding::default());

        let store = ContextStore::open(dir.path(), "test", embedder.clone());
        store.ingest("something").await.unwrap();
        store.reset();

        let reopened = ContextStore::open(dir.path(), "test", embedder);
        assert!(reopened.is_empty());
    }
}
