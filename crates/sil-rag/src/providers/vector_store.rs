//! Vector store provider trait for storing and searching embeddings

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::types::Chunk;

/// A chunk together with its embedding, as stored in the index
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IndexedVector {
    /// The embedded chunk
    pub chunk: Chunk,
    /// Its embedding
    pub vector: Vec<f32>,
}

/// Search result from vector store
#[derive(Debug, Clone)]
pub struct VectorSearchResult {
    /// The matched chunk
    pub chunk: Chunk,
    /// Cosine distance to the query (0.0 identical, 1.0 orthogonal, 2.0 opposite;
    /// smaller is more similar)
    pub distance: f32,
}

/// Trait for vector storage and similarity search
///
/// Stores are keyed by a collection name that encodes the embedding
/// dimensionality. Vectors of any other dimensionality are rejected.
#[async_trait]
pub trait VectorStoreProvider: Send + Sync {
    /// Stage vectors for the next `persist`; either all are staged or none are
    async fn add(&self, entries: Vec<IndexedVector>) -> Result<()>;

    /// Durably write the collection, making staged vectors searchable
    ///
    /// On failure the staged vectors are discarded and the searchable
    /// collection is unchanged.
    async fn persist(&self) -> Result<()>;

    /// The `k` nearest chunks, closest first
    async fn similarity_search(&self, query: &[f32], k: usize)
        -> Result<Vec<VectorSearchResult>>;

    /// Get total number of vectors stored
    async fn len(&self) -> Result<usize>;

    /// Check if store is empty
    async fn is_empty(&self) -> Result<bool> {
        Ok(self.len().await? == 0)
    }

    /// Dimensionality of the collection
    fn dimensions(&self) -> usize;

    /// Collection name
    fn collection(&self) -> &str;

    /// Check if the provider is healthy
    async fn health_check(&self) -> Result<bool>;

    /// Get provider name for logging
    fn name(&self) -> &str;
}
