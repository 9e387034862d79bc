//! Query-time nearest-neighbour retrieval

use std::sync::Arc;

use crate::error::Result;
use crate::providers::{EmbeddingProvider, VectorSearchResult, VectorStoreProvider};

/// Embeds a query and asks the vector store for its nearest chunks
pub struct Retriever {
    embedder: Arc<dyn EmbeddingProvider>,
    store: Arc<dyn VectorStoreProvider>,
    top_k: usize,
}

impl Retriever {
    /// Create a retriever returning at most `top_k` results per query
    pub fn new(
        embedder: Arc<dyn EmbeddingProvider>,
        store: Arc<dyn VectorStoreProvider>,
        top_k: usize,
    ) -> Self {
        Self {
            embedder,
            store,
            top_k: top_k.max(1),
        }
    }

    pub fn top_k(&self) -> usize {
        self.top_k
    }

    pub fn embedder(&self) -> &Arc<dyn EmbeddingProvider> {
        &self.embedder
    }

    /// Retrieve with the configured `top_k`
    pub async fn search(&self, query: &str) -> Result<Vec<VectorSearchResult>> {
        self.retrieve(query, self.top_k).await
    }

    /// The `k` chunks nearest to `query`, closest first
    pub async fn retrieve(&self, query: &str, k: usize) -> Result<Vec<VectorSearchResult>> {
        let embedding = self.embedder.embed(query).await?;
        let mut results = self.store.similarity_search(&embedding, k).await?;

        // Providers are expected to sort already; don't rely on it
        results.sort_by(|a, b| a.distance.total_cmp(&b.distance));
        results.truncate(k);

        tracing::debug!(
            "Retrieved {} chunks (best distance {:?})",
            results.len(),
            results.first().map(|r| r.distance)
        );

        Ok(results)
    }
}
