//! Local vector store backed by the on-disk flat index

use async_trait::async_trait;
use std::path::Path;
use std::sync::Arc;

use crate::config::RagConfig;
use crate::error::{Error, Result};
use crate::retrieval::VectorIndex;

use super::vector_store::{IndexedVector, VectorSearchResult, VectorStoreProvider};

/// Local vector store wrapping a `VectorIndex`
///
/// Index work is synchronous and can touch the disk, so it runs on the
/// blocking pool.
pub struct LocalVectorStore {
    index: Arc<VectorIndex>,
}

impl LocalVectorStore {
    /// Create from an existing index
    pub fn new(index: Arc<VectorIndex>) -> Self {
        Self { index }
    }

    /// Open `<db_dir>/<collection>.json` for the configured dimensionality
    pub fn from_config(config: &RagConfig) -> Result<Self> {
        Self::open(
            &config.storage.db_dir,
            &config.collection_name(),
            config.embeddings.dimensions,
        )
    }

    /// Open a collection directly
    pub fn open(db_dir: &Path, collection: &str, dimensions: usize) -> Result<Self> {
        let index = VectorIndex::open(db_dir, collection, dimensions)?;
        Ok(Self::new(Arc::new(index)))
    }

    /// Get underlying index for direct access
    pub fn inner(&self) -> &Arc<VectorIndex> {
        &self.index
    }

    async fn blocking<T, F>(&self, f: F) -> Result<T>
    where
        T: Send + 'static,
        F: FnOnce(&VectorIndex) -> Result<T> + Send + 'static,
    {
        let index = self.index.clone();
        tokio::task::spawn_blocking(move || f(&index))
            .await
            .map_err(|e| Error::internal(format!("Task join error: {}", e)))?
    }
}

#[async_trait]
impl VectorStoreProvider for LocalVectorStore {
    async fn add(&self, entries: Vec<IndexedVector>) -> Result<()> {
        self.blocking(move |index| index.add(entries)).await
    }

    async fn persist(&self) -> Result<()> {
        self.blocking(|index| index.persist()).await
    }

    async fn similarity_search(
        &self,
        query: &[f32],
        k: usize,
    ) -> Result<Vec<VectorSearchResult>> {
        let query = query.to_vec();
        self.blocking(move |index| index.search(&query, k)).await
    }

    async fn len(&self) -> Result<usize> {
        Ok(self.index.len())
    }

    fn dimensions(&self) -> usize {
        self.index.dimensions()
    }

    fn collection(&self) -> &str {
        self.index.collection()
    }

    async fn health_check(&self) -> Result<bool> {
        Ok(self.index.path().parent().map_or(false, Path::exists))
    }

    fn name(&self) -> &str {
        "local-flat"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Chunk, Document, FileType};
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_add_persist_search() {
        let dir = TempDir::new().unwrap();
        let store = LocalVectorStore::open(dir.path(), "unit_3", 3).unwrap();
        assert!(store.is_empty().await.unwrap());
        assert_eq!(store.collection(), "unit_3");

        let doc = Document::new("hello", "a.txt", FileType::Txt);
        store
            .add(vec![IndexedVector {
                chunk: Chunk::new(&doc, "hello".into(), 0, 0),
                vector: vec![1.0, 0.0, 0.0],
            }])
            .await
            .unwrap();
        assert!(store.is_empty().await.unwrap());
        store.persist().await.unwrap();

        assert_eq!(store.len().await.unwrap(), 1);
        assert!(dir.path().join("unit_3.json").exists());
        assert!(store.health_check().await.unwrap());

        let results = store.similarity_search(&[1.0, 0.0, 0.0], 5).await.unwrap();
        assert_eq!(results.len(), 1);
        assert!(results[0].distance.abs() < 1e-6);
    }
}
