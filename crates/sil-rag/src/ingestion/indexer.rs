//! Chunk, embed and store documents in the vector index

use std::sync::Arc;
use std::time::Instant;
use tokio::sync::Mutex;

use crate::error::{Error, Result};
use crate::providers::{EmbeddingProvider, IndexedVector, VectorStoreProvider};
use crate::types::{Chunk, Document};

use super::chunker::TextChunker;

/// Feeds documents through the chunker and embedder into the vector store
///
/// At most one `index` call writes at a time; searches are not blocked.
pub struct Indexer {
    chunker: TextChunker,
    embedder: Arc<dyn EmbeddingProvider>,
    store: Arc<dyn VectorStoreProvider>,
    write_lock: Mutex<()>,
}

impl Indexer {
    /// Create an indexer; the embedder and store must agree on dimensionality
    pub fn new(
        chunker: TextChunker,
        embedder: Arc<dyn EmbeddingProvider>,
        store: Arc<dyn VectorStoreProvider>,
    ) -> Result<Self> {
        if embedder.dimensions() != store.dimensions() {
            return Err(Error::DimensionMismatch {
                collection: store.collection().to_string(),
                expected: store.dimensions(),
                actual: embedder.dimensions(),
            });
        }

        Ok(Self {
            chunker,
            embedder,
            store,
            write_lock: Mutex::new(()),
        })
    }

    pub fn chunker(&self) -> &TextChunker {
        &self.chunker
    }

    /// Chunk every document, dropping whitespace-only chunks
    pub fn chunk_documents(&self, documents: &[Document]) -> Vec<Chunk> {
        documents
            .iter()
            .flat_map(|doc| self.chunker.chunk_document(doc))
            .filter(|chunk| !chunk.content.trim().is_empty())
            .collect()
    }

    /// Index `documents`, returning the number of chunks added
    ///
    /// No chunks means no embedding call and no write. Any embedding or store
    /// failure aborts the call with nothing added to the index or the file.
    pub async fn index(&self, documents: &[Document]) -> Result<usize> {
        let chunks = self.chunk_documents(documents);
        if chunks.is_empty() {
            tracing::debug!("Nothing to index ({} documents)", documents.len());
            return Ok(0);
        }

        let start = Instant::now();
        let texts: Vec<String> = chunks.iter().map(|c| c.content.clone()).collect();
        let vectors = self.embedder.embed_batch(&texts).await?;

        if vectors.len() != chunks.len() {
            return Err(Error::embedding(format!(
                "{} returned {} embeddings for {} chunks",
                self.embedder.name(),
                vectors.len(),
                chunks.len()
            )));
        }

        let entries: Vec<IndexedVector> = chunks
            .into_iter()
            .zip(vectors)
            .map(|(chunk, vector)| IndexedVector { chunk, vector })
            .collect();
        let count = entries.len();

        {
            let _guard = self.write_lock.lock().await;
            self.store.add(entries).await?;
            self.store.persist().await?;
        }

        tracing::info!(
            "Indexed {} chunks into {} in {}ms",
            count,
            self.store.collection(),
            start.elapsed().as_millis()
        );

        Ok(count)
    }
}
