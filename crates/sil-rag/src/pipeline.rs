//! The RAG pipeline: ingestion and question answering over injected providers

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;
use uuid::Uuid;

use crate::config::RagConfig;
use crate::error::{Error, Result};
use crate::generation::{
    cited_indices, AnswerGenerator, ContextFormatter, PromptBuilder, QueryRouter,
};
use crate::ingestion::{DocumentLoader, Indexer, TextChunker};
use crate::providers::{
    EmbeddingProvider, GenerationProvider, LocalVectorStore, OllamaClient, OllamaEmbedder,
    OllamaLlm, VectorStoreProvider,
};
use crate::retrieval::{RelevanceFilter, Retriever};
use crate::types::{Answer, FileType, Health, IngestOutcome, QueryRoute, Readiness};

/// Ingestion and query pipeline
///
/// Built once at startup and shared; every provider is passed in explicitly.
pub struct RagPipeline {
    config: RagConfig,
    store: Arc<dyn VectorStoreProvider>,
    indexer: Indexer,
    retriever: Retriever,
    filter: RelevanceFilter,
    formatter: ContextFormatter,
    router: QueryRouter,
    prompts: PromptBuilder,
    generator: AnswerGenerator,
}

impl RagPipeline {
    /// Wire the pipeline from explicit providers
    pub fn new(
        config: RagConfig,
        embedder: Arc<dyn EmbeddingProvider>,
        store: Arc<dyn VectorStoreProvider>,
        llm: Arc<dyn GenerationProvider>,
    ) -> Result<Self> {
        let indexer = Indexer::new(
            TextChunker::from_config(&config.chunking),
            Arc::clone(&embedder),
            Arc::clone(&store),
        )?;
        let retriever = Retriever::new(embedder, Arc::clone(&store), config.retrieval.top_k);

        Ok(Self {
            filter: RelevanceFilter::from_config(&config.retrieval),
            formatter: ContextFormatter::new(config.retrieval.max_context_chars),
            router: QueryRouter,
            prompts: PromptBuilder::from_config(&config.assistant),
            generator: AnswerGenerator::from_config(llm, &config.llm),
            indexer,
            retriever,
            store,
            config,
        })
    }

    /// Build the Ollama + local index providers described by `config`
    pub fn from_config(config: RagConfig) -> Result<Self> {
        let client = Arc::new(OllamaClient::new(&config.llm)?);
        let embedder = Arc::new(OllamaEmbedder::new(Arc::clone(&client), &config.embeddings));
        let llm = Arc::new(OllamaLlm::new(client));
        let store = Arc::new(LocalVectorStore::from_config(&config)?);

        tracing::info!(
            "Pipeline ready: embed={} generate={} collection={} at {}",
            config.embeddings.model,
            config.llm.generate_model,
            store.collection(),
            config.llm.base_url
        );

        Self::new(config, embedder, store, llm)
    }

    pub fn config(&self) -> &RagConfig {
        &self.config
    }

    /// Number of vectors currently in the collection
    pub async fn indexed_vectors(&self) -> Result<usize> {
        self.store.len().await
    }

    /// Save uploaded bytes as `docs_dir/<uuid-hex><.ext>`, keeping the original extension
    pub async fn store_upload(&self, filename: &str, data: &[u8]) -> Result<PathBuf> {
        let docs_dir = &self.config.storage.docs_dir;
        tokio::fs::create_dir_all(docs_dir).await?;

        let ext = Path::new(filename)
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| format!(".{}", e))
            .unwrap_or_default();
        let dst = docs_dir.join(format!("{}{}", Uuid::new_v4().simple(), ext));

        tokio::fs::write(&dst, data).await?;
        tracing::info!("Stored upload '{}' as {}", filename, dst.display());

        Ok(dst)
    }

    /// Load and index one file with upload semantics
    ///
    /// Unsupported file types are skipped silently (not an error).
    pub async fn ingest_path(&self, path: &Path) -> Result<IngestOutcome> {
        let stored_as = path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_default();

        if !FileType::from_path(path).is_supported() {
            tracing::info!("Ignoring unsupported upload {}", path.display());
            return Ok(IngestOutcome {
                path: path.to_path_buf(),
                stored_as,
                chunks_indexed: 0,
                skipped: true,
            });
        }

        let owned = path.to_path_buf();
        let documents = tokio::task::spawn_blocking(move || DocumentLoader::load_file(&owned))
            .await
            .map_err(|e| Error::internal(format!("Task join error: {}", e)))??;

        let chunks_indexed = self.indexer.index(&documents).await?;

        Ok(IngestOutcome {
            path: path.to_path_buf(),
            stored_as,
            chunks_indexed,
            skipped: false,
        })
    }

    /// Store an upload and ingest it
    pub async fn upload(&self, filename: &str, data: &[u8]) -> Result<IngestOutcome> {
        let path = self.store_upload(filename, data).await?;
        self.ingest_path(&path).await
    }

    /// Bulk-build from `docs_dir`; returns the number of chunks indexed
    ///
    /// Files that fail to load are logged and skipped. No loadable documents
    /// at all is an `EmptyCorpus` error.
    pub async fn build_index(&self) -> Result<usize> {
        let docs_dir = self.config.storage.docs_dir.clone();
        tracing::info!("Building vector index from {}", docs_dir.display());

        let corpus = tokio::task::spawn_blocking(move || DocumentLoader::load_dir(&docs_dir))
            .await
            .map_err(|e| Error::internal(format!("Task join error: {}", e)))??;

        self.indexer.index(&corpus.documents).await
    }

    /// Answer one query
    pub async fn answer(&self, query: &str) -> Result<Answer> {
        let query = query.trim();
        if query.is_empty() {
            return Err(Error::InvalidRequest("query must not be empty".into()));
        }

        let start = Instant::now();

        if let Some(route) = self.router.pre_route(query) {
            let answer = self.generator.generate(&self.prompts.smalltalk(query)).await?;
            return Ok(ungrounded(answer, route));
        }

        let retrieved = self.retriever.search(query).await?;
        let relevant = self.filter.filter(retrieved);

        let answer = match self.router.route_retrieved(relevant.len()) {
            QueryRoute::Grounded => {
                let context = self.formatter.format(&relevant);
                let text = self
                    .generator
                    .generate(&self.prompts.grounded(query, &context.text))
                    .await?;
                let cited = cited_indices(&text, &context.citations);

                Answer {
                    answer: text,
                    sources: context.labels(),
                    citations: context.citations,
                    route: QueryRoute::Grounded,
                    cited,
                }
            }
            route => {
                let text = self.generator.generate(&self.prompts.general(query)).await?;
                ungrounded(text, route)
            }
        };

        tracing::info!(
            "Answered via {:?} with {} sources in {}ms",
            answer.route,
            answer.sources.len(),
            start.elapsed().as_millis()
        );

        Ok(answer)
    }

    /// Liveness: the process is up
    pub fn health(&self) -> Health {
        Health { ok: true }
    }

    /// Whether every provider answers its health check
    pub async fn readiness(&self) -> Readiness {
        let embedder = self.retriever.embedder().health_check().await.unwrap_or(false);
        let generator = self.generator.health_check().await.unwrap_or(false);
        let index = self.store.health_check().await.unwrap_or(false);
        let indexed_vectors = self.store.len().await.unwrap_or(0);

        Readiness {
            ok: embedder && generator && index,
            embedder,
            generator,
            index,
            collection: self.store.collection().to_string(),
            indexed_vectors,
        }
    }
}

fn ungrounded(answer: String, route: QueryRoute) -> Answer {
    Answer {
        answer,
        sources: Vec::new(),
        citations: Vec::new(),
        route,
        cited: Vec::new(),
    }
}
