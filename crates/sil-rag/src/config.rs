//! Configuration for the RAG assistant
//!
//! One `RagConfig` is built at process start and injected into every component.
//! Upload-time ingestion and bulk builds share the same `ChunkingConfig`.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::{Error, Result};

/// Default config file looked up in the working directory
pub const DEFAULT_CONFIG_FILE: &str = "sil-rag.toml";

/// Main configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct RagConfig {
    /// HTTP server configuration
    pub server: ServerConfig,
    /// Document and index directories
    pub storage: StorageConfig,
    /// Embedding configuration
    pub embeddings: EmbeddingConfig,
    /// Chunking configuration (shared by upload and bulk build)
    pub chunking: ChunkingConfig,
    /// Retrieval and relevance filtering
    pub retrieval: RetrievalConfig,
    /// Ollama/LLM configuration
    pub llm: LlmConfig,
    /// Vector index configuration
    pub vector_db: VectorDbConfig,
    /// Assistant persona used in prompts
    pub assistant: AssistantConfig,
}

impl RagConfig {
    /// Load configuration from an explicit file, `./sil-rag.toml`, or defaults,
    /// then apply environment overrides and validate.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut config = match path {
            Some(path) => Self::from_file(path)?,
            None => {
                let default_path = Path::new(DEFAULT_CONFIG_FILE);
                if default_path.exists() {
                    Self::from_file(default_path)?
                } else {
                    Self::default()
                }
            }
        };

        config.apply_env_overrides();
        config.validate()?;
        Ok(config)
    }

    /// Parse a TOML config file
    pub fn from_file(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path)
            .map_err(|e| Error::Config(format!("Cannot read {}: {}", path.display(), e)))?;
        Ok(toml::from_str(&raw)?)
    }

    /// Apply `SIL_RAG_*` environment overrides
    pub fn apply_env_overrides(&mut self) {
        self.apply_overrides(|key| std::env::var(key).ok());
    }

    fn apply_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(url) = lookup("SIL_RAG_OLLAMA_URL") {
            self.llm.base_url = url;
        }
        if let Some(model) = lookup("SIL_RAG_EMBED_MODEL") {
            self.embeddings.model = model;
        }
        if let Some(model) = lookup("SIL_RAG_GENERATE_MODEL") {
            self.llm.generate_model = model;
        }
        if let Some(dir) = lookup("SIL_RAG_DOCS_DIR") {
            self.storage.docs_dir = PathBuf::from(dir);
        }
        if let Some(dir) = lookup("SIL_RAG_DB_DIR") {
            self.storage.db_dir = PathBuf::from(dir);
        }
        if let Some(host) = lookup("SIL_RAG_HOST") {
            self.server.host = host;
        }
        if let Some(port) = lookup("SIL_RAG_PORT") {
            match port.parse() {
                Ok(port) => self.server.port = port,
                Err(_) => tracing::warn!("Ignoring invalid SIL_RAG_PORT={}", port),
            }
        }
    }

    /// Reject configurations the pipeline cannot run with
    pub fn validate(&self) -> Result<()> {
        let chunking = &self.chunking;
        if chunking.chunk_size == 0 {
            return Err(Error::Config("chunking.chunk_size must be positive".into()));
        }
        if chunking.chunk_overlap == 0 || chunking.chunk_overlap >= chunking.chunk_size {
            return Err(Error::Config(format!(
                "chunking.chunk_overlap must satisfy 0 < overlap < chunk_size (got {} / {})",
                chunking.chunk_overlap, chunking.chunk_size
            )));
        }
        if self.retrieval.top_k == 0 {
            return Err(Error::Config("retrieval.top_k must be at least 1".into()));
        }
        let threshold = self.retrieval.max_distance;
        if !threshold.is_finite() || !(0.0..=2.0).contains(&threshold) {
            return Err(Error::Config(format!(
                "retrieval.max_distance must be a cosine distance in [0, 2] (got {})",
                threshold
            )));
        }
        if self.retrieval.max_context_chars == 0 {
            return Err(Error::Config("retrieval.max_context_chars must be positive".into()));
        }
        if self.embeddings.dimensions == 0 {
            return Err(Error::Config("embeddings.dimensions must be positive".into()));
        }
        if self.embeddings.model.trim().is_empty() || self.llm.generate_model.trim().is_empty() {
            return Err(Error::Config("model names must not be empty".into()));
        }
        if self.llm.timeout_secs == 0 {
            return Err(Error::Config("llm.timeout_secs must be at least 1".into()));
        }
        if self.vector_db.collection_prefix.trim().is_empty() {
            return Err(Error::Config("vector_db.collection_prefix must not be empty".into()));
        }
        Ok(())
    }

    /// Collection name for the configured embedding dimensionality
    pub fn collection_name(&self) -> String {
        self.vector_db.collection_name(self.embeddings.dimensions)
    }
}

/// Server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Host address
    pub host: String,
    /// Port number
    pub port: u16,
    /// Origins allowed by CORS
    pub cors_origins: Vec<String>,
    /// Maximum upload size in bytes
    pub max_upload_size: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 8000,
            cors_origins: vec![
                "http://localhost:3000".to_string(),
                "http://127.0.0.1:3000".to_string(),
                "http://localhost:3001".to_string(),
                "http://127.0.0.1:3001".to_string(),
            ],
            max_upload_size: 50 * 1024 * 1024, // 50MB
        }
    }
}

/// Where uploaded documents and the vector index live
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    /// Directory holding source documents (uploads land here too)
    pub docs_dir: PathBuf,
    /// Directory holding persisted collections
    pub db_dir: PathBuf,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            docs_dir: PathBuf::from("docs"),
            db_dir: PathBuf::from("vector_db"),
        }
    }
}

/// Embedding configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EmbeddingConfig {
    /// Embedding model served by Ollama
    pub model: String,
    /// Output dimensionality of the model
    pub dimensions: usize,
}

impl Default for EmbeddingConfig {
    fn default() -> Self {
        Self {
            model: "nomic-embed-text".to_string(),
            dimensions: 768,
        }
    }
}

/// Text chunking configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ChunkingConfig {
    /// Maximum chunk size in characters
    pub chunk_size: usize,
    /// Overlap between consecutive chunks in characters
    pub chunk_overlap: usize,
}

impl Default for ChunkingConfig {
    fn default() -> Self {
        Self {
            chunk_size: 1000,
            chunk_overlap: 150,
        }
    }
}

/// Retrieval and relevance filtering
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RetrievalConfig {
    /// Number of nearest chunks requested per query
    pub top_k: usize,
    /// Maximum cosine distance a chunk may have to ground an answer
    pub max_distance: f32,
    /// Per-chunk character cap when rendering context
    pub max_context_chars: usize,
}

impl Default for RetrievalConfig {
    fn default() -> Self {
        Self {
            top_k: 3,
            max_distance: 0.40,
            max_context_chars: 1500,
        }
    }
}

/// LLM (Ollama) configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LlmConfig {
    /// Ollama base URL
    pub base_url: String,
    /// Generation model name
    pub generate_model: String,
    /// Temperature for generation
    pub temperature: f32,
    /// Request timeout in seconds
    pub timeout_secs: u64,
    /// Ask Ollama for an NDJSON stream instead of one response object
    pub stream: bool,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            base_url: "http://127.0.0.1:11434".to_string(),
            generate_model: "mistral".to_string(),
            temperature: 0.2,
            timeout_secs: 120,
            stream: false,
        }
    }
}

/// Vector index configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct VectorDbConfig {
    /// Collection name prefix; the dimensionality is appended
    pub collection_prefix: String,
}

impl VectorDbConfig {
    /// `"{prefix}_{dimensions}"`, e.g. `sil_embed_768`
    pub fn collection_name(&self, dimensions: usize) -> String {
        format!("{}_{}", self.collection_prefix, dimensions)
    }
}

impl Default for VectorDbConfig {
    fn default() -> Self {
        Self {
            collection_prefix: "sil_embed".to_string(),
        }
    }
}

/// Assistant persona
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AssistantConfig {
    /// Name the assistant introduces itself with in grounded prompts
    pub name: String,
}

impl Default for AssistantConfig {
    fn default() -> Self {
        Self {
            name: "SIL Copilot".to_string(),
        }
    }
}
