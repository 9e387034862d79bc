//! In-process providers and fixtures shared by the integration tests

#![allow(dead_code)]

use async_trait::async_trait;
use parking_lot::Mutex;
use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tempfile::TempDir;

use sil_rag::config::RagConfig;
use sil_rag::error::{Error, Result};
use sil_rag::providers::{EmbeddingProvider, GenerationProvider, LocalVectorStore};
use sil_rag::RagPipeline;

/// Bag-of-words embedder over a fixed vocabulary
///
/// Words outside the vocabulary are ignored, so unrelated text embeds to the
/// zero vector (distance 1.0 from everything).
pub struct VocabEmbedder {
    vocabulary: Vec<&'static str>,
    query_calls: AtomicUsize,
}

impl VocabEmbedder {
    pub fn new(vocabulary: Vec<&'static str>) -> Self {
        Self {
            vocabulary,
            query_calls: AtomicUsize::new(0),
        }
    }

    /// Single-text embeds, i.e. query-time calls
    pub fn query_calls(&self) -> usize {
        self.query_calls.load(Ordering::SeqCst)
    }

    fn vectorize(&self, text: &str) -> Vec<f32> {
        let lower = text.to_lowercase();
        let words: Vec<&str> = lower
            .split(|c: char| !c.is_alphanumeric())
            .filter(|w| !w.is_empty())
            .collect();

        self.vocabulary
            .iter()
            .map(|term| words.iter().filter(|w| *w == term).count() as f32)
            .collect()
    }
}

#[async_trait]
impl EmbeddingProvider for VocabEmbedder {
    async fn embed(&self, text: &str) -> Result<Vec<f32>> {
        self.query_calls.fetch_add(1, Ordering::SeqCst);
        Ok(self.vectorize(text))
    }

    async fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>> {
        Ok(texts.iter().map(|t| self.vectorize(t)).collect())
    }

    fn dimensions(&self) -> usize {
        self.vocabulary.len()
    }

    async fn health_check(&self) -> Result<bool> {
        Ok(true)
    }

    fn name(&self) -> &str {
        "vocab"
    }
}

/// Generator that records every prompt and answers with a fixed reply
pub struct RecordingGenerator {
    reply: String,
    pub prompts: Mutex<Vec<String>>,
}

impl RecordingGenerator {
    pub fn new(reply: &str) -> Self {
        Self {
            reply: reply.to_string(),
            prompts: Mutex::new(Vec::new()),
        }
    }

    pub fn last_prompt(&self) -> Option<String> {
        self.prompts.lock().last().cloned()
    }
}

#[async_trait]
impl GenerationProvider for RecordingGenerator {
    async fn complete(&self, prompt: &str, _model: &str, _stream: bool) -> Result<String> {
        self.prompts.lock().push(prompt.to_string());
        Ok(self.reply.clone())
    }

    async fn health_check(&self) -> Result<bool> {
        Ok(true)
    }

    fn name(&self) -> &str {
        "recording"
    }
}

/// Generator whose every call fails like an unreachable model server
pub struct FailingGenerator;

#[async_trait]
impl GenerationProvider for FailingGenerator {
    async fn complete(&self, _prompt: &str, _model: &str, _stream: bool) -> Result<String> {
        Err(Error::generation("Ollama error: HTTP 500 Internal Server Error - model crashed"))
    }

    async fn health_check(&self) -> Result<bool> {
        Ok(false)
    }

    fn name(&self) -> &str {
        "failing"
    }
}

pub const VOCABULARY: [&str; 4] = ["sky", "water", "boils", "rust"];

/// Small chunks so a two-sentence document splits into several chunks
pub fn test_config(root: &Path) -> RagConfig {
    let mut config = RagConfig::default();
    config.storage.docs_dir = root.join("docs");
    config.storage.db_dir = root.join("db");
    config.embeddings.dimensions = VOCABULARY.len();
    config.chunking.chunk_size = 20;
    config.chunking.chunk_overlap = 5;
    config
}

pub struct Fixture {
    pub dir: TempDir,
    pub embedder: Arc<VocabEmbedder>,
    pub store: Arc<LocalVectorStore>,
    pub pipeline: Arc<RagPipeline>,
}

impl Fixture {
    pub fn new(generator: Arc<dyn GenerationProvider>) -> Self {
        let dir = TempDir::new().unwrap();
        let config = test_config(dir.path());
        let embedder = Arc::new(VocabEmbedder::new(VOCABULARY.to_vec()));
        let store = Arc::new(LocalVectorStore::from_config(&config).unwrap());
        let pipeline = Arc::new(
            RagPipeline::new(config, embedder.clone(), store.clone(), generator).unwrap(),
        );

        Self {
            dir,
            embedder,
            store,
            pipeline,
        }
    }

    /// Write a file into the docs dir and return its path
    pub fn write_doc(&self, name: &str, contents: &[u8]) -> std::path::PathBuf {
        let docs = self.dir.path().join("docs");
        std::fs::create_dir_all(&docs).unwrap();
        let path = docs.join(name);
        std::fs::write(&path, contents).unwrap();
        path
    }
}
