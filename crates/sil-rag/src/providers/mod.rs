//! Provider abstractions for embeddings, text generation, and vector storage
//!
//! The pipeline only talks to these traits; concrete providers are built once
//! at startup and injected, so each can be swapped (or faked in tests)
//! independently.

pub mod embedding;
pub mod llm;
pub mod local;
pub mod ollama;
pub mod vector_store;

pub use embedding::EmbeddingProvider;
pub use llm::GenerationProvider;
pub use local::LocalVectorStore;
pub use ollama::{OllamaClient, OllamaEmbedder, OllamaLlm};
pub use vector_store::{IndexedVector, VectorSearchResult, VectorStoreProvider};
