//! sil-rag: a minimal retrieval-augmented assistant over local documents
//!
//! Documents are loaded, chunked and embedded into a persisted vector index.
//! Questions are routed to smalltalk, grounded or general prompts depending
//! on what retrieval finds, and answered by a locally hosted model. Both the
//! HTTP server and the interactive loop drive the same [`RagPipeline`].

pub mod config;
pub mod error;
pub mod generation;
pub mod ingestion;
pub mod pipeline;
pub mod providers;
pub mod repl;
pub mod retrieval;
pub mod server;
pub mod types;

pub use config::RagConfig;
pub use error::{Error, Result};
pub use pipeline::RagPipeline;
pub use types::{
    document::{Chunk, ChunkSource, Document, FileType},
    query::ChatRequest,
    response::{Answer, ChatResponse, Citation, QueryRoute},
};
