//! Core types for the RAG system

pub mod document;
pub mod query;
pub mod response;

pub use document::{Chunk, ChunkSource, Document, FileType};
pub use query::ChatRequest;
pub use response::{
    Answer, ChatResponse, Citation, Health, IngestOutcome, QueryRoute, Readiness,
    UploadResponse,
};
