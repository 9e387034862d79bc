//! Document ingestion: loading, chunking and indexing

mod chunker;
mod indexer;
mod loader;

pub use chunker::{Span, TextChunker};
pub use indexer::Indexer;
pub use loader::{decode_text, DocumentLoader, LoadedCorpus};
