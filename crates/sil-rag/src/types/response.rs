//! Response types with citation formatting

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;

/// Display-only reference to a retrieved chunk
///
/// Renders as `[1] manual.pdf (p.3) (rel 0.12)`. `page` is the 0-based page
/// index; it is shown 1-based.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Citation {
    /// 1-based position in the context block
    pub index: usize,
    /// File name of the source
    pub source_name: String,
    /// 0-based page index
    pub page: Option<u32>,
    /// Cosine distance of the chunk (smaller is more relevant)
    pub distance: f32,
}

impl fmt::Display for Citation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.index, self.source_name)?;
        if let Some(page) = self.page {
            write!(f, " (p.{})", page + 1)?;
        }
        write!(f, " (rel {:.2})", self.distance)
    }
}

/// Which prompt template answered a query
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QueryRoute {
    /// Greeting, thanks, farewell: answered without retrieval
    Smalltalk,
    /// Answered from retrieved context
    Grounded,
    /// Nothing relevant retrieved: answered as a general assistant
    General,
}

/// Result of answering one query
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Answer {
    /// Generated answer text
    pub answer: String,
    /// Rendered citation labels (empty unless grounded)
    pub sources: Vec<String>,
    /// Structured citations, parallel to `sources`
    pub citations: Vec<Citation>,
    /// Route the query took
    pub route: QueryRoute,
    /// Bracketed citation indices the model used inline
    pub cited: Vec<usize>,
}

/// `POST /chat` response body
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatResponse {
    pub answer: String,
    pub sources: Vec<String>,
}

impl From<Answer> for ChatResponse {
    fn from(answer: Answer) -> Self {
        Self {
            answer: answer.answer,
            sources: answer.sources,
        }
    }
}

/// Outcome of ingesting one file
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IngestOutcome {
    /// Path the file was ingested from
    pub path: PathBuf,
    /// File name the upload was stored as
    pub stored_as: String,
    /// Number of chunks added to the index
    pub chunks_indexed: usize,
    /// True when the file type is unsupported and nothing was indexed
    pub skipped: bool,
}

/// `POST /upload` response body
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UploadResponse {
    pub ok: bool,
    pub stored_as: String,
    pub chunks_indexed: usize,
}

/// Liveness
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Health {
    pub ok: bool,
}

/// Provider readiness
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Readiness {
    pub ok: bool,
    pub embedder: bool,
    pub generator: bool,
    pub index: bool,
    pub collection: String,
    pub indexed_vectors: usize,
}
