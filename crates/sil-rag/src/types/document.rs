//! Document and chunk types with source tracking for citations

use serde::{Deserialize, Serialize};
use std::path::Path;
use uuid::Uuid;

/// Supported file types
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum FileType {
    /// PDF document, loaded one page at a time
    Pdf,
    /// Plain text file
    Txt,
    /// Markdown file
    Markdown,
    /// CSV file (indexed as raw text)
    Csv,
    /// YAML file
    Yaml,
    /// Anything else
    Unknown,
}

impl FileType {
    /// Detect file type from extension
    pub fn from_extension(ext: &str) -> Self {
        match ext.to_lowercase().as_str() {
            "pdf" => Self::Pdf,
            "txt" => Self::Txt,
            "md" => Self::Markdown,
            "csv" => Self::Csv,
            "yaml" | "yml" => Self::Yaml,
            _ => Self::Unknown,
        }
    }

    /// Detect file type from a path's extension
    pub fn from_path(path: &Path) -> Self {
        path.extension()
            .and_then(|e| e.to_str())
            .map(Self::from_extension)
            .unwrap_or(Self::Unknown)
    }

    /// Check if this is a supported file type
    pub fn is_supported(&self) -> bool {
        !matches!(self, Self::Unknown)
    }
}

/// A unit of ingested content: a whole text file or one PDF page
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Document {
    /// Extracted text
    pub content: String,
    /// Path or identifier of the originating file
    pub source: String,
    /// 0-based page index (paged formats only)
    pub page: Option<u32>,
    /// File type
    pub file_type: FileType,
}

impl Document {
    /// Create a document for a whole file
    pub fn new(content: impl Into<String>, source: impl Into<String>, file_type: FileType) -> Self {
        Self {
            content: content.into(),
            source: source.into(),
            page: None,
            file_type,
        }
    }

    /// Create a document for a single page
    pub fn page(
        content: impl Into<String>,
        source: impl Into<String>,
        page: u32,
        file_type: FileType,
    ) -> Self {
        Self {
            content: content.into(),
            source: source.into(),
            page: Some(page),
            file_type,
        }
    }
}

/// Source information inherited by a chunk from its document
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChunkSource {
    /// Path or identifier of the originating file
    pub path: String,
    /// 0-based page index
    pub page: Option<u32>,
}

impl ChunkSource {
    /// File name component of the source path, used in citations
    pub fn file_name(&self) -> &str {
        Path::new(&self.path)
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or(&self.path)
    }
}

/// A bounded slice of a document's content
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Chunk {
    /// Unique chunk ID
    pub id: Uuid,
    /// Chunk text
    pub content: String,
    /// Where the chunk came from
    pub source: ChunkSource,
    /// Position of the chunk within its document
    pub chunk_index: u32,
    /// Character offset of the chunk start within the document
    pub char_start: usize,
}

impl Chunk {
    /// Create a new chunk of `doc`
    pub fn new(doc: &Document, content: String, chunk_index: u32, char_start: usize) -> Self {
        Self {
            id: Uuid::new_v4(),
            content,
            source: ChunkSource {
                path: doc.source.clone(),
                page: doc.page,
            },
            chunk_index,
            char_start,
        }
    }
}
