//! File loading: text formats with encoding detection, PDFs page by page

use chardetng::EncodingDetector;
use encoding_rs::Encoding;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

use crate::error::{Error, Result};
use crate::types::{Document, FileType};

/// Loads supported files into documents
pub struct DocumentLoader;

/// Result of scanning a directory for a bulk build
#[derive(Debug, Default)]
pub struct LoadedCorpus {
    /// Documents from every file that loaded
    pub documents: Vec<Document>,
    /// Files that failed to load
    pub failures: Vec<Error>,
    /// Number of supported files found
    pub files: usize,
}

impl DocumentLoader {
    /// Load one file, dispatching on its extension
    ///
    /// PDFs yield one document per page, text formats one document per file.
    pub fn load_file(path: &Path) -> Result<Vec<Document>> {
        let file_type = FileType::from_path(path);
        if !file_type.is_supported() {
            let ext = path
                .extension()
                .map(|e| e.to_string_lossy().to_string())
                .unwrap_or_default();
            return Err(Error::UnsupportedFileType(ext));
        }

        let data = std::fs::read(path).map_err(|e| Error::load(path, e.to_string()))?;
        let source = path.to_string_lossy().to_string();

        match file_type {
            FileType::Pdf => Self::load_pdf(path, &source, &data),
            _ => {
                let content = decode_text(path, &data)?;
                Ok(vec![Document::new(content, source, file_type)])
            }
        }
    }

    /// Supported files under `dir`, in a stable order
    pub fn collect_files(dir: &Path) -> Result<Vec<PathBuf>> {
        if !dir.is_dir() {
            return Err(Error::Config(format!(
                "Docs folder not found: {}",
                dir.display()
            )));
        }

        let mut files: Vec<PathBuf> = WalkDir::new(dir)
            .follow_links(true)
            .into_iter()
            .filter_map(|e| e.ok())
            .filter(|e| e.file_type().is_file())
            .map(|e| e.into_path())
            .filter(|p| FileType::from_path(p).is_supported())
            .collect();
        files.sort();

        Ok(files)
    }

    /// Load every supported file under `dir`
    ///
    /// A file that fails to load is recorded and skipped; the batch continues.
    /// Finding no documents at all is an `EmptyCorpus` error.
    pub fn load_dir(dir: &Path) -> Result<LoadedCorpus> {
        let files = Self::collect_files(dir)?;
        let mut corpus = LoadedCorpus {
            files: files.len(),
            ..Default::default()
        };

        for path in files {
            match Self::load_file(&path) {
                Ok(docs) => {
                    tracing::debug!("Loaded {} ({} documents)", path.display(), docs.len());
                    corpus.documents.extend(docs);
                }
                Err(e) => {
                    tracing::warn!("Skipping {}: {}", path.display(), e);
                    corpus.failures.push(e);
                }
            }
        }

        if corpus.documents.is_empty() {
            return Err(Error::EmptyCorpus(dir.to_path_buf()));
        }

        tracing::info!(
            "Loaded {} documents from {} files in {} ({} failed)",
            corpus.documents.len(),
            corpus.files,
            dir.display(),
            corpus.failures.len()
        );

        Ok(corpus)
    }

    fn load_pdf(path: &Path, source: &str, data: &[u8]) -> Result<Vec<Document>> {
        let pdf = lopdf::Document::load_mem(data)
            .map_err(|e| Error::load(path, format!("Failed to load PDF: {}", e)))?;

        let mut documents = Vec::new();
        for page_number in pdf.get_pages().into_keys() {
            match pdf.extract_text(&[page_number]) {
                Ok(text) => documents.push(Document::page(
                    cleanup_pdf_text(&text),
                    source,
                    page_number.saturating_sub(1),
                    FileType::Pdf,
                )),
                Err(e) => {
                    tracing::warn!(
                        "Could not extract page {} of {}: {}",
                        page_number,
                        path.display(),
                        e
                    );
                }
            }
        }

        Ok(documents)
    }
}

/// Decode file bytes, detecting the encoding when they are not UTF-8
pub fn decode_text(path: &Path, data: &[u8]) -> Result<String> {
    if let Some((encoding, bom_len)) = Encoding::for_bom(data) {
        return decode_with(path, encoding, &data[bom_len..]);
    }

    if let Ok(text) = std::str::from_utf8(data) {
        return reject_binary(path, text.to_string());
    }

    let mut detector = EncodingDetector::new();
    detector.feed(data, true);
    let encoding = detector.guess(None, true);
    tracing::debug!("Detected {} for {}", encoding.name(), path.display());

    decode_with(path, encoding, data)
}

fn decode_with(path: &Path, encoding: &'static Encoding, data: &[u8]) -> Result<String> {
    let text = encoding
        .decode_without_bom_handling_and_without_replacement(data)
        .ok_or_else(|| {
            Error::load(
                path,
                format!("content is not valid {}", encoding.name()),
            )
        })?;
    reject_binary(path, text.into_owned())
}

fn reject_binary(path: &Path, text: String) -> Result<String> {
    if text.contains('\0') {
        return Err(Error::load(path, "binary content (NUL bytes)"));
    }
    Ok(text)
}

/// Normalize characters pdf text extraction commonly leaves behind
fn cleanup_pdf_text(text: &str) -> String {
    text.replace('\0', "")
        .replace('\u{00A0}', " ")
        .replace('\u{FB00}', "ff")
        .replace('\u{FB01}', "fi")
        .replace('\u{FB02}', "fl")
        .replace('\u{FB03}', "ffi")
        .replace('\u{FB04}', "ffl")
}
