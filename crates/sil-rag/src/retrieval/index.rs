//! Flat, exact cosine-distance index persisted as one JSON file per collection

use parking_lot::{Mutex, RwLock, RwLockUpgradableReadGuard};
use serde::{Deserialize, Serialize};
use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;

use crate::error::{Error, Result};
use crate::providers::{IndexedVector, VectorSearchResult};

/// On-disk layout of a collection
#[derive(Serialize, Deserialize)]
struct CollectionFile {
    collection: String,
    dimensions: usize,
    entries: Vec<IndexedVector>,
}

/// In-memory vector index for a single collection
///
/// Search is brute force over every stored vector, which keeps results exact.
/// The collection is written to `<db_dir>/<collection>.json`.
pub struct VectorIndex {
    collection: String,
    dimensions: usize,
    path: PathBuf,
    entries: RwLock<Vec<IndexedVector>>,
    staged: Mutex<Vec<IndexedVector>>,
}

impl VectorIndex {
    /// Open a collection, loading it from `db_dir` when it was persisted before
    ///
    /// A persisted collection with a different dimensionality fails with
    /// `DimensionMismatch`.
    pub fn open(db_dir: &Path, collection: &str, dimensions: usize) -> Result<Self> {
        std::fs::create_dir_all(db_dir)?;
        let path = db_dir.join(format!("{}.json", collection));

        let entries = if path.exists() {
            let raw = std::fs::read(&path)?;
            let file: CollectionFile = serde_json::from_slice(&raw).map_err(|e| {
                Error::vector_db(format!("Corrupt collection {}: {}", path.display(), e))
            })?;

            if file.dimensions != dimensions {
                return Err(Error::DimensionMismatch {
                    collection: collection.to_string(),
                    expected: file.dimensions,
                    actual: dimensions,
                });
            }
            if let Some(bad) = file.entries.iter().find(|e| e.vector.len() != dimensions) {
                return Err(Error::DimensionMismatch {
                    collection: collection.to_string(),
                    expected: dimensions,
                    actual: bad.vector.len(),
                });
            }

            tracing::info!(
                "Opened collection {} with {} vectors",
                collection,
                file.entries.len()
            );
            file.entries
        } else {
            tracing::info!("Created empty collection {}", collection);
            Vec::new()
        };

        Ok(Self {
            collection: collection.to_string(),
            dimensions,
            path,
            entries: RwLock::new(entries),
            staged: Mutex::new(Vec::new()),
        })
    }

    pub fn collection(&self) -> &str {
        &self.collection
    }

    pub fn dimensions(&self) -> usize {
        self.dimensions
    }

    /// File the collection persists to
    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }

    /// Stage entries for the next `persist`; one wrong-sized vector rejects the whole batch
    pub fn add(&self, new_entries: Vec<IndexedVector>) -> Result<()> {
        if let Some(bad) = new_entries
            .iter()
            .find(|e| e.vector.len() != self.dimensions)
        {
            return Err(Error::DimensionMismatch {
                collection: self.collection.clone(),
                expected: self.dimensions,
                actual: bad.vector.len(),
            });
        }

        self.staged.lock().extend(new_entries);
        Ok(())
    }

    /// Write committed plus staged entries to disk, then make them searchable
    ///
    /// Staged entries are consumed either way: a failed write discards them and
    /// leaves the searchable entries and the file as they were. Concurrent
    /// persists are serialized; searches keep running against the previous
    /// entries until the swap.
    pub fn persist(&self) -> Result<()> {
        let current = self.entries.upgradable_read();
        let staged = std::mem::take(&mut *self.staged.lock());

        let mut snapshot = Vec::with_capacity(current.len() + staged.len());
        snapshot.extend_from_slice(&current);
        snapshot.extend(staged);

        self.write_file(&snapshot)?;

        let mut entries = RwLockUpgradableReadGuard::upgrade(current);
        *entries = snapshot;
        Ok(())
    }

    /// Write `entries` atomically (temp file in the same directory, then rename)
    fn write_file(&self, entries: &[IndexedVector]) -> Result<()> {
        let fail = |e: &dyn std::fmt::Display| {
            Error::vector_db(format!("Failed to persist {}: {}", self.path.display(), e))
        };

        let dir = self
            .path
            .parent()
            .ok_or_else(|| Error::vector_db("Collection path has no parent directory"))?;

        let file = CollectionFileRef {
            collection: &self.collection,
            dimensions: self.dimensions,
            entries,
        };

        let mut tmp = NamedTempFile::new_in(dir).map_err(|e| fail(&e))?;
        serde_json::to_writer(&mut tmp, &file).map_err(|e| fail(&e))?;
        tmp.flush().map_err(|e| fail(&e))?;
        tmp.persist(&self.path).map_err(|e| fail(&e))?;

        tracing::debug!("Persisted {} vectors to {}", entries.len(), self.path.display());
        Ok(())
    }

    /// The `k` stored chunks closest to `query`, ascending by distance
    pub fn search(&self, query: &[f32], k: usize) -> Result<Vec<VectorSearchResult>> {
        if query.len() != self.dimensions {
            return Err(Error::DimensionMismatch {
                collection: self.collection.clone(),
                expected: self.dimensions,
                actual: query.len(),
            });
        }
        if k == 0 {
            return Ok(Vec::new());
        }

        let entries = self.entries.read();
        let mut scored: Vec<(usize, f32)> = entries
            .iter()
            .enumerate()
            .map(|(i, e)| (i, cosine_distance(query, &e.vector)))
            .collect();

        scored.sort_by(|a, b| a.1.total_cmp(&b.1));
        scored.truncate(k);

        Ok(scored
            .into_iter()
            .map(|(i, distance)| VectorSearchResult {
                chunk: entries[i].chunk.clone(),
                distance,
            })
            .collect())
    }
}

#[derive(Serialize)]
struct CollectionFileRef<'a> {
    collection: &'a str,
    dimensions: usize,
    entries: &'a [IndexedVector],
}

/// Cosine distance `1 - cos(a, b)`; a zero vector is treated as orthogonal
pub fn cosine_distance(a: &[f32], b: &[f32]) -> f32 {
    let mut dot = 0.0f32;
    let mut norm_a = 0.0f32;
    let mut norm_b = 0.0f32;

    for (x, y) in a.iter().zip(b) {
        dot += x * y;
        norm_a += x * x;
        norm_b += y * y;
    }

    if norm_a == 0.0 || norm_b == 0.0 {
        return 1.0;
    }

    let cos = (dot / (norm_a.sqrt() * norm_b.sqrt())).clamp(-1.0, 1.0);
    1.0 - cos
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Chunk, Document, FileType};
    use tempfile::TempDir;

    fn entry(text: &str, vector: Vec<f32>) -> IndexedVector {
        let doc = Document::new(text, "docs/facts.txt", FileType::Txt);
        IndexedVector {
            chunk: Chunk::new(&doc, text.to_string(), 0, 0),
            vector,
        }
    }

    #[test]
    fn test_cosine_distance() {
        assert!(cosine_distance(&[1.0, 0.0], &[2.0, 0.0]).abs() < 1e-6);
        assert!((cosine_distance(&[1.0, 0.0], &[0.0, 1.0]) - 1.0).abs() < 1e-6);
        assert!((cosine_distance(&[1.0, 0.0], &[-1.0, 0.0]) - 2.0).abs() < 1e-6);
        assert_eq!(cosine_distance(&[0.0, 0.0], &[1.0, 0.0]), 1.0);
    }

    #[test]
    fn test_search_sorted_ascending_and_truncated() {
        let dir = TempDir::new().unwrap();
        let index = VectorIndex::open(dir.path(), "test_2", 2).unwrap();
        index
            .add(vec![
                entry("far", vec![0.0, 1.0]),
                entry("near", vec![1.0, 0.1]),
                entry("exact", vec![1.0, 0.0]),
            ])
            .unwrap();
        index.persist().unwrap();

        let results = index.search(&[1.0, 0.0], 2).unwrap();
        assert_eq!(results.len(), 2);
        assert_eq!(results[0].chunk.content, "exact");
        assert_eq!(results[1].chunk.content, "near");
        assert!(results[0].distance <= results[1].distance);
    }

    #[test]
    fn test_search_empty_index() {
        let dir = TempDir::new().unwrap();
        let index = VectorIndex::open(dir.path(), "test_2", 2).unwrap();
        assert!(index.search(&[1.0, 0.0], 3).unwrap().is_empty());
    }

    #[test]
    fn test_add_rejects_whole_batch_on_wrong_dimensions() {
        let dir = TempDir::new().unwrap();
        let index = VectorIndex::open(dir.path(), "test_2", 2).unwrap();
        let result = index.add(vec![entry("ok", vec![1.0, 0.0]), entry("bad", vec![1.0])]);

        assert!(matches!(result, Err(Error::DimensionMismatch { .. })));
        assert_eq!(index.staged.lock().len(), 0);
        assert!(index.is_empty());
    }

    #[test]
    fn test_staged_entries_are_not_searchable_until_persisted() {
        let dir = TempDir::new().unwrap();
        let index = VectorIndex::open(dir.path(), "test_2", 2).unwrap();
        index.add(vec![entry("pending", vec![1.0, 0.0])]).unwrap();

        assert!(index.is_empty());
        assert!(index.search(&[1.0, 0.0], 3).unwrap().is_empty());

        index.persist().unwrap();
        assert_eq!(index.len(), 1);
        assert_eq!(index.staged.lock().len(), 0);
    }

    #[test]
    fn test_failed_persist_leaves_index_unchanged() {
        let dir = TempDir::new().unwrap();
        let db = dir.path().join("db");
        let index = VectorIndex::open(&db, "test_2", 2).unwrap();
        index.add(vec![entry("first", vec![1.0, 0.0])]).unwrap();
        index.persist().unwrap();

        std::fs::remove_dir_all(&db).unwrap();
        index.add(vec![entry("lost", vec![0.0, 1.0])]).unwrap();
        let err = index.persist().unwrap_err();

        assert!(matches!(err, Error::VectorDb(_)));
        assert!(err.is_index_error());
        assert_eq!(index.len(), 1);
        assert_eq!(index.staged.lock().len(), 0);
        assert_eq!(index.search(&[0.0, 1.0], 5).unwrap()[0].chunk.content, "first");

        // The discarded batch does not resurface on the next successful write
        std::fs::create_dir_all(&db).unwrap();
        index.persist().unwrap();
        assert_eq!(VectorIndex::open(&db, "test_2", 2).unwrap().len(), 1);
    }

    #[test]
    fn test_persist_and_reopen() {
        let dir = TempDir::new().unwrap();
        {
            let index = VectorIndex::open(dir.path(), "test_2", 2).unwrap();
            index.add(vec![entry("kept", vec![0.6, 0.8])]).unwrap();
            index.persist().unwrap();
        }

        let reopened = VectorIndex::open(dir.path(), "test_2", 2).unwrap();
        assert_eq!(reopened.len(), 1);
        assert_eq!(reopened.search(&[0.6, 0.8], 1).unwrap()[0].chunk.content, "kept");
    }

    #[test]
    fn test_reopen_with_other_dimensions_fails() {
        let dir = TempDir::new().unwrap();
        let index = VectorIndex::open(dir.path(), "shared", 2).unwrap();
        index.add(vec![entry("x", vec![1.0, 0.0])]).unwrap();
        index.persist().unwrap();

        assert!(matches!(
            VectorIndex::open(dir.path(), "shared", 3),
            Err(Error::DimensionMismatch { expected: 2, actual: 3, .. })
        ));
    }
}
