//! # sage-vector
//!
//! An embedded, exact nearest-neighbor vector index for Sage's essay
//! corpus. Vectors are compared by cosine similarity over a brute-force
//! scan, which is both simpler and fully rank-correct at corpus scale
//! (tens of thousands of chunks).
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use sage_vector::VectorIndex;
//!
//! let index = VectorIndex::build(vec![
//!     (vec![1.0, 0.0], "first"),
//!     (vec![0.0, 1.0], "second"),
//! ])?;
//!
//! let hits = index.search(&[0.9, 0.1], 1)?;
//! assert_eq!(*hits[0].0, "first");
//!
//! index.save("data/index.json")?;
//! let reloaded: VectorIndex<&str> = VectorIndex::load("data/index.json")?;
//! ```
//!
//! ## Persistence
//!
//! The whole index round-trips through a versioned JSON envelope:
//! `load(save(index))` recovers every (payload, vector) pair. Saving
//! writes to a temp file and renames it into place, so concurrent
//! readers never observe a partially written index on disk.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod distance;
pub mod error;

pub use distance::cosine_similarity;
pub use error::{Error, Result};

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::{debug, info};

/// On-disk format version. Bumped whenever the envelope layout changes;
/// a mismatch on load is reported as corruption rather than a partial read.
const FORMAT_VERSION: u32 = 1;

/// A single indexed vector with its caller-supplied payload.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct Entry<P> {
    vector: Vec<f32>,
    payload: P,
}

/// Serialized envelope for persistence.
#[derive(Debug, Serialize, Deserialize)]
struct IndexFile<P> {
    format_version: u32,
    dimensions: usize,
    entries: Vec<Entry<P>>,
}

/// An immutable exact nearest-neighbor index over payloads of type `P`.
///
/// Built once from a corpus and then shared read-only across queries.
/// Rebuilding produces a fresh `VectorIndex` that callers swap in
/// atomically; the index itself never mutates after `build`.
#[derive(Debug)]
pub struct VectorIndex<P> {
    dimensions: usize,
    entries: Vec<Entry<P>>,
}

impl<P> VectorIndex<P> {
    /// Build an index from `(vector, payload)` pairs.
    ///
    /// All vectors must share one dimensionality, fixed by the first
    /// entry. Insertion order is preserved and used for stable tie
    /// breaking in [`search`](Self::search).
    ///
    /// # Errors
    ///
    /// - [`Error::EmptyCorpus`] when `entries` is empty.
    /// - [`Error::DimensionMismatch`] when vectors disagree in length.
    /// - [`Error::InvalidVector`] for empty or non-finite vectors.
    pub fn build(entries: Vec<(Vec<f32>, P)>) -> Result<Self> {
        if entries.is_empty() {
            return Err(Error::EmptyCorpus);
        }

        let dimensions = entries[0].0.len();
        if dimensions == 0 {
            return Err(Error::InvalidVector("zero-length vector".to_string()));
        }

        let mut stored = Vec::with_capacity(entries.len());
        for (vector, payload) in entries {
            if vector.len() != dimensions {
                return Err(Error::DimensionMismatch {
                    expected: dimensions,
                    actual: vector.len(),
                });
            }
            if vector.iter().any(|v| !v.is_finite()) {
                return Err(Error::InvalidVector(
                    "vector contains NaN or infinity".to_string(),
                ));
            }
            stored.push(Entry { vector, payload });
        }

        debug!(count = stored.len(), dimensions, "Built vector index");
        Ok(Self {
            dimensions,
            entries: stored,
        })
    }

    /// Search for the `k` entries most similar to `query`.
    ///
    /// Results are sorted by descending cosine similarity; entries with
    /// equal scores keep their insertion order. At most `k` results are
    /// returned.
    ///
    /// # Errors
    ///
    /// Returns [`Error::DimensionMismatch`] if the query dimensionality
    /// differs from the index.
    pub fn search(&self, query: &[f32], k: usize) -> Result<Vec<(&P, f32)>> {
        if query.len() != self.dimensions {
            return Err(Error::DimensionMismatch {
                expected: self.dimensions,
                actual: query.len(),
            });
        }
        if k == 0 {
            return Ok(Vec::new());
        }

        let mut scored: Vec<(&P, f32)> = self
            .entries
            .iter()
            .map(|entry| (&entry.payload, cosine_similarity(query, &entry.vector)))
            .collect();

        // Stable sort keeps insertion order for equal scores.
        scored.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(std::cmp::Ordering::Equal));
        scored.truncate(k);
        Ok(scored)
    }

    /// Iterate over every stored `(vector, payload)` pair in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&[f32], &P)> {
        self.entries
            .iter()
            .map(|entry| (entry.vector.as_slice(), &entry.payload))
    }

    /// Number of vectors in the index.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the index holds no vectors. Never true for a built index.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Dimensionality shared by every vector in the index.
    pub fn dimensions(&self) -> usize {
        self.dimensions
    }
}

impl<P: Serialize> VectorIndex<P> {
    /// Persist the index to `path` as a versioned JSON envelope.
    ///
    /// The file is written to a sibling temp path first and renamed into
    /// place, so a reader loading concurrently sees either the old index
    /// or the new one, never a partial write.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Io`] if the file cannot be written, or
    /// [`Error::IndexCorrupt`] if serialization fails.
    pub fn save<Q: AsRef<Path>>(&self, path: Q) -> Result<()> {
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }

        let file = IndexFileRef {
            format_version: FORMAT_VERSION,
            dimensions: self.dimensions,
            entries: &self.entries,
        };
        let json = serde_json::to_string(&file)
            .map_err(|e| Error::IndexCorrupt(format!("Failed to serialize index: {}", e)))?;

        let tmp = path.with_extension("json.tmp");
        std::fs::write(&tmp, json)?;
        std::fs::rename(&tmp, path)?;

        info!(path = %path.display(), count = self.entries.len(), "Saved vector index");
        Ok(())
    }
}

/// Borrowing variant of [`IndexFile`] used by `save()` to avoid cloning
/// the entry list.
#[derive(Serialize)]
struct IndexFileRef<'a, P> {
    format_version: u32,
    dimensions: usize,
    entries: &'a [Entry<P>],
}

impl<P: DeserializeOwned> VectorIndex<P> {
    /// Load a previously saved index from `path`.
    ///
    /// # Errors
    ///
    /// - [`Error::IndexNotFound`] when no file exists at `path`.
    /// - [`Error::IndexCorrupt`] when the file cannot be parsed or its
    ///   format version is unsupported.
    pub fn load<Q: AsRef<Path>>(path: Q) -> Result<Self> {
        let path = path.as_ref();
        let json = match std::fs::read_to_string(path) {
            Ok(json) => json,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(Error::IndexNotFound(path.display().to_string()));
            }
            Err(e) => return Err(Error::Io(e)),
        };

        let file: IndexFile<P> = serde_json::from_str(&json)
            .map_err(|e| Error::IndexCorrupt(format!("Failed to parse index file: {}", e)))?;

        if file.format_version != FORMAT_VERSION {
            return Err(Error::IndexCorrupt(format!(
                "Unsupported format version {} (expected {})",
                file.format_version, FORMAT_VERSION
            )));
        }

        info!(path = %path.display(), count = file.entries.len(), "Loaded vector index");
        Ok(Self {
            dimensions: file.dimensions,
            entries: file.entries,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn sample_index() -> VectorIndex<String> {
        VectorIndex::build(vec![
            (vec![1.0, 0.0, 0.0], "x".to_string()),
            (vec![0.0, 1.0, 0.0], "y".to_string()),
            (vec![0.9, 0.1, 0.0], "near-x".to_string()),
        ])
        .unwrap()
    }

    #[test]
    fn test_build_and_search() {
        let index = sample_index();
        let results = index.search(&[1.0, 0.0, 0.0], 10).unwrap();

        assert_eq!(results.len(), 3);
        assert_eq!(results[0].0, "x");
        assert_eq!(results[1].0, "near-x");
        // Sorted by non-increasing similarity
        assert!(results[0].1 >= results[1].1 && results[1].1 >= results[2].1);
    }

    #[test]
    fn test_search_respects_k() {
        let index = sample_index();
        assert_eq!(index.search(&[1.0, 0.0, 0.0], 2).unwrap().len(), 2);
        assert!(index.search(&[1.0, 0.0, 0.0], 0).unwrap().is_empty());
    }

    #[test]
    fn test_ties_keep_insertion_order() {
        let index = VectorIndex::build(vec![
            (vec![1.0, 0.0], "first"),
            (vec![1.0, 0.0], "second"),
            (vec![2.0, 0.0], "third"), // same direction, same cosine score
        ])
        .unwrap();

        let results = index.search(&[1.0, 0.0], 3).unwrap();
        let order: Vec<_> = results.iter().map(|(p, _)| **p).collect();
        assert_eq!(order, vec!["first", "second", "third"]);
    }

    #[test]
    fn test_empty_corpus_rejected() {
        let result = VectorIndex::<String>::build(Vec::new());
        assert!(matches!(result, Err(Error::EmptyCorpus)));
    }

    #[test]
    fn test_dimension_mismatch_on_build() {
        let result = VectorIndex::build(vec![
            (vec![1.0, 0.0], "a".to_string()),
            (vec![1.0, 0.0, 0.0], "b".to_string()),
        ]);
        assert!(matches!(
            result,
            Err(Error::DimensionMismatch {
                expected: 2,
                actual: 3
            })
        ));
    }

    #[test]
    fn test_dimension_mismatch_on_search() {
        let index = sample_index();
        let result = index.search(&[1.0, 0.0], 1);
        assert!(matches!(result, Err(Error::DimensionMismatch { .. })));
    }

    #[test]
    fn test_nan_vector_rejected() {
        let result = VectorIndex::build(vec![(vec![f32::NAN, 0.0], "bad".to_string())]);
        assert!(matches!(result, Err(Error::InvalidVector(_))));
    }

    #[test]
    fn test_save_load_round_trip() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("index.json");

        let index = sample_index();
        index.save(&path).unwrap();

        let loaded: VectorIndex<String> = VectorIndex::load(&path).unwrap();
        assert_eq!(loaded.len(), index.len());
        assert_eq!(loaded.dimensions(), index.dimensions());

        // Every (vector, payload) pair is recoverable, in order.
        for ((v1, p1), (v2, p2)) in index.iter().zip(loaded.iter()) {
            assert_eq!(v1, v2);
            assert_eq!(p1, p2);
        }

        // And ranking is preserved.
        let results = loaded.search(&[1.0, 0.0, 0.0], 1).unwrap();
        assert_eq!(results[0].0, "x");
    }

    #[test]
    fn test_load_missing_file() {
        let temp = TempDir::new().unwrap();
        let result: Result<VectorIndex<String>> =
            VectorIndex::load(temp.path().join("nonexistent.json"));
        assert!(matches!(result, Err(Error::IndexNotFound(_))));
    }

    #[test]
    fn test_load_corrupt_file() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("index.json");
        std::fs::write(&path, "not json at all {{{").unwrap();

        let result: Result<VectorIndex<String>> = VectorIndex::load(&path);
        assert!(matches!(result, Err(Error::IndexCorrupt(_))));
    }

    #[test]
    fn test_load_wrong_format_version() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("index.json");
        std::fs::write(
            &path,
            r#"{"format_version":99,"dimensions":2,"entries":[]}"#,
        )
        .unwrap();

        let result: Result<VectorIndex<String>> = VectorIndex::load(&path);
        assert!(matches!(result, Err(Error::IndexCorrupt(_))));
    }

    #[test]
    fn test_save_creates_parent_dirs() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("nested").join("dir").join("index.json");

        sample_index().save(&path).unwrap();
        assert!(path.exists());
    }
}
