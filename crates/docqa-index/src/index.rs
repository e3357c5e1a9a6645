//! Vector index over embedded chunks.

use std::collections::HashMap;
use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::TRACING_TARGET;
use crate::error::{IndexError, IndexResult};

/// An embedded chunk stored in the index.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VectorEntry {
    /// Unique identifier for the entry.
    pub id: String,
    /// The embedding vector.
    pub vector: Vec<f32>,
    /// The chunk text the vector was computed from.
    pub text: String,
    /// Optional metadata.
    #[serde(default, skip_serializing_if = "HashMap::is_empty")]
    pub metadata: HashMap<String, serde_json::Value>,
}

impl VectorEntry {
    /// Creates a new entry with an ID, embedding, and text.
    pub fn new(id: impl Into<String>, vector: Vec<f32>, text: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            vector,
            text: text.into(),
            metadata: HashMap::new(),
        }
    }

    /// Adds a single metadata field.
    pub fn with_field(mut self, key: impl Into<String>, value: serde_json::Value) -> Self {
        self.metadata.insert(key.into(), value);
        self
    }
}

/// Search result from a vector query.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScoredEntry {
    /// Entry ID.
    pub id: String,
    /// Cosine similarity score, higher is more similar.
    pub score: f32,
    /// The chunk text.
    pub text: String,
    /// Associated metadata.
    #[serde(default, skip_serializing_if = "HashMap::is_empty")]
    pub metadata: HashMap<String, serde_json::Value>,
}

/// In-process vector index supporting cosine nearest-neighbor queries.
///
/// Entries are scanned exhaustively on search; chunk counts for a single
/// document are small enough that an approximate structure would buy
/// nothing. The index is append-only while building and read-only during
/// retrieval.
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct VectorIndex {
    dimensions: usize,
    entries: Vec<VectorEntry>,
}

impl VectorIndex {
    /// Creates an empty index for vectors of the given dimension.
    pub fn new(dimensions: usize) -> Self {
        Self {
            dimensions,
            entries: Vec::new(),
        }
    }

    /// Returns the vector dimension.
    pub fn dimensions(&self) -> usize {
        self.dimensions
    }

    /// Returns the number of entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns whether the index is empty.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Inserts an entry into the index.
    pub fn insert(&mut self, entry: VectorEntry) -> IndexResult<()> {
        if entry.vector.len() != self.dimensions {
            return Err(IndexError::dimension_mismatch(
                self.dimensions,
                entry.vector.len(),
            ));
        }
        self.entries.push(entry);
        Ok(())
    }

    /// Searches for the `limit` entries most similar to `query`.
    ///
    /// Results are ordered by descending cosine similarity.
    pub fn search(&self, query: &[f32], limit: usize) -> IndexResult<Vec<ScoredEntry>> {
        if query.len() != self.dimensions {
            return Err(IndexError::dimension_mismatch(self.dimensions, query.len()));
        }

        let mut scored: Vec<ScoredEntry> = self
            .entries
            .iter()
            .map(|entry| ScoredEntry {
                id: entry.id.clone(),
                score: cosine_similarity(query, &entry.vector),
                text: entry.text.clone(),
                metadata: entry.metadata.clone(),
            })
            .collect();

        scored.sort_by(|a, b| b.score.total_cmp(&a.score));
        scored.truncate(limit);

        tracing::debug!(
            target: TRACING_TARGET,
            candidates = self.entries.len(),
            returned = scored.len(),
            "vector search complete"
        );

        Ok(scored)
    }

    /// Persists the index to a JSON file.
    pub fn save(&self, path: impl AsRef<Path>) -> IndexResult<()> {
        let file = File::create(path.as_ref())?;
        serde_json::to_writer(BufWriter::new(file), self)?;

        tracing::debug!(
            target: TRACING_TARGET,
            path = %path.as_ref().display(),
            entries = self.entries.len(),
            "index saved"
        );

        Ok(())
    }

    /// Loads an index from a JSON file.
    pub fn load(path: impl AsRef<Path>) -> IndexResult<Self> {
        let file = File::open(path.as_ref())?;
        let index: Self = serde_json::from_reader(BufReader::new(file))?;

        tracing::debug!(
            target: TRACING_TARGET,
            path = %path.as_ref().display(),
            entries = index.entries.len(),
            "index loaded"
        );

        Ok(index)
    }
}

/// Cosine similarity between two vectors of equal length.
fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    let dot: f32 = a.iter().zip(b.iter()).map(|(x, y)| x * y).sum();
    let norm_a: f32 = a.iter().map(|x| x * x).sum::<f32>().sqrt();
    let norm_b: f32 = b.iter().map(|x| x * x).sum::<f32>().sqrt();

    if norm_a == 0.0 || norm_b == 0.0 {
        0.0
    } else {
        dot / (norm_a * norm_b)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(id: &str, vector: Vec<f32>) -> VectorEntry {
        VectorEntry::new(id, vector, format!("text for {id}"))
    }

    #[test]
    fn search_orders_by_similarity() {
        let mut index = VectorIndex::new(2);
        index.insert(entry("east", vec![1.0, 0.0])).unwrap();
        index.insert(entry("north", vec![0.0, 1.0])).unwrap();
        index.insert(entry("northeast", vec![1.0, 1.0])).unwrap();

        let results = index.search(&[1.0, 0.0], 3).unwrap();
        assert_eq!(results.len(), 3);
        assert_eq!(results[0].id, "east");
        assert_eq!(results[1].id, "northeast");
        assert_eq!(results[2].id, "north");
        assert!(results[0].score > results[1].score);
        assert!(results[1].score > results[2].score);
    }

    #[test]
    fn search_truncates_to_limit() {
        let mut index = VectorIndex::new(2);
        for i in 0..5 {
            index
                .insert(entry(&format!("e{i}"), vec![1.0, i as f32]))
                .unwrap();
        }

        let results = index.search(&[1.0, 0.0], 2).unwrap();
        assert_eq!(results.len(), 2);
    }

    #[test]
    fn dimension_mismatch_is_rejected() {
        let mut index = VectorIndex::new(3);
        let err = index.insert(entry("bad", vec![1.0])).unwrap_err();
        assert!(matches!(err, IndexError::DimensionMismatch { .. }));

        let err = index.search(&[1.0], 1).unwrap_err();
        assert!(matches!(err, IndexError::DimensionMismatch { .. }));
    }

    #[test]
    fn zero_vector_scores_zero() {
        let mut index = VectorIndex::new(2);
        index.insert(entry("zero", vec![0.0, 0.0])).unwrap();

        let results = index.search(&[1.0, 0.0], 1).unwrap();
        assert_eq!(results[0].score, 0.0);
    }

    #[test]
    fn save_and_load_round_trip() {
        let mut index = VectorIndex::new(2);
        index
            .insert(entry("a", vec![0.5, 0.5]).with_field("page", serde_json::json!(1)))
            .unwrap();

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("index.json");
        index.save(&path).unwrap();

        let loaded = VectorIndex::load(&path).unwrap();
        assert_eq!(loaded.dimensions(), 2);
        assert_eq!(loaded.len(), 1);

        let results = loaded.search(&[0.5, 0.5], 1).unwrap();
        assert_eq!(results[0].id, "a");
        assert_eq!(results[0].metadata["page"], serde_json::json!(1));
    }

    #[test]
    fn load_rejects_corrupt_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("index.json");
        std::fs::write(&path, "not json").unwrap();

        let err = VectorIndex::load(&path).unwrap_err();
        assert!(matches!(err, IndexError::Corrupt(_)));
    }
}
