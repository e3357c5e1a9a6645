//! Chunk embedding and index construction.

use docqa_index::{VectorEntry, VectorIndex};

use crate::provider::EmbeddingProvider;
use crate::splitter::OwnedSplitChunk;
use crate::{Error, Result, TRACING_TARGET};

/// Builds a vector index from document chunks.
///
/// Embedding happens in one batched request per document; the embedding
/// count is validated against the chunk count before anything is inserted.
pub struct Indexer {
    provider: EmbeddingProvider,
}

impl Indexer {
    /// Creates a new indexer over the given embedding provider.
    pub fn new(provider: EmbeddingProvider) -> Self {
        Self { provider }
    }

    /// Returns the embedding provider.
    pub fn provider(&self) -> &EmbeddingProvider {
        &self.provider
    }

    /// Embeds the chunks and builds a searchable index over them.
    pub async fn index(&self, chunks: Vec<OwnedSplitChunk>) -> Result<VectorIndex> {
        let mut index = VectorIndex::new(self.provider.ndims());

        if chunks.is_empty() {
            return Ok(index);
        }

        let texts: Vec<String> = chunks.iter().map(|c| c.text.clone()).collect();

        let embeddings = self
            .provider
            .embed_texts(texts)
            .await
            .map_err(|e| Error::embedding(format!("failed to embed chunks: {e}")))?;

        if embeddings.len() != chunks.len() {
            return Err(Error::embedding(format!(
                "embedding count mismatch: expected {}, got {}",
                chunks.len(),
                embeddings.len()
            )));
        }

        for (chunk, vector) in chunks.iter().zip(embeddings) {
            let mut entry = VectorEntry::new(
                format!("chunk-{}", chunk.metadata.chunk_index),
                vector,
                chunk.text.clone(),
            )
            .with_field(
                "chunk_index",
                serde_json::json!(chunk.metadata.chunk_index),
            )
            .with_field(
                "start_offset",
                serde_json::json!(chunk.metadata.start_offset),
            )
            .with_field("end_offset", serde_json::json!(chunk.metadata.end_offset));

            if let Some(page) = chunk.metadata.page {
                entry = entry.with_field("page", serde_json::json!(page));
            }

            index.insert(entry)?;
        }

        tracing::debug!(
            target: TRACING_TARGET,
            chunks = index.len(),
            model = %self.provider.model_name(),
            "index built"
        );

        Ok(index)
    }
}
