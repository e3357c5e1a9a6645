//! Semantic retrieval over an indexed document.

use docqa_index::VectorIndex;
use serde::{Deserialize, Serialize};

use crate::provider::EmbeddingProvider;
use crate::{Error, Result, TRACING_TARGET};

/// A retrieved chunk with its similarity score.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RetrievedChunk {
    /// Entry ID within the index.
    pub id: String,
    /// Similarity score, higher is more similar.
    pub score: f32,
    /// The chunk text.
    pub text: String,
}

/// Retrieves the chunks most relevant to a question.
///
/// The index is an opaque ranked source here: the retriever embeds the
/// question, queries, and optionally filters by a minimum score. It never
/// assumes how many results come back.
pub struct Retriever {
    provider: EmbeddingProvider,
    min_score: Option<f64>,
}

impl Retriever {
    /// Creates a new retriever over the given embedding provider.
    pub fn new(provider: EmbeddingProvider) -> Self {
        Self {
            provider,
            min_score: None,
        }
    }

    /// Sets the minimum similarity score threshold.
    pub fn with_min_score(mut self, min_score: f64) -> Self {
        self.min_score = Some(min_score);
        self
    }

    /// Returns up to `limit` chunks ranked by descending similarity.
    pub async fn retrieve(
        &self,
        index: &VectorIndex,
        question: &str,
        limit: u32,
    ) -> Result<Vec<RetrievedChunk>> {
        if index.is_empty() {
            return Ok(Vec::new());
        }

        let query = self
            .provider
            .embed_text(question)
            .await
            .map_err(|e| Error::embedding(format!("failed to embed question: {e}")))?;

        let scored = index
            .search(&query, limit as usize)
            .map_err(|e| Error::retrieval(format!("vector search failed: {e}")))?;

        let min_score = self.min_score.unwrap_or(f64::MIN);
        let chunks: Vec<RetrievedChunk> = scored
            .into_iter()
            .filter(|entry| f64::from(entry.score) >= min_score)
            .map(|entry| RetrievedChunk {
                id: entry.id,
                score: entry.score,
                text: entry.text,
            })
            .collect();

        tracing::debug!(
            target: TRACING_TARGET,
            returned = chunks.len(),
            limit,
            top_score = chunks.first().map(|c| c.score),
            "retrieval complete"
        );

        Ok(chunks)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::indexer::Indexer;
    use crate::splitter::Splitter;

    async fn indexed_document() -> VectorIndex {
        let text = "The sky is blue.\n\nBananas are yellow fruit.\n\nRust compiles to native code.";
        let chunks = Splitter::new(60, 0, true).split_owned(text);
        Indexer::new(EmbeddingProvider::mock(64))
            .index(chunks)
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn most_relevant_chunk_ranks_first() {
        let index = indexed_document().await;
        let retriever = Retriever::new(EmbeddingProvider::mock(64));

        let chunks = retriever
            .retrieve(&index, "What color is the sky?", 3)
            .await
            .unwrap();

        assert!(!chunks.is_empty());
        assert!(chunks[0].text.contains("sky"));

        for pair in chunks.windows(2) {
            assert!(pair[0].score >= pair[1].score);
        }
    }

    #[tokio::test]
    async fn limit_caps_results() {
        let index = indexed_document().await;
        let retriever = Retriever::new(EmbeddingProvider::mock(64));

        let chunks = retriever.retrieve(&index, "sky", 1).await.unwrap();
        assert_eq!(chunks.len(), 1);
    }

    #[tokio::test]
    async fn empty_index_returns_nothing() {
        let index = VectorIndex::new(64);
        let retriever = Retriever::new(EmbeddingProvider::mock(64));

        let chunks = retriever.retrieve(&index, "anything", 5).await.unwrap();
        assert!(chunks.is_empty());
    }

    #[tokio::test]
    async fn min_score_filters_weak_matches() {
        let index = indexed_document().await;
        let retriever = Retriever::new(EmbeddingProvider::mock(64)).with_min_score(0.99);

        let chunks = retriever
            .retrieve(&index, "completely unrelated astrophysics jargon", 5)
            .await
            .unwrap();
        assert!(chunks.is_empty());
    }
}
