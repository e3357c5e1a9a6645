//! RAG pipeline configuration.

/// Configuration for the retrieval side of the pipeline.
#[derive(Debug, Clone)]
pub struct RagConfig {
    /// Maximum chunk size in characters for text splitting.
    pub max_chunk_characters: u32,

    /// Number of characters to overlap between chunks.
    pub chunk_overlap_characters: u32,

    /// Whether to trim whitespace from chunks.
    pub trim_chunks: bool,

    /// Maximum chunks to retrieve per question.
    pub max_results: u32,

    /// Minimum similarity score (0.0 to 1.0). If `None`, no filtering is applied.
    pub min_score: Option<f64>,

    /// Token budget for the assembled context.
    pub max_context_tokens: u32,
}

impl Default for RagConfig {
    fn default() -> Self {
        Self {
            max_chunk_characters: 1000,
            chunk_overlap_characters: 100,
            trim_chunks: true,
            max_results: 2,
            min_score: None,
            max_context_tokens: 3000,
        }
    }
}

impl RagConfig {
    /// Validates the configuration.
    pub fn validate(&self) -> crate::Result<()> {
        if self.max_chunk_characters == 0 {
            return Err(crate::Error::config("max_chunk_characters must be positive"));
        }
        if self.chunk_overlap_characters >= self.max_chunk_characters {
            return Err(crate::Error::config(
                "chunk_overlap_characters must be smaller than max_chunk_characters",
            ));
        }
        if self.max_results == 0 {
            return Err(crate::Error::config("max_results must be positive"));
        }
        if self.max_context_tokens == 0 {
            return Err(crate::Error::config("max_context_tokens must be positive"));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        RagConfig::default().validate().unwrap();
    }

    #[test]
    fn overlap_must_stay_below_chunk_size() {
        let config = RagConfig {
            max_chunk_characters: 100,
            chunk_overlap_characters: 100,
            ..RagConfig::default()
        };
        assert!(config.validate().is_err());
    }
}
