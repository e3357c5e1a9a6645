//! AI provider configuration and service construction.

use std::sync::Arc;

use anyhow::Context;
use clap::Args;
use docqa_rag::generator::CompletionSource;
use docqa_rag::provider::{CompletionProvider, EmbeddingProvider};
use docqa_rag::{ContinuationPolicy, GeneratorConfig, RagConfig, RagService};
use serde::{Deserialize, Serialize};

use crate::TRACING_TARGET_CONFIG;

/// AI provider and pipeline configuration.
///
/// Provider selection is driven by which API keys are present: OpenAI when
/// `OPENAI_API_KEY` is set, otherwise the local Ollama server. Anthropic
/// can serve completions when only `ANTHROPIC_API_KEY` is set, with
/// embeddings falling back to Ollama.
#[derive(Debug, Clone, Args, Serialize, Deserialize)]
#[must_use = "config does nothing unless you use it"]
pub struct ProviderConfig {
    /// OpenAI API key (enables OpenAI completion and embeddings).
    #[arg(long, env = "OPENAI_API_KEY", hide_env_values = true)]
    #[serde(skip_serializing)]
    pub openai_api_key: Option<String>,

    /// Anthropic API key (enables Anthropic completion).
    #[arg(long, env = "ANTHROPIC_API_KEY", hide_env_values = true)]
    #[serde(skip_serializing)]
    pub anthropic_api_key: Option<String>,

    /// Completion model identifier.
    #[arg(long, env = "COMPLETION_MODEL", default_value = "gpt-4o")]
    pub completion_model: String,

    /// Embedding model identifier.
    #[arg(long, env = "EMBEDDING_MODEL", default_value = "text-embedding-3-small")]
    pub embedding_model: String,

    /// Embedding vector dimensions.
    #[arg(long, env = "EMBEDDING_DIMENSIONS", default_value_t = 1536)]
    pub embedding_dimensions: usize,

    /// Base URL of the local Ollama server.
    #[cfg(feature = "ollama")]
    #[arg(long, env = "OLLAMA_URL", default_value = "http://localhost:11434")]
    pub ollama_url: String,

    /// Ollama completion model.
    #[cfg(feature = "ollama")]
    #[arg(long, env = "OLLAMA_COMPLETION_MODEL", default_value = "llama3.2")]
    pub ollama_completion_model: String,

    /// Ollama embedding model.
    #[cfg(feature = "ollama")]
    #[arg(long, env = "OLLAMA_EMBEDDING_MODEL", default_value = "nomic-embed-text")]
    pub ollama_embedding_model: String,

    /// Ollama embedding vector dimensions.
    #[cfg(feature = "ollama")]
    #[arg(long, env = "OLLAMA_EMBEDDING_DIMENSIONS", default_value_t = 768)]
    pub ollama_embedding_dimensions: usize,

    /// Maximum chunk size in characters for text splitting.
    #[arg(long, env = "CHUNK_SIZE", default_value_t = 1000)]
    pub chunk_size: u32,

    /// Characters of overlap between consecutive chunks.
    #[arg(long, env = "CHUNK_OVERLAP", default_value_t = 100)]
    pub chunk_overlap: u32,

    /// Number of chunks to retrieve per question.
    #[arg(long, env = "TOP_K", default_value_t = 2)]
    pub top_k: u32,

    /// Minimum similarity score for retrieved chunks.
    #[arg(long, env = "MIN_SCORE")]
    pub min_score: Option<f64>,

    /// Token budget for the assembled context.
    #[arg(long, env = "MAX_CONTEXT_TOKENS", default_value_t = 3000)]
    pub max_context_tokens: u32,

    /// Output token cap for the first completion round.
    #[arg(long, env = "MAX_OUTPUT_TOKENS", default_value_t = 1500)]
    pub max_output_tokens: u64,

    /// Output token cap for each continuation round.
    #[arg(long, env = "CONTINUATION_OUTPUT_TOKENS", default_value_t = 1000)]
    pub continuation_output_tokens: u64,

    /// Sampling temperature.
    #[arg(long, env = "TEMPERATURE", default_value_t = 0.85)]
    pub temperature: f64,

    /// Hard ceiling on continuation rounds.
    #[arg(long, env = "MAX_CONTINUATIONS", default_value_t = 5)]
    pub max_continuations: u32,

    /// Disable multi-turn continuation and return the first reply as-is.
    #[arg(long, env = "SINGLE_SHOT", default_value_t = false)]
    pub single_shot: bool,
}

impl ProviderConfig {
    /// Builds the question answering service from this configuration.
    pub fn create_rag_service(&self) -> anyhow::Result<RagService> {
        let embedding = self.embedding_provider()?;
        let completion = self.completion_source()?;

        RagService::new(
            embedding,
            completion,
            self.rag_config(),
            self.generator_config(),
        )
        .context("failed to create RAG service")
    }

    /// Returns the retrieval-side configuration.
    pub fn rag_config(&self) -> RagConfig {
        RagConfig {
            max_chunk_characters: self.chunk_size,
            chunk_overlap_characters: self.chunk_overlap,
            trim_chunks: true,
            max_results: self.top_k,
            min_score: self.min_score,
            max_context_tokens: self.max_context_tokens,
        }
    }

    /// Returns the generation-side configuration.
    pub fn generator_config(&self) -> GeneratorConfig {
        let continuation = if self.single_shot {
            ContinuationPolicy::SingleShot
        } else {
            ContinuationPolicy::MultiTurn {
                max_rounds: self.max_continuations,
            }
        };

        GeneratorConfig {
            max_output_tokens: self.max_output_tokens,
            continuation_output_tokens: self.continuation_output_tokens,
            temperature: self.temperature,
            continuation,
            ..GeneratorConfig::default()
        }
    }

    /// Selects the completion provider based on available keys.
    fn completion_source(&self) -> anyhow::Result<Arc<dyn CompletionSource>> {
        if let Some(api_key) = &self.openai_api_key {
            let provider = CompletionProvider::openai(api_key, &self.completion_model)
                .context("failed to create OpenAI completion provider")?;
            Self::log_provider("openai", &self.completion_model);
            return Ok(Arc::new(provider));
        }

        if let Some(api_key) = &self.anthropic_api_key {
            let provider = CompletionProvider::anthropic(api_key, &self.completion_model)
                .context("failed to create Anthropic completion provider")?;
            Self::log_provider("anthropic", &self.completion_model);
            return Ok(Arc::new(provider));
        }

        #[cfg(feature = "ollama")]
        {
            let provider =
                CompletionProvider::ollama(&self.ollama_url, &self.ollama_completion_model)
                    .context("failed to create Ollama completion provider")?;
            Self::log_provider("ollama", &self.ollama_completion_model);
            return Ok(Arc::new(provider));
        }

        #[cfg(not(feature = "ollama"))]
        anyhow::bail!("no completion provider configured: set OPENAI_API_KEY or ANTHROPIC_API_KEY")
    }

    /// Selects the embedding provider based on available keys.
    fn embedding_provider(&self) -> anyhow::Result<EmbeddingProvider> {
        if let Some(api_key) = &self.openai_api_key {
            return EmbeddingProvider::openai(
                api_key,
                &self.embedding_model,
                self.embedding_dimensions,
            )
            .context("failed to create OpenAI embedding provider");
        }

        #[cfg(feature = "ollama")]
        {
            return EmbeddingProvider::ollama(
                &self.ollama_url,
                &self.ollama_embedding_model,
                self.ollama_embedding_dimensions,
            )
            .context("failed to create Ollama embedding provider");
        }

        #[cfg(not(feature = "ollama"))]
        anyhow::bail!("no embedding provider configured: set OPENAI_API_KEY")
    }

    fn log_provider(provider: &str, model: &str) {
        tracing::info!(
            target: TRACING_TARGET_CONFIG,
            provider,
            model,
            "completion provider selected"
        );
    }
}
