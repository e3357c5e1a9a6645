//! Type-safe model references.

use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display, EnumString};

/// Reference to a completion/chat model.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "provider", content = "model", rename_all = "snake_case")]
pub enum CompletionModel {
    /// OpenAI completion models.
    OpenAi(OpenAiCompletionModel),
    /// Anthropic models.
    Anthropic(AnthropicModel),
}

/// OpenAI completion models.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[derive(AsRefStr, Display, EnumString)]
#[serde(rename_all = "kebab-case")]
#[strum(serialize_all = "kebab-case")]
pub enum OpenAiCompletionModel {
    /// GPT-4o (multimodal flagship)
    #[strum(serialize = "gpt-4o")]
    Gpt4o,
    /// GPT-4o mini (fast, affordable)
    #[strum(serialize = "gpt-4o-mini")]
    Gpt4oMini,
    /// GPT-4 Turbo
    #[strum(serialize = "gpt-4-turbo")]
    Gpt4Turbo,
}

/// Anthropic models.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[derive(AsRefStr, Display, EnumString)]
#[serde(rename_all = "kebab-case")]
#[strum(serialize_all = "kebab-case")]
pub enum AnthropicModel {
    /// Claude Sonnet 4 (balanced)
    #[strum(serialize = "claude-sonnet-4-20250514")]
    ClaudeSonnet4,
    /// Claude Haiku 3.5 (fast)
    #[strum(serialize = "claude-3-5-haiku-20241022")]
    ClaudeHaiku35,
}

impl CompletionModel {
    /// Returns the model identifier string.
    pub fn as_str(&self) -> &str {
        match self {
            Self::OpenAi(m) => m.as_ref(),
            Self::Anthropic(m) => m.as_ref(),
        }
    }
}

/// Reference to an embedding model.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "provider", content = "model", rename_all = "snake_case")]
pub enum EmbeddingModel {
    /// OpenAI embedding models.
    OpenAi(OpenAiEmbeddingModel),
    /// Ollama local models.
    #[cfg(feature = "ollama")]
    Ollama(OllamaEmbeddingModel),
}

/// OpenAI embedding models.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[derive(AsRefStr, Display, EnumString)]
#[serde(rename_all = "kebab-case")]
#[strum(serialize_all = "kebab-case")]
pub enum OpenAiEmbeddingModel {
    /// text-embedding-3-small (1536 dimensions)
    #[strum(serialize = "text-embedding-3-small")]
    TextEmbedding3Small,
    /// text-embedding-3-large (3072 dimensions)
    #[strum(serialize = "text-embedding-3-large")]
    TextEmbedding3Large,
    /// text-embedding-ada-002 (legacy, 1536 dimensions)
    #[strum(serialize = "text-embedding-ada-002")]
    TextEmbeddingAda002,
}

impl OpenAiEmbeddingModel {
    /// Returns the vector dimension the model produces.
    pub fn dimensions(&self) -> usize {
        match self {
            Self::TextEmbedding3Small => 1536,
            Self::TextEmbedding3Large => 3072,
            Self::TextEmbeddingAda002 => 1536,
        }
    }
}

/// Ollama embedding models.
#[cfg(feature = "ollama")]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[derive(AsRefStr, Display, EnumString)]
#[serde(rename_all = "kebab-case")]
#[strum(serialize_all = "kebab-case")]
pub enum OllamaEmbeddingModel {
    /// nomic-embed-text (768 dimensions)
    #[strum(serialize = "nomic-embed-text")]
    NomicEmbedText,
    /// mxbai-embed-large (1024 dimensions)
    #[strum(serialize = "mxbai-embed-large")]
    MxbaiEmbedLarge,
    /// all-minilm (384 dimensions)
    #[strum(serialize = "all-minilm")]
    AllMinilm,
}

#[cfg(feature = "ollama")]
impl OllamaEmbeddingModel {
    /// Returns the vector dimension the model produces.
    pub fn dimensions(&self) -> usize {
        match self {
            Self::NomicEmbedText => 768,
            Self::MxbaiEmbedLarge => 1024,
            Self::AllMinilm => 384,
        }
    }
}

impl EmbeddingModel {
    /// Returns the model identifier string.
    pub fn as_str(&self) -> &str {
        match self {
            Self::OpenAi(m) => m.as_ref(),
            #[cfg(feature = "ollama")]
            Self::Ollama(m) => m.as_ref(),
        }
    }

    /// Returns the vector dimension the model produces.
    pub fn dimensions(&self) -> usize {
        match self {
            Self::OpenAi(m) => m.dimensions(),
            #[cfg(feature = "ollama")]
            Self::Ollama(m) => m.dimensions(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn model_identifiers_match_provider_names() {
        assert_eq!(OpenAiCompletionModel::Gpt4o.as_ref(), "gpt-4o");
        assert_eq!(
            EmbeddingModel::OpenAi(OpenAiEmbeddingModel::TextEmbedding3Small).as_str(),
            "text-embedding-3-small"
        );
    }

    #[test]
    fn embedding_dimensions_are_known() {
        assert_eq!(OpenAiEmbeddingModel::TextEmbedding3Large.dimensions(), 3072);
        assert_eq!(OpenAiEmbeddingModel::TextEmbeddingAda002.dimensions(), 1536);
    }
}
