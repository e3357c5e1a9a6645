//! Shared credential types for AI providers.

use serde::{Deserialize, Serialize};
use strum::IntoStaticStr;

/// API key credentials for AI providers.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiKeyCredentials {
    /// API key.
    pub api_key: String,
}

impl ApiKeyCredentials {
    /// Creates credentials from an API key.
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
        }
    }
}

/// Unified credentials for all AI providers.
///
/// The same credentials can be used for both completion and embedding
/// operations, depending on the provider's capabilities.
#[derive(Debug, Clone, Serialize, Deserialize, IntoStaticStr)]
#[serde(tag = "provider", rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum Credentials {
    /// OpenAI credentials (supports completion and embedding).
    OpenAi(ApiKeyCredentials),
    /// Anthropic credentials (completion only).
    Anthropic(ApiKeyCredentials),
    /// Ollama runs locally and needs no key, only a base URL.
    #[cfg(feature = "ollama")]
    Ollama {
        /// Base URL of the local Ollama server.
        base_url: String,
    },
}

impl Credentials {
    /// Returns the provider name as a string.
    pub fn provider(&self) -> &'static str {
        self.into()
    }

    /// Returns true if this provider supports embedding.
    pub fn supports_embedding(&self) -> bool {
        match self {
            Self::OpenAi(_) => true,
            Self::Anthropic(_) => false,
            #[cfg(feature = "ollama")]
            Self::Ollama { .. } => true,
        }
    }

    /// Validates that credentials support embedding, returning an error if not.
    pub fn require_embedding_support(&self) -> crate::Result<()> {
        if self.supports_embedding() {
            Ok(())
        } else {
            Err(crate::Error::config(format!(
                "{} does not support embeddings",
                self.provider()
            )))
        }
    }
}
