//! Embedding provider abstraction.

use std::sync::Arc;

use rig::embeddings::EmbeddingModel as RigEmbeddingModel;
use rig::prelude::EmbeddingsClient;
use rig::providers::openai;
#[cfg(feature = "ollama")]
use rig::providers::ollama;

use super::credentials::Credentials;
use super::model::EmbeddingModel;
use crate::{Error, Result};

/// Embedding provider that wraps different rig embedding model implementations.
///
/// This is a cheaply cloneable wrapper around an `Arc<EmbeddingService>`.
#[derive(Clone)]
pub struct EmbeddingProvider(Arc<EmbeddingService>);

pub(crate) enum EmbeddingService {
    OpenAi {
        model: openai::EmbeddingModel,
        model_name: String,
        ndims: usize,
    },
    #[cfg(feature = "ollama")]
    Ollama {
        client: ollama::Client,
        model_name: String,
        ndims: usize,
    },
    #[cfg(any(test, feature = "mock"))]
    Mock { ndims: usize },
}

impl EmbeddingProvider {
    /// Connects to the provider selected by the credentials.
    pub fn connect(model: EmbeddingModel, credentials: Credentials) -> Result<Self> {
        credentials.require_embedding_support()?;

        match (credentials, model) {
            (Credentials::OpenAi(c), EmbeddingModel::OpenAi(m)) => {
                Self::openai(&c.api_key, m.as_ref(), m.dimensions())
            }
            #[cfg(feature = "ollama")]
            (Credentials::Ollama { base_url }, EmbeddingModel::Ollama(m)) => {
                Self::ollama(&base_url, m.as_ref(), m.dimensions())
            }
            #[allow(unreachable_patterns)]
            _ => Err(Error::config("mismatched credentials and model provider")),
        }
    }

    /// Creates an OpenAI embedding provider.
    pub fn openai(api_key: &str, model_name: &str, ndims: usize) -> Result<Self> {
        let client = openai::Client::new(api_key)
            .map_err(|e| Error::provider("openai", e.to_string()))?;
        Ok(Self(Arc::new(EmbeddingService::OpenAi {
            model: client.embedding_model_with_ndims(model_name, ndims),
            model_name: model_name.to_string(),
            ndims,
        })))
    }

    /// Creates an Ollama embedding provider pointed at a local server.
    #[cfg(feature = "ollama")]
    pub fn ollama(base_url: &str, model_name: &str, ndims: usize) -> Result<Self> {
        let client = ollama::Client::builder()
            .api_key(rig::client::Nothing)
            .base_url(base_url)
            .build()
            .map_err(|e| Error::provider("ollama", e.to_string()))?;
        Ok(Self(Arc::new(EmbeddingService::Ollama {
            client,
            model_name: model_name.to_string(),
            ndims,
        })))
    }

    /// Creates a deterministic mock provider for tests.
    #[cfg(any(test, feature = "mock"))]
    pub fn mock(ndims: usize) -> Self {
        Self(Arc::new(EmbeddingService::Mock { ndims }))
    }

    /// Returns the model name.
    pub fn model_name(&self) -> &str {
        match self.0.as_ref() {
            EmbeddingService::OpenAi { model_name, .. } => model_name,
            #[cfg(feature = "ollama")]
            EmbeddingService::Ollama { model_name, .. } => model_name,
            #[cfg(any(test, feature = "mock"))]
            EmbeddingService::Mock { .. } => "mock",
        }
    }

    /// Returns the provider name.
    pub fn provider_name(&self) -> &'static str {
        match self.0.as_ref() {
            EmbeddingService::OpenAi { .. } => "openai",
            #[cfg(feature = "ollama")]
            EmbeddingService::Ollama { .. } => "ollama",
            #[cfg(any(test, feature = "mock"))]
            EmbeddingService::Mock { .. } => "mock",
        }
    }

    /// Returns the number of dimensions of produced vectors.
    pub fn ndims(&self) -> usize {
        match self.0.as_ref() {
            EmbeddingService::OpenAi { ndims, .. } => *ndims,
            #[cfg(feature = "ollama")]
            EmbeddingService::Ollama { ndims, .. } => *ndims,
            #[cfg(any(test, feature = "mock"))]
            EmbeddingService::Mock { ndims } => *ndims,
        }
    }

    /// Embeds a single text document.
    pub async fn embed_text(&self, text: &str) -> Result<Vec<f32>> {
        let mut embeddings = self.embed_texts(vec![text.to_string()]).await?;
        embeddings
            .pop()
            .ok_or_else(|| Error::embedding("provider returned no embedding"))
    }

    /// Embeds multiple text documents in one batch request.
    pub async fn embed_texts(&self, texts: Vec<String>) -> Result<Vec<Vec<f32>>> {
        if texts.is_empty() {
            return Ok(Vec::new());
        }

        let embeddings = match self.0.as_ref() {
            EmbeddingService::OpenAi { model, .. } => model
                .embed_texts(texts)
                .await
                .map_err(|e| Error::provider("openai", e.to_string()))?,
            #[cfg(feature = "ollama")]
            EmbeddingService::Ollama {
                client,
                model_name,
                ndims,
            } => {
                let model = ollama::EmbeddingModel::new(client.clone(), model_name, *ndims);
                model
                    .embed_texts(texts)
                    .await
                    .map_err(|e| Error::provider("ollama", e.to_string()))?
            }
            #[cfg(any(test, feature = "mock"))]
            EmbeddingService::Mock { ndims } => {
                return Ok(texts
                    .iter()
                    .map(|t| crate::mock::deterministic_embedding(t, *ndims))
                    .collect());
            }
        };

        Ok(embeddings
            .into_iter()
            .map(|e| e.vec.into_iter().map(|x| x as f32).collect())
            .collect())
    }
}

impl std::fmt::Debug for EmbeddingProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EmbeddingProvider")
            .field("provider", &self.provider_name())
            .field("model", &self.model_name())
            .field("ndims", &self.ndims())
            .finish()
    }
}
