//! Completion provider abstraction.

use std::sync::Arc;

use docqa_core::token::count_tokens;
use rig::completion::{AssistantContent, CompletionError, CompletionModel as RigCompletionModel};
use rig::one_or_many::OneOrMany;
use rig::prelude::CompletionClient;
use rig::providers::{anthropic, openai};
#[cfg(feature = "ollama")]
use rig::providers::ollama;

use super::credentials::Credentials;
use super::model::CompletionModel;
use crate::generator::{Completion, CompletionRequest, CompletionSource, FinishReason};
use crate::{Error, Result, TRACING_TARGET};

/// Completion provider that wraps different rig completion model implementations.
///
/// This is a cheaply cloneable wrapper around an `Arc<CompletionService>`.
#[derive(Clone)]
pub struct CompletionProvider(Arc<CompletionService>);

pub(crate) enum CompletionService {
    OpenAi {
        model: openai::CompletionModel,
        model_name: String,
    },
    Anthropic {
        model: anthropic::completion::CompletionModel,
        model_name: String,
    },
    #[cfg(feature = "ollama")]
    Ollama {
        client: ollama::Client,
        model_name: String,
    },
}

impl CompletionProvider {
    /// Connects to the provider selected by the credentials.
    pub fn connect(model: CompletionModel, credentials: Credentials) -> Result<Self> {
        match (credentials, model) {
            (Credentials::OpenAi(c), CompletionModel::OpenAi(m)) => Self::openai(&c.api_key, m.as_ref()),
            (Credentials::Anthropic(c), CompletionModel::Anthropic(m)) => {
                Self::anthropic(&c.api_key, m.as_ref())
            }
            #[allow(unreachable_patterns)]
            _ => Err(Error::config("mismatched credentials and model provider")),
        }
    }

    /// Creates an OpenAI completion provider.
    pub fn openai(api_key: &str, model_name: &str) -> Result<Self> {
        let client = openai::Client::new(api_key)
            .map_err(|e| Error::provider("openai", e.to_string()))?
            .completions_api();
        Ok(Self(Arc::new(CompletionService::OpenAi {
            model: client.completion_model(model_name),
            model_name: model_name.to_string(),
        })))
    }

    /// Creates an Anthropic completion provider.
    pub fn anthropic(api_key: &str, model_name: &str) -> Result<Self> {
        let client = anthropic::Client::new(api_key)
            .map_err(|e| Error::provider("anthropic", e.to_string()))?;
        Ok(Self(Arc::new(CompletionService::Anthropic {
            model: client.completion_model(model_name),
            model_name: model_name.to_string(),
        })))
    }

    /// Creates an Ollama completion provider pointed at a local server.
    #[cfg(feature = "ollama")]
    pub fn ollama(base_url: &str, model_name: &str) -> Result<Self> {
        let client = ollama::Client::builder()
            .api_key(rig::client::Nothing)
            .base_url(base_url)
            .build()
            .map_err(|e| Error::provider("ollama", e.to_string()))?;
        Ok(Self(Arc::new(CompletionService::Ollama {
            client,
            model_name: model_name.to_string(),
        })))
    }

    /// Returns the model name.
    pub fn model_name(&self) -> &str {
        match self.0.as_ref() {
            CompletionService::OpenAi { model_name, .. } => model_name,
            CompletionService::Anthropic { model_name, .. } => model_name,
            #[cfg(feature = "ollama")]
            CompletionService::Ollama { model_name, .. } => model_name,
        }
    }

    /// Returns the provider name.
    pub fn provider_name(&self) -> &'static str {
        match self.0.as_ref() {
            CompletionService::OpenAi { .. } => "openai",
            CompletionService::Anthropic { .. } => "anthropic",
            #[cfg(feature = "ollama")]
            CompletionService::Ollama { .. } => "ollama",
        }
    }

    /// Sends one completion round to the underlying model.
    async fn send(&self, request: &CompletionRequest) -> Result<String> {
        let provider = self.provider_name();
        let map_err =
            |e: CompletionError| Error::provider(provider, e.to_string());

        let choice = match self.0.as_ref() {
            CompletionService::OpenAi { model, .. } => model
                .completion_request(request.prompt.as_str())
                .preamble(request.system.clone())
                .temperature(request.temperature)
                .max_tokens(request.max_tokens)
                .send()
                .await
                .map(|r| r.choice)
                .map_err(map_err)?,
            CompletionService::Anthropic { model, .. } => model
                .completion_request(request.prompt.as_str())
                .preamble(request.system.clone())
                .temperature(request.temperature)
                .max_tokens(request.max_tokens)
                .send()
                .await
                .map(|r| r.choice)
                .map_err(map_err)?,
            #[cfg(feature = "ollama")]
            CompletionService::Ollama { client, model_name } => {
                let model = client.completion_model(model_name);
                model
                    .completion_request(request.prompt.as_str())
                    .preamble(request.system.clone())
                    .temperature(request.temperature)
                    .max_tokens(request.max_tokens)
                    .send()
                    .await
                    .map(|r| r.choice)
                    .map_err(map_err)?
            }
        };

        Ok(extract_text_content(&choice))
    }
}

#[async_trait::async_trait]
impl CompletionSource for CompletionProvider {
    async fn complete(&self, request: CompletionRequest) -> Result<Completion> {
        let text = self.send(&request).await?;

        // rig's unified response omits finish_reason across providers, so
        // truncation is inferred: a reply that spends the whole output
        // budget is treated as cut short.
        let token_count = count_tokens(&text);
        let finish = if u64::from(token_count) >= request.max_tokens {
            FinishReason::Length
        } else {
            FinishReason::Stop
        };

        tracing::debug!(
            target: TRACING_TARGET,
            provider = %self.provider_name(),
            model = %self.model_name(),
            token_count,
            finish = ?finish,
            "completion round finished"
        );

        Ok(Completion { text, finish })
    }
}

/// Extracts text content from assistant content choices.
fn extract_text_content(choice: &OneOrMany<AssistantContent>) -> String {
    choice
        .iter()
        .filter_map(|content| match content {
            AssistantContent::Text(text) => Some(text.text()),
            _ => None,
        })
        .collect::<Vec<_>>()
        .join("")
}

impl std::fmt::Debug for CompletionProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CompletionProvider")
            .field("provider", &self.provider_name())
            .field("model", &self.model_name())
            .finish()
    }
}
