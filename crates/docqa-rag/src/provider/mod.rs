//! Completion and embedding providers.
//!
//! Providers are concrete enums over rig-core client implementations so the
//! rest of the pipeline never needs generic model parameters. Both are
//! cheaply cloneable `Arc` wrappers.

mod completion;
mod credentials;
mod embedding;
mod model;

pub use completion::CompletionProvider;
pub use credentials::{ApiKeyCredentials, Credentials};
pub use embedding::EmbeddingProvider;
#[cfg(feature = "ollama")]
pub use model::OllamaEmbeddingModel;
pub use model::{
    AnthropicModel, CompletionModel, EmbeddingModel, OpenAiCompletionModel, OpenAiEmbeddingModel,
};
