//! The question-answering pipeline.

use std::path::Path;
use std::sync::Arc;

use crate::assembler::ContextAssembler;
use crate::config::RagConfig;
use crate::generator::{CompletionSource, Generator, GeneratorConfig};
use crate::indexer::Indexer;
use crate::provider::EmbeddingProvider;
use crate::retriever::Retriever;
use crate::splitter::Splitter;
use crate::{Result, TRACING_TARGET, loader};

/// High-level service answering questions over uploaded documents.
///
/// Each request runs the same fixed sequence: extract, split, index,
/// retrieve, assemble, generate. Every stage consumes the previous stage's
/// output, so there is nothing to parallelize inside a request; concurrent
/// requests are independent because the index is rebuilt per document.
///
/// The service is cheap to clone and can be shared across threads.
#[derive(Clone)]
pub struct RagService {
    inner: Arc<RagServiceInner>,
}

struct RagServiceInner {
    splitter: Splitter,
    indexer: Indexer,
    retriever: Retriever,
    assembler: ContextAssembler,
    generator: Generator,
    config: RagConfig,
}

impl RagService {
    /// Creates a new service from providers and configuration.
    pub fn new(
        embedding: EmbeddingProvider,
        completion: Arc<dyn CompletionSource>,
        config: RagConfig,
        generator_config: GeneratorConfig,
    ) -> Result<Self> {
        config.validate()?;

        let splitter = Splitter::new(
            config.max_chunk_characters,
            config.chunk_overlap_characters,
            config.trim_chunks,
        );

        let mut retriever = Retriever::new(embedding.clone());
        if let Some(min_score) = config.min_score {
            retriever = retriever.with_min_score(min_score);
        }

        Ok(Self {
            inner: Arc::new(RagServiceInner {
                splitter,
                indexer: Indexer::new(embedding),
                retriever,
                assembler: ContextAssembler::new(config.max_context_tokens),
                generator: Generator::new(completion, generator_config),
                config,
            }),
        })
    }

    /// Returns the configuration.
    pub fn config(&self) -> &RagConfig {
        &self.inner.config
    }

    /// Returns a reference to the text splitter.
    pub fn splitter(&self) -> &Splitter {
        &self.inner.splitter
    }

    /// Answers a question about a PDF document on disk.
    pub async fn answer_document(
        &self,
        path: impl AsRef<Path>,
        question: &str,
    ) -> Result<String> {
        let path = path.as_ref().to_owned();

        // PDF parsing is CPU-bound; keep it off the async workers.
        let text = tokio::task::spawn_blocking(move || loader::extract_text(&path))
            .await
            .map_err(|e| crate::Error::extraction(format!("extraction task failed: {e}")))??;

        self.answer_text(&text, question).await
    }

    /// Answers a question about already-extracted text.
    pub async fn answer_text(&self, text: &str, question: &str) -> Result<String> {
        let chunks = self.inner.splitter.split_with_pages_owned(text);
        tracing::debug!(
            target: TRACING_TARGET,
            chunks = chunks.len(),
            "document split"
        );

        let index = self.inner.indexer.index(chunks).await?;

        let retrieved = self
            .inner
            .retriever
            .retrieve(&index, question, self.inner.config.max_results)
            .await?;

        let context = self.inner.assembler.assemble(&retrieved);

        let answer = self.inner.generator.generate(&context, question).await?;

        tracing::info!(
            target: TRACING_TARGET,
            retrieved = retrieved.len(),
            answer_chars = answer.len(),
            "question answered"
        );

        Ok(answer)
    }
}

impl std::fmt::Debug for RagService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RagService")
            .field("config", &self.inner.config)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generator::Completion;
    use crate::mock::ScriptedCompletion;

    fn service(source: Arc<ScriptedCompletion>, config: RagConfig) -> RagService {
        RagService::new(
            EmbeddingProvider::mock(64),
            source,
            config,
            GeneratorConfig::default(),
        )
        .unwrap()
    }

    #[tokio::test]
    async fn single_chunk_document_flows_through_verbatim() {
        let source = Arc::new(ScriptedCompletion::new(vec![Completion::stopped("Blue.")]));
        let config = RagConfig {
            max_results: 1,
            max_context_tokens: 500,
            ..RagConfig::default()
        };

        let answer = service(source.clone(), config)
            .answer_text("The sky is blue.", "What color is the sky?")
            .await
            .unwrap();

        assert_eq!(answer, "Blue.");

        // The single extracted chunk must reach the model verbatim,
        // alongside the question.
        let requests = source.requests();
        assert_eq!(requests.len(), 1);
        assert!(requests[0].prompt.contains("The sky is blue."));
        assert!(requests[0].prompt.contains("What color is the sky?"));
    }

    #[tokio::test]
    async fn retrieval_is_capped_by_max_results() {
        let source = Arc::new(ScriptedCompletion::new(vec![Completion::stopped("ok")]));
        let config = RagConfig {
            max_chunk_characters: 40,
            chunk_overlap_characters: 0,
            max_results: 1,
            ..RagConfig::default()
        };

        let text = "The sky is blue today.\n\nBananas are yellow.\n\nRivers carry fresh water.";
        service(source.clone(), config)
            .answer_text(text, "What color is the sky?")
            .await
            .unwrap();

        // With k=1 only the sky chunk may appear in the prompt.
        let prompt = &source.requests()[0].prompt;
        assert!(prompt.contains("sky"));
        assert!(!prompt.contains("Bananas"));
    }

    #[tokio::test]
    async fn generation_failure_propagates() {
        // Empty script: the first completion call fails.
        let source = Arc::new(ScriptedCompletion::new(vec![]));

        let err = service(source, RagConfig::default())
            .answer_text("some document text", "a question")
            .await
            .unwrap_err();

        assert!(matches!(err, crate::Error::Generation(_)));
    }

    #[tokio::test]
    async fn invalid_config_is_rejected_at_construction() {
        let source = Arc::new(ScriptedCompletion::new(vec![]));
        let config = RagConfig {
            max_results: 0,
            ..RagConfig::default()
        };

        let err = RagService::new(
            EmbeddingProvider::mock(8),
            source,
            config,
            GeneratorConfig::default(),
        )
        .unwrap_err();

        assert!(matches!(err, crate::Error::Config(_)));
    }
}
