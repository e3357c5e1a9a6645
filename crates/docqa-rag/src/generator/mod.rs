//! Answer generation with a bounded continuation policy.
//!
//! One request is always sent. Whether follow-up rounds happen is decided
//! by [`ContinuationPolicy`]: the single-shot variant returns the first
//! reply as-is, the multi-turn variant keeps asking the model to continue
//! while the previous round looks truncated. The loop is guaranteed to
//! terminate by three independent exits: a natural stop, the duplicate
//! guard, and a hard round ceiling.

mod source;

use std::sync::Arc;

pub use self::source::{Completion, CompletionRequest, CompletionSource, FinishReason};
use crate::{Result, TRACING_TARGET};

/// Default system instruction for answering.
const SYSTEM_PROMPT: &str = "You are a helpful assistant.";

/// How the generator handles a truncated first reply.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContinuationPolicy {
    /// One call, return the reply even if it was cut short.
    SingleShot,
    /// Keep requesting continuations while the reply looks truncated,
    /// up to `max_rounds` follow-up calls.
    MultiTurn {
        /// Hard ceiling on follow-up rounds. Required for termination;
        /// without it a model that never reports a natural stop would
        /// loop (and bill) forever.
        max_rounds: u32,
    },
}

impl Default for ContinuationPolicy {
    fn default() -> Self {
        Self::MultiTurn { max_rounds: 5 }
    }
}

/// Configuration for the answer generator.
#[derive(Debug, Clone)]
pub struct GeneratorConfig {
    /// System instruction sent with every round.
    pub system_prompt: String,

    /// Output token cap for the first round.
    pub max_output_tokens: u64,

    /// Output token cap for each continuation round.
    pub continuation_output_tokens: u64,

    /// Sampling temperature.
    pub temperature: f64,

    /// Continuation behavior.
    pub continuation: ContinuationPolicy,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            system_prompt: SYSTEM_PROMPT.to_string(),
            max_output_tokens: 1500,
            continuation_output_tokens: 1000,
            temperature: 0.85,
            continuation: ContinuationPolicy::default(),
        }
    }
}

/// Generates an answer from assembled context and a question.
#[derive(Clone)]
pub struct Generator {
    source: Arc<dyn CompletionSource>,
    config: GeneratorConfig,
}

impl Generator {
    /// Creates a new generator over a completion source.
    pub fn new(source: Arc<dyn CompletionSource>, config: GeneratorConfig) -> Self {
        Self { source, config }
    }

    /// Returns the configuration.
    pub fn config(&self) -> &GeneratorConfig {
        &self.config
    }

    /// Generates an answer for `question` grounded in `context`.
    ///
    /// Provider failures propagate; a partial answer is never silently
    /// returned in their place.
    pub async fn generate(&self, context: &str, question: &str) -> Result<String> {
        let first = self
            .source
            .complete(CompletionRequest {
                system: self.config.system_prompt.clone(),
                prompt: answer_prompt(context, question),
                max_tokens: self.config.max_output_tokens,
                temperature: self.config.temperature,
            })
            .await?;

        let mut answer = first.text.trim().to_string();

        let ContinuationPolicy::MultiTurn { max_rounds } = self.config.continuation else {
            return Ok(answer);
        };

        let mut finish = first.finish;
        let mut rounds = 0u32;

        while finish == FinishReason::Length && rounds < max_rounds {
            rounds += 1;

            let continuation = self
                .source
                .complete(CompletionRequest {
                    system: self.config.system_prompt.clone(),
                    prompt: continuation_prompt(&answer),
                    max_tokens: self.config.continuation_output_tokens,
                    temperature: self.config.temperature,
                })
                .await?;

            let text = continuation.text.trim();

            // Duplicate guard: a continuation already contained in the
            // accumulated answer means the model is repeating itself.
            if text.is_empty() || answer.contains(text) {
                tracing::debug!(
                    target: TRACING_TARGET,
                    rounds,
                    "continuation duplicated accumulated answer, stopping"
                );
                break;
            }

            answer.push(' ');
            answer.push_str(text);
            finish = continuation.finish;
        }

        tracing::debug!(
            target: TRACING_TARGET,
            rounds,
            answer_chars = answer.len(),
            "answer generated"
        );

        Ok(answer)
    }
}

impl std::fmt::Debug for Generator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Generator")
            .field("config", &self.config)
            .finish()
    }
}

/// Builds the first-round prompt.
fn answer_prompt(context: &str, question: &str) -> String {
    format!("Context: {context}\nQuestion: {question}\nAnswer:")
}

/// Builds a continuation prompt over the accumulated answer.
fn continuation_prompt(answer: &str) -> String {
    format!("Continue elaborating on this response without repeating:\n\n{answer}")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mock::ScriptedCompletion;

    fn generator(source: Arc<ScriptedCompletion>, continuation: ContinuationPolicy) -> Generator {
        Generator::new(
            source,
            GeneratorConfig {
                continuation,
                ..GeneratorConfig::default()
            },
        )
    }

    #[tokio::test]
    async fn single_shot_returns_first_reply() {
        let source = Arc::new(ScriptedCompletion::new(vec![Completion::truncated(
            "partial answer",
        )]));
        let generator = generator(source.clone(), ContinuationPolicy::SingleShot);

        let answer = generator.generate("ctx", "q").await.unwrap();
        assert_eq!(answer, "partial answer");
        assert_eq!(source.requests().len(), 1);
    }

    #[tokio::test]
    async fn natural_stop_ends_the_loop() {
        let source = Arc::new(ScriptedCompletion::new(vec![
            Completion::truncated("part one"),
            Completion::stopped("part two"),
        ]));
        let generator = generator(source.clone(), ContinuationPolicy::default());

        let answer = generator.generate("ctx", "q").await.unwrap();
        assert_eq!(answer, "part one part two");
        assert_eq!(source.requests().len(), 2);
    }

    #[tokio::test]
    async fn duplicate_continuation_is_not_appended() {
        let source = Arc::new(ScriptedCompletion::new(vec![
            Completion::truncated("the sky is blue"),
            Completion::truncated("sky is"),
        ]));
        let generator = generator(source.clone(), ContinuationPolicy::default());

        let answer = generator.generate("ctx", "q").await.unwrap();
        assert_eq!(answer, "the sky is blue");
    }

    #[tokio::test]
    async fn ceiling_bounds_a_source_that_never_stops() {
        // Ten unique truncated replies; only the ceiling can end this.
        let script: Vec<Completion> = (0..10)
            .map(|i| Completion::truncated(format!("segment {i}")))
            .collect();
        let source = Arc::new(ScriptedCompletion::new(script));
        let generator = generator(source.clone(), ContinuationPolicy::MultiTurn { max_rounds: 3 });

        let answer = generator.generate("ctx", "q").await.unwrap();
        assert_eq!(answer, "segment 0 segment 1 segment 2 segment 3");
        // First call plus exactly max_rounds continuations.
        assert_eq!(source.requests().len(), 4);
    }

    #[tokio::test]
    async fn provider_errors_propagate() {
        let source = Arc::new(ScriptedCompletion::new(vec![]));
        let generator = generator(source, ContinuationPolicy::default());

        let err = generator.generate("ctx", "q").await.unwrap_err();
        assert!(matches!(err, crate::Error::Generation(_)));
    }

    #[tokio::test]
    async fn prompt_carries_context_and_question() {
        let source = Arc::new(ScriptedCompletion::new(vec![Completion::stopped("blue")]));
        let generator = generator(source.clone(), ContinuationPolicy::default());

        generator
            .generate("The sky is blue.", "What color is the sky?")
            .await
            .unwrap();

        let requests = source.requests();
        assert!(requests[0].prompt.contains("The sky is blue."));
        assert!(requests[0].prompt.contains("What color is the sky?"));
    }

    #[tokio::test]
    async fn continuation_prompt_carries_accumulated_answer() {
        let source = Arc::new(ScriptedCompletion::new(vec![
            Completion::truncated("first half"),
            Completion::stopped("second half"),
        ]));
        let generator = generator(source.clone(), ContinuationPolicy::default());

        generator.generate("ctx", "q").await.unwrap();

        let requests = source.requests();
        assert!(requests[1].prompt.contains("without repeating"));
        assert!(requests[1].prompt.contains("first half"));
    }
}
