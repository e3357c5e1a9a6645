//! The completion seam the generator drives.
//!
//! The continuation loop only cares about two things per round: the text
//! that came back and whether the model stopped on its own. Putting that
//! behind a trait keeps the loop independent of any concrete provider and
//! lets tests script arbitrary response sequences.

use async_trait::async_trait;

use crate::Result;

/// A single round-trip request to a completion model.
#[derive(Debug, Clone)]
pub struct CompletionRequest {
    /// System instruction.
    pub system: String,
    /// User prompt.
    pub prompt: String,
    /// Output token cap for this round.
    pub max_tokens: u64,
    /// Sampling temperature.
    pub temperature: f64,
}

/// Why a completion round ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FinishReason {
    /// The model stopped on its own.
    Stop,
    /// The reply was cut short by the output token cap.
    Length,
}

/// One completed round.
#[derive(Debug, Clone)]
pub struct Completion {
    /// The reply text.
    pub text: String,
    /// Why the round ended.
    pub finish: FinishReason,
}

impl Completion {
    /// Creates a completion that stopped naturally.
    pub fn stopped(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            finish: FinishReason::Stop,
        }
    }

    /// Creates a completion that was cut short.
    pub fn truncated(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            finish: FinishReason::Length,
        }
    }
}

/// Anything that can answer a completion request.
#[async_trait]
pub trait CompletionSource: Send + Sync {
    /// Sends one completion request and returns the reply.
    async fn complete(&self, request: CompletionRequest) -> Result<Completion>;
}
