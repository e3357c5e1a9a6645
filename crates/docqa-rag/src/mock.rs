//! Deterministic mock providers for tests and offline development.

use std::collections::VecDeque;
use std::hash::{DefaultHasher, Hash, Hasher};
use std::sync::Mutex;

use async_trait::async_trait;

use crate::generator::{Completion, CompletionRequest, CompletionSource};
use crate::{Error, Result};

/// Produces a deterministic bag-of-words embedding.
///
/// Each lowercased word hashes into one of `ndims` buckets; the resulting
/// count vector is L2-normalized. Texts sharing vocabulary land close in
/// cosine space, which is all retrieval tests need.
pub fn deterministic_embedding(text: &str, ndims: usize) -> Vec<f32> {
    let mut vector = vec![0.0f32; ndims];

    for word in text.to_lowercase().split_whitespace() {
        let word = word.trim_matches(|c: char| !c.is_alphanumeric());
        if word.is_empty() {
            continue;
        }

        let mut hasher = DefaultHasher::new();
        word.hash(&mut hasher);
        let bucket = (hasher.finish() % ndims as u64) as usize;
        vector[bucket] += 1.0;
    }

    let norm = vector.iter().map(|x| x * x).sum::<f32>().sqrt();
    if norm > 0.0 {
        for value in &mut vector {
            *value /= norm;
        }
    }

    vector
}

/// A completion source that replays a fixed script.
///
/// Every request is recorded; once the script runs dry, further calls fail
/// with a generation error so tests notice unexpected extra rounds.
pub struct ScriptedCompletion {
    script: Mutex<VecDeque<Completion>>,
    requests: Mutex<Vec<CompletionRequest>>,
}

impl ScriptedCompletion {
    /// Creates a source that replays `script` in order.
    pub fn new(script: Vec<Completion>) -> Self {
        Self {
            script: Mutex::new(script.into()),
            requests: Mutex::new(Vec::new()),
        }
    }

    /// Returns all requests received so far.
    pub fn requests(&self) -> Vec<CompletionRequest> {
        self.requests.lock().expect("requests lock poisoned").clone()
    }
}

#[async_trait]
impl CompletionSource for ScriptedCompletion {
    async fn complete(&self, request: CompletionRequest) -> Result<Completion> {
        self.requests
            .lock()
            .expect("requests lock poisoned")
            .push(request);

        self.script
            .lock()
            .expect("script lock poisoned")
            .pop_front()
            .ok_or_else(|| Error::generation("scripted completion exhausted"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn embeddings_are_deterministic_and_normalized() {
        let a = deterministic_embedding("the sky is blue", 64);
        let b = deterministic_embedding("the sky is blue", 64);
        assert_eq!(a, b);

        let norm: f32 = a.iter().map(|x| x * x).sum::<f32>().sqrt();
        assert!((norm - 1.0).abs() < 1e-5);
    }

    #[test]
    fn shared_vocabulary_scores_higher() {
        let query = deterministic_embedding("what color is the sky", 64);
        let relevant = deterministic_embedding("the sky is blue", 64);
        let unrelated = deterministic_embedding("quarterly revenue grew strongly", 64);

        let dot = |a: &[f32], b: &[f32]| -> f32 { a.iter().zip(b).map(|(x, y)| x * y).sum() };
        assert!(dot(&query, &relevant) > dot(&query, &unrelated));
    }

    #[test]
    fn empty_text_embeds_to_zero_vector() {
        let vector = deterministic_embedding("", 16);
        assert!(vector.iter().all(|&x| x == 0.0));
    }
}
