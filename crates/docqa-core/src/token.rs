//! Token counting using tiktoken-rs.
//!
//! Uses the cl100k_base encoding, which matches the tokenizer family of the
//! chat models this service generates with. Counting with a different
//! tokenizer than the downstream model would let the context budget drift.

use std::sync::OnceLock;

use tiktoken_rs::CoreBPE;

use crate::TRACING_TARGET;

/// Process-wide encoder, built once on first use.
static ENCODER: OnceLock<Option<CoreBPE>> = OnceLock::new();

fn encoder() -> Option<&'static CoreBPE> {
    ENCODER
        .get_or_init(|| match tiktoken_rs::cl100k_base() {
            Ok(bpe) => Some(bpe),
            Err(err) => {
                tracing::warn!(
                    target: TRACING_TARGET,
                    error = %err,
                    "failed to build cl100k encoder, falling back to estimates"
                );
                None
            }
        })
        .as_ref()
}

/// Counts tokens in text under the cl100k_base encoding.
///
/// Falls back to [`estimate_tokens`] if the encoder cannot be constructed.
pub fn count_tokens(text: &str) -> u32 {
    if text.is_empty() {
        return 0;
    }

    match encoder() {
        Some(bpe) => bpe.encode_with_special_tokens(text).len() as u32,
        None => estimate_tokens(text),
    }
}

/// Estimates the token count (~4 chars per token).
pub fn estimate_tokens(text: &str) -> u32 {
    (text.len() as f64 / 4.0).ceil() as u32
}

/// Checks whether text exceeds a token limit.
///
/// Uses the cheap estimate to short-circuit the clear cases and only pays
/// for an exact count near the boundary.
pub fn exceeds_token_limit(text: &str, limit: u32) -> bool {
    let estimate = estimate_tokens(text);
    if estimate < limit / 2 {
        return false;
    }
    if estimate > limit.saturating_mul(2) {
        return true;
    }
    count_tokens(text) > limit
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_text_has_no_tokens() {
        assert_eq!(count_tokens(""), 0);
        assert_eq!(estimate_tokens(""), 0);
    }

    #[test]
    fn short_text_counts_low() {
        let count = count_tokens("Hello, world!");
        assert!(count > 0);
        assert!(count < 10);
    }

    #[test]
    fn counting_is_deterministic() {
        let text = "The sky is blue.";
        assert_eq!(count_tokens(text), count_tokens(text));
    }

    #[test]
    fn estimate_tracks_exact_count() {
        let text = "a plain english sentence used for estimation checks";
        let estimate = estimate_tokens(text);
        let exact = count_tokens(text);
        assert!(estimate <= exact * 2);
        assert!(estimate >= exact / 2);
    }

    #[test]
    fn limit_check_handles_both_sides() {
        assert!(!exceeds_token_limit("Hi", 100));
        let long = "many words strung together to blow a tiny budget wide open";
        assert!(exceeds_token_limit(long, 3));
    }
}
