//! Context assembly under a hard token budget.
//!
//! The assembler is a pure function of its inputs: given ranked chunks and
//! a budget, it produces the context string the generator will see. The
//! budget is counted with the same tokenizer family as the downstream
//! model (cl100k); counting with anything else would let the context drift
//! past what the model accepts.

use docqa_core::token::count_tokens;

use crate::TRACING_TARGET;
use crate::retriever::RetrievedChunk;

/// Separator between chunks in the assembled context.
const SEPARATOR: &str = "\n";

/// Assembles retrieved chunks into a budgeted context string.
#[derive(Debug, Clone)]
pub struct ContextAssembler {
    max_tokens: u32,
}

impl ContextAssembler {
    /// Creates an assembler with the given token budget.
    pub fn new(max_tokens: u32) -> Self {
        Self { max_tokens }
    }

    /// Returns the token budget.
    pub fn max_tokens(&self) -> u32 {
        self.max_tokens
    }

    /// Concatenates chunks in rank order, dropping from the tail until the
    /// context fits the budget.
    ///
    /// Invariants:
    /// - `count_tokens(result) <= max_tokens`
    /// - the surviving chunks are exactly the highest-ranked prefix of the
    ///   input, in input order
    ///
    /// If the single top-ranked chunk alone exceeds the budget, it is
    /// truncated at the word boundary nearest the budget rather than
    /// rejected; a question should still be answered from the best
    /// evidence available.
    pub fn assemble(&self, chunks: &[RetrievedChunk]) -> String {
        if chunks.is_empty() {
            return String::new();
        }

        let mut kept: Vec<&str> = chunks.iter().map(|c| c.text.as_str()).collect();
        let mut context = kept.join(SEPARATOR);

        // Recounting the joined string per drop is quadratic, but the
        // chunk count is bounded by max_results (tens at most).
        while count_tokens(&context) > self.max_tokens && kept.len() > 1 {
            kept.pop();
            context = kept.join(SEPARATOR);
        }

        if count_tokens(&context) > self.max_tokens {
            let truncated = truncate_at_word_boundary(&context, self.max_tokens);
            tracing::warn!(
                target: TRACING_TARGET,
                budget = self.max_tokens,
                original_chars = context.len(),
                truncated_chars = truncated.len(),
                "top-ranked chunk exceeds the context budget, truncating"
            );
            context = truncated;
        }

        tracing::debug!(
            target: TRACING_TARGET,
            chunks_in = chunks.len(),
            chunks_kept = kept.len(),
            token_count = count_tokens(&context),
            budget = self.max_tokens,
            "context assembled"
        );

        context
    }
}

/// Returns the longest whitespace-delimited prefix of `text` that stays
/// within `max_tokens`.
fn truncate_at_word_boundary(text: &str, max_tokens: u32) -> String {
    let mut result = String::new();

    for word in text.split_whitespace() {
        let candidate = if result.is_empty() {
            word.to_string()
        } else {
            format!("{result} {word}")
        };

        if count_tokens(&candidate) > max_tokens {
            break;
        }
        result = candidate;
    }

    result
}

#[cfg(test)]
mod tests {
    use super::*;

    fn chunk(text: &str, score: f32) -> RetrievedChunk {
        RetrievedChunk {
            id: format!("chunk-{score}"),
            score,
            text: text.to_string(),
        }
    }

    fn ranked(texts: &[&str]) -> Vec<RetrievedChunk> {
        texts
            .iter()
            .enumerate()
            .map(|(i, t)| chunk(t, 1.0 - i as f32 * 0.1))
            .collect()
    }

    #[test]
    fn empty_input_yields_empty_context() {
        let assembler = ContextAssembler::new(100);
        assert_eq!(assembler.assemble(&[]), "");
    }

    #[test]
    fn everything_fits_under_a_large_budget() {
        let assembler = ContextAssembler::new(500);
        let chunks = ranked(&["The sky is blue.", "Grass is green."]);

        let context = assembler.assemble(&chunks);
        assert_eq!(context, "The sky is blue.\nGrass is green.");
    }

    #[test]
    fn budget_is_never_exceeded() {
        let chunks = ranked(&[
            "one two three four five six seven eight nine ten",
            "eleven twelve thirteen fourteen fifteen sixteen",
            "seventeen eighteen nineteen twenty twenty-one",
        ]);

        for budget in [1, 3, 5, 10, 20, 50, 500] {
            let assembler = ContextAssembler::new(budget);
            let context = assembler.assemble(&chunks);
            assert!(
                count_tokens(&context) <= budget,
                "budget {budget} exceeded: {} tokens",
                count_tokens(&context)
            );
        }
    }

    #[test]
    fn truncation_keeps_the_highest_ranked_prefix() {
        let chunks = ranked(&[
            "alpha beta gamma delta",
            "epsilon zeta eta theta",
            "iota kappa lambda mu",
        ]);

        // A budget that fits roughly two chunks.
        let assembler = ContextAssembler::new(12);
        let context = assembler.assemble(&chunks);

        assert!(context.starts_with("alpha beta gamma delta"));
        assert!(!context.contains("iota"));

        // Surviving text must be a prefix of the full join: no gaps, no
        // reordering.
        let full = chunks
            .iter()
            .map(|c| c.text.as_str())
            .collect::<Vec<_>>()
            .join("\n");
        assert!(full.starts_with(&context));
    }

    #[test]
    fn single_oversized_chunk_is_word_truncated() {
        let long = "word ".repeat(200);
        let chunks = vec![chunk(long.trim(), 1.0)];

        let assembler = ContextAssembler::new(10);
        let context = assembler.assemble(&chunks);

        assert!(!context.is_empty());
        assert!(count_tokens(&context) <= 10);
        // No mid-word cut: the result is whole words from the chunk.
        for word in context.split_whitespace() {
            assert_eq!(word, "word");
        }
    }

    #[test]
    fn assembly_is_idempotent() {
        let chunks = ranked(&["first chunk of text", "second chunk of text"]);
        let assembler = ContextAssembler::new(8);

        assert_eq!(assembler.assemble(&chunks), assembler.assemble(&chunks));
    }

    #[test]
    fn single_fitting_chunk_is_returned_verbatim() {
        let chunks = vec![chunk("The sky is blue.", 1.0)];
        let assembler = ContextAssembler::new(500);

        assert_eq!(assembler.assemble(&chunks), "The sky is blue.");
    }
}
