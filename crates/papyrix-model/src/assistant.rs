//! High-level document operations: summarization and question answering.

use async_trait::async_trait;
use tracing::debug;

use crate::generation::GenerationParams;
use crate::Result;

/// Returned when generation produces fewer than three words.
pub const NO_ANSWER_FOUND: &str = "No answer found";

const MIN_ANSWER_WORDS: usize = 3;

/// Seam between the entry points and the model. The production
/// implementation is [`crate::T5Generator`]; tests substitute stubs.
#[async_trait]
pub trait TextGenerator: Send + Sync {
    async fn generate(&self, prompt: &str, params: &GenerationParams) -> Result<String>;
    fn model_id(&self) -> &str;
}

/// Summarize the extracted document text.
pub async fn summarize(generator: &dyn TextGenerator, context: &str) -> Result<String> {
    let prompt = format!("summarize: {context}");
    debug!(prompt_chars = prompt.len(), "Running summarization");
    generator.generate(&prompt, &GenerationParams::summarization()).await
}

/// Answer a question against the extracted document text. Falls back to the
/// fixed sentinel when the model produces fewer than three words.
pub async fn answer_query(
    generator: &dyn TextGenerator,
    context: &str,
    question: &str,
) -> Result<String> {
    let prompt = format!("question: {question} context: {context}");
    debug!(prompt_chars = prompt.len(), "Running question answering");
    let answer = generator.generate(&prompt, &GenerationParams::answering()).await?;
    Ok(fallback_if_short(answer))
}

fn fallback_if_short(answer: String) -> String {
    if answer.split_whitespace().count() < MIN_ANSWER_WORDS {
        NO_ANSWER_FOUND.to_string()
    } else {
        answer
    }
}
