//! papyrix-model — T5 summarization and question answering via Candle.
//!
//! Loads a pretrained seq2seq model from the Hugging Face Hub and runs
//! deterministic beam-search generation natively. No Python, no external
//! inference service.

mod assistant;
mod generation;
mod questions;
mod t5;

pub use assistant::{answer_query, summarize, TextGenerator, NO_ANSWER_FOUND};
pub use generation::{beam_search, GenerationParams};
pub use questions::suggest_questions;
pub use t5::{GeneratorConfig, T5Generator};

pub type Result<T> = std::result::Result<T, ModelError>;

#[derive(Debug, thiserror::Error)]
pub enum ModelError {
    #[error("Model loading failed: {0}")]
    ModelLoad(String),

    #[error("Tokenization failed: {0}")]
    Tokenization(String),

    #[error("Inference failed: {0}")]
    Inference(String),

    #[error("Download failed: {0}")]
    Download(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

impl From<candle_core::Error> for ModelError {
    fn from(e: candle_core::Error) -> Self {
        ModelError::Inference(e.to_string())
    }
}

impl From<std::io::Error> for ModelError {
    fn from(e: std::io::Error) -> Self {
        ModelError::Download(e.to_string())
    }
}
