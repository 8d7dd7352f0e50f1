//! Language model access
//!
//! A single prompt in, a single completion out. No streaming, no tools.

pub mod ollama;
pub mod responder;

pub use ollama::OllamaClient;
pub use responder::{QueryResponder, build_prompt};

use crate::error::ModelResult;
use async_trait::async_trait;

#[async_trait]
pub trait LanguageModel: Send + Sync {
    /// Complete one prompt
    async fn complete(&self, prompt: &str) -> ModelResult<String>;
}
