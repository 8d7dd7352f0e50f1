//! Natural-language question answering over the stored products

use crate::error::{ModelError, ModelResult};
use crate::llm::LanguageModel;
use std::sync::Arc;
use std::time::Duration;

/// Build the single prompt sent to the model
pub fn build_prompt(question: &str, schema_text: &str) -> String {
    format!(
        "Below is the schema of a PostgreSQL database. Provide a natural language \
         explanation or answer to the following question based on the data.\n\
         {}\n\n\
         Question: {}\n\
         Answer:",
        schema_text,
        question.trim()
    )
}

/// Sends one question plus schema text to a language model.
///
/// The answer comes back verbatim; nothing checks that it is grounded in the
/// stored rows.
#[derive(Clone)]
pub struct QueryResponder {
    model: Arc<dyn LanguageModel>,
    timeout: Duration,
}

impl QueryResponder {
    pub fn new(model: Arc<dyn LanguageModel>, timeout: Duration) -> Self {
        Self { model, timeout }
    }

    pub async fn answer(&self, question: &str, schema_text: &str) -> ModelResult<String> {
        let prompt = build_prompt(question, schema_text);
        tracing::debug!(chars = prompt.len(), "dispatching question to model");

        match tokio::time::timeout(self.timeout, self.model.complete(&prompt)).await {
            Ok(result) => result,
            Err(_) => {
                tracing::warn!(timeout = ?self.timeout, "model call timed out");
                Err(ModelError::Timeout(self.timeout))
            }
        }
    }
}
