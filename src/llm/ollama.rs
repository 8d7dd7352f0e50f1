//! Ollama client
//!
//! Non-streaming completions via `POST /api/generate`.

use crate::config::settings::ModelSettings;
use crate::error::{ModelError, ModelResult};
use crate::llm::LanguageModel;
use async_trait::async_trait;
use serde_json::json;

pub struct OllamaClient {
    client: reqwest::Client,
    model: String,
    base_url: String,
}

impl OllamaClient {
    pub fn new(settings: &ModelSettings) -> Self {
        Self {
            client: reqwest::Client::new(),
            model: settings.name.clone(),
            base_url: settings.base_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    fn endpoint(&self) -> String {
        format!("{}/api/generate", self.base_url)
    }
}

#[async_trait]
impl LanguageModel for OllamaClient {
    async fn complete(&self, prompt: &str) -> ModelResult<String> {
        let payload = json!({
            "model": self.model,
            "prompt": prompt,
            "stream": false
        });

        let response = self
            .client
            .post(self.endpoint())
            .json(&payload)
            .send()
            .await
            .map_err(|e| {
                ModelError::Unavailable(format!(
                    "Ollama unavailable at {}. Start Ollama and ensure model '{}' is installed. Error: {}",
                    self.base_url, self.model, e
                ))
            })?;

        let status = response.status();
        let text = response
            .text()
            .await
            .map_err(|e| ModelError::BadResponse(e.to_string()))?;

        if !status.is_success() {
            let detail = serde_json::from_str::<serde_json::Value>(&text)
                .ok()
                .and_then(|body| body.get("error")?.as_str().map(str::to_string))
                .unwrap_or(text);
            return Err(ModelError::Unavailable(format!(
                "Ollama error ({}): {}",
                status, detail
            )));
        }

        let body: serde_json::Value =
            serde_json::from_str(&text).map_err(|e| ModelError::BadResponse(e.to_string()))?;

        body.get("response")
            .and_then(|value| value.as_str())
            .map(str::to_string)
            .ok_or_else(|| ModelError::BadResponse(format!("response missing text: {}", body)))
    }
}
