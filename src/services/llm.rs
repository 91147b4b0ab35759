//! Chat-completion client used to draft waypoints.

use crate::constants::{LLM_MAX_TOKENS, LLM_TEMPERATURE};
use crate::error::{AppError, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;

const JSON_ONLY_SYSTEM_PROMPT: &str =
    "You are a JSON-only response assistant. Always respond with valid JSON only, no explanations.";

#[derive(Debug, Clone, PartialEq)]
pub struct CompletionRequest {
    pub system_prompt: String,
    pub prompt: String,
    pub temperature: f32,
    pub max_tokens: u32,
}

impl CompletionRequest {
    /// Low-temperature request that asks for bare JSON
    pub fn json_only(prompt: String) -> Self {
        CompletionRequest {
            system_prompt: JSON_ONLY_SYSTEM_PROMPT.to_string(),
            prompt,
            temperature: LLM_TEMPERATURE,
            max_tokens: LLM_MAX_TOKENS,
        }
    }
}

/// Stateless text completion: every call is a fresh conversation.
#[async_trait]
pub trait LlmClient: Send + Sync {
    /// Returns the trimmed text of the first choice, or `None` when the model
    /// answered with nothing.
    async fn complete(&self, request: CompletionRequest) -> Result<Option<String>>;
}

/// Groq's OpenAI-compatible chat completions endpoint
#[derive(Clone)]
pub struct GroqClient {
    client: Client,
    api_key: String,
    base_url: String,
    model: String,
}

impl GroqClient {
    pub fn new(api_key: String, base_url: String, model: String, timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| AppError::Internal(format!("Failed to build LLM HTTP client: {}", e)))?;

        Ok(GroqClient {
            client,
            api_key,
            base_url: base_url.trim_end_matches('/').to_string(),
            model,
        })
    }

    fn build_request_body(&self, request: &CompletionRequest) -> serde_json::Value {
        serde_json::json!({
            "model": self.model,
            "messages": [
                {"role": "system", "content": request.system_prompt},
                {"role": "user", "content": request.prompt},
            ],
            "temperature": request.temperature,
            "max_tokens": request.max_tokens,
        })
    }
}

#[async_trait]
impl LlmClient for GroqClient {
    async fn complete(&self, request: CompletionRequest) -> Result<Option<String>> {
        let url = format!("{}/chat/completions", self.base_url);

        tracing::debug!(
            model = %self.model,
            prompt_chars = request.prompt.len(),
            "LLM request: model {}, {} prompt chars",
            self.model, request.prompt.len()
        );

        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.api_key)
            .json(&self.build_request_body(&request))
            .send()
            .await
            .map_err(|e| AppError::LlmApi(format!("Request failed: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            tracing::warn!(status = %status, "LLM API HTTP error {}: {}", status, error_text);
            return Err(AppError::LlmApi(format!("HTTP {}: {}", status, error_text)));
        }

        let completion: ChatCompletionResponse = response
            .json()
            .await
            .map_err(|e| AppError::LlmApi(format!("Failed to parse response: {}", e)))?;

        Ok(completion.first_content())
    }
}

#[derive(Debug, Deserialize)]
struct ChatCompletionResponse {
    #[serde(default)]
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: Option<ChatMessage>,
}

#[derive(Debug, Deserialize)]
struct ChatMessage {
    content: Option<String>,
}

impl ChatCompletionResponse {
    fn first_content(self) -> Option<String> {
        self.choices
            .into_iter()
            .next()
            .and_then(|c| c.message)
            .and_then(|m| m.content)
            .map(|text| text.trim().to_string())
            .filter(|text| !text.is_empty())
    }
}

#[cfg(test)]
pub mod mock {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;

    /// Replays scripted replies in order and records every prompt it saw.
    /// `Err` entries surface as `AppError::LlmApi`.
    pub struct MockLlmClient {
        replies: Vec<std::result::Result<Option<String>, String>>,
        call_count: AtomicUsize,
        prompts: Mutex<Vec<String>>,
    }

    impl MockLlmClient {
        pub fn new(replies: Vec<std::result::Result<Option<String>, String>>) -> Self {
            Self {
                replies,
                call_count: AtomicUsize::new(0),
                prompts: Mutex::new(Vec::new()),
            }
        }

        pub fn texts(replies: Vec<&str>) -> Self {
            Self::new(replies.into_iter().map(|r| Ok(Some(r.to_string()))).collect())
        }

        pub fn call_count(&self) -> usize {
            self.call_count.load(Ordering::SeqCst)
        }

        pub fn prompts(&self) -> Vec<String> {
            self.prompts.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl LlmClient for MockLlmClient {
        async fn complete(&self, request: CompletionRequest) -> Result<Option<String>> {
            let idx = self.call_count.fetch_add(1, Ordering::SeqCst);
            self.prompts.lock().unwrap().push(request.prompt);
            match self.replies.get(idx) {
                Some(Ok(reply)) => Ok(reply.clone()),
                Some(Err(e)) => Err(AppError::LlmApi(e.clone())),
                None => Err(AppError::LlmApi("No more mock responses".to_string())),
            }
        }
    }
}
