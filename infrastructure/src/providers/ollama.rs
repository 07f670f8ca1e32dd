//! Ollama backend
//!
//! `POST {base_url}/api/chat` with `stream: false`; the system prompt is
//! sent as the first message.

use crate::config::FileOllamaConfig;
use async_trait::async_trait;
use cafe_application::ports::llm_gateway::{GatewayError, LlmGateway};
use cafe_domain::Message;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::debug;

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    stream: bool,
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    message: Option<ResponseMessage>,
    error: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ResponseMessage {
    content: String,
}

pub struct OllamaGateway {
    client: reqwest::Client,
    base_url: String,
    model: String,
    timeout_secs: u64,
}

impl OllamaGateway {
    pub fn new(config: &FileOllamaConfig) -> Result<Self, GatewayError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| GatewayError::Other(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            model: config.model.clone(),
            timeout_secs: config.timeout_secs,
        })
    }

    /// Override the model name from configuration.
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    fn chat_url(&self) -> String {
        format!("{}/api/chat", self.base_url)
    }

    fn request<'a>(&'a self, system_prompt: &'a str, messages: &'a [Message]) -> ChatRequest<'a> {
        let messages = std::iter::once(ChatMessage {
            role: "system",
            content: system_prompt,
        })
        .chain(messages.iter().map(|m| ChatMessage {
            role: m.role.as_str(),
            content: &m.content,
        }))
        .collect();

        ChatRequest {
            model: &self.model,
            messages,
            stream: false,
        }
    }

    fn convert_error(&self, err: reqwest::Error) -> GatewayError {
        if err.is_timeout() {
            GatewayError::Timeout(self.timeout_secs)
        } else if err.is_connect() {
            GatewayError::ConnectionError(format!(
                "Cannot reach Ollama at {} (is `ollama serve` running?): {}",
                self.base_url, err
            ))
        } else {
            GatewayError::RequestFailed(err.to_string())
        }
    }
}

#[async_trait]
impl LlmGateway for OllamaGateway {
    fn name(&self) -> &str {
        "ollama"
    }

    fn model(&self) -> &str {
        &self.model
    }

    async fn complete(
        &self,
        system_prompt: &str,
        messages: &[Message],
    ) -> Result<String, GatewayError> {
        debug!(model = %self.model, messages = messages.len(), "Calling Ollama chat API");

        let response = self
            .client
            .post(self.chat_url())
            .json(&self.request(system_prompt, messages))
            .send()
            .await
            .map_err(|e| self.convert_error(e))?;

        let status = response.status();
        let body = response.text().await.map_err(|e| self.convert_error(e))?;
        let parsed: Option<ChatResponse> = serde_json::from_str(&body).ok();

        if !status.is_success() {
            let detail = parsed
                .and_then(|r| r.error)
                .unwrap_or_else(|| body.trim().to_string());
            return Err(if status == reqwest::StatusCode::NOT_FOUND {
                GatewayError::ModelNotAvailable(format!("{}: {}", self.model, detail))
            } else {
                GatewayError::RequestFailed(format!("Ollama returned {}: {}", status, detail))
            });
        }

        match parsed {
            Some(ChatResponse {
                message: Some(message),
                ..
            }) => Ok(message.content),
            Some(ChatResponse {
                error: Some(error), ..
            }) => Err(GatewayError::RequestFailed(error)),
            _ => Err(GatewayError::MalformedResponse(format!(
                "Unexpected Ollama response: {}",
                cafe_domain::core::string::truncate(&body, 200)
            ))),
        }
    }
}
