//! LLM Gateway port
//!
//! Defines the interface for communicating with model backends.

use async_trait::async_trait;
use cafe_domain::Message;
use thiserror::Error;

/// Errors that can occur during LLM gateway operations
#[derive(Error, Debug)]
pub enum GatewayError {
    #[error("Connection error: {0}")]
    ConnectionError(String),

    #[error("Model not available: {0}")]
    ModelNotAvailable(String),

    #[error("Request failed: {0}")]
    RequestFailed(String),

    #[error("Malformed provider response: {0}")]
    MalformedResponse(String),

    #[error("Timeout after {0}s")]
    Timeout(u64),

    #[error("Other error: {0}")]
    Other(String),
}

/// Gateway for LLM communication
///
/// One stateless completion per call: the caller passes the full transcript
/// every time and the system prompt separately. Implementations (adapters)
/// live in the infrastructure layer.
#[async_trait]
pub trait LlmGateway: Send + Sync {
    /// Short backend label for logs and progress output (e.g. "bedrock").
    fn name(&self) -> &str;

    /// Model identifier requests are sent to.
    fn model(&self) -> &str;

    /// Complete the conversation and return the raw reply text.
    async fn complete(&self, system_prompt: &str, messages: &[Message]) -> Result<String, GatewayError>;
}
