//! Model backends
//!
//! One [`LlmGateway`] implementation per backend. The backend is chosen by
//! [`BackendKind`] at construction; there is no runtime failover.

pub mod ollama;

#[cfg(feature = "bedrock")]
pub mod bedrock;

pub use ollama::OllamaGateway;

use crate::config::FileConfig;
use cafe_application::ports::llm_gateway::{GatewayError, LlmGateway};
use cafe_domain::BackendKind;
use std::sync::Arc;

/// Build the gateway for `kind`, optionally overriding the configured model.
pub async fn build_gateway(
    kind: BackendKind,
    config: &FileConfig,
    model_override: Option<&str>,
) -> Result<Arc<dyn LlmGateway>, GatewayError> {
    match kind {
        BackendKind::Ollama => {
            let mut gateway = OllamaGateway::new(&config.ollama)?;
            if let Some(model) = model_override {
                gateway = gateway.with_model(model);
            }
            Ok(Arc::new(gateway))
        }
        #[cfg(feature = "bedrock")]
        BackendKind::Bedrock => {
            let mut gateway = bedrock::BedrockGateway::new(&config.bedrock).await;
            if let Some(model) = model_override {
                gateway = gateway.with_model(model);
            }
            Ok(Arc::new(gateway))
        }
        #[cfg(not(feature = "bedrock"))]
        BackendKind::Bedrock => Err(GatewayError::ModelNotAvailable(
            "this build does not include the Bedrock backend (enable the `bedrock` feature)"
                .to_string(),
        )),
    }
}
