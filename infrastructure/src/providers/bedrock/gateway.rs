//! Bedrock gateway
//!
//! Implements [`LlmGateway`] on top of the stateless Converse API: every
//! call sends the system prompt and the full transcript.

use super::types;
use crate::config::FileBedrockConfig;
use async_trait::async_trait;
use aws_sdk_bedrockruntime::Client as BedrockClient;
use aws_sdk_bedrockruntime::types as bedrock;
use cafe_application::ports::llm_gateway::{GatewayError, LlmGateway};
use cafe_domain::Message;
use std::time::Duration;
use tracing::{debug, info};

pub struct BedrockGateway {
    client: BedrockClient,
    model_id: String,
    max_tokens: i32,
    timeout: Duration,
}

impl BedrockGateway {
    /// Create a gateway from configuration.
    ///
    /// Resolves AWS credentials from the default chain (or the named profile).
    /// Missing credentials surface on the first request, not here.
    pub async fn new(config: &FileBedrockConfig) -> Self {
        let mut loader = aws_config::defaults(aws_config::BehaviorVersion::latest())
            .region(aws_config::Region::new(config.region.clone()));

        if let Some(ref profile) = config.profile {
            loader = loader.profile_name(profile);
        }

        let aws_config = loader.load().await;
        info!(region = %config.region, model = %config.model_id, "Bedrock backend initialized");

        Self {
            client: BedrockClient::new(&aws_config),
            model_id: config.model_id.clone(),
            max_tokens: i32::try_from(config.max_tokens).unwrap_or(i32::MAX),
            timeout: Duration::from_secs(config.timeout_secs),
        }
    }

    /// Override the model ID from configuration.
    pub fn with_model(mut self, model_id: impl Into<String>) -> Self {
        self.model_id = model_id.into();
        self
    }
}

#[async_trait]
impl LlmGateway for BedrockGateway {
    fn name(&self) -> &str {
        "bedrock"
    }

    fn model(&self) -> &str {
        &self.model_id
    }

    async fn complete(
        &self,
        system_prompt: &str,
        messages: &[Message],
    ) -> Result<String, GatewayError> {
        let bedrock_messages = messages
            .iter()
            .map(types::to_bedrock_message)
            .collect::<Result<Vec<_>, _>>()?;

        debug!(
            model = %self.model_id,
            messages = bedrock_messages.len(),
            "Calling Bedrock Converse API"
        );

        let request = self
            .client
            .converse()
            .model_id(&self.model_id)
            .set_system(Some(vec![bedrock::SystemContentBlock::Text(
                system_prompt.to_string(),
            )]))
            .set_messages(Some(bedrock_messages))
            .inference_config(
                bedrock::InferenceConfiguration::builder()
                    .max_tokens(self.max_tokens)
                    .build(),
            );

        let timeout_secs = self.timeout.as_secs();
        let response = tokio::time::timeout(self.timeout, request.send())
            .await
            .map_err(|_| GatewayError::Timeout(timeout_secs))?
            .map_err(|e| types::convert_converse_error(&e, timeout_secs))?;

        let output = response.output().ok_or_else(|| {
            GatewayError::MalformedResponse("No output in Bedrock response".to_string())
        })?;
        types::output_text(output)
    }
}
