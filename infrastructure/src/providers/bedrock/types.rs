//! Conversions between the Bedrock SDK and domain types

use aws_sdk_bedrockruntime::types as bedrock;
use cafe_application::ports::llm_gateway::GatewayError;
use cafe_domain::{Message, Role};

/// Convert a domain message to a Bedrock text message.
pub fn to_bedrock_message(message: &Message) -> Result<bedrock::Message, GatewayError> {
    let role = match message.role {
        Role::User => bedrock::ConversationRole::User,
        Role::Assistant => bedrock::ConversationRole::Assistant,
    };
    bedrock::Message::builder()
        .role(role)
        .content(bedrock::ContentBlock::Text(message.content.clone()))
        .build()
        .map_err(|e| GatewayError::RequestFailed(format!("Failed to build message: {}", e)))
}

/// Concatenate the text blocks of a Converse output.
pub fn output_text(output: &bedrock::ConverseOutput) -> Result<String, GatewayError> {
    let bedrock::ConverseOutput::Message(message) = output else {
        return Err(GatewayError::MalformedResponse(
            "Bedrock output is not a message".to_string(),
        ));
    };

    let text: Vec<&str> = message
        .content()
        .iter()
        .filter_map(|block| match block {
            bedrock::ContentBlock::Text(text) => Some(text.as_str()),
            _ => None,
        })
        .collect();

    if text.is_empty() {
        return Err(GatewayError::MalformedResponse(
            "Bedrock reply contained no text".to_string(),
        ));
    }
    Ok(text.join(""))
}

/// Convert a Bedrock SDK error to a GatewayError.
pub fn convert_converse_error(
    err: &aws_sdk_bedrockruntime::error::SdkError<
        aws_sdk_bedrockruntime::operation::converse::ConverseError,
    >,
    timeout_secs: u64,
) -> GatewayError {
    use aws_sdk_bedrockruntime::operation::converse::ConverseError;

    match err {
        aws_sdk_bedrockruntime::error::SdkError::ServiceError(service_err) => {
            match service_err.err() {
                ConverseError::ThrottlingException(e) => {
                    GatewayError::RequestFailed(format!("Bedrock throttled: {}", e))
                }
                ConverseError::ModelNotReadyException(e) => {
                    GatewayError::ModelNotAvailable(format!("Bedrock model not ready: {}", e))
                }
                ConverseError::ResourceNotFoundException(e) => {
                    GatewayError::ModelNotAvailable(format!("Bedrock model not found: {}", e))
                }
                ConverseError::AccessDeniedException(e) => {
                    GatewayError::RequestFailed(format!("Bedrock access denied: {}", e))
                }
                ConverseError::ValidationException(e) => {
                    GatewayError::RequestFailed(format!("Bedrock validation error: {}", e))
                }
                ConverseError::ModelTimeoutException(_) => GatewayError::Timeout(timeout_secs),
                other => GatewayError::RequestFailed(format!("Bedrock error: {:?}", other)),
            }
        }
        aws_sdk_bedrockruntime::error::SdkError::TimeoutError(_) => {
            GatewayError::Timeout(timeout_secs)
        }
        other => GatewayError::ConnectionError(format!("Bedrock SDK error: {}", other)),
    }
}
