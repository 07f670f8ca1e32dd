//! Port for the structured question transcript.
//!
//! Diagnostics go through `tracing`; this port records what the model saw
//! and did for each question (replies, rejected replies, tool calls and
//! observations) so a transcript can be replayed or audited afterwards.

use serde_json::Value;

/// Step of the agent loop an event records.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConversationEventKind {
    Question,
    LlmResponse,
    InvalidResponse,
    ToolCall,
    ToolResult,
    Answer,
    Failure,
}

impl ConversationEventKind {
    /// Name written to the `type` field of a transcript record.
    pub fn as_str(&self) -> &'static str {
        match self {
            ConversationEventKind::Question => "question",
            ConversationEventKind::LlmResponse => "llm_response",
            ConversationEventKind::InvalidResponse => "invalid_response",
            ConversationEventKind::ToolCall => "tool_call",
            ConversationEventKind::ToolResult => "tool_result",
            ConversationEventKind::Answer => "answer",
            ConversationEventKind::Failure => "failure",
        }
    }
}

/// One transcript record: its kind plus an event-specific JSON payload.
pub struct ConversationEvent {
    pub kind: ConversationEventKind,
    pub payload: Value,
}

impl ConversationEvent {
    pub fn new(kind: ConversationEventKind, payload: Value) -> Self {
        Self { kind, payload }
    }
}

/// Sink for transcript events.
///
/// Logging never fails the question; adapters handle their own write errors.
pub trait ConversationLogger: Send + Sync {
    fn log(&self, event: ConversationEvent);
}

/// Used when no transcript is configured.
pub struct NoConversationLogger;

impl ConversationLogger for NoConversationLogger {
    fn log(&self, _event: ConversationEvent) {}
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_event_kind_names() {
        assert_eq!(ConversationEventKind::LlmResponse.as_str(), "llm_response");
        assert_eq!(ConversationEventKind::InvalidResponse.as_str(), "invalid_response");
        assert_eq!(ConversationEventKind::Failure.as_str(), "failure");
    }
}
