//! Application layer for cafe-assistant
//!
//! This crate contains the agent loop use case, port definitions, and
//! application configuration. It depends only on the domain layer.

pub mod config;
pub mod ports;
pub mod use_cases;

// Re-export commonly used types
pub use config::ExecutionParams;
pub use ports::{
    agent_progress::{AgentProgressNotifier, NoAgentProgress},
    conversation_logger::{
        ConversationEvent, ConversationEventKind, ConversationLogger, NoConversationLogger,
    },
    llm_gateway::{GatewayError, LlmGateway},
    tool_executor::ToolExecutorPort,
};
pub use use_cases::run_ask::{AskError, RunAskUseCase};
