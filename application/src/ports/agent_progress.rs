//! Agent execution progress port.
//!
//! [`AgentProgressNotifier`] is an **output port** that the presentation layer
//! implements to display real-time progress while a question is answered.
//!
//! All methods have default no-op implementations, so implementers only
//! need to override the callbacks they care about.

use cafe_domain::{ActionKind, ActionParseError, ToolResult};

/// Progress notifier for the agent loop.
pub trait AgentProgressNotifier: Send + Sync {
    /// Called before each model request
    fn on_thinking(&self, _turn: usize, _max_turns: usize) {}

    /// Called when a reply failed validation and the model is re-prompted
    fn on_retry(&self, _attempt: usize, _max_retries: usize, _error: &ActionParseError) {}

    /// Called when a tool is invoked
    fn on_tool_call(&self, _tool: ActionKind, _summary: &str) {}

    /// Called when a tool returns (successfully or not)
    fn on_tool_result(&self, _result: &ToolResult) {}

    /// Called when the model produced its final answer
    fn on_answer(&self, _text: &str) {}

    /// Called when the question fails for good
    fn on_error(&self, _message: &str) {}
}

/// No-op progress notifier
pub struct NoAgentProgress;

impl AgentProgressNotifier for NoAgentProgress {}
