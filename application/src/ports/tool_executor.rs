//! Tool Executor port
//!
//! Defines the interface for executing the model's non-answer actions.

use async_trait::async_trait;
use cafe_domain::{Action, ActionKind, ToolDefinition, ToolResult, ToolSpec};

/// Port for tool execution
///
/// Executors never fail the question: every failure is reported as an
/// unsuccessful [`ToolResult`] that the loop feeds back to the model.
#[async_trait]
pub trait ToolExecutorPort: Send + Sync {
    /// Get the specification of all available tools
    fn tool_spec(&self) -> &ToolSpec;

    /// Check if a tool is available
    fn has_tool(&self, kind: ActionKind) -> bool {
        self.tool_spec().contains(kind)
    }

    /// Get the definition of a specific tool
    fn get_tool(&self, kind: ActionKind) -> Option<&ToolDefinition> {
        self.tool_spec().get(kind)
    }

    /// Get names of all available tools
    fn available_tools(&self) -> Vec<&'static str> {
        self.tool_spec().names().collect()
    }

    /// Human-readable description of the data the tools operate on,
    /// embedded in the system prompt.
    fn schema_description(&self) -> String;

    /// Execute a validated, non-answer action
    async fn execute(&self, action: &Action) -> ToolResult;
}
