//! Tool domain module
//!
//! Every non-answer [`Action`](crate::action::Action) is executed by a tool.
//! This module holds the pure side of that:
//!
//! - [`ToolSpec`] - which tools are registered, in prompt order
//! - [`ToolDefinition`] - name, description and parameters of one tool
//! - [`ToolResult`] - a kind-tagged [`ToolOutput`] or a coded [`ToolError`],
//!   rendered to text for the model by [`ToolResult::to_observation`]
//!
//! ```text
//! ┌──────────────┐    ┌──────────────┐    ┌──────────────┐
//! │ ToolSpec     │───▶│ Action       │───▶│ ToolResult   │
//! │ (registry)   │    │ (invocation) │    │ (observation)│
//! └──────────────┘    └──────────────┘    └──────────────┘
//! ```
//!
//! Execution itself lives behind the application layer's `ToolExecutorPort`.

pub mod entities;
pub mod value_objects;

pub use entities::{ParamType, ToolDefinition, ToolParameter, ToolSpec};
pub use value_objects::{
    GameMatch, QueryRows, ToolError, ToolOutput, ToolResult, ToolResultMetadata,
};
