//! Domain layer for cafe-assistant
//!
//! This crate contains the core business logic, entities, and value objects.
//! It has no dependencies on infrastructure or presentation concerns.
//!
//! # Core Concepts
//!
//! ## Actions
//!
//! The model drives the assistant by emitting exactly one JSON [`Action`]
//! per turn: `query`, `calculate`, `search`, `whatif` or `answer`.
//! [`parse_action`] recovers actions from messy model output and classifies
//! what it cannot recover as an [`ActionParseError`].
//!
//! ## Safe evaluation
//!
//! The [`calculator`] never evaluates anything outside a closed set of
//! arithmetic and statistics nodes.
//!
//! ## What-if projections
//!
//! [`whatif`] turns sales and expense aggregates into linear projections.

pub mod action;
pub mod calculator;
pub mod config;
pub mod conversation;
pub mod core;
pub mod prompt;
pub mod tool;
pub mod util;
pub mod whatif;

// Re-export commonly used types
pub use action::{Action, ActionKind, ActionParseError, ParsedAction, parse_action};
pub use calculator::{CalcError, calculate};
pub use config::{BackendKind, ConfigIssue, ConfigIssueCode, Severity};
pub use conversation::entities::{ConversationHistory, DEFAULT_HISTORY_TURNS, Message, Role};
pub use core::{error::DomainError, question::Question};
pub use prompt::AgentPromptTemplate;
pub use tool::{
    entities::{ParamType, ToolDefinition, ToolParameter, ToolSpec},
    value_objects::{GameMatch, QueryRows, ToolError, ToolOutput, ToolResult, ToolResultMetadata},
};
pub use whatif::{ExpenseCategory, PriceTarget, Projection, Scenario};
