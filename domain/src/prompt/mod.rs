//! Prompt domain
//!
//! Templates for the agent's system prompt and the corrective messages the
//! loop appends to the transcript.

pub mod agent;

pub use agent::AgentPromptTemplate;
