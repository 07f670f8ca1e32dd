//! Interactive chat module
//!
//! Provides a reedline-based interactive chat interface for the assistant.

mod repl;

pub use repl::{ChatRepl, ReplCommand};
