//! Presentation layer for cafe-assistant
//!
//! This crate contains the CLI definition, console formatting,
//! progress reporters, and the interactive chat REPL.

pub mod chat;
pub mod cli;
pub mod config;
pub mod output;
pub mod progress;

// Re-export commonly used types
pub use chat::ChatRepl;
pub use cli::commands::{BackendArg, Cli};
pub use config::ReplConfig;
pub use output::console::ConsoleFormatter;
pub use progress::reporter::{AgentProgressReporter, SimpleProgress, progress_notifier};
