//! Presentation-level configuration
//!
//! Settings for the chat REPL, filled in by the binary from the
//! `[repl]` section of the file configuration.

use std::path::PathBuf;

/// Question/answer pairs the REPL carries into the next question.
pub const MAX_HISTORY_PAIRS: usize = 4;

/// REPL configuration for the presentation layer
#[derive(Debug, Clone)]
pub struct ReplConfig {
    /// Show progress indicators
    pub show_progress: bool,
    /// Path to the line-editor history file
    pub history_file: Option<PathBuf>,
    /// Conversation window in question/answer pairs
    pub max_history_pairs: usize,
}

impl Default for ReplConfig {
    fn default() -> Self {
        Self {
            show_progress: true,
            history_file: None,
            max_history_pairs: MAX_HISTORY_PAIRS,
        }
    }
}

impl ReplConfig {
    pub fn with_progress(mut self, show: bool) -> Self {
        self.show_progress = show;
        self
    }

    pub fn with_history_file(mut self, path: Option<PathBuf>) -> Self {
        self.history_file = path;
        self
    }
}
