//! Storage configuration from TOML (`[database]` and `[search]` sections)

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// SQLite database settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FileDatabaseConfig {
    /// Path to the SQLite database file
    pub path: PathBuf,
    /// Maximum rows a query observation may carry
    pub max_rows: usize,
}

impl Default for FileDatabaseConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from("cafe.db"),
            max_rows: 50,
        }
    }
}

/// Semantic game search settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FileSearchConfig {
    /// Register the `search` tool
    pub enabled: bool,
    /// Upper bound on matches per search (1-15)
    pub top_k: usize,
}

impl Default for FileSearchConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            top_k: 15,
        }
    }
}
