//! Configuration file loading for cafe-assistant
//!
//! This module handles file I/O and merging of configuration from multiple sources.
//! The priority order (highest to lowest):
//!
//! 1. `CAFE_`-prefixed environment variables (`CAFE_BACKEND__KIND=ollama`)
//! 2. `--config <path>` specified file
//! 3. Project root: `./cafe.toml` or `./.cafe.toml`
//! 4. Global: `$XDG_CONFIG_HOME/cafe-assistant/config.toml`
//! 5. Default values

mod file_config;
mod loader;

pub use file_config::{
    FileAgentConfig, FileBackendConfig, FileBedrockConfig, FileConfig, FileDatabaseConfig,
    FileLoggingConfig, FileOllamaConfig, FileReplConfig, FileSearchConfig,
};
pub use loader::{ConfigLoader, ConfigSource};
