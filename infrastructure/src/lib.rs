//! Infrastructure layer for cafe-assistant
//!
//! This crate contains adapters that implement the ports defined
//! in the application layer, plus configuration file loading.
//!
//! - [`storage`]: SQLite schema, seeding and the read-only [`CafeDatabase`]
//! - [`search`]: token-hash embeddings over the game catalog
//! - [`tools`]: [`LocalToolExecutor`] and the four tool implementations
//! - [`providers`]: Bedrock and Ollama [`LlmGateway`](cafe_application::LlmGateway) adapters
//! - [`logging`]: JSONL conversation transcript

pub mod config;
pub mod logging;
pub mod providers;
pub mod search;
pub mod storage;
pub mod tools;

// Re-export commonly used types
pub use config::{
    ConfigLoader, FileAgentConfig, FileBackendConfig, FileBedrockConfig, FileConfig,
    FileDatabaseConfig, FileLoggingConfig, FileOllamaConfig, FileReplConfig, FileSearchConfig,
};
pub use logging::JsonlConversationLogger;
pub use providers::{OllamaGateway, build_gateway};
pub use search::GameSearchIndex;
pub use storage::{CafeDatabase, SeedSummary, StorageError, init_db};
pub use tools::LocalToolExecutor;
