//! SQLite storage for the cafe's business data
//!
//! - [`schema`] owns the DDL and the schema description shown to the model
//! - [`seed`] creates and populates a database (`--init-db`)
//! - [`CafeDatabase`] is the read-only handle the tools run against

mod database;
pub mod schema;
pub mod seed;

pub use database::{CafeDatabase, CatalogItem, GameRecord, ItemSales, ItemSource};
pub use seed::{SeedSummary, init_db};

use std::path::PathBuf;
use thiserror::Error;

/// Errors from opening, seeding or reading the database.
#[derive(Error, Debug)]
pub enum StorageError {
    #[error("Database not found at {0} (run with --init-db to create it)")]
    NotFound(PathBuf),

    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("Failed to create directory {path}: {source}")]
    CreateDir {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Database connection lock poisoned")]
    Poisoned,
}

pub type Result<T> = std::result::Result<T, StorageError>;
