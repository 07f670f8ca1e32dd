//! Domain error types

use thiserror::Error;

/// Domain-level errors
#[derive(Error, Debug)]
pub enum DomainError {
    #[error("Invalid question: {0}")]
    InvalidQuestion(String),

    #[error("Unknown backend kind: {0}")]
    UnknownBackend(String),

    #[error("Invalid scenario: {0}")]
    InvalidScenario(String),
}
