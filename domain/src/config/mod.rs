//! Configuration value objects shared by the outer layers.
//!
//! - [`BackendKind`] - which model backend answers questions
//! - [`ConfigIssue`] - a structured problem found while validating config

mod backend;
mod validation;

pub use backend::BackendKind;
pub use validation::{ConfigIssue, ConfigIssueCode, Severity};
