//! Model backend selection

use crate::core::error::DomainError;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Model backend (Value Object)
///
/// Chosen explicitly by configuration and passed to the gateway factory;
/// there is no process-wide default switch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BackendKind {
    /// AWS Bedrock Converse API
    #[default]
    Bedrock,
    /// Local Ollama server
    Ollama,
}

impl BackendKind {
    pub const ALL: [BackendKind; 2] = [BackendKind::Bedrock, BackendKind::Ollama];

    pub fn as_str(&self) -> &'static str {
        match self {
            BackendKind::Bedrock => "bedrock",
            BackendKind::Ollama => "ollama",
        }
    }
}

impl FromStr for BackendKind {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "bedrock" | "aws" => Ok(BackendKind::Bedrock),
            "ollama" | "local" => Ok(BackendKind::Ollama),
            other => Err(DomainError::UnknownBackend(other.to_string())),
        }
    }
}

impl std::fmt::Display for BackendKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_backend() {
        assert_eq!("bedrock".parse::<BackendKind>().unwrap(), BackendKind::Bedrock);
        assert_eq!(" Ollama ".parse::<BackendKind>().unwrap(), BackendKind::Ollama);
        assert_eq!("local".parse::<BackendKind>().unwrap(), BackendKind::Ollama);
        assert!("openai".parse::<BackendKind>().is_err());
    }

    #[test]
    fn test_default_is_bedrock() {
        assert_eq!(BackendKind::default(), BackendKind::Bedrock);
        assert_eq!(BackendKind::default().to_string(), "bedrock");
    }
}
