//! Backend configuration from TOML (`[backend]`, `[bedrock]`, `[ollama]` sections)

use cafe_domain::{BackendKind, ConfigIssue, ConfigIssueCode, Severity};
use serde::{Deserialize, Serialize};

/// Default Bedrock model.
pub const DEFAULT_BEDROCK_MODEL: &str = "anthropic.claude-3-haiku-20240307-v1:0";

/// Backend selection
///
/// ```toml
/// [backend]
/// kind = "bedrock"   # "bedrock" or "ollama"
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FileBackendConfig {
    pub kind: String,
}

impl Default for FileBackendConfig {
    fn default() -> Self {
        Self {
            kind: BackendKind::default().to_string(),
        }
    }
}

impl FileBackendConfig {
    /// Parse `kind`, falling back to the default backend with an error issue.
    pub fn parse_kind(&self) -> (BackendKind, Vec<ConfigIssue>) {
        match self.kind.parse::<BackendKind>() {
            Ok(kind) => (kind, vec![]),
            Err(_) => {
                let issue = ConfigIssue {
                    severity: Severity::Error,
                    code: ConfigIssueCode::InvalidEnumValue {
                        field: "backend.kind".to_string(),
                        value: self.kind.clone(),
                        valid_values: BackendKind::ALL.iter().map(|k| k.to_string()).collect(),
                    },
                    message: format!(
                        "backend.kind: unknown value '{}' (expected 'bedrock' or 'ollama')",
                        self.kind
                    ),
                };
                (BackendKind::default(), vec![issue])
            }
        }
    }
}

/// AWS Bedrock settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FileBedrockConfig {
    /// AWS region for Bedrock models (default: "us-east-1")
    pub region: String,
    /// AWS profile name for credentials
    pub profile: Option<String>,
    /// Bedrock model ID
    pub model_id: String,
    /// Max tokens per response (default: 1024)
    pub max_tokens: u32,
    /// Per-request timeout in seconds
    pub timeout_secs: u64,
}

impl Default for FileBedrockConfig {
    fn default() -> Self {
        Self {
            region: "us-east-1".to_string(),
            profile: None,
            model_id: DEFAULT_BEDROCK_MODEL.to_string(),
            max_tokens: 1024,
            timeout_secs: 120,
        }
    }
}

/// Local Ollama settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FileOllamaConfig {
    /// Base URL of the Ollama server
    pub base_url: String,
    /// Model name (llama3, mistral, phi3, ...)
    pub model: String,
    /// Per-request timeout in seconds
    pub timeout_secs: u64,
}

impl Default for FileOllamaConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:11434".to_string(),
            model: "llama3".to_string(),
            timeout_secs: 120,
        }
    }
}
