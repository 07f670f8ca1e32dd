//! Raw TOML configuration data types
//!
//! These structs represent the exact structure of the TOML config file.
//! They are deserialized directly; string enums are parsed during
//! [`FileConfig::validate`].

mod agent;
mod providers;
mod repl;
mod storage;

pub use agent::FileAgentConfig;
pub use providers::{FileBackendConfig, FileBedrockConfig, FileOllamaConfig};
pub use repl::{FileLoggingConfig, FileReplConfig};
pub use storage::{FileDatabaseConfig, FileSearchConfig};

use crate::search::MAX_RESULTS;
use cafe_domain::{ConfigIssue, ConfigIssueCode, Severity};
use serde::{Deserialize, Serialize};

/// Complete file configuration (raw TOML structure)
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct FileConfig {
    /// Which model backend to use
    pub backend: FileBackendConfig,
    /// AWS Bedrock settings
    pub bedrock: FileBedrockConfig,
    /// Local Ollama settings
    pub ollama: FileOllamaConfig,
    /// Agent loop budgets
    pub agent: FileAgentConfig,
    /// SQLite database
    pub database: FileDatabaseConfig,
    /// Semantic game search
    pub search: FileSearchConfig,
    /// REPL settings
    pub repl: FileReplConfig,
    /// Conversation transcript logging
    pub logging: FileLoggingConfig,
}

impl FileConfig {
    /// Validate the entire configuration, returning all detected issues.
    ///
    /// Errors make the configuration unusable; warnings are reported and
    /// the affected setting falls back to its default.
    pub fn validate(&self) -> Vec<ConfigIssue> {
        let mut issues = Vec::new();

        issues.extend(self.backend.parse_kind().1);
        issues.extend(self.agent.validate());

        for (field, value) in [
            ("bedrock.timeout_secs", self.bedrock.timeout_secs),
            ("ollama.timeout_secs", self.ollama.timeout_secs),
        ] {
            if value == 0 {
                issues.push(zero_limit(field, Severity::Error));
            }
        }
        if self.bedrock.max_tokens == 0 {
            issues.push(zero_limit("bedrock.max_tokens", Severity::Error));
        }
        if self.search.enabled && self.search.top_k == 0 {
            issues.push(zero_limit("search.top_k", Severity::Warning));
        }
        if self.search.enabled && self.search.top_k > MAX_RESULTS {
            issues.push(ConfigIssue {
                severity: Severity::Warning,
                code: ConfigIssueCode::AboveMaximum {
                    field: "search.top_k".to_string(),
                    max: MAX_RESULTS,
                },
                message: format!("search.top_k is capped at {MAX_RESULTS}"),
            });
        }
        if self.database.max_rows == 0 {
            issues.push(zero_limit("database.max_rows", Severity::Error));
        }

        for (field, value) in [
            ("bedrock.model_id", &self.bedrock.model_id),
            ("ollama.model", &self.ollama.model),
            ("ollama.base_url", &self.ollama.base_url),
        ] {
            if value.trim().is_empty() {
                issues.push(ConfigIssue {
                    severity: Severity::Error,
                    code: ConfigIssueCode::EmptyValue {
                        field: field.to_string(),
                    },
                    message: format!("{field} cannot be empty"),
                });
            }
        }

        issues
    }
}

pub(crate) fn zero_limit(field: &str, severity: Severity) -> ConfigIssue {
    ConfigIssue {
        severity,
        code: ConfigIssueCode::ZeroLimit {
            field: field.to_string(),
        },
        message: format!("{field} must be greater than 0"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cafe_domain::BackendKind;

    #[test]
    fn test_deserialize_full_config() {
        let toml_str = r#"
[backend]
kind = "ollama"

[ollama]
base_url = "http://gpu-box:11434"
model = "mistral"
timeout_secs = 60

[bedrock]
region = "eu-west-1"
profile = "cafe"

[agent]
max_turns = 6
max_retries = 2

[database]
path = "/srv/cafe/cafe.db"
max_rows = 25

[search]
enabled = false

[logging]
conversation_log = "/tmp/cafe.jsonl"
"#;

        let config: FileConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(config.backend.parse_kind().0, BackendKind::Ollama);
        assert_eq!(config.ollama.base_url, "http://gpu-box:11434");
        assert_eq!(config.ollama.model, "mistral");
        assert_eq!(config.ollama.timeout_secs, 60);
        assert_eq!(config.bedrock.region, "eu-west-1");
        assert_eq!(config.bedrock.profile.as_deref(), Some("cafe"));
        assert_eq!(config.agent.max_turns, 6);
        assert_eq!(config.agent.max_retries, 2);
        assert_eq!(config.database.path.to_string_lossy(), "/srv/cafe/cafe.db");
        assert_eq!(config.database.max_rows, 25);
        assert!(!config.search.enabled);
        assert_eq!(
            config.logging.conversation_log.as_deref().map(|p| p.to_string_lossy().to_string()),
            Some("/tmp/cafe.jsonl".to_string())
        );
        assert!(config.validate().is_empty());
    }

    #[test]
    fn test_deserialize_partial_config() {
        let config: FileConfig = toml::from_str("[agent]\nmax_turns = 4\n").unwrap();
        assert_eq!(config.agent.max_turns, 4);
        // Defaults should apply
        assert_eq!(config.agent.max_retries, 3);
        assert_eq!(config.backend.parse_kind().0, BackendKind::Bedrock);
        assert_eq!(config.ollama.model, "llama3");
        assert!(config.search.enabled);
        assert_eq!(config.search.top_k, 15);
    }

    #[test]
    fn test_validate_valid_config() {
        assert!(FileConfig::default().validate().is_empty());
    }

    #[test]
    fn test_validate_reports_problems() {
        let mut config = FileConfig::default();
        config.backend.kind = "openai".to_string();
        config.agent.max_turns = 0;
        config.ollama.model = " ".to_string();

        let issues = config.validate();
        assert_eq!(issues.len(), 3);
        assert!(issues.iter().any(|i| matches!(
            &i.code,
            ConfigIssueCode::InvalidEnumValue { field, .. } if field == "backend.kind"
        )));
        assert!(issues.iter().any(|i| i.is_error()
            && matches!(&i.code, ConfigIssueCode::ZeroLimit { field } if field == "agent.max_turns")));
        assert!(issues.iter().any(|i| matches!(
            &i.code,
            ConfigIssueCode::EmptyValue { field } if field == "ollama.model"
        )));
    }

    #[test]
    fn test_top_k_above_cap_is_a_warning() {
        let mut config = FileConfig::default();
        config.search.top_k = 40;

        let issues = config.validate();
        assert_eq!(issues.len(), 1);
        assert!(!issues[0].is_error());
        assert_eq!(
            issues[0].code,
            ConfigIssueCode::AboveMaximum {
                field: "search.top_k".to_string(),
                max: 15
            }
        );
    }
}
