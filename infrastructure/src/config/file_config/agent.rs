//! Agent configuration from TOML (`[agent]` section)

use super::zero_limit;
use cafe_application::ExecutionParams;
use cafe_domain::{ConfigIssue, ConfigIssueCode, Severity};
use serde::{Deserialize, Serialize};

/// Raw agent configuration from TOML
///
/// # Example
///
/// ```toml
/// [agent]
/// max_turns = 10       # tool-executing turns per question
/// max_retries = 3      # re-prompts after malformed replies, per turn
/// history_turns = 8    # prior user/assistant messages sent as context
/// ```
///
/// `history_turns` counts whole exchanges, so an odd value is rounded down;
/// the context must start with a user message.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FileAgentConfig {
    pub max_turns: usize,
    pub max_retries: usize,
    pub history_turns: usize,
}

impl Default for FileAgentConfig {
    fn default() -> Self {
        let params = ExecutionParams::default();
        Self {
            max_turns: params.max_turns,
            max_retries: params.max_retries,
            history_turns: params.history_turns,
        }
    }
}

impl FileAgentConfig {
    pub fn validate(&self) -> Vec<ConfigIssue> {
        let mut issues = Vec::new();
        if self.max_turns == 0 {
            issues.push(zero_limit("agent.max_turns", Severity::Error));
        }
        if self.history_turns % 2 == 1 {
            let used = self.even_history_turns();
            issues.push(ConfigIssue {
                severity: Severity::Warning,
                code: ConfigIssueCode::OddValue {
                    field: "agent.history_turns".to_string(),
                    used,
                },
                message: format!(
                    "agent.history_turns should be even (user/assistant pairs); using {used}"
                ),
            });
        }
        issues
    }

    /// Convert to application execution parameters.
    pub fn to_execution_params(&self) -> ExecutionParams {
        ExecutionParams::default()
            .with_max_turns(self.max_turns)
            .with_max_retries(self.max_retries)
            .with_history_turns(self.even_history_turns())
    }

    fn even_history_turns(&self) -> usize {
        self.history_turns - self.history_turns % 2
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_execution_params() {
        assert_eq!(
            FileAgentConfig::default().to_execution_params(),
            ExecutionParams::default()
        );
    }

    #[test]
    fn test_zero_retries_is_allowed() {
        let config = FileAgentConfig {
            max_retries: 0,
            ..Default::default()
        };
        assert!(config.validate().is_empty());
        assert_eq!(config.to_execution_params().max_retries, 0);
    }

    #[test]
    fn test_odd_history_turns_rounded_down() {
        let config = FileAgentConfig {
            history_turns: 7,
            ..Default::default()
        };
        let issues = config.validate();
        assert_eq!(issues.len(), 1);
        assert!(!issues[0].is_error());
        assert_eq!(
            issues[0].code,
            ConfigIssueCode::OddValue {
                field: "agent.history_turns".to_string(),
                used: 6
            }
        );
        assert_eq!(config.to_execution_params().history_turns, 6);
    }
}
