//! Execution parameters - agent loop control.
//!
//! [`ExecutionParams`] groups the static parameters that bound the loop in
//! [`RunAskUseCase`](crate::use_cases::run_ask::RunAskUseCase).

use cafe_domain::DEFAULT_HISTORY_TURNS;
use serde::{Deserialize, Serialize};

/// Default number of tool-executing turns per question.
pub const DEFAULT_MAX_TURNS: usize = 10;

/// Default number of re-prompts after malformed replies, per turn.
pub const DEFAULT_MAX_RETRIES: usize = 3;

/// Agent loop control parameters.
///
/// Turn and retry budgets are independent: a malformed reply consumes a
/// retry, never a turn, and the retry budget is restored after every
/// successfully validated reply.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExecutionParams {
    /// Maximum tool-executing turns before giving up.
    pub max_turns: usize,
    /// Maximum re-prompts for invalid replies within one turn.
    pub max_retries: usize,
    /// Prior conversation turns (user + assistant messages) sent as context.
    pub history_turns: usize,
}

impl Default for ExecutionParams {
    fn default() -> Self {
        Self {
            max_turns: DEFAULT_MAX_TURNS,
            max_retries: DEFAULT_MAX_RETRIES,
            history_turns: DEFAULT_HISTORY_TURNS,
        }
    }
}

impl ExecutionParams {
    // ==================== Builder Methods ====================

    pub fn with_max_turns(mut self, max: usize) -> Self {
        self.max_turns = max;
        self
    }

    pub fn with_max_retries(mut self, max: usize) -> Self {
        self.max_retries = max;
        self
    }

    pub fn with_history_turns(mut self, turns: usize) -> Self {
        self.history_turns = turns;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default() {
        let params = ExecutionParams::default();
        assert_eq!(params.max_turns, 10);
        assert_eq!(params.max_retries, 3);
        assert_eq!(params.history_turns, 8);
    }

    #[test]
    fn test_builder() {
        let params = ExecutionParams::default()
            .with_max_turns(4)
            .with_max_retries(1)
            .with_history_turns(2);

        assert_eq!(params.max_turns, 4);
        assert_eq!(params.max_retries, 1);
        assert_eq!(params.history_turns, 2);
    }
}
