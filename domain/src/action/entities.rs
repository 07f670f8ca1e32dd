//! Action entities

use crate::whatif::Scenario;
use serde::{Deserialize, Serialize};

/// Number of search matches returned when the model omits `n`.
pub const DEFAULT_SEARCH_RESULTS: usize = 5;

/// Field-less discriminant of [`Action`], as spelled on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ActionKind {
    Query,
    Calculate,
    Search,
    WhatIf,
    Answer,
}

impl ActionKind {
    pub const ALL: [ActionKind; 5] = [
        ActionKind::Query,
        ActionKind::Calculate,
        ActionKind::Search,
        ActionKind::WhatIf,
        ActionKind::Answer,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ActionKind::Query => "query",
            ActionKind::Calculate => "calculate",
            ActionKind::Search => "search",
            ActionKind::WhatIf => "whatif",
            ActionKind::Answer => "answer",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        ActionKind::ALL.into_iter().find(|kind| kind.as_str() == s)
    }
}

impl std::fmt::Display for ActionKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A single decision made by the model (Entity)
#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    /// Run a read-only SQL statement.
    Query { sql: String },
    /// Evaluate an arithmetic/statistics expression.
    Calculate { expression: String },
    /// Semantic lookup over the game catalogue.
    Search { query: String, n: usize },
    /// Project a hypothetical business change.
    WhatIf(Scenario),
    /// Final natural-language answer; ends the loop.
    Answer { text: String },
}

impl Action {
    pub fn kind(&self) -> ActionKind {
        match self {
            Action::Query { .. } => ActionKind::Query,
            Action::Calculate { .. } => ActionKind::Calculate,
            Action::Search { .. } => ActionKind::Search,
            Action::WhatIf(_) => ActionKind::WhatIf,
            Action::Answer { .. } => ActionKind::Answer,
        }
    }

    pub fn is_answer(&self) -> bool {
        matches!(self, Action::Answer { .. })
    }

    /// One-line summary for progress display.
    pub fn summary(&self) -> String {
        match self {
            Action::Query { sql } => crate::core::string::single_line(sql),
            Action::Calculate { expression } => expression.clone(),
            Action::Search { query, n } => format!("{query} (top {n})"),
            Action::WhatIf(scenario) => scenario.type_name().to_string(),
            Action::Answer { text } => text.clone(),
        }
    }
}

/// A validated action plus the cleaned JSON text it was parsed from.
///
/// The cleaned text (a single object, newline-repaired) is what gets
/// recorded in the transcript as the assistant's turn.
#[derive(Debug, Clone, PartialEq)]
pub struct ParsedAction {
    pub action: Action,
    pub cleaned_json: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_round_trip_names() {
        for kind in ActionKind::ALL {
            assert_eq!(ActionKind::parse(kind.as_str()), Some(kind));
        }
        assert_eq!(ActionKind::parse("delete"), None);
    }

    #[test]
    fn test_summary_flattens_sql() {
        let action = Action::Query {
            sql: "SELECT name\nFROM board_games".to_string(),
        };
        assert_eq!(action.summary(), "SELECT name FROM board_games");
        assert_eq!(action.kind(), ActionKind::Query);
        assert!(!action.is_answer());
    }
}
