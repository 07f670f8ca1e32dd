//! Tool outcomes: output kinds, error codes and execution metadata
//!
//! Every tool execution produces a [`ToolResult`]. Tool failures are
//! ordinary values here: the agent loop feeds them back to the model as an
//! observation and lets it try something else.

use crate::action::ActionKind;
use crate::calculator::format_number;
use crate::whatif::Projection;
use serde::ser::{SerializeMap, Serializer};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A failed tool call, reported to the model as an observation.
///
/// | Code | Description |
/// |------|-------------|
/// | `FORBIDDEN_STATEMENT` | SQL other than a single SELECT |
/// | `DISALLOWED_EXPRESSION` | Calculator input outside the whitelist |
/// | `DIVISION_BY_ZERO` | Calculator divided by zero |
/// | `INVALID_ARGUMENT` | Malformed input the model can fix |
/// | `NOT_FOUND` | Unknown item, empty aggregate or unregistered tool |
/// | `EXECUTION_FAILED` | Storage or runtime failure |
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolError {
    /// One of the associated code constants
    pub code: String,
    pub message: String,
}

impl ToolError {
    pub const FORBIDDEN_STATEMENT: &'static str = "FORBIDDEN_STATEMENT";
    pub const DISALLOWED_EXPRESSION: &'static str = "DISALLOWED_EXPRESSION";
    pub const DIVISION_BY_ZERO: &'static str = "DIVISION_BY_ZERO";
    pub const INVALID_ARGUMENT: &'static str = "INVALID_ARGUMENT";
    pub const NOT_FOUND: &'static str = "NOT_FOUND";
    pub const EXECUTION_FAILED: &'static str = "EXECUTION_FAILED";

    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
        }
    }

    pub fn forbidden_statement(message: impl Into<String>) -> Self {
        Self::new(Self::FORBIDDEN_STATEMENT, message)
    }

    pub fn disallowed_expression(message: impl Into<String>) -> Self {
        Self::new(Self::DISALLOWED_EXPRESSION, message)
    }

    pub fn division_by_zero() -> Self {
        Self::new(Self::DIVISION_BY_ZERO, "division by zero")
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(Self::NOT_FOUND, message)
    }

    pub fn invalid_argument(message: impl Into<String>) -> Self {
        Self::new(Self::INVALID_ARGUMENT, message)
    }

    pub fn execution_failed(message: impl Into<String>) -> Self {
        Self::new(Self::EXECUTION_FAILED, message)
    }
}

impl std::fmt::Display for ToolError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}] {}", self.code, self.message)
    }
}

impl std::error::Error for ToolError {}

/// Rows returned by a query, columns in select order.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct QueryRows {
    pub columns: Vec<String>,
    pub rows: Vec<Vec<Value>>,
    /// More rows existed than were returned.
    pub truncated: bool,
}

impl QueryRows {
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Borrowing views that serialize each row as a column-ordered object.
    fn records(&self) -> Vec<RowRecord<'_>> {
        self.rows
            .iter()
            .map(|values| RowRecord {
                columns: &self.columns,
                values,
            })
            .collect()
    }
}

struct RowRecord<'a> {
    columns: &'a [String],
    values: &'a [Value],
}

impl Serialize for RowRecord<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.columns.len()))?;
        for (column, value) in self.columns.iter().zip(self.values) {
            map.serialize_entry(column, value)?;
        }
        map.end()
    }
}

/// A board game matched by semantic search.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GameMatch {
    pub name: String,
    pub category: String,
    pub price: f64,
    pub in_stock: i64,
    /// Cosine similarity, rounded to three decimals.
    pub relevance: f64,
}

/// Successful tool output, tagged by kind.
#[derive(Debug, Clone, PartialEq)]
pub enum ToolOutput {
    Rows(QueryRows),
    Number(f64),
    Matches(Vec<GameMatch>),
    Projection(Projection),
}

/// Timing and size facts recorded alongside a result.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ToolResultMetadata {
    /// Wall-clock time in milliseconds
    #[serde(skip_serializing_if = "Option::is_none")]
    pub duration_ms: Option<u64>,
    /// Rows returned by a query or matches returned by search
    #[serde(skip_serializing_if = "Option::is_none")]
    pub match_count: Option<usize>,
    /// Query result was capped
    #[serde(default)]
    pub truncated: bool,
}

/// Outcome of one tool call: exactly one of `output` or `error` is set.
#[derive(Debug, Clone, PartialEq)]
pub struct ToolResult {
    pub tool: ActionKind,
    pub success: bool,
    pub output: Option<ToolOutput>,
    pub error: Option<ToolError>,
    pub metadata: ToolResultMetadata,
}

impl ToolResult {
    /// Successful result; row and match counts are copied into the metadata.
    pub fn success(tool: ActionKind, output: ToolOutput) -> Self {
        let metadata = match &output {
            ToolOutput::Rows(rows) => ToolResultMetadata {
                match_count: Some(rows.len()),
                truncated: rows.truncated,
                ..Default::default()
            },
            ToolOutput::Matches(matches) => ToolResultMetadata {
                match_count: Some(matches.len()),
                ..Default::default()
            },
            _ => ToolResultMetadata::default(),
        };
        Self {
            tool,
            success: true,
            output: Some(output),
            error: None,
            metadata,
        }
    }

    pub fn failure(tool: ActionKind, error: ToolError) -> Self {
        Self {
            tool,
            success: false,
            output: None,
            error: Some(error),
            metadata: ToolResultMetadata::default(),
        }
    }

    pub fn with_duration(mut self, duration_ms: u64) -> Self {
        self.metadata.duration_ms = Some(duration_ms);
        self
    }

    pub fn is_success(&self) -> bool {
        self.success
    }

    pub fn output(&self) -> Option<&ToolOutput> {
        self.output.as_ref()
    }

    pub fn error(&self) -> Option<&ToolError> {
        self.error.as_ref()
    }

    /// Render the result as the text the model sees.
    pub fn to_observation(&self) -> String {
        if let Some(error) = &self.error {
            return self.render_error(error);
        }
        match &self.output {
            Some(ToolOutput::Rows(rows)) if rows.is_empty() => {
                "Query returned no results.".to_string()
            }
            Some(ToolOutput::Rows(rows)) => {
                let mut text = pretty(&rows.records());
                if rows.truncated {
                    text.push_str(&format!(
                        "\n(Showing the first {} rows; more rows matched. Use aggregates or LIMIT to narrow the query.)",
                        rows.len()
                    ));
                }
                text
            }
            Some(ToolOutput::Number(value)) => format!("Result: {}", format_number(*value)),
            Some(ToolOutput::Matches(matches)) if matches.is_empty() => {
                "No matching games found.".to_string()
            }
            Some(ToolOutput::Matches(matches)) => pretty(matches),
            Some(ToolOutput::Projection(projection)) => pretty(projection),
            None => "Tool produced no output.".to_string(),
        }
    }

    fn render_error(&self, error: &ToolError) -> String {
        match self.tool {
            ActionKind::Query => format!("Query error [{}]: {}", error.code, error.message),
            ActionKind::Calculate => format!(
                "Calculation error [{}]: {}. Remember: the calculator only supports numbers, \
                 +, -, *, /, parentheses and mean/median/mode/stdev/range. Try a different approach.",
                error.code, error.message
            ),
            ActionKind::Search => format!("Search error [{}]: {}", error.code, error.message),
            ActionKind::WhatIf => format!("Scenario error [{}]: {}", error.code, error.message),
            ActionKind::Answer => error.to_string(),
        }
    }
}

fn pretty<T: Serialize + ?Sized>(value: &T) -> String {
    serde_json::to_string_pretty(value).unwrap_or_else(|e| format!("<unserializable result: {e}>"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_tool_error_display() {
        let err = ToolError::forbidden_statement("only SELECT statements are allowed");
        assert_eq!(err.code, ToolError::FORBIDDEN_STATEMENT);
        assert_eq!(
            err.to_string(),
            "[FORBIDDEN_STATEMENT] only SELECT statements are allowed"
        );
    }

    #[test]
    fn test_rows_observation_keeps_column_order() {
        let rows = QueryRows {
            columns: vec!["name".to_string(), "category".to_string()],
            rows: vec![vec![json!("Catan"), json!("Strategy")]],
            truncated: false,
        };
        let result = ToolResult::success(ActionKind::Query, ToolOutput::Rows(rows));
        let text = result.to_observation();
        let name_pos = text.find("\"name\"").unwrap();
        let category_pos = text.find("\"category\"").unwrap();
        assert!(name_pos < category_pos);
        assert_eq!(result.metadata.match_count, Some(1));
    }

    #[test]
    fn test_empty_rows_observation() {
        let result = ToolResult::success(ActionKind::Query, ToolOutput::Rows(QueryRows::default()));
        assert_eq!(result.to_observation(), "Query returned no results.");
    }

    #[test]
    fn test_truncated_rows_observation() {
        let rows = QueryRows {
            columns: vec!["id".to_string()],
            rows: vec![vec![json!(1)], vec![json!(2)]],
            truncated: true,
        };
        let result = ToolResult::success(ActionKind::Query, ToolOutput::Rows(rows));
        assert!(result.metadata.truncated);
        assert!(result.to_observation().contains("Showing the first 2 rows"));
    }

    #[test]
    fn test_number_observation() {
        let result = ToolResult::success(ActionKind::Calculate, ToolOutput::Number(14.0));
        assert_eq!(result.to_observation(), "Result: 14");
    }

    #[test]
    fn test_error_observation() {
        let result = ToolResult::failure(ActionKind::Calculate, ToolError::division_by_zero());
        let text = result.to_observation();
        assert!(text.starts_with("Calculation error [DIVISION_BY_ZERO]: division by zero."));
        assert!(!result.is_success());
    }

    #[test]
    fn test_empty_matches_observation() {
        let result = ToolResult::success(ActionKind::Search, ToolOutput::Matches(vec![]));
        assert_eq!(result.to_observation(), "No matching games found.");
    }
}
