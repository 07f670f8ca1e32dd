//! Query tool: read-only SQL against the cafe database

use crate::storage::CafeDatabase;
use cafe_domain::tool::entities::{ToolDefinition, ToolParameter};
use cafe_domain::{ActionKind, ToolError, ToolOutput, ToolResult};
use std::time::Instant;
use tracing::debug;

/// Get the tool definition for query
pub fn query_definition() -> ToolDefinition {
    ToolDefinition::new(ActionKind::Query, "Run a SQL SELECT query against the database")
        .with_parameter(ToolParameter::new("sql", "A single SELECT statement", true))
        .with_example(r#"{"action": "query", "sql": "SELECT name, price FROM board_games WHERE category = 'Strategy'"}"#)
}

/// Skip whitespace, `--` line comments and `/* */` block comments.
fn skip_noise(sql: &str) -> &str {
    let mut rest = sql;
    loop {
        let trimmed = rest.trim_start();
        if let Some(after) = trimmed.strip_prefix("--") {
            rest = after.find('\n').map_or("", |i| &after[i + 1..]);
        } else if let Some(after) = trimmed.strip_prefix("/*") {
            rest = after.find("*/").map_or("", |i| &after[i + 2..]);
        } else {
            return trimmed;
        }
    }
}

/// Byte offset of the first `;` outside literals, identifiers and comments.
fn statement_end(sql: &str) -> Option<usize> {
    let bytes = sql.as_bytes();
    let mut i = 0;
    while i < bytes.len() {
        match bytes[i] {
            quote @ (b'\'' | b'"' | b'`') => {
                i += 1;
                while i < bytes.len() {
                    if bytes[i] == quote {
                        // Doubled quote is an escaped quote
                        if bytes.get(i + 1) == Some(&quote) {
                            i += 1;
                        } else {
                            break;
                        }
                    }
                    i += 1;
                }
            }
            b'-' if bytes.get(i + 1) == Some(&b'-') => {
                while i < bytes.len() && bytes[i] != b'\n' {
                    i += 1;
                }
            }
            b'/' if bytes.get(i + 1) == Some(&b'*') => {
                i += 2;
                while i < bytes.len() && !(bytes[i] == b'*' && bytes.get(i + 1) == Some(&b'/')) {
                    i += 1;
                }
                i += 1;
            }
            b';' => return Some(i),
            _ => {}
        }
        i += 1;
    }
    None
}

/// Accept exactly one SELECT statement; returns it without the trailing `;`.
pub fn check_select(sql: &str) -> Result<&str, ToolError> {
    let statement = skip_noise(sql);
    if statement.is_empty() {
        return Err(ToolError::invalid_argument("SQL statement is empty"));
    }

    let keyword: String = statement
        .chars()
        .take_while(|c| c.is_ascii_alphanumeric() || *c == '_')
        .collect();
    if !keyword.eq_ignore_ascii_case("select") {
        let shown = if keyword.is_empty() { "(none)".to_string() } else { keyword.to_uppercase() };
        return Err(ToolError::forbidden_statement(format!(
            "Only SELECT statements are allowed, got {shown}"
        )));
    }

    match statement_end(statement) {
        Some(end) if !skip_noise(&statement[end + 1..]).is_empty() => Err(
            ToolError::forbidden_statement("Only a single SELECT statement is allowed"),
        ),
        Some(end) => Ok(statement[..end].trim_end()),
        None => Ok(statement.trim_end()),
    }
}

/// Execute the query tool
pub fn execute_query(db: &CafeDatabase, sql: &str) -> ToolResult {
    let start = Instant::now();

    let statement = match check_select(sql) {
        Ok(s) => s,
        Err(e) => return ToolResult::failure(ActionKind::Query, e),
    };

    let result = match db.query(statement) {
        Ok(rows) => {
            debug!(rows = rows.len(), truncated = rows.truncated, "Query executed");
            ToolResult::success(ActionKind::Query, ToolOutput::Rows(rows))
        }
        Err(e) => ToolResult::failure(ActionKind::Query, ToolError::execution_failed(e.to_string())),
    };
    result.with_duration(start.elapsed().as_millis() as u64)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn forbidden(sql: &str) -> bool {
        matches!(check_select(sql), Err(e) if e.code == ToolError::FORBIDDEN_STATEMENT)
    }

    #[test]
    fn test_accepts_select() {
        assert_eq!(check_select("  select * from board_games").unwrap(), "select * from board_games");
        assert_eq!(check_select("SELECT 1;").unwrap(), "SELECT 1");
        assert_eq!(check_select("SELECT 1;  -- done").unwrap(), "SELECT 1");
    }

    #[test]
    fn test_skips_leading_comments() {
        let sql = "-- top sellers\n/* ranked */ SELECT name FROM board_games";
        assert_eq!(check_select(sql).unwrap(), "SELECT name FROM board_games");
    }

    #[test]
    fn test_rejects_other_statements() {
        assert!(forbidden("DELETE FROM board_games"));
        assert!(forbidden("drop table game_sales"));
        assert!(forbidden("/* SELECT */ UPDATE board_games SET price = 0"));
        assert!(forbidden("WITH t AS (SELECT 1) SELECT * FROM t"));
        assert!(forbidden("SELECTED"));
    }

    #[test]
    fn test_rejects_second_statement() {
        assert!(forbidden("SELECT 1; DROP TABLE board_games"));
        assert!(forbidden("SELECT 1;SELECT 2"));
    }

    #[test]
    fn test_semicolon_inside_literal_is_not_a_terminator() {
        let sql = "SELECT * FROM board_games WHERE name = 'a;b' OR name = 'it''s; fine'";
        assert_eq!(check_select(sql).unwrap(), sql);
    }

    #[test]
    fn test_empty_statement_is_invalid() {
        let err = check_select("  -- nothing\n").unwrap_err();
        assert_eq!(err.code, ToolError::INVALID_ARGUMENT);
    }
}
