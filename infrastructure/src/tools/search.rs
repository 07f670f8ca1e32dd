//! Search tool: semantic lookup over the game catalog

use crate::search::GameSearchIndex;
use cafe_domain::tool::entities::{ParamType, ToolDefinition, ToolParameter};
use cafe_domain::{ActionKind, ToolError, ToolOutput, ToolResult};
use std::time::Instant;

/// Get the tool definition for search
pub fn search_definition() -> ToolDefinition {
    ToolDefinition::new(
        ActionKind::Search,
        "Find board games by description, theme or feel",
    )
    .with_parameter(
        ToolParameter::new("query", "Natural-language description of the games wanted", true)
            .with_type(ParamType::String),
    )
    .with_parameter(
        ToolParameter::new("n", "Number of results (default 5, max 15)", false)
            .with_type(ParamType::Integer),
    )
    .with_example(r#"{"action": "search", "query": "cooperative games for families", "n": 5}"#)
}

/// Execute the search tool; `index` is `None` when search is disabled.
pub fn execute_search(index: Option<&GameSearchIndex>, query: &str, n: usize) -> ToolResult {
    let start = Instant::now();

    let Some(index) = index else {
        return ToolResult::failure(
            ActionKind::Search,
            ToolError::not_found("Semantic search is not available; use query instead"),
        );
    };
    if query.trim().is_empty() {
        return ToolResult::failure(
            ActionKind::Search,
            ToolError::invalid_argument("Search query is empty"),
        );
    }

    let matches = index.search(query, n);
    ToolResult::success(ActionKind::Search, ToolOutput::Matches(matches))
        .with_duration(start.elapsed().as_millis() as u64)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::GameRecord;

    #[test]
    fn test_disabled_search_is_not_found() {
        let result = execute_search(None, "party games", 5);
        assert_eq!(result.error().unwrap().code, ToolError::NOT_FOUND);
    }

    #[test]
    fn test_search_returns_matches() {
        let index = GameSearchIndex::build(vec![GameRecord {
            id: 1,
            name: "Codenames".to_string(),
            category: "Party".to_string(),
            price: 19.99,
            in_stock: 15,
        }]);
        let result = execute_search(Some(&index), "party", 3);
        assert!(result.is_success());
        assert_eq!(result.metadata.match_count, Some(1));
        assert!(result.to_observation().contains("Codenames"));
    }
}
