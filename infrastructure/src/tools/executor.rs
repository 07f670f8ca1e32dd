//! Local tool executor - the concrete implementation of [`ToolExecutorPort`].
//!
//! [`LocalToolExecutor`] routes each validated [`Action`] to its tool module.
//! Storage access is synchronous and short; it happens inline on the calling
//! task, one tool at a time.
//!
//! ```text
//! ToolExecutorPort::execute(action)
//!   ├─ query      → query::execute_query      (CafeDatabase)
//!   ├─ calculate  → calculate::execute_calculate
//!   ├─ search     → search::execute_search    (GameSearchIndex, if enabled)
//!   └─ whatif     → whatif::execute_whatif    (CafeDatabase)
//! ```

use super::{calculate, query, search, whatif};
use crate::search::GameSearchIndex;
use crate::storage::{CafeDatabase, schema};
use async_trait::async_trait;
use cafe_application::ports::tool_executor::ToolExecutorPort;
use cafe_domain::{Action, ActionKind, ToolError, ToolResult, ToolSpec};
use std::sync::Arc;
use tracing::debug;

/// Executor that runs tools against the local cafe database.
///
/// | Constructor | Tools |
/// |-------------|-------|
/// | [`new()`](Self::new) | query, calculate, whatif |
/// | [`with_search_index()`](Self::with_search_index) | adds search |
pub struct LocalToolExecutor {
    tool_spec: ToolSpec,
    db: Arc<CafeDatabase>,
    search_index: Option<GameSearchIndex>,
    /// Upper bound on search results
    search_limit: usize,
}

impl LocalToolExecutor {
    /// Create an executor without semantic search.
    pub fn new(db: Arc<CafeDatabase>) -> Self {
        Self {
            tool_spec: super::core_tool_spec(),
            db,
            search_index: None,
            search_limit: crate::search::MAX_RESULTS,
        }
    }

    /// Enable the search tool backed by `index`.
    pub fn with_search_index(mut self, index: GameSearchIndex) -> Self {
        self.tool_spec = super::full_tool_spec();
        self.search_index = Some(index);
        self
    }

    /// Cap the number of search results below the index maximum.
    pub fn with_search_limit(mut self, limit: usize) -> Self {
        self.search_limit = limit.clamp(1, crate::search::MAX_RESULTS);
        self
    }

    pub fn has_search(&self) -> bool {
        self.search_index.is_some()
    }
}

#[async_trait]
impl ToolExecutorPort for LocalToolExecutor {
    fn tool_spec(&self) -> &ToolSpec {
        &self.tool_spec
    }

    fn schema_description(&self) -> String {
        schema::schema_description().to_string()
    }

    async fn execute(&self, action: &Action) -> ToolResult {
        debug!(tool = action.kind().as_str(), "Executing tool");
        match action {
            Action::Query { sql } => query::execute_query(&self.db, sql),
            Action::Calculate { expression } => calculate::execute_calculate(expression),
            Action::Search { query, n } => search::execute_search(
                self.search_index.as_ref(),
                query,
                (*n).min(self.search_limit),
            ),
            Action::WhatIf(scenario) => whatif::execute_whatif(&self.db, scenario),
            Action::Answer { .. } => ToolResult::failure(
                ActionKind::Answer,
                ToolError::invalid_argument("answer is not a tool"),
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::init_db;
    use cafe_domain::{PriceTarget, Scenario};

    fn executor() -> (tempfile::TempDir, LocalToolExecutor) {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("cafe.db");
        init_db(&path).unwrap();
        let db = Arc::new(CafeDatabase::open_read_only(&path).unwrap());
        (dir, LocalToolExecutor::new(db))
    }

    #[test]
    fn test_executor_without_search() {
        let (_dir, executor) = executor();
        assert!(executor.has_tool(ActionKind::Query));
        assert!(executor.has_tool(ActionKind::Calculate));
        assert!(executor.has_tool(ActionKind::WhatIf));
        assert!(!executor.has_tool(ActionKind::Search));
        assert_eq!(executor.available_tools(), vec!["query", "calculate", "whatif"]);
    }

    #[test]
    fn test_executor_with_search() {
        let (_dir, executor) = executor();
        let index = GameSearchIndex::from_database(&executor.db).unwrap();
        let executor = executor.with_search_index(index);
        assert!(executor.has_search());
        assert_eq!(
            executor.available_tools(),
            vec!["query", "calculate", "search", "whatif"]
        );
    }

    #[tokio::test]
    async fn test_executor_query() {
        let (_dir, executor) = executor();
        let result = executor
            .execute(&Action::Query {
                sql: "SELECT COUNT(*) AS games FROM board_games".to_string(),
            })
            .await;
        assert!(result.is_success());
        assert!(result.to_observation().contains("\"games\": 15"));
    }

    #[tokio::test]
    async fn test_executor_rejects_write_before_storage() {
        let (_dir, executor) = executor();
        let result = executor
            .execute(&Action::Query {
                sql: "DROP TABLE board_games".to_string(),
            })
            .await;
        assert_eq!(result.error().unwrap().code, ToolError::FORBIDDEN_STATEMENT);
        assert!(result.to_observation().starts_with("Query error [FORBIDDEN_STATEMENT]"));
    }

    #[tokio::test]
    async fn test_executor_sql_error_is_observation() {
        let (_dir, executor) = executor();
        let result = executor
            .execute(&Action::Query {
                sql: "SELECT nope FROM board_games".to_string(),
            })
            .await;
        assert_eq!(result.error().unwrap().code, ToolError::EXECUTION_FAILED);
    }

    #[tokio::test]
    async fn test_executor_search_disabled() {
        let (_dir, executor) = executor();
        let result = executor
            .execute(&Action::Search {
                query: "party".to_string(),
                n: 5,
            })
            .await;
        assert_eq!(result.error().unwrap().code, ToolError::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_executor_search_limit() {
        let (_dir, executor) = executor();
        let index = GameSearchIndex::from_database(&executor.db).unwrap();
        let executor = executor.with_search_index(index).with_search_limit(2);
        let result = executor
            .execute(&Action::Search {
                query: "strategy".to_string(),
                n: 10,
            })
            .await;
        assert_eq!(result.metadata.match_count, Some(2));
    }

    #[tokio::test]
    async fn test_executor_whatif() {
        let (_dir, executor) = executor();
        let result = executor
            .execute(&Action::WhatIf(Scenario::PriceChange {
                target: PriceTarget::Tables,
                change_percent: 25.0,
            }))
            .await;
        assert!(result.is_success());
        assert!(result.to_observation().contains("\"projected_revenue\": 495.0"));
    }

    #[test]
    fn test_schema_description_lists_tables() {
        let (_dir, executor) = executor();
        assert!(executor.schema_description().contains("operating_expenses"));
    }
}
