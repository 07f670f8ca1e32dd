//! Tool implementations for the cafe assistant
//!
//! Each module owns one action kind: its [`ToolDefinition`] (as shown to the
//! model) and its execution against storage or the evaluator.
//!
//! - `query`: read-only SQL, guarded to a single SELECT
//! - `calculate`: safe arithmetic and statistics
//! - `search`: semantic lookup over the game catalog (optional)
//! - `whatif`: revenue/profit projections
//!
//! [`ToolDefinition`]: cafe_domain::ToolDefinition

pub mod calculate;
pub mod query;
pub mod search;
pub mod whatif;

mod executor;

pub use executor::LocalToolExecutor;

use cafe_domain::ToolSpec;

/// Tools that are always available, in prompt order.
pub fn core_tool_spec() -> ToolSpec {
    ToolSpec::new()
        .register(query::query_definition())
        .register(calculate::calculate_definition())
        .register(whatif::whatif_definition())
}

/// Core tools plus semantic search.
pub fn full_tool_spec() -> ToolSpec {
    ToolSpec::new()
        .register(query::query_definition())
        .register(calculate::calculate_definition())
        .register(search::search_definition())
        .register(whatif::whatif_definition())
}
