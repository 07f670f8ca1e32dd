//! Prompt templates for the agent loop

use crate::action::{ActionKind, ActionParseError};
use crate::tool::entities::ToolSpec;

/// Templates for generating agent prompts
pub struct AgentPromptTemplate;

impl AgentPromptTemplate {
    /// System prompt: tools, response contract, business rules and schema.
    ///
    /// Only tools registered in `tool_spec` are described, so a deployment
    /// without semantic search never advertises it.
    pub fn agent_system(tool_spec: &ToolSpec, schema: &str, today: &str) -> String {
        let tool_descriptions = tool_spec
            .all()
            .enumerate()
            .map(|(i, t)| {
                let params = t
                    .parameters
                    .iter()
                    .map(|p| {
                        let required = if p.required { " (required)" } else { "" };
                        format!("   - {} ({}): {}{}", p.name, p.param_type, p.description, required)
                    })
                    .collect::<Vec<_>>()
                    .join("\n");
                format!("{}. {} - {}\n{}", i + 1, t.name(), t.description, params)
            })
            .collect::<Vec<_>>()
            .join("\n");

        let examples = tool_spec
            .all()
            .map(|t| t.example.as_str())
            .filter(|e| !e.is_empty())
            .chain(std::iter::once(
                r#"{"action": "answer", "text": "Your final answer here"}"#,
            ))
            .collect::<Vec<_>>()
            .join("\n");

        let mut guidance = String::new();
        if tool_spec.contains(ActionKind::Search) {
            guidance.push_str(SEARCH_GUIDANCE);
        }
        if tool_spec.contains(ActionKind::WhatIf) {
            guidance.push_str(WHATIF_GUIDANCE);
        }

        format!(
            r#"You are a helpful assistant for a board game cafe/shop. Answer questions using ONLY the data in the database.

TOOLS:
{tool_descriptions}

RESPONSE FORMAT:
You must respond with EXACTLY ONE JSON object per message. No other text, no explanations.

{examples}

ANSWER FORMAT:
The "answer" text MUST be natural language for a human reader, NOT raw JSON or data.
- WRONG: {{"action": "answer", "text": "{{\"avg\": 50.99, \"median\": 44.99}}"}}
- RIGHT: {{"action": "answer", "text": "The average game price is $50.99, with a median of $44.99."}}
{guidance}
ONE action at a time. You will see the result, then can do the next action.

CRITICAL RULES:
1. ONLY use data that exists in the schema below. If asked about data we don't have (e.g., employee data), say "We don't have that data in our system."
2. NEVER guess or make up numbers. Every number in your answer must come from a tool result.
3. Final answers MUST be conversational natural language, NOT raw data or JSON. Explain the results clearly.
4. For multi-step math:
   - FIRST: use query to get the numbers you need
   - THEN: use calculate with those ACTUAL numbers (e.g., "553.19 - 92")
   - The calculate tool accepts: numbers, +, -, *, /, parentheses
   - Statistical functions: mean(), median(), mode(), stdev(), range()
   - WRONG: {{"action": "calculate", "expression": "SELECT ... - 92"}}
   - RIGHT: {{"action": "calculate", "expression": "553.19 - 92"}}

DATA WE HAVE:
- Board game inventory (names, prices, wholesale costs, stock levels)
- Game sales (what we sold, when, at what price, online vs in-store)
- Table rentals (what we CHARGE customers for table time - this is REVENUE)
- Food & beverage items (menu items with sell prices AND costs)
- Food & beverage orders (what customers ordered during rentals)
- Operating expenses (rent, utilities, labor, insurance, marketing, supplies by month)

PROFIT CALCULATIONS:
- Game profit = (unit_price - board_games.cost) * quantity
- Food/bev profit = (unit_price - food_bev_items.cost) * quantity (join on item_name)
- Table rental revenue is pure profit (no direct costs)
- Net profit = total revenue - total costs - operating expenses

INTERPRETING COMMON TERMS (use averages, not specific dates):
- "daily" = average per day (total / number of distinct days), NOT "today"
- "weekly" = average per week or total for a week period
- "monthly" = average per month or total for a specific month
- "typical" or "usual" = use mean or median of historical data
When asked about rates (daily/weekly/monthly), calculate from ALL available data unless a specific date range is mentioned.

Today's date is {today}

{schema}"#
        )
    }

    /// Instruction appended after a response that failed validation.
    pub fn invalid_format(error: &ActionParseError) -> String {
        format!(
            "Invalid format: {error}. Respond with EXACTLY ONE JSON object, nothing else. \
             Example: {{\"action\": \"query\", \"sql\": \"SELECT ...\"}}"
        )
    }

    /// User turn carrying a tool observation back to the model.
    pub fn tool_result(observation: &str) -> String {
        format!("Tool result:\n{observation}")
    }
}

const SEARCH_GUIDANCE: &str = r#"
WHEN TO USE SEARCH VS QUERY:
- Use "search" when looking for games by description/vibe (e.g., "games about building", "fun party games")
- Use "query" when you need exact data (e.g., prices, stock levels, sales figures)
"#;

const WHATIF_GUIDANCE: &str = r#"
WHAT-IF SCENARIOS (use "whatif" action):
- scenario_type: "price_change" - params: {"target": "games"|"food"|"tables"|item_name, "change_percent": number}
- scenario_type: "volume_change" - params: {"target": item_name, "quantity_change": number}
- scenario_type: "expense_change" - params: {"category": "all"|"rent"|"labor"|etc, "change_percent": number, "month": "2026-01"|"january"|optional}
- scenario_type: "hours_change" - params: {"hours_change": number, "hourly_rate": number|optional}
Example: "What if game prices increased 15%?" -> {"action": "whatif", "scenario_type": "price_change", "params": {"target": "games", "change_percent": 15}}
"#;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tool::entities::{ToolDefinition, ToolParameter};

    fn spec(with_search: bool) -> ToolSpec {
        let mut spec = ToolSpec::new()
            .register(
                ToolDefinition::new(ActionKind::Query, "Execute SQL SELECT queries")
                    .with_parameter(ToolParameter::new("sql", "A single SELECT statement", true))
                    .with_example(r#"{"action": "query", "sql": "SELECT ..."}"#),
            )
            .register(
                ToolDefinition::new(ActionKind::WhatIf, "Scenario analysis")
                    .with_example(r#"{"action": "whatif", "scenario_type": "hours_change", "params": {"hours_change": 10}}"#),
            );
        if with_search {
            spec = spec.register(
                ToolDefinition::new(ActionKind::Search, "Semantic search for board games")
                    .with_example(r#"{"action": "search", "query": "party games", "n": 5}"#),
            );
        }
        spec
    }

    #[test]
    fn test_system_prompt_contents() {
        let prompt = AgentPromptTemplate::agent_system(&spec(true), "TABLE board_games(...)", "2026-02-14");
        assert!(prompt.contains("1. query - Execute SQL SELECT queries"));
        assert!(prompt.contains("   - sql (string): A single SELECT statement (required)"));
        assert!(prompt.contains(r#"{"action": "answer", "text": "Your final answer here"}"#));
        assert!(prompt.contains("WHEN TO USE SEARCH VS QUERY"));
        assert!(prompt.contains("WHAT-IF SCENARIOS"));
        assert!(prompt.contains("Today's date is 2026-02-14"));
        assert!(prompt.ends_with("TABLE board_games(...)"));
    }

    #[test]
    fn test_system_prompt_without_search() {
        let prompt = AgentPromptTemplate::agent_system(&spec(false), "", "2026-02-14");
        assert!(!prompt.contains("search - "));
        assert!(!prompt.contains("WHEN TO USE SEARCH VS QUERY"));
    }

    #[test]
    fn test_invalid_format_names_error() {
        let msg = AgentPromptTemplate::invalid_format(&ActionParseError::UnknownAction("drop".to_string()));
        assert!(msg.starts_with("Invalid format: unknown action 'drop'"));
        assert!(msg.contains("EXACTLY ONE JSON object"));
    }

    #[test]
    fn test_tool_result_message() {
        assert_eq!(AgentPromptTemplate::tool_result("Result: 4"), "Tool result:\nResult: 4");
    }
}
