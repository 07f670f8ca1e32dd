//! Calculate tool: the safe arithmetic and statistics evaluator

use cafe_domain::tool::entities::{ToolDefinition, ToolParameter};
use cafe_domain::{ActionKind, CalcError, ToolError, ToolOutput, ToolResult, calculate};
use std::time::Instant;

/// Get the tool definition for calculate
pub fn calculate_definition() -> ToolDefinition {
    ToolDefinition::new(
        ActionKind::Calculate,
        "Evaluate arithmetic (+, -, *, /, parentheses) and statistics (mean, median, mode, stdev, range)",
    )
    .with_parameter(
        ToolParameter::new("expression", "Expression using numbers from earlier results", true),
    )
    .with_example(r#"{"action": "calculate", "expression": "(49.99 - 27.50) * 3"}"#)
}

fn to_tool_error(err: CalcError) -> ToolError {
    match err {
        CalcError::DisallowedExpression(detail) => ToolError::disallowed_expression(detail),
        CalcError::DivisionByZero => ToolError::division_by_zero(),
        err @ (CalcError::InvalidSyntax(_) | CalcError::Statistics(_)) => {
            ToolError::invalid_argument(err.to_string())
        }
    }
}

/// Execute the calculate tool
pub fn execute_calculate(expression: &str) -> ToolResult {
    let start = Instant::now();
    let result = match calculate(expression) {
        Ok(value) => ToolResult::success(ActionKind::Calculate, ToolOutput::Number(value)),
        Err(e) => ToolResult::failure(ActionKind::Calculate, to_tool_error(e)),
    };
    result.with_duration(start.elapsed().as_millis() as u64)
}
