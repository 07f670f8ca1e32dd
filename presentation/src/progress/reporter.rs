//! Progress reporting for the agent loop

use cafe_application::{AgentProgressNotifier, NoAgentProgress};
use cafe_domain::core::string::{single_line, truncate};
use cafe_domain::{ActionKind, ActionParseError, ToolOutput, ToolResult};
use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};
use std::io::IsTerminal;
use std::sync::Mutex;
use std::time::Duration;

const SQL_DISPLAY_LEN: usize = 80;
const ERROR_DISPLAY_LEN: usize = 60;
const SCENARIO_DISPLAY_LEN: usize = 60;

/// Reports progress with a spinner and colored step markers
///
/// Markers stay ASCII so they render on any terminal:
/// `>` thinking and tool calls, `<` results, `!` retries, `X` errors.
pub struct AgentProgressReporter {
    spinner: Mutex<Option<ProgressBar>>,
    verbose: bool,
}

impl AgentProgressReporter {
    pub fn new() -> Self {
        Self {
            spinner: Mutex::new(None),
            verbose: false,
        }
    }

    /// Create with verbose output (shows parse errors on retries)
    pub fn verbose() -> Self {
        Self {
            spinner: Mutex::new(None),
            verbose: true,
        }
    }

    fn spinner_style() -> ProgressStyle {
        ProgressStyle::default_spinner()
            .template("  {spinner:.green} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner())
    }

    fn start_spinner(&self, message: String) {
        self.finish_spinner();
        let pb = ProgressBar::new_spinner();
        pb.set_style(Self::spinner_style());
        pb.set_message(message);
        pb.enable_steady_tick(Duration::from_millis(100));
        if let Ok(mut slot) = self.spinner.lock() {
            *slot = Some(pb);
        }
    }

    fn finish_spinner(&self) {
        let current = self.spinner.lock().ok().and_then(|mut slot| slot.take());
        if let Some(pb) = current {
            pb.finish_and_clear();
        }
    }

    fn line(&self, text: String) {
        self.finish_spinner();
        println!("{}", text);
    }
}

impl Default for AgentProgressReporter {
    fn default() -> Self {
        Self::new()
    }
}

impl AgentProgressNotifier for AgentProgressReporter {
    fn on_thinking(&self, turn: usize, max_turns: usize) {
        self.start_spinner(format!(
            "{} {}",
            "Thinking".bold().cyan(),
            format!("... (turn {}/{})", turn, max_turns).dimmed()
        ));
    }

    fn on_retry(&self, attempt: usize, max_retries: usize, error: &ActionParseError) {
        let mut text = format!("Attempt {} of {} failed, retrying...", attempt, max_retries);
        if self.verbose {
            text.push_str(&format!(" ({})", error));
        }
        self.line(format!("  {} {}", "!".bold(), text.yellow()));
    }

    fn on_tool_call(&self, tool: ActionKind, summary: &str) {
        let label = match tool {
            ActionKind::Query => "SQL Query:".bold().yellow(),
            ActionKind::Calculate => "Calculate:".bold().magenta(),
            ActionKind::Search => "Search:".bold().blue(),
            ActionKind::WhatIf => "What-If:".bold().green(),
            ActionKind::Answer => "Answer:".bold(),
        };
        let detail = call_detail(tool, summary);
        let detail = if tool == ActionKind::Query {
            detail.dimmed()
        } else {
            detail.cyan()
        };
        self.line(format!("  {} {} {}", ">".bold(), label, detail));
        self.start_spinner(format!("{}{}", format!("Running {}", tool).bold(), "...".dimmed()));
    }

    fn on_tool_result(&self, result: &ToolResult) {
        match summarize_result(result) {
            Ok(summary) => self.line(format!(
                "  {} {} {}",
                "<".bold(),
                "Result:".bold().green(),
                summary.dimmed()
            )),
            Err(message) => self.line(format!(
                "  {} {} {}",
                "X".bold().red(),
                "Error:".bold().red(),
                message.red()
            )),
        }
    }

    fn on_answer(&self, _text: &str) {
        self.line(format!("  {} {}", ">".bold(), "Composing answer...".bold().green()));
    }

    fn on_error(&self, message: &str) {
        self.line(format!("  {} {}", "X".bold().red(), message.red()));
    }
}

/// Line-per-event progress without a spinner or colors
///
/// Used when stdout is not a terminal.
pub struct SimpleProgress;

impl AgentProgressNotifier for SimpleProgress {
    fn on_thinking(&self, turn: usize, max_turns: usize) {
        println!("  > Thinking (turn {}/{})", turn, max_turns);
    }

    fn on_retry(&self, attempt: usize, max_retries: usize, _error: &ActionParseError) {
        println!("  ! Attempt {} of {} failed, retrying...", attempt, max_retries);
    }

    fn on_tool_call(&self, tool: ActionKind, summary: &str) {
        println!("  > {}: {}", tool, call_detail(tool, summary));
    }

    fn on_tool_result(&self, result: &ToolResult) {
        match summarize_result(result) {
            Ok(summary) => println!("  < Result: {}", summary),
            Err(message) => println!("  X Error: {}", message),
        }
    }

    fn on_error(&self, message: &str) {
        println!("  X {}", message);
    }
}

/// Pick a notifier: nothing when quiet, the spinner on a terminal,
/// plain lines otherwise.
pub fn progress_notifier(show: bool, verbose: bool) -> Box<dyn AgentProgressNotifier> {
    if !show {
        Box::new(NoAgentProgress)
    } else if !std::io::stdout().is_terminal() {
        Box::new(SimpleProgress)
    } else if verbose {
        Box::new(AgentProgressReporter::verbose())
    } else {
        Box::new(AgentProgressReporter::new())
    }
}

/// Display text for a tool call; SQL is flattened and shortened.
fn call_detail(tool: ActionKind, summary: &str) -> String {
    match tool {
        ActionKind::Query => truncate(&single_line(summary), SQL_DISPLAY_LEN),
        _ => summary.to_string(),
    }
}

/// One-line summary of a tool result: `Ok` for output, `Err` for a tool error.
fn summarize_result(result: &ToolResult) -> Result<String, String> {
    if let Some(error) = result.error() {
        let first_sentence = error.message.split('.').next().unwrap_or(&error.message);
        return Err(truncate(first_sentence, ERROR_DISPLAY_LEN));
    }
    let summary = match result.output() {
        Some(ToolOutput::Rows(rows)) if rows.truncated => {
            format!("{} row(s) returned (truncated)", rows.len())
        }
        Some(ToolOutput::Rows(rows)) => format!("{} row(s) returned", rows.len()),
        Some(ToolOutput::Number(value)) => format!("{}", value),
        Some(ToolOutput::Matches(matches)) => format!("{} game(s) found", matches.len()),
        Some(ToolOutput::Projection(projection)) => {
            truncate(&projection.scenario, SCENARIO_DISPLAY_LEN)
        }
        None => "no output".to_string(),
    };
    Ok(summary)
}

#[cfg(test)]
mod tests {
    use super::*;
    use cafe_domain::{GameMatch, QueryRows, ToolError};

    #[test]
    fn test_query_detail_is_single_line_and_truncated() {
        let sql = "SELECT name,\n       price\nFROM board_games";
        assert_eq!(
            call_detail(ActionKind::Query, sql),
            "SELECT name, price FROM board_games"
        );

        let long = format!("SELECT {} FROM board_games", "name, ".repeat(30));
        let detail = call_detail(ActionKind::Query, &long);
        assert_eq!(detail.len(), SQL_DISPLAY_LEN);
        assert!(detail.ends_with("..."));
    }

    #[test]
    fn test_other_details_untouched() {
        assert_eq!(call_detail(ActionKind::Calculate, "553.19 - 92"), "553.19 - 92");
    }

    #[test]
    fn test_summarize_rows() {
        let rows = QueryRows {
            columns: vec!["name".to_string()],
            rows: vec![vec![serde_json::json!("Catan")], vec![serde_json::json!("Azul")]],
            truncated: false,
        };
        let result = ToolResult::success(ActionKind::Query, ToolOutput::Rows(rows));
        assert_eq!(summarize_result(&result), Ok("2 row(s) returned".to_string()));
    }

    #[test]
    fn test_summarize_number_and_matches() {
        let number = ToolResult::success(ActionKind::Calculate, ToolOutput::Number(14.0));
        assert_eq!(summarize_result(&number), Ok("14".to_string()));

        let matches = ToolResult::success(
            ActionKind::Search,
            ToolOutput::Matches(vec![GameMatch {
                name: "Codenames".to_string(),
                category: "Party".to_string(),
                price: 19.99,
                in_stock: 10,
                relevance: 0.42,
            }]),
        );
        assert_eq!(summarize_result(&matches), Ok("1 game(s) found".to_string()));
    }

    #[test]
    fn test_summarize_error_keeps_first_sentence() {
        let result = ToolResult::failure(
            ActionKind::Query,
            ToolError::forbidden_statement("Only SELECT statements are allowed. Got DELETE"),
        );
        assert_eq!(
            summarize_result(&result),
            Err("Only SELECT statements are allowed".to_string())
        );
    }
}
