//! Action parsing from model responses.
//!
//! Models are asked for exactly one JSON object, but in practice they wrap
//! it in markdown fences, surround it with prose, emit several objects in a
//! row, or put raw newlines inside string values. [`parse_action`] tolerates
//! all of these and classifies what it cannot recover from.

use super::entities::{Action, ActionKind, DEFAULT_SEARCH_RESULTS, ParsedAction};
use crate::whatif::Scenario;
use serde_json::{Map, Value};
use thiserror::Error;

/// Why a model response is not a valid action. Every variant is retryable.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ActionParseError {
    #[error("no valid JSON object found ({0})")]
    MalformedJson(String),

    #[error("unknown action '{0}' (expected one of: query, calculate, search, whatif, answer)")]
    UnknownAction(String),

    #[error("action '{action}' requires field '{field}'")]
    MissingField { action: String, field: String },
}

impl ActionParseError {
    fn missing(action: ActionKind, field: impl Into<String>) -> Self {
        ActionParseError::MissingField {
            action: action.as_str().to_string(),
            field: field.into(),
        }
    }
}

/// Parse raw model text into a validated action.
///
/// 1. Strip a surrounding markdown code fence
/// 2. Parse the whole body as a JSON object (repairing raw control
///    characters inside strings if needed)
/// 3. Otherwise fall back to the first balanced `{...}` substring
/// 4. Validate the `action` kind and its required fields
pub fn parse_action(raw: &str) -> Result<ParsedAction, ActionParseError> {
    let body = strip_code_fence(raw.trim());
    let (object, cleaned_json) = parse_object(body)?;
    let action = validate_fields(&object)?;
    Ok(ParsedAction {
        action,
        cleaned_json,
    })
}

/// Remove a leading ```` ``` ```` / ```` ```json ```` fence and its closing fence.
///
/// Text that does not start with a fence is returned unchanged.
pub fn strip_code_fence(text: &str) -> &str {
    let Some(rest) = text.strip_prefix("```") else {
        return text;
    };
    let rest = match rest.get(..4) {
        Some(tag) if tag.eq_ignore_ascii_case("json") => &rest[4..],
        _ => rest,
    };
    let inner = match rest.find("```") {
        Some(end) => &rest[..end],
        None => rest,
    };
    inner.trim()
}

/// Find the first brace-balanced JSON object in `text`.
///
/// Braces inside string literals (including escaped quotes) are ignored.
/// Returns `None` if there is no `{` or the first object never closes.
pub fn extract_json_object(text: &str) -> Option<&str> {
    let start = text.find('{')?;
    let mut depth = 0usize;
    let mut in_string = false;
    let mut escape_next = false;

    for (offset, ch) in text[start..].char_indices() {
        if escape_next {
            escape_next = false;
            continue;
        }
        match ch {
            '\\' if in_string => escape_next = true,
            '"' => in_string = !in_string,
            _ if in_string => {}
            '{' => depth += 1,
            '}' => {
                depth -= 1;
                if depth == 0 {
                    let end = start + offset + ch.len_utf8();
                    return Some(&text[start..end]);
                }
            }
            _ => {}
        }
    }
    None
}

/// Escape raw `\n`, `\r` and `\t` characters that appear inside JSON strings.
///
/// Existing escape sequences are copied through untouched.
pub fn repair_string_controls(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut in_string = false;
    let mut chars = text.chars();

    while let Some(ch) = chars.next() {
        match ch {
            '\\' if in_string => {
                out.push(ch);
                if let Some(next) = chars.next() {
                    out.push(next);
                }
            }
            '"' => {
                in_string = !in_string;
                out.push(ch);
            }
            '\n' if in_string => out.push_str("\\n"),
            '\r' if in_string => out.push_str("\\r"),
            '\t' if in_string => out.push_str("\\t"),
            _ => out.push(ch),
        }
    }
    out
}

fn parse_object(body: &str) -> Result<(Map<String, Value>, String), ActionParseError> {
    if let Some(object) = try_object(body) {
        return Ok((object, body.to_string()));
    }
    let repaired = repair_string_controls(body);
    if let Some(object) = try_object(&repaired) {
        return Ok((object, repaired));
    }

    let extracted = extract_json_object(body).ok_or_else(|| {
        ActionParseError::MalformedJson("no balanced {...} object in response".to_string())
    })?;
    let repaired = repair_string_controls(extracted);
    match serde_json::from_str::<Value>(&repaired) {
        Ok(Value::Object(object)) => Ok((object, repaired)),
        Ok(_) => Err(ActionParseError::MalformedJson(
            "top-level value is not an object".to_string(),
        )),
        Err(e) => Err(ActionParseError::MalformedJson(e.to_string())),
    }
}

fn try_object(text: &str) -> Option<Map<String, Value>> {
    match serde_json::from_str::<Value>(text) {
        Ok(Value::Object(object)) => Some(object),
        _ => None,
    }
}

fn validate_fields(object: &Map<String, Value>) -> Result<Action, ActionParseError> {
    let name = match object.get("action") {
        Some(Value::String(name)) => name.trim(),
        Some(other) => return Err(ActionParseError::UnknownAction(other.to_string())),
        None => {
            return Err(ActionParseError::MissingField {
                action: "(none)".to_string(),
                field: "action".to_string(),
            });
        }
    };
    let kind = ActionKind::parse(&name.to_lowercase())
        .ok_or_else(|| ActionParseError::UnknownAction(name.to_string()))?;

    match kind {
        ActionKind::Query => Ok(Action::Query {
            sql: required_str(object, kind, "sql")?,
        }),
        ActionKind::Calculate => Ok(Action::Calculate {
            expression: required_str(object, kind, "expression")?,
        }),
        ActionKind::Search => {
            let query = required_str(object, kind, "query")?;
            let n = match object.get("n") {
                None | Some(Value::Null) => DEFAULT_SEARCH_RESULTS,
                Some(value) => value
                    .as_u64()
                    .map(|n| n as usize)
                    .ok_or_else(|| ActionParseError::missing(kind, "n"))?,
            };
            Ok(Action::Search { query, n })
        }
        ActionKind::WhatIf => {
            let scenario_type = required_str(object, kind, "scenario_type")?;
            let empty = Map::new();
            let params = match object.get("params") {
                Some(Value::Object(params)) => params,
                None | Some(Value::Null) => &empty,
                Some(_) => return Err(ActionParseError::missing(kind, "params")),
            };
            Scenario::from_params(&scenario_type, params)
                .map(Action::WhatIf)
                .map_err(|e| ActionParseError::missing(kind, e.field()))
        }
        ActionKind::Answer => {
            let text = optional_str(object, "text")
                .or_else(|| optional_str(object, "answer"))
                .ok_or_else(|| ActionParseError::missing(kind, "text"))?;
            Ok(Action::Answer { text })
        }
    }
}

fn optional_str(object: &Map<String, Value>, field: &str) -> Option<String> {
    object
        .get(field)
        .and_then(Value::as_str)
        .map(str::to_string)
}

fn required_str(
    object: &Map<String, Value>,
    kind: ActionKind,
    field: &str,
) -> Result<String, ActionParseError> {
    optional_str(object, field)
        .filter(|s| !s.trim().is_empty())
        .ok_or_else(|| ActionParseError::missing(kind, field))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::whatif::PriceTarget;

    #[test]
    fn test_parse_plain_query() {
        let parsed = parse_action(r#"{"action": "query", "sql": "SELECT * FROM board_games"}"#).unwrap();
        assert_eq!(
            parsed.action,
            Action::Query {
                sql: "SELECT * FROM board_games".to_string()
            }
        );
    }

    #[test]
    fn test_parse_fenced_answer() {
        let raw = "```json\n{\"action\":\"answer\",\"text\":\"42\"}\n```";
        let parsed = parse_action(raw).unwrap();
        assert_eq!(
            parsed.action,
            Action::Answer {
                text: "42".to_string()
            }
        );
        assert_eq!(parsed.cleaned_json, r#"{"action":"answer","text":"42"}"#);
    }

    #[test]
    fn test_parse_bare_fence() {
        let raw = "```\n{\"action\":\"calculate\",\"expression\":\"2+2\"}\n```";
        assert_eq!(parse_action(raw).unwrap().action.kind(), ActionKind::Calculate);
    }

    #[test]
    fn test_parse_with_surrounding_prose() {
        let raw = "Let me check the catalogue.\n{\"action\": \"search\", \"query\": \"co-op games\", \"n\": 3}\nThanks!";
        let parsed = parse_action(raw).unwrap();
        assert_eq!(
            parsed.action,
            Action::Search {
                query: "co-op games".to_string(),
                n: 3
            }
        );
        assert_eq!(
            parsed.cleaned_json,
            r#"{"action": "search", "query": "co-op games", "n": 3}"#
        );
    }

    #[test]
    fn test_search_default_n() {
        let parsed = parse_action(r#"{"action":"search","query":"party"}"#).unwrap();
        assert_eq!(
            parsed.action,
            Action::Search {
                query: "party".to_string(),
                n: DEFAULT_SEARCH_RESULTS
            }
        );
    }

    #[test]
    fn test_takes_first_of_multiple_objects() {
        let raw = "{\"action\": \"query\", \"sql\": \"SELECT 1\"}\n\n{\"action\": \"calculate\", \"expression\": \"fake\"}";
        let parsed = parse_action(raw).unwrap();
        assert_eq!(
            parsed.action,
            Action::Query {
                sql: "SELECT 1".to_string()
            }
        );
        assert_eq!(parsed.cleaned_json, r#"{"action": "query", "sql": "SELECT 1"}"#);
    }

    #[test]
    fn test_repairs_raw_newlines_in_strings() {
        let raw = "{\"action\": \"query\", \"sql\": \"SELECT name\nFROM board_games\"}";
        let parsed = parse_action(raw).unwrap();
        assert_eq!(
            parsed.action,
            Action::Query {
                sql: "SELECT name\nFROM board_games".to_string()
            }
        );
        assert!(parsed.cleaned_json.contains("\\n"));
    }

    #[test]
    fn test_braces_inside_strings_are_ignored() {
        let raw = r#"Sure: {"action": "answer", "text": "use {curly} \"quotes\""} done"#;
        let parsed = parse_action(raw).unwrap();
        assert_eq!(
            parsed.action,
            Action::Answer {
                text: "use {curly} \"quotes\"".to_string()
            }
        );
    }

    #[test]
    fn test_malformed_json() {
        assert!(matches!(
            parse_action("I think the answer is 42."),
            Err(ActionParseError::MalformedJson(_))
        ));
        assert!(matches!(
            parse_action("{\"action\": \"answer\", \"text\": \"unterminated"),
            Err(ActionParseError::MalformedJson(_))
        ));
    }

    #[test]
    fn test_unknown_action() {
        let err = parse_action(r#"{"action": "delete", "table": "board_games"}"#).unwrap_err();
        assert_eq!(err, ActionParseError::UnknownAction("delete".to_string()));
    }

    #[test]
    fn test_missing_field() {
        let err = parse_action(r#"{"action": "query"}"#).unwrap_err();
        assert_eq!(
            err,
            ActionParseError::MissingField {
                action: "query".to_string(),
                field: "sql".to_string()
            }
        );

        let err = parse_action(r#"{"action": "calculate", "expression": 5}"#).unwrap_err();
        assert!(matches!(err, ActionParseError::MissingField { ref field, .. } if field == "expression"));
    }

    #[test]
    fn test_missing_action_field() {
        let err = parse_action(r#"{"sql": "SELECT 1"}"#).unwrap_err();
        assert!(matches!(err, ActionParseError::MissingField { ref field, .. } if field == "action"));
    }

    #[test]
    fn test_answer_alias_field() {
        let parsed = parse_action(r#"{"action": "answer", "answer": "Catan"}"#).unwrap();
        assert_eq!(
            parsed.action,
            Action::Answer {
                text: "Catan".to_string()
            }
        );
    }

    #[test]
    fn test_whatif_action() {
        let raw = r#"{"action": "whatif", "scenario_type": "price_change", "params": {"target": "food", "change_percent": -5}}"#;
        let parsed = parse_action(raw).unwrap();
        assert_eq!(
            parsed.action,
            Action::WhatIf(Scenario::PriceChange {
                target: PriceTarget::Food,
                change_percent: -5.0
            })
        );
    }

    #[test]
    fn test_whatif_bad_params() {
        let raw = r#"{"action": "whatif", "scenario_type": "hours_change", "params": {}}"#;
        let err = parse_action(raw).unwrap_err();
        assert_eq!(
            err,
            ActionParseError::MissingField {
                action: "whatif".to_string(),
                field: "params.hours_change".to_string()
            }
        );
    }

    #[test]
    fn test_strip_code_fence_passthrough() {
        assert_eq!(strip_code_fence("{\"a\":1}"), "{\"a\":1}");
        assert_eq!(strip_code_fence("```JSON\n{}\n```"), "{}");
    }

    #[test]
    fn test_extract_json_object_unbalanced() {
        assert_eq!(extract_json_object("{\"a\": {\"b\": 1}"), None);
        assert_eq!(extract_json_object("x {\"a\": {\"b\": 1}} y"), Some("{\"a\": {\"b\": 1}}"));
    }

    #[test]
    fn test_repair_keeps_escapes() {
        assert_eq!(repair_string_controls(r#"{"t": "a\"b"}"#), r#"{"t": "a\"b"}"#);
        assert_eq!(repair_string_controls("{\"t\": \"a\tb\"}"), "{\"t\": \"a\\tb\"}");
        // Newlines between tokens are left alone.
        assert_eq!(repair_string_controls("{\n\"t\": 1\n}"), "{\n\"t\": 1\n}");
    }
}
