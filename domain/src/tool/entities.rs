//! Tool domain entities

use crate::action::ActionKind;
use serde::{Deserialize, Serialize};

/// Definition of a tool the model may invoke
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolDefinition {
    /// Action kind that triggers this tool
    pub kind: ActionKind,
    /// Human-readable description
    pub description: String,
    /// Parameter specifications
    pub parameters: Vec<ToolParameter>,
    /// Example action JSON shown in the prompt
    pub example: String,
}

/// JSON type of an action field, as shown in the prompt
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ParamType {
    #[default]
    String,
    Integer,
    Object,
}

impl ParamType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ParamType::String => "string",
            ParamType::Integer => "integer",
            ParamType::Object => "object",
        }
    }
}

impl std::fmt::Display for ParamType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One field of an action payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolParameter {
    pub name: String,
    pub description: String,
    pub required: bool,
    pub param_type: ParamType,
}

impl ToolDefinition {
    pub fn new(kind: ActionKind, description: impl Into<String>) -> Self {
        Self {
            kind,
            description: description.into(),
            parameters: Vec::new(),
            example: String::new(),
        }
    }

    pub fn with_parameter(mut self, param: ToolParameter) -> Self {
        self.parameters.push(param);
        self
    }

    pub fn with_example(mut self, example: impl Into<String>) -> Self {
        self.example = example.into();
        self
    }

    pub fn name(&self) -> &'static str {
        self.kind.as_str()
    }
}

impl ToolParameter {
    pub fn new(name: impl Into<String>, description: impl Into<String>, required: bool) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            required,
            param_type: ParamType::String,
        }
    }

    pub fn with_type(mut self, param_type: ParamType) -> Self {
        self.param_type = param_type;
        self
    }
}

/// Specification of available tools, in registration order
#[derive(Debug, Clone, Default)]
pub struct ToolSpec {
    tools: Vec<ToolDefinition>,
}

impl ToolSpec {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a tool, replacing any earlier definition of the same kind.
    pub fn register(mut self, tool: ToolDefinition) -> Self {
        self.tools.retain(|t| t.kind != tool.kind);
        self.tools.push(tool);
        self
    }

    pub fn get(&self, kind: ActionKind) -> Option<&ToolDefinition> {
        self.tools.iter().find(|t| t.kind == kind)
    }

    pub fn contains(&self, kind: ActionKind) -> bool {
        self.get(kind).is_some()
    }

    pub fn all(&self) -> impl Iterator<Item = &ToolDefinition> {
        self.tools.iter()
    }

    pub fn names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.tools.iter().map(|t| t.name())
    }

    pub fn len(&self) -> usize {
        self.tools.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn calculate_tool() -> ToolDefinition {
        ToolDefinition::new(ActionKind::Calculate, "Evaluate arithmetic")
            .with_parameter(ToolParameter::new("expression", "Expression", true))
            .with_example(r#"{"action": "calculate", "expression": "2 + 2"}"#)
    }

    #[test]
    fn test_tool_spec_preserves_order() {
        let spec = ToolSpec::new()
            .register(ToolDefinition::new(ActionKind::Query, "Run SQL"))
            .register(calculate_tool());

        assert_eq!(spec.names().collect::<Vec<_>>(), vec!["query", "calculate"]);
        assert!(spec.contains(ActionKind::Calculate));
        assert!(!spec.contains(ActionKind::Search));
    }

    #[test]
    fn test_parameter_type_defaults_to_string() {
        let n = ToolParameter::new("n", "Result count", false);
        assert_eq!(n.param_type, ParamType::String);
        assert_eq!(n.with_type(ParamType::Integer).param_type.to_string(), "integer");
    }

    #[test]
    fn test_register_replaces_same_kind() {
        let spec = ToolSpec::new()
            .register(ToolDefinition::new(ActionKind::Calculate, "old"))
            .register(calculate_tool());
        assert_eq!(spec.len(), 1);
        assert_eq!(
            spec.get(ActionKind::Calculate).unwrap().description,
            "Evaluate arithmetic"
        );
    }
}
