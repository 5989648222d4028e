//! Tool calling models: specs advertised to the model, requests coming back
//! from it, and the outcomes fed into the conversation.

use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};
use thiserror::Error;

/// Type of a tool parameter or return value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ParamType {
    Number,
    String,
}

impl ParamType {
    /// JSON schema type name.
    pub const fn schema_type(&self) -> &'static str {
        match self {
            Self::Number => "number",
            Self::String => "string",
        }
    }
}

/// One declared positional parameter of a tool.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ToolParameter {
    pub name: String,
    pub description: String,
    pub param_type: ParamType,
}

impl ToolParameter {
    pub fn number(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            param_type: ParamType::Number,
        }
    }

    pub fn string(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            param_type: ParamType::String,
        }
    }
}

/// Description of a callable tool, advertised to the model.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ToolSpec {
    pub name: String,
    pub description: String,
    pub parameters: Vec<ToolParameter>,
    pub returns: ParamType,
}

impl ToolSpec {
    /// JSON schema object describing the parameters.
    pub fn parameters_schema(&self) -> Value {
        let mut properties = Map::new();
        for param in &self.parameters {
            properties.insert(
                param.name.clone(),
                json!({
                    "type": param.param_type.schema_type(),
                    "description": param.description,
                }),
            );
        }
        let required: Vec<&str> = self.parameters.iter().map(|p| p.name.as_str()).collect();

        json!({
            "type": "object",
            "properties": properties,
            "required": required,
        })
    }
}

/// A tool invocation requested by the model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolRequest {
    pub name: String,
    /// Usually a JSON object keyed by parameter name.
    pub arguments: Value,
}

impl ToolRequest {
    pub fn new(name: impl Into<String>, arguments: Value) -> Self {
        Self {
            name: name.into(),
            arguments,
        }
    }
}

/// A typed argument or return value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ToolValue {
    Number(f64),
    Text(String),
}

impl ToolValue {
    pub const fn as_number(&self) -> Option<f64> {
        match self {
            Self::Number(n) => Some(*n),
            Self::Text(_) => None,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(s) => Some(s),
            Self::Number(_) => None,
        }
    }
}

impl std::fmt::Display for ToolValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            // Whole numbers keep one decimal so results read as floating point.
            Self::Number(n) if n.is_finite() && n.fract() == 0.0 => write!(f, "{n:.1}"),
            Self::Number(n) => write!(f, "{n}"),
            Self::Text(s) => f.write_str(s),
        }
    }
}

impl From<f64> for ToolValue {
    fn from(value: f64) -> Self {
        Self::Number(value)
    }
}

impl From<String> for ToolValue {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<&str> for ToolValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

/// Failure of a single tool execution.
///
/// Never aborts a request: it is rendered into a tool message so the model can
/// recover.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ToolError {
    #[error("Unknown tool: {0}")]
    UnknownTool(String),

    #[error("Missing argument: {0}")]
    MissingArgument(String),

    #[error("Invalid argument '{name}': {reason}")]
    InvalidArgument { name: String, reason: String },

    #[error("{0}")]
    Execution(String),
}

/// Result of one tool execution.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", content = "value", rename_all = "lowercase")]
pub enum ToolOutcome {
    Success(ToolValue),
    Error(String),
}

impl ToolOutcome {
    pub const fn is_error(&self) -> bool {
        matches!(self, Self::Error(_))
    }

    /// Text of the tool message sent back to the model.
    pub fn to_message_text(&self) -> String {
        match self {
            Self::Success(value) => value.to_string(),
            Self::Error(message) => format!("Error: {message}"),
        }
    }
}

impl From<Result<ToolValue, ToolError>> for ToolOutcome {
    fn from(result: Result<ToolValue, ToolError>) -> Self {
        match result {
            Ok(value) => Self::Success(value),
            Err(err) => Self::Error(err.to_string()),
        }
    }
}

/// Record of one executed tool call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolCall {
    pub name: String,
    /// Bound positional arguments. Empty when binding failed.
    pub arguments: Vec<ToolValue>,
    pub outcome: ToolOutcome,
}
