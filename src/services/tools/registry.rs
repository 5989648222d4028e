//! Tool registry
//!
//! Maps tool names to a [`ToolSpec`] and a handler. The model sends
//! arguments as JSON; the registry binds them to the declared positional
//! parameters before calling the handler.

use serde_json::Value;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;
use tracing::{debug, warn};

use crate::domain::models::{ParamType, ToolCall, ToolError, ToolOutcome, ToolRequest, ToolSpec, ToolValue};

/// Tool implementation, called with arguments in declared parameter order.
pub type ToolHandler = Arc<dyn Fn(&[ToolValue]) -> Result<ToolValue, ToolError> + Send + Sync>;

struct RegisteredTool {
    spec: ToolSpec,
    handler: ToolHandler,
}

/// Lookup table of callable tools.
#[derive(Default)]
pub struct ToolRegistry {
    tools: Vec<RegisteredTool>,
    index: HashMap<String, usize>,
}

impl fmt::Debug for ToolRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ToolRegistry")
            .field("tools", &self.index.keys().collect::<Vec<_>>())
            .finish()
    }
}

impl ToolRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a tool, replacing any tool with the same name.
    pub fn register(&mut self, spec: ToolSpec, handler: ToolHandler) {
        let name = spec.name.clone();
        let tool = RegisteredTool { spec, handler };
        match self.index.get(&name) {
            Some(&pos) => self.tools[pos] = tool,
            None => {
                self.index.insert(name, self.tools.len());
                self.tools.push(tool);
            }
        }
    }

    /// Builder-style [`register`](Self::register).
    #[must_use]
    pub fn with_tool<F>(mut self, spec: ToolSpec, handler: F) -> Self
    where
        F: Fn(&[ToolValue]) -> Result<ToolValue, ToolError> + Send + Sync + 'static,
    {
        self.register(spec, Arc::new(handler));
        self
    }

    /// Specs of every tool, in registration order.
    pub fn specs(&self) -> Vec<ToolSpec> {
        self.tools.iter().map(|t| t.spec.clone()).collect()
    }

    pub fn spec(&self, name: &str) -> Option<&ToolSpec> {
        self.index.get(name).map(|&pos| &self.tools[pos].spec)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.index.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.tools.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }

    /// Run one requested tool. Every failure becomes an error outcome.
    pub fn execute(&self, request: &ToolRequest) -> ToolCall {
        let Some(&pos) = self.index.get(&request.name) else {
            warn!(tool = %request.name, "model requested unknown tool");
            return ToolCall {
                name: request.name.clone(),
                arguments: Vec::new(),
                outcome: ToolOutcome::Error(ToolError::UnknownTool(request.name.clone()).to_string()),
            };
        };
        let tool = &self.tools[pos];

        let arguments = match bind_arguments(&tool.spec, &request.arguments) {
            Ok(arguments) => arguments,
            Err(err) => {
                warn!(tool = %request.name, error = %err, "tool arguments rejected");
                return ToolCall {
                    name: request.name.clone(),
                    arguments: Vec::new(),
                    outcome: ToolOutcome::Error(err.to_string()),
                };
            }
        };

        let outcome = ToolOutcome::from((tool.handler)(&arguments));
        debug!(tool = %request.name, error = outcome.is_error(), "tool executed");
        ToolCall {
            name: request.name.clone(),
            arguments,
            outcome,
        }
    }
}

/// Bind JSON arguments to the tool's declared positional parameters.
///
/// Accepts an object keyed by parameter name, the same object encoded as a
/// JSON string, or an array in parameter order. `null` means no arguments.
pub fn bind_arguments(spec: &ToolSpec, arguments: &Value) -> Result<Vec<ToolValue>, ToolError> {
    match arguments {
        Value::Null => bind_each(spec, |_, _| None),
        Value::Object(map) => bind_each(spec, |name, _| map.get(name)),
        Value::Array(items) => bind_each(spec, |_, pos| items.get(pos)),
        Value::String(raw) if raw.trim().is_empty() => bind_each(spec, |_, _| None),
        Value::String(raw) => {
            let parsed: Value = serde_json::from_str(raw).map_err(|e| ToolError::InvalidArgument {
                name: "arguments".to_string(),
                reason: e.to_string(),
            })?;
            if parsed.is_string() {
                return Err(ToolError::InvalidArgument {
                    name: "arguments".to_string(),
                    reason: "expected an object or array".to_string(),
                });
            }
            bind_arguments(spec, &parsed)
        }
        other => Err(ToolError::InvalidArgument {
            name: "arguments".to_string(),
            reason: format!("expected an object or array, got {other}"),
        }),
    }
}

fn bind_each<'a>(
    spec: &ToolSpec,
    lookup: impl Fn(&str, usize) -> Option<&'a Value>,
) -> Result<Vec<ToolValue>, ToolError> {
    spec.parameters
        .iter()
        .enumerate()
        .map(|(pos, param)| {
            let value = lookup(&param.name, pos)
                .filter(|v| !v.is_null())
                .ok_or_else(|| ToolError::MissingArgument(param.name.clone()))?;
            coerce(&param.name, param.param_type, value)
        })
        .collect()
}

fn coerce(name: &str, param_type: ParamType, value: &Value) -> Result<ToolValue, ToolError> {
    let invalid = |reason: String| ToolError::InvalidArgument {
        name: name.to_string(),
        reason,
    };
    match param_type {
        ParamType::Number => match value {
            Value::Number(n) => n
                .as_f64()
                .map(ToolValue::Number)
                .ok_or_else(|| invalid(format!("{n} is not representable as a number"))),
            Value::String(s) => s
                .trim()
                .parse::<f64>()
                .ok()
                .filter(|n| n.is_finite())
                .map(ToolValue::Number)
                .ok_or_else(|| invalid(format!("'{s}' is not a number"))),
            other => Err(invalid(format!("expected a number, got {other}"))),
        },
        ParamType::String => match value {
            Value::String(s) => Ok(ToolValue::Text(s.clone())),
            Value::Number(n) => Ok(ToolValue::Text(n.to_string())),
            Value::Bool(b) => Ok(ToolValue::Text(b.to_string())),
            other => Err(invalid(format!("expected a string, got {other}"))),
        },
    }
}
