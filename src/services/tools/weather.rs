//! Simulated weather lookup and the local clock.

use chrono::Local;
use std::sync::Arc;

use crate::domain::models::{ParamType, ToolError, ToolParameter, ToolSpec, ToolValue};

use super::registry::ToolRegistry;

const DATE_TIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Canned conditions; there is no real weather backend.
pub fn current_weather(args: &[ToolValue]) -> Result<ToolValue, ToolError> {
    let city = args
        .first()
        .and_then(ToolValue::as_text)
        .ok_or_else(|| ToolError::MissingArgument("city".to_string()))?;
    Ok(ToolValue::Text(format!(
        "Weather in {city}: Sunny, 22°C, Humidity 65%"
    )))
}

pub fn current_date_time(_args: &[ToolValue]) -> Result<ToolValue, ToolError> {
    Ok(ToolValue::Text(Local::now().format(DATE_TIME_FORMAT).to_string()))
}

pub fn register(registry: &mut ToolRegistry) {
    registry.register(
        ToolSpec {
            name: "get_current_weather".to_string(),
            description: "Gets the current weather for a city".to_string(),
            parameters: vec![ToolParameter::string("city", "Name of the city")],
            returns: ParamType::String,
        },
        Arc::new(current_weather),
    );
    registry.register(
        ToolSpec {
            name: "get_current_date_time".to_string(),
            description: "Gets the current date and time".to_string(),
            parameters: Vec::new(),
            returns: ParamType::String,
        },
        Arc::new(current_date_time),
    );
}
