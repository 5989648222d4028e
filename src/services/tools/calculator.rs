//! Arithmetic tools: add, subtract, multiply, divide, sqrt.

use std::sync::Arc;

use crate::domain::models::{ParamType, ToolError, ToolParameter, ToolSpec, ToolValue};

use super::registry::ToolRegistry;

fn binary_spec(name: &str, description: &str) -> ToolSpec {
    ToolSpec {
        name: name.to_string(),
        description: description.to_string(),
        parameters: vec![
            ToolParameter::number("a", "First number"),
            ToolParameter::number("b", "Second number"),
        ],
        returns: ParamType::Number,
    }
}

pub(crate) fn number(args: &[ToolValue], pos: usize, name: &str) -> Result<f64, ToolError> {
    args.get(pos)
        .and_then(ToolValue::as_number)
        .ok_or_else(|| ToolError::MissingArgument(name.to_string()))
}

fn binary(args: &[ToolValue]) -> Result<(f64, f64), ToolError> {
    Ok((number(args, 0, "a")?, number(args, 1, "b")?))
}

pub fn add(args: &[ToolValue]) -> Result<ToolValue, ToolError> {
    let (a, b) = binary(args)?;
    Ok(ToolValue::Number(a + b))
}

pub fn subtract(args: &[ToolValue]) -> Result<ToolValue, ToolError> {
    let (a, b) = binary(args)?;
    Ok(ToolValue::Number(a - b))
}

pub fn multiply(args: &[ToolValue]) -> Result<ToolValue, ToolError> {
    let (a, b) = binary(args)?;
    Ok(ToolValue::Number(a * b))
}

pub fn divide(args: &[ToolValue]) -> Result<ToolValue, ToolError> {
    let (a, b) = binary(args)?;
    if b == 0.0 {
        return Err(ToolError::Execution("Cannot divide by zero".to_string()));
    }
    Ok(ToolValue::Number(a / b))
}

pub fn sqrt(args: &[ToolValue]) -> Result<ToolValue, ToolError> {
    let n = number(args, 0, "number")?;
    if n < 0.0 {
        return Err(ToolError::Execution(
            "Cannot calculate square root of a negative number".to_string(),
        ));
    }
    Ok(ToolValue::Number(n.sqrt()))
}

/// Register the calculator tools.
pub fn register(registry: &mut ToolRegistry) {
    registry.register(binary_spec("add", "Adds two numbers"), Arc::new(add));
    registry.register(
        binary_spec("subtract", "Subtracts second number from first"),
        Arc::new(subtract),
    );
    registry.register(binary_spec("multiply", "Multiplies two numbers"), Arc::new(multiply));
    registry.register(
        binary_spec("divide", "Divides first number by second"),
        Arc::new(divide),
    );
    registry.register(
        ToolSpec {
            name: "sqrt".to_string(),
            description: "Calculates the square root of a number".to_string(),
            parameters: vec![ToolParameter::number("number", "Number to take the root of")],
            returns: ParamType::Number,
        },
        Arc::new(sqrt),
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    fn nums(values: &[f64]) -> Vec<ToolValue> {
        values.iter().copied().map(ToolValue::Number).collect()
    }

    #[test]
    fn test_arithmetic() {
        assert_eq!(add(&nums(&[2.0, 3.0])).unwrap(), ToolValue::Number(5.0));
        assert_eq!(subtract(&nums(&[2.0, 3.0])).unwrap(), ToolValue::Number(-1.0));
        assert_eq!(multiply(&nums(&[25.0, 4.0])).unwrap(), ToolValue::Number(100.0));
        assert_eq!(divide(&nums(&[9.0, 2.0])).unwrap(), ToolValue::Number(4.5));
        assert_eq!(sqrt(&nums(&[144.0])).unwrap(), ToolValue::Number(12.0));
    }

    #[test]
    fn test_divide_by_zero() {
        let err = divide(&nums(&[1.0, 0.0])).unwrap_err();
        assert_eq!(err.to_string(), "Cannot divide by zero");
    }

    #[test]
    fn test_sqrt_negative() {
        assert!(sqrt(&nums(&[-4.0])).is_err());
    }

    #[test]
    fn test_register_all() {
        let mut registry = ToolRegistry::new();
        register(&mut registry);
        for name in ["add", "subtract", "multiply", "divide", "sqrt"] {
            assert!(registry.contains(name), "missing {name}");
        }
    }
}
