//! Arithmetic tools: `add`, `sub`, `mul`, `div`.
//!
//! Each operates on `{a: number, b: number}` and returns the value formatted
//! as a string. `div` fails on a zero divisor; the session treats that as a
//! fatal tool-execution error, while the MCP server answers it as error text.
//!
//! ```rust
//! use agentloop::tools::register_arithmetic_tools;
//! use agentloop::ToolRegistry;
//!
//! # #[tokio::main]
//! # async fn main() {
//! let mut registry = ToolRegistry::new();
//! register_arithmetic_tools(&mut registry);
//!
//! let product = registry
//!     .execute("mul", serde_json::json!({"a": 4, "b": 5}))
//!     .await
//!     .unwrap();
//! assert_eq!(product, "20");
//! # }
//! ```

use std::error::Error;
use std::fmt;
use std::sync::Arc;

use serde_json::Value as JsonValue;

use crate::agentloop::tool_protocol::{
    ToolParameter, ToolParameterType, ToolRegistry, ToolSchema,
};

/// Errors raised by the arithmetic handlers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ArithmeticError {
    /// A required operand is missing or not a number.
    InvalidOperand(String),
    /// `div` was asked to divide by zero.
    DivisionByZero,
}

impl fmt::Display for ArithmeticError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ArithmeticError::InvalidOperand(name) => {
                write!(f, "operand '{}' is missing or not a number", name)
            }
            ArithmeticError::DivisionByZero => write!(f, "Division by zero"),
        }
    }
}

impl Error for ArithmeticError {}

fn operand(params: &JsonValue, name: &str) -> Result<f64, Box<dyn Error + Send + Sync>> {
    params[name]
        .as_f64()
        .ok_or_else(|| ArithmeticError::InvalidOperand(name.to_string()).into())
}

fn binary_schema(name: &str, description: &str, a_desc: &str, b_desc: &str) -> ToolSchema {
    ToolSchema::new(name, description)
        .with_parameter(
            ToolParameter::new("a", ToolParameterType::Number)
                .with_description(a_desc)
                .required(),
        )
        .with_parameter(
            ToolParameter::new("b", ToolParameterType::Number)
                .with_description(b_desc)
                .required(),
        )
}

fn add_schema() -> ToolSchema {
    binary_schema(
        "add",
        "Add two numbers and return the sum as a string.",
        "first number",
        "second number",
    )
}

fn sub_schema() -> ToolSchema {
    binary_schema(
        "sub",
        "Subtract b from a and return the difference as a string.",
        "first number",
        "second number",
    )
}

fn mul_schema() -> ToolSchema {
    binary_schema(
        "mul",
        "Multiply two numbers and return the product as a string.",
        "first number",
        "second number",
    )
}

fn div_schema() -> ToolSchema {
    binary_schema(
        "div",
        "Divide a by b and return the quotient as a string.",
        "Dividend",
        "Divisor (non-zero)",
    )
}

/// The four arithmetic schemas, in the order the registry will declare them.
pub fn arithmetic_schemas() -> Vec<ToolSchema> {
    vec![add_schema(), sub_schema(), mul_schema(), div_schema()]
}

/// Install the four arithmetic tools into `registry`.
pub fn register_arithmetic_tools(registry: &mut ToolRegistry) {
    registry.register(
        add_schema(),
        Arc::new(|params| {
            let (a, b) = (operand(&params, "a")?, operand(&params, "b")?);
            Ok((a + b).to_string())
        }),
    );
    registry.register(
        sub_schema(),
        Arc::new(|params| {
            let (a, b) = (operand(&params, "a")?, operand(&params, "b")?);
            Ok((a - b).to_string())
        }),
    );
    registry.register(
        mul_schema(),
        Arc::new(|params| {
            let (a, b) = (operand(&params, "a")?, operand(&params, "b")?);
            Ok((a * b).to_string())
        }),
    );
    registry.register(
        div_schema(),
        Arc::new(|params| {
            let (a, b) = (operand(&params, "a")?, operand(&params, "b")?);
            if b == 0.0 {
                return Err(ArithmeticError::DivisionByZero.into());
            }
            Ok((a / b).to_string())
        }),
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn run(name: &str, a: f64, b: f64) -> Result<String, crate::ToolError> {
        let mut registry = ToolRegistry::new();
        register_arithmetic_tools(&mut registry);
        registry
            .execute(name, serde_json::json!({"a": a, "b": b}))
            .await
    }

    #[tokio::test]
    async fn integral_results_have_no_fraction() {
        assert_eq!(run("add", 4.0, 5.0).await.unwrap(), "9");
        assert_eq!(run("sub", 4.0, 5.0).await.unwrap(), "-1");
        assert_eq!(run("mul", 4.0, 5.0).await.unwrap(), "20");
        assert_eq!(run("div", 9.0, 2.0).await.unwrap(), "4.5");
    }

    #[tokio::test]
    async fn division_by_zero_fails_the_handler() {
        let err = run("div", 1.0, 0.0).await.unwrap_err();
        let text = err.to_string();
        assert!(text.contains("div"));
        assert!(text.contains("Division by zero"));
    }

    #[tokio::test]
    async fn missing_operand_is_rejected() {
        let mut registry = ToolRegistry::new();
        register_arithmetic_tools(&mut registry);
        let err = registry
            .execute("add", serde_json::json!({"a": 1}))
            .await
            .unwrap_err();
        assert!(err.to_string().contains("'b'"));
    }

    #[test]
    fn four_schemas_in_declaration_order() {
        let names: Vec<String> = arithmetic_schemas().into_iter().map(|s| s.name).collect();
        assert_eq!(names, ["add", "sub", "mul", "div"]);
    }
}
