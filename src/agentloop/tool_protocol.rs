//! Tool Schema & Registry
//!
//! This module is the single declarative source of truth for tools: the same
//! [`ToolSchema`] list that the request builder sends to the completion
//! provider is the list the [`ToolRegistry`] dispatches against, so name and
//! shape stay in sync by construction.
//!
//! # Example
//!
//! ```rust
//! use agentloop::tool_protocol::{ToolParameter, ToolParameterType, ToolSchema};
//!
//! let schema = ToolSchema::new("add", "Add two numbers and return the sum as a string.")
//!     .with_parameter(ToolParameter::new("a", ToolParameterType::Number).required())
//!     .with_parameter(ToolParameter::new("b", ToolParameterType::Number).required());
//! assert_eq!(schema.parameters_json()["required"][0], "a");
//! ```

use futures_util::future::BoxFuture;
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;
use std::collections::HashMap;
use std::error::Error;
use std::fmt;
use std::sync::Arc;

/// Defines the type of a tool parameter.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ToolParameterType {
    String,
    Number,
    Integer,
    Boolean,
    Array,
    Object,
}

impl ToolParameterType {
    fn json_name(&self) -> &'static str {
        match self {
            ToolParameterType::String => "string",
            ToolParameterType::Number => "number",
            ToolParameterType::Integer => "integer",
            ToolParameterType::Boolean => "boolean",
            ToolParameterType::Array => "array",
            ToolParameterType::Object => "object",
        }
    }
}

/// Defines a parameter for a tool.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ToolParameter {
    pub name: String,
    #[serde(rename = "type")]
    pub param_type: ToolParameterType,
    pub description: Option<String>,
    pub required: bool,
    /// Value used when the model omits the parameter.
    pub default: Option<JsonValue>,
}

impl ToolParameter {
    /// Define a new tool parameter with the provided name and type.
    pub fn new(name: impl Into<String>, param_type: ToolParameterType) -> Self {
        Self {
            name: name.into(),
            param_type,
            description: None,
            required: false,
            default: None,
        }
    }

    /// Add a human readable description that will surface in the generated
    /// schema.
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Mark the argument as required.
    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    /// Provide a default value.
    pub fn with_default(mut self, default: JsonValue) -> Self {
        self.default = Some(default);
        self
    }
}

/// Declares one tool: a unique name, a description the model reads, and the
/// typed parameter list from which the JSON schema is generated.
///
/// Declared once per session and passed unchanged with every completion
/// request.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ToolSchema {
    pub name: String,
    pub description: String,
    pub parameters: Vec<ToolParameter>,
}

impl ToolSchema {
    /// Create a schema with the supplied identifier and description.
    pub fn new(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            parameters: Vec::new(),
        }
    }

    /// Append a parameter declaration.
    pub fn with_parameter(mut self, param: ToolParameter) -> Self {
        self.parameters.push(param);
        self
    }

    /// Render the parameter list as a JSON-Schema object of the shape the
    /// chat-completions API expects:
    /// `{"type":"object","properties":{...},"required":[...]}`.
    pub fn parameters_json(&self) -> JsonValue {
        let mut properties = serde_json::Map::new();
        let mut required = Vec::new();
        for param in &self.parameters {
            let mut prop = serde_json::Map::new();
            prop.insert("type".into(), JsonValue::String(param.param_type.json_name().into()));
            if let Some(desc) = &param.description {
                prop.insert("description".into(), JsonValue::String(desc.clone()));
            }
            if let Some(default) = &param.default {
                prop.insert("default".into(), default.clone());
            }
            properties.insert(param.name.clone(), JsonValue::Object(prop));
            if param.required {
                required.push(JsonValue::String(param.name.clone()));
            }
        }
        serde_json::json!({
            "type": "object",
            "properties": properties,
            "required": required,
        })
    }
}

/// Error types for tool operations.
#[derive(Debug)]
pub enum ToolError {
    /// Requested tool is not registered. A configuration error, never
    /// retried.
    NotFound(String),
    /// A registered handler failed (e.g. division by zero).
    ExecutionFailed {
        tool: String,
        source: Box<dyn Error + Send + Sync>,
    },
    /// A lower level protocol/transport error occurred (remote registries).
    ProtocolError(String),
}

impl fmt::Display for ToolError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ToolError::NotFound(name) => write!(f, "Tool not found: {}", name),
            ToolError::ExecutionFailed { tool, source } => {
                write!(f, "Tool '{}' failed: {}", tool, source)
            }
            ToolError::ProtocolError(msg) => write!(f, "Protocol error: {}", msg),
        }
    }
}

impl Error for ToolError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            ToolError::ExecutionFailed { source, .. } => Some(source.as_ref()),
            _ => None,
        }
    }
}

/// Type alias for synchronous tool handlers.
pub type ToolFunction =
    Arc<dyn Fn(JsonValue) -> Result<String, Box<dyn Error + Send + Sync>> + Send + Sync>;

/// Type alias for asynchronous tool handlers.
pub type AsyncToolFunction = Arc<
    dyn Fn(JsonValue) -> BoxFuture<'static, Result<String, Box<dyn Error + Send + Sync>>>
        + Send
        + Sync,
>;

enum Handler {
    Sync(ToolFunction),
    Async(AsyncToolFunction),
}

/// Registry mapping tool names to executable handlers.
///
/// Built mutably during setup, then shared immutably (`Arc<ToolRegistry>`)
/// across sessions; nothing mutates a registry once a session holds it.
/// Every name a ToolCall references must exist here; absence is a fatal
/// configuration error, not a retryable condition.
#[derive(Default)]
pub struct ToolRegistry {
    handlers: HashMap<String, Handler>,
    /// Declarative schema list in registration order, consumed verbatim by
    /// the request builder.
    schemas: Vec<ToolSchema>,
}

impl ToolRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a synchronous tool handler under its schema's name.
    /// Re-registering a name replaces the previous schema and handler.
    pub fn register(&mut self, schema: ToolSchema, function: ToolFunction) {
        self.insert(schema, Handler::Sync(function));
    }

    /// Register an asynchronous tool handler under its schema's name.
    pub fn register_async(&mut self, schema: ToolSchema, function: AsyncToolFunction) {
        self.insert(schema, Handler::Async(function));
    }

    fn insert(&mut self, schema: ToolSchema, handler: Handler) {
        match self.schemas.iter_mut().find(|s| s.name == schema.name) {
            Some(slot) => *slot = schema.clone(),
            None => self.schemas.push(schema.clone()),
        }
        self.handlers.insert(schema.name, handler);
    }

    /// Whether a handler is registered under `name`.
    pub fn contains(&self, name: &str) -> bool {
        self.handlers.contains_key(name)
    }

    /// The declared schemas, in registration order.
    pub fn schemas(&self) -> &[ToolSchema] {
        &self.schemas
    }

    /// Number of registered tools.
    pub fn len(&self) -> usize {
        self.handlers.len()
    }

    /// Whether the registry has no tools.
    pub fn is_empty(&self) -> bool {
        self.handlers.is_empty()
    }

    /// Execute a named tool with structured arguments, returning the
    /// stringified result.
    pub async fn execute(&self, name: &str, arguments: JsonValue) -> Result<String, ToolError> {
        let handler = self
            .handlers
            .get(name)
            .ok_or_else(|| ToolError::NotFound(name.to_string()))?;

        let result = match handler {
            Handler::Sync(f) => f(arguments),
            Handler::Async(f) => f(arguments).await,
        };

        result.map_err(|source| ToolError::ExecutionFailed {
            tool: name.to_string(),
            source,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parameters_json_shape() {
        let schema = ToolSchema::new("mul", "Multiply two numbers.")
            .with_parameter(
                ToolParameter::new("a", ToolParameterType::Number)
                    .with_description("first number")
                    .required(),
            )
            .with_parameter(ToolParameter::new("b", ToolParameterType::Number).required());

        let json = schema.parameters_json();
        assert_eq!(json["type"], "object");
        assert_eq!(json["properties"]["a"]["type"], "number");
        assert_eq!(json["properties"]["a"]["description"], "first number");
        assert_eq!(json["required"], serde_json::json!(["a", "b"]));
    }

    #[test]
    fn optional_parameter_with_default() {
        let schema = ToolSchema::new("read_file_head", "Read the first lines of a file.")
            .with_parameter(ToolParameter::new("filepath", ToolParameterType::String).required())
            .with_parameter(
                ToolParameter::new("lines", ToolParameterType::Number)
                    .with_default(serde_json::json!(10)),
            );

        let json = schema.parameters_json();
        assert_eq!(json["properties"]["lines"]["default"], 10);
        assert_eq!(json["required"], serde_json::json!(["filepath"]));
    }

    #[tokio::test]
    async fn registry_executes_sync_handler() {
        let mut registry = ToolRegistry::new();
        registry.register(
            ToolSchema::new("echo", "Echo the input."),
            Arc::new(|params| Ok(params["text"].as_str().unwrap_or("").to_string())),
        );

        let out = registry
            .execute("echo", serde_json::json!({"text": "hi"}))
            .await
            .unwrap();
        assert_eq!(out, "hi");
    }

    #[tokio::test]
    async fn registry_reports_missing_tool() {
        let registry = ToolRegistry::new();
        let err = registry
            .execute("nope", serde_json::json!({}))
            .await
            .unwrap_err();
        assert!(matches!(err, ToolError::NotFound(name) if name == "nope"));
    }

    #[tokio::test]
    async fn re_registration_replaces_handler_and_schema() {
        let mut registry = ToolRegistry::new();
        registry.register(
            ToolSchema::new("t", "first"),
            Arc::new(|_| Ok("one".to_string())),
        );
        registry.register(
            ToolSchema::new("t", "second"),
            Arc::new(|_| Ok("two".to_string())),
        );

        assert_eq!(registry.len(), 1);
        assert_eq!(registry.schemas()[0].description, "second");
        let out = registry.execute("t", serde_json::json!({})).await.unwrap();
        assert_eq!(out, "two");
    }
}
