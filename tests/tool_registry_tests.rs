use std::sync::Arc;

use agentloop::{ToolError, ToolParameter, ToolParameterType, ToolRegistry, ToolSchema};

fn echo_schema() -> ToolSchema {
    ToolSchema::new("echo", "Echo the text argument.").with_parameter(
        ToolParameter::new("text", ToolParameterType::String)
            .with_description("Text to echo back")
            .required(),
    )
}

#[tokio::test]
async fn sync_and_async_handlers_dispatch() {
    let mut registry = ToolRegistry::new();
    registry.register(
        echo_schema(),
        Arc::new(|params| Ok(params["text"].as_str().unwrap_or("").to_string())),
    );
    registry.register_async(
        ToolSchema::new("shout", "Echo the text argument, uppercased."),
        Arc::new(|params| {
            Box::pin(async move {
                Ok(params["text"].as_str().unwrap_or("").to_uppercase())
            })
        }),
    );

    assert_eq!(registry.len(), 2);
    assert_eq!(
        registry
            .execute("echo", serde_json::json!({"text": "hi"}))
            .await
            .unwrap(),
        "hi"
    );
    assert_eq!(
        registry
            .execute("shout", serde_json::json!({"text": "hi"}))
            .await
            .unwrap(),
        "HI"
    );
}

#[tokio::test]
async fn missing_tool_is_not_found() {
    let registry = ToolRegistry::new();
    let err = registry
        .execute("missing", serde_json::json!({}))
        .await
        .unwrap_err();
    assert!(matches!(err, ToolError::NotFound(name) if name == "missing"));
}

#[tokio::test]
async fn handler_failure_names_the_tool() {
    let mut registry = ToolRegistry::new();
    registry.register(
        ToolSchema::new("fragile", "Always fails."),
        Arc::new(|_| Err("boom".into())),
    );

    let err = registry
        .execute("fragile", serde_json::json!({}))
        .await
        .unwrap_err();
    match err {
        ToolError::ExecutionFailed { tool, source } => {
            assert_eq!(tool, "fragile");
            assert_eq!(source.to_string(), "boom");
        }
        other => panic!("expected ExecutionFailed, got {:?}", other),
    }
}

#[test]
fn schemas_keep_registration_order() {
    let mut registry = ToolRegistry::new();
    registry.register(ToolSchema::new("b", "second letter"), Arc::new(|_| Ok(String::new())));
    registry.register(ToolSchema::new("a", "first letter"), Arc::new(|_| Ok(String::new())));
    registry.register(ToolSchema::new("c", "third letter"), Arc::new(|_| Ok(String::new())));

    let names: Vec<&str> = registry.schemas().iter().map(|s| s.name.as_str()).collect();
    assert_eq!(names, ["b", "a", "c"]);
}

#[test]
fn schema_serde_roundtrip() {
    // The same declarative schema travels over the MCP list endpoint; make
    // sure nothing is lost in serialization.
    let schema = echo_schema();
    let json = serde_json::to_string(&schema).unwrap();
    let back: ToolSchema = serde_json::from_str(&json).unwrap();
    assert_eq!(back, schema);
    assert_eq!(back.parameters_json(), schema.parameters_json());
}
