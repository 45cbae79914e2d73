use agentloop::tools::{arithmetic_schemas, register_arithmetic_tools};
use agentloop::{ToolError, ToolRegistry};
use serde_json::json;

async fn evaluate(name: &str, args: serde_json::Value) -> Result<String, ToolError> {
    let mut registry = ToolRegistry::new();
    register_arithmetic_tools(&mut registry);
    registry.execute(name, args).await
}

#[tokio::test]
async fn add_sub_mul_div() {
    assert_eq!(evaluate("add", json!({"a": 2, "b": 3})).await.unwrap(), "5");
    assert_eq!(evaluate("sub", json!({"a": 2, "b": 3})).await.unwrap(), "-1");
    assert_eq!(evaluate("mul", json!({"a": 4, "b": 5})).await.unwrap(), "20");
    assert_eq!(evaluate("div", json!({"a": 20, "b": 5})).await.unwrap(), "4");
}

#[tokio::test]
async fn fractional_results_keep_their_fraction() {
    assert_eq!(evaluate("div", json!({"a": 9, "b": 2})).await.unwrap(), "4.5");
    assert_eq!(
        evaluate("add", json!({"a": 0.1, "b": 0.4})).await.unwrap(),
        "0.5"
    );
}

#[tokio::test]
async fn negative_operands() {
    assert_eq!(evaluate("mul", json!({"a": -4, "b": 5})).await.unwrap(), "-20");
    assert_eq!(evaluate("sub", json!({"a": -1, "b": -1})).await.unwrap(), "0");
}

#[tokio::test]
async fn division_by_zero_is_a_handler_error() {
    let err = evaluate("div", json!({"a": 1, "b": 0})).await.unwrap_err();
    match err {
        ToolError::ExecutionFailed { tool, source } => {
            assert_eq!(tool, "div");
            assert_eq!(source.to_string(), "Division by zero");
        }
        other => panic!("expected ExecutionFailed, got {:?}", other),
    }
}

#[tokio::test]
async fn non_numeric_operand_is_rejected() {
    let err = evaluate("add", json!({"a": "two", "b": 3})).await.unwrap_err();
    assert!(err.to_string().contains("'a'"));
}

#[test]
fn schemas_declare_two_required_numbers_each() {
    let schemas = arithmetic_schemas();
    assert_eq!(schemas.len(), 4);
    for schema in schemas {
        let json = schema.parameters_json();
        assert_eq!(json["required"], json!(["a", "b"]));
        assert_eq!(json["properties"]["a"]["type"], "number");
        assert_eq!(json["properties"]["b"]["type"], "number");
    }
}
