use std::net::SocketAddr;
use std::sync::Arc;

use agentloop::mcp_client::{register_remote_tools, McpToolClient};
use agentloop::mcp_server::McpServerBuilder;
use agentloop::tools::register_arithmetic_tools;
use agentloop::ToolRegistry;
use axum::body::Body;
use axum::extract::ConnectInfo;
use axum::http::{Request, StatusCode};
use http_body_util::BodyExt;
use serde_json::{json, Value};
use tower::ServiceExt;

fn arithmetic_registry() -> Arc<ToolRegistry> {
    let mut registry = ToolRegistry::new();
    register_arithmetic_tools(&mut registry);
    Arc::new(registry)
}

/// Drive the router in-process, stamping a client address the way the
/// listener would.
async fn post(
    router: axum::Router,
    path: &str,
    body: Value,
    bearer: Option<&str>,
    peer: [u8; 4],
) -> (StatusCode, Value) {
    let mut builder = Request::builder()
        .method("POST")
        .uri(path)
        .header("content-type", "application/json");
    if let Some(token) = bearer {
        builder = builder.header("authorization", format!("Bearer {}", token));
    }
    let mut request = builder.body(Body::from(body.to_string())).unwrap();
    request
        .extensions_mut()
        .insert(ConnectInfo(SocketAddr::from((peer, 55555))));

    let response = router.oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, value)
}

#[tokio::test]
async fn tools_list_serves_the_declared_schemas() {
    let router = McpServerBuilder::new(arithmetic_registry()).into_router();
    let (status, body) = post(router, "/tools/list", json!({}), None, [127, 0, 0, 1]).await;

    assert_eq!(status, StatusCode::OK);
    let tools = body["tools"].as_array().unwrap();
    let names: Vec<&str> = tools.iter().map(|t| t["name"].as_str().unwrap()).collect();
    assert_eq!(names, ["add", "sub", "mul", "div"]);
}

#[tokio::test]
async fn execute_routes_to_the_handler() {
    let router = McpServerBuilder::new(arithmetic_registry()).into_router();
    let (status, body) = post(
        router,
        "/tools/execute",
        json!({"name": "mul", "arguments": {"a": 4, "b": 5}}),
        None,
        [127, 0, 0, 1],
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["result"], "20");
}

#[tokio::test]
async fn division_by_zero_is_answered_as_error_text() {
    let router = McpServerBuilder::new(arithmetic_registry()).into_router();
    let (status, body) = post(
        router,
        "/tools/execute",
        json!({"name": "div", "arguments": {"a": 1, "b": 0}}),
        None,
        [127, 0, 0, 1],
    )
    .await;

    // The server answers rather than failing the request.
    assert_eq!(status, StatusCode::OK);
    assert!(body["error"].as_str().unwrap().contains("Division by zero"));
}

#[tokio::test]
async fn unknown_tool_is_a_404() {
    let router = McpServerBuilder::new(arithmetic_registry()).into_router();
    let (status, body) = post(
        router,
        "/tools/execute",
        json!({"name": "pow", "arguments": {}}),
        None,
        [127, 0, 0, 1],
    )
    .await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert!(body["error"].as_str().unwrap().contains("pow"));
}

#[tokio::test]
async fn bearer_token_is_enforced() {
    let build = || {
        McpServerBuilder::new(arithmetic_registry())
            .with_bearer_token("sekrit")
            .into_router()
    };

    let (status, _) = post(build(), "/tools/list", json!({}), None, [127, 0, 0, 1]).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, _) = post(build(), "/tools/list", json!({}), Some("wrong"), [127, 0, 0, 1]).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, body) = post(build(), "/tools/list", json!({}), Some("sekrit"), [127, 0, 0, 1]).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["tools"].as_array().unwrap().len(), 4);
}

#[tokio::test]
async fn ip_filter_rejects_unlisted_peers() {
    let router = McpServerBuilder::new(arithmetic_registry())
        .allow_ip("10.0.0.1")
        .unwrap()
        .into_router();
    let (status, body) = post(router, "/tools/list", json!({}), None, [127, 0, 0, 1]).await;

    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["error"], "Access denied");
}

#[tokio::test]
async fn remote_registry_roundtrip_over_a_live_server() {
    let server = McpServerBuilder::new(arithmetic_registry())
        .start_on(0)
        .await
        .unwrap();
    let remote = Arc::new(McpToolClient::new(format!("http://{}", server.addr())));

    let mut registry = ToolRegistry::new();
    let installed = register_remote_tools(&mut registry, remote).await.unwrap();
    assert_eq!(installed, 4);

    let product = registry
        .execute("mul", json!({"a": 4, "b": 5}))
        .await
        .unwrap();
    assert_eq!(product, "20");

    let err = registry
        .execute("div", json!({"a": 1, "b": 0}))
        .await
        .unwrap_err();
    assert!(err.to_string().contains("Division by zero"));

    server.shutdown();
}
