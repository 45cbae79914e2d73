//! MCP-style tool server.
//!
//! Exposes a shared [`ToolRegistry`] over HTTP so remote agents can list and
//! execute its tools:
//!
//! - `POST /tools/list`: the declared schemas, serialized as-is so a remote
//!   registry can reconstruct them.
//! - `POST /tools/execute`: `{ "name": ..., "arguments": {...} }`, answered
//!   with `{"result": ...}` on success or `{"error": ...}` when the handler
//!   fails. Division by zero is answered this way rather than failing
//!   the request; an unknown tool is a 404.
//!
//! Only available on the `mcp-server` feature (requires `axum` and `tower`).
//!
//! # Example
//!
//! ```rust,ignore
//! use agentloop::mcp_server::McpServerBuilder;
//! use agentloop::tools::register_arithmetic_tools;
//! use agentloop::ToolRegistry;
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let mut registry = ToolRegistry::new();
//!     register_arithmetic_tools(&mut registry);
//!
//!     let server = McpServerBuilder::new(Arc::new(registry))
//!         .with_bearer_token("my-secret-token")
//!         .allow_localhost_only()
//!         .start_on(3000)
//!         .await?;
//!     println!("MCP server running on http://{}", server.addr());
//!     Ok(())
//! }
//! ```

use std::error::Error;
use std::net::SocketAddr;
use std::sync::Arc;

use axum::extract::{ConnectInfo, State};
use axum::http::{header, HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::post;
use axum::{Json, Router};
use serde::Deserialize;
use serde_json::json;
use tokio::net::TcpListener;
use tokio::task::JoinHandle;

use crate::agentloop::mcp_auth::{AuthConfig, IpFilter};
use crate::agentloop::tool_protocol::{ToolError, ToolRegistry};

struct ServerState {
    registry: Arc<ToolRegistry>,
    auth: AuthConfig,
    ip_filter: IpFilter,
}

/// Builder for deploying a [`ToolRegistry`] as an HTTP tool server.
pub struct McpServerBuilder {
    registry: Arc<ToolRegistry>,
    auth: AuthConfig,
    ip_filter: IpFilter,
}

impl McpServerBuilder {
    /// Create a builder serving the given registry. By default no
    /// authentication is required and all client IPs are allowed.
    pub fn new(registry: Arc<ToolRegistry>) -> Self {
        Self {
            registry,
            auth: AuthConfig::None,
            ip_filter: IpFilter::new(),
        }
    }

    /// Require `Authorization: Bearer <token>` on every request.
    pub fn with_bearer_token(mut self, token: impl Into<String>) -> Self {
        self.auth = AuthConfig::bearer(token);
        self
    }

    /// Allow a specific client IP address.
    pub fn allow_ip(mut self, ip: &str) -> Result<Self, String> {
        self.ip_filter.allow(ip)?;
        Ok(self)
    }

    /// Allow only localhost connections (IPv4 and IPv6).
    pub fn allow_localhost_only(mut self) -> Self {
        let _ = self.ip_filter.allow("127.0.0.1");
        let _ = self.ip_filter.allow("::1");
        self
    }

    /// Build the router without binding a socket. Useful for in-process
    /// testing with `tower::ServiceExt`.
    pub fn into_router(self) -> Router {
        let state = Arc::new(ServerState {
            registry: self.registry,
            auth: self.auth,
            ip_filter: self.ip_filter,
        });
        Router::new()
            .route("/tools/list", post(list_tools))
            .route("/tools/execute", post(execute_tool))
            .with_state(state)
    }

    /// Start the server on `127.0.0.1:port`. Pass port 0 to pick a free
    /// port; the bound address is available from the returned handle.
    pub async fn start_on(self, port: u16) -> Result<McpServerHandle, Box<dyn Error + Send + Sync>> {
        self.start_at(SocketAddr::from(([127, 0, 0, 1], port))).await
    }

    /// Start the server at the given address.
    pub async fn start_at(
        self,
        addr: SocketAddr,
    ) -> Result<McpServerHandle, Box<dyn Error + Send + Sync>> {
        let app = self.into_router();
        let listener = TcpListener::bind(addr).await?;
        let local_addr = listener.local_addr()?;
        log::info!("mcp server: listening on http://{}", local_addr);

        let task = tokio::spawn(async move {
            if let Err(err) = axum::serve(
                listener,
                app.into_make_service_with_connect_info::<SocketAddr>(),
            )
            .await
            {
                log::error!("mcp server: serve failed: {}", err);
            }
        });

        Ok(McpServerHandle {
            addr: local_addr,
            task,
        })
    }
}

/// A running MCP tool server.
pub struct McpServerHandle {
    addr: SocketAddr,
    task: JoinHandle<()>,
}

impl McpServerHandle {
    /// The bound socket address.
    pub fn addr(&self) -> SocketAddr {
        self.addr
    }

    /// Stop the server.
    pub fn shutdown(self) {
        self.task.abort();
    }

    /// Run until the serving task exits (normally never).
    pub async fn wait(self) {
        let _ = self.task.await;
    }
}

/// Reject the request if the client IP or credentials don't pass. Returns
/// the rejection response, or None to proceed.
fn guard(state: &ServerState, addr: SocketAddr, headers: &HeaderMap) -> Option<Response> {
    if !state.ip_filter.is_allowed(addr.ip()) {
        log::warn!("mcp server: rejected {} (IP not allowed)", addr.ip());
        return Some(
            (StatusCode::FORBIDDEN, Json(json!({"error": "Access denied"}))).into_response(),
        );
    }
    let auth_header = headers
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok());
    if !state.auth.validate(auth_header) {
        log::warn!("mcp server: rejected {} (bad credentials)", addr.ip());
        return Some(
            (StatusCode::UNAUTHORIZED, Json(json!({"error": "Unauthorized"}))).into_response(),
        );
    }
    None
}

async fn list_tools(
    State(state): State<Arc<ServerState>>,
    ConnectInfo(addr): ConnectInfo<SocketAddr>,
    headers: HeaderMap,
) -> Response {
    if let Some(rejection) = guard(&state, addr, &headers) {
        return rejection;
    }
    log::debug!("mcp server: tool list requested by {}", addr.ip());
    (StatusCode::OK, Json(json!({"tools": state.registry.schemas()}))).into_response()
}

#[derive(Deserialize)]
struct ExecuteRequest {
    name: String,
    #[serde(default)]
    arguments: serde_json::Value,
}

async fn execute_tool(
    State(state): State<Arc<ServerState>>,
    ConnectInfo(addr): ConnectInfo<SocketAddr>,
    headers: HeaderMap,
    Json(request): Json<ExecuteRequest>,
) -> Response {
    if let Some(rejection) = guard(&state, addr, &headers) {
        return rejection;
    }

    let arguments = if request.arguments.is_null() {
        json!({})
    } else {
        request.arguments
    };

    log::info!("mcp server: {} called {}({})", addr.ip(), request.name, arguments);
    match state.registry.execute(&request.name, arguments).await {
        Ok(result) => (StatusCode::OK, Json(json!({"result": result}))).into_response(),
        Err(ToolError::NotFound(name)) => (
            StatusCode::NOT_FOUND,
            Json(json!({"error": format!("Tool not found: {}", name)})),
        )
            .into_response(),
        // Handler failures are answered as error text rather than failing
        // the request, so the caller can decide what to do with them.
        Err(err) => (StatusCode::OK, Json(json!({"error": format!("Error: {}", err)}))).into_response(),
    }
}
