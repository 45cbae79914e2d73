//! HTTP client for remote MCP-style tool servers.
//!
//! [`McpToolClient`] consumes the surface served by
//! [`McpServerBuilder`](crate::mcp_server::McpServerBuilder), or any server
//! speaking the same `/tools/list` + `/tools/execute` contract, and
//! [`register_remote_tools`] installs every remote tool into a local
//! [`ToolRegistry`] as async handlers, so a
//! [`ToolCallingSession`](crate::ToolCallingSession) drives remote tools
//! exactly like local ones.
//!
//! # Example
//!
//! ```rust,no_run
//! use agentloop::mcp_client::{register_remote_tools, McpToolClient};
//! use agentloop::ToolRegistry;
//! use std::sync::Arc;
//!
//! # async fn demo() -> Result<(), Box<dyn std::error::Error>> {
//! let client = Arc::new(McpToolClient::new("http://127.0.0.1:3000".to_string()));
//! let mut registry = ToolRegistry::new();
//! let installed = register_remote_tools(&mut registry, client).await?;
//! println!("{} remote tools available", installed);
//! # Ok(())
//! # }
//! ```

use std::sync::Arc;
use std::time::Duration;

use serde::Deserialize;
use serde_json::{json, Value as JsonValue};

use crate::agentloop::tool_protocol::{ToolError, ToolRegistry, ToolSchema};

/// Client for a remote tool server.
pub struct McpToolClient {
    endpoint: String,
    client: reqwest::Client,
    bearer_token: Option<String>,
}

#[derive(Deserialize)]
struct ListResponse {
    tools: Vec<ToolSchema>,
}

#[derive(Deserialize)]
struct ExecuteResponse {
    result: Option<String>,
    error: Option<String>,
}

impl McpToolClient {
    /// Create a client for the server at `endpoint` (no trailing slash),
    /// with a 30 second request timeout.
    pub fn new(endpoint: String) -> Self {
        Self {
            endpoint: endpoint.trim_end_matches('/').to_string(),
            client: reqwest::Client::builder()
                .timeout(Duration::from_secs(30))
                .build()
                .expect("Failed to build HTTP client"),
            bearer_token: None,
        }
    }

    /// Override the request timeout.
    pub fn with_timeout(mut self, timeout_secs: u64) -> Self {
        self.client = reqwest::Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .build()
            .expect("Failed to build HTTP client");
        self
    }

    /// Send `Authorization: Bearer <token>` with every request.
    pub fn with_bearer_token(mut self, token: impl Into<String>) -> Self {
        self.bearer_token = Some(token.into());
        self
    }

    fn request(&self, path: &str) -> reqwest::RequestBuilder {
        let mut builder = self.client.post(format!("{}{}", self.endpoint, path));
        if let Some(token) = &self.bearer_token {
            builder = builder.bearer_auth(token);
        }
        builder
    }

    /// Fetch the remote tool schemas.
    pub async fn list_tools(&self) -> Result<Vec<ToolSchema>, ToolError> {
        let response = self
            .request("/tools/list")
            .json(&json!({}))
            .send()
            .await
            .map_err(|err| ToolError::ProtocolError(err.to_string()))?;

        if !response.status().is_success() {
            return Err(ToolError::ProtocolError(format!(
                "tool server returned status {}",
                response.status()
            )));
        }

        let listed: ListResponse = response
            .json()
            .await
            .map_err(|err| ToolError::ProtocolError(format!("invalid tool list: {}", err)))?;
        Ok(listed.tools)
    }

    /// Execute a remote tool. A server-side handler failure arrives as
    /// `{"error": ...}` and is surfaced as the handler error string.
    pub async fn execute(
        &self,
        name: &str,
        arguments: JsonValue,
    ) -> Result<String, Box<dyn std::error::Error + Send + Sync>> {
        let response = self
            .request("/tools/execute")
            .json(&json!({"name": name, "arguments": arguments}))
            .send()
            .await
            .map_err(|err| ToolError::ProtocolError(err.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ToolError::ProtocolError(format!(
                "tool server returned status {}: {}",
                status, body
            ))
            .into());
        }

        let executed: ExecuteResponse = response
            .json()
            .await
            .map_err(|err| ToolError::ProtocolError(format!("invalid execute response: {}", err)))?;

        match (executed.result, executed.error) {
            (Some(result), _) => Ok(result),
            (None, Some(error)) => Err(error.into()),
            (None, None) => {
                Err(ToolError::ProtocolError("execute response carried neither result nor error".into()).into())
            }
        }
    }
}

/// Fetch the remote schemas and register every one of them in `registry` as
/// an async handler dispatching over `client`. Returns the number of tools
/// installed.
pub async fn register_remote_tools(
    registry: &mut ToolRegistry,
    client: Arc<McpToolClient>,
) -> Result<usize, ToolError> {
    let schemas = client.list_tools().await?;
    let count = schemas.len();
    for schema in schemas {
        let client = Arc::clone(&client);
        let name = schema.name.clone();
        registry.register_async(
            schema,
            Arc::new(move |arguments| {
                let client = Arc::clone(&client);
                let name = name.clone();
                Box::pin(async move { client.execute(&name, arguments).await })
            }),
        );
    }
    log::info!("mcp client: registered {} remote tool(s)", count);
    Ok(count)
}
