//! Arithmetic agent backed by a remote MCP-style tool server.
//!
//! The registry is populated from the server's /tools/list response, so the
//! session dispatches add/sub/mul/div over HTTP instead of in-process.
//! Start the server first: cargo run --example arithmetic_mcp_server --features mcp-server
//!
//! Usage: cargo run --example math_solver_mcp -- "3 * (4 + 5) / 2"
//! Requires OPENAI_API_KEY; honors AGENTLOOP_MCP_URL (default
//! http://127.0.0.1:3000).

use std::process;
use std::sync::Arc;

use agentloop::mcp_client::{register_remote_tools, McpToolClient};
use agentloop::clients::openai::OpenAIClient;
use agentloop::{SessionConfig, ToolCallingSession, ToolRegistry};

const SYSTEM_PROMPT: &str = "You are an arithmetic assistant. Evaluate the user's expression \
step by step using the available tools, then reply with the final result.";

#[tokio::main]
async fn main() {
    agentloop::init_logger();

    let expression = std::env::args().skip(1).collect::<Vec<_>>().join(" ");
    if expression.is_empty() {
        eprintln!("Usage: math_solver_mcp \"<arithmetic expression>\"");
        process::exit(1);
    }

    let api_key = match std::env::var("OPENAI_API_KEY") {
        Ok(key) => key,
        Err(_) => {
            eprintln!("Error: OPENAI_API_KEY environment variable required");
            process::exit(1);
        }
    };

    let server_url = std::env::var("AGENTLOOP_MCP_URL")
        .unwrap_or_else(|_| "http://127.0.0.1:3000".to_string());

    let remote = Arc::new(McpToolClient::new(server_url.clone()));
    let mut registry = ToolRegistry::new();
    match register_remote_tools(&mut registry, remote).await {
        Ok(count) => println!("Using {} tools from {}", count, server_url),
        Err(err) => {
            eprintln!("Failed to reach tool server at {}: {}", server_url, err);
            process::exit(1);
        }
    }

    let config = SessionConfig::default();
    let client = Arc::new(OpenAIClient::new(&api_key, &config));

    let mut session = ToolCallingSession::new(client, Arc::new(registry), config);
    match session.run(SYSTEM_PROMPT, &expression).await {
        Ok(answer) => println!("Answer: {}", answer),
        Err(err) => {
            eprintln!("{}", err);
            process::exit(1);
        }
    }
}
