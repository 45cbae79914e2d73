//! Arithmetic tool server.
//!
//! Serves add/sub/mul/div over the MCP-style HTTP surface. Division by zero
//! is answered as error text rather than failing the request.
//!
//! Usage: cargo run --example arithmetic_mcp_server --features mcp-server -- [port]
//! Honors AGENTLOOP_MCP_TOKEN to require bearer authentication.

use std::process;
use std::sync::Arc;

use agentloop::mcp_server::McpServerBuilder;
use agentloop::tools::register_arithmetic_tools;
use agentloop::ToolRegistry;

#[tokio::main]
async fn main() {
    agentloop::init_logger();

    let port: u16 = match std::env::args().nth(1) {
        Some(arg) => match arg.parse() {
            Ok(port) => port,
            Err(_) => {
                eprintln!("Usage: arithmetic_mcp_server [port]");
                process::exit(1);
            }
        },
        None => 3000,
    };

    let mut registry = ToolRegistry::new();
    register_arithmetic_tools(&mut registry);

    let mut builder = McpServerBuilder::new(Arc::new(registry));
    if let Ok(token) = std::env::var("AGENTLOOP_MCP_TOKEN") {
        builder = builder.with_bearer_token(token);
    }

    match builder.start_on(port).await {
        Ok(server) => {
            println!("MCP server running on http://{}", server.addr());
            server.wait().await;
        }
        Err(err) => {
            eprintln!("Failed to start server: {}", err);
            process::exit(1);
        }
    }
}
