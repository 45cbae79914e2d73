//! # agentloop
//!
//! agentloop is a focused Rust toolkit for driving **tool-calling
//! conversations** against hosted language-model chat-completion APIs: the
//! bounded request/execute/append loop that turns a model's text or
//! tool-call responses into a terminating, side-effecting agent run.
//!
//! The crate provides carefully layered abstractions for:
//!
//! * **The session loop**: [`ToolCallingSession`] owns the conversation
//!   transcript, dispatches every tool call the model requests, appends the
//!   results, and stops on the first response with no tool calls: a
//!   structured terminal signal, never free-text sniffing
//! * **Provider abstraction**: the [`ClientWrapper`] trait, implemented for
//!   OpenAI-compatible chat-completions endpoints by
//!   [`clients::openai::OpenAIClient`], and easily stubbed for tests
//! * **Declarative tools**: one [`ToolSchema`] list consumed by both the
//!   request builder and the [`ToolRegistry`] dispatcher, so name and shape
//!   stay in sync by construction
//! * **Built-in tool suites**: arithmetic operators and sandboxed
//!   file-classification helpers under [`tools`]
//! * **Remote tools**: an MCP-style HTTP server (`McpServerBuilder`, on the
//!   `mcp-server` feature) exposing a registry to the network, and
//!   [`mcp_client::McpToolClient`] to consume one from a session
//!
//! ## Core Concepts
//!
//! ### ToolCallingSession: the loop (the foundation)
//!
//! A session is constructed from a provider client, a shared tool registry,
//! and a [`SessionConfig`]; `run()` seeds the transcript with the system and
//! user message and drives the exchange to a terminal answer:
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use agentloop::clients::openai::OpenAIClient;
//! use agentloop::tools::register_arithmetic_tools;
//! use agentloop::{SessionConfig, ToolCallingSession, ToolRegistry};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     agentloop::init_logger();
//!
//!     let config = SessionConfig::default();
//!     let client = Arc::new(OpenAIClient::new(
//!         &std::env::var("OPENAI_API_KEY")?,
//!         &config,
//!     ));
//!
//!     let mut registry = ToolRegistry::new();
//!     register_arithmetic_tools(&mut registry);
//!
//!     let mut session = ToolCallingSession::new(client, Arc::new(registry), config);
//!     let answer = session
//!         .run("You are an arithmetic assistant.", "3 * (4 + 5) / 2")
//!         .await?;
//!     println!("Answer: {}", answer);
//!     Ok(())
//! }
//! ```
//!
//! Every tool call is answered, in the order the model listed them, before
//! the next completion request is issued, the loop is bounded by
//! `max_iterations`, and an unknown tool or a failing handler aborts the run
//! with a typed [`SessionError`].
//!
//! ### Declaring tools
//!
//! Tools are declared once; the same declaration drives the wire schema and
//! the dispatch table:
//!
//! ```rust
//! use agentloop::{ToolParameter, ToolParameterType, ToolRegistry, ToolSchema};
//! use std::sync::Arc;
//!
//! let mut registry = ToolRegistry::new();
//! registry.register(
//!     ToolSchema::new("add", "Add two numbers and return the sum as a string.")
//!         .with_parameter(ToolParameter::new("a", ToolParameterType::Number).required())
//!         .with_parameter(ToolParameter::new("b", ToolParameterType::Number).required()),
//!     Arc::new(|params| {
//!         let a = params["a"].as_f64().unwrap_or(0.0);
//!         let b = params["b"].as_f64().unwrap_or(0.0);
//!         Ok((a + b).to_string())
//!     }),
//! );
//! ```
//!
//! Async handlers register through `register_async`; the registry is built
//! mutably, then shared immutably (`Arc<ToolRegistry>`) across sessions.
//!
//! ### Remote tools over HTTP
//!
//! With the `mcp-server` feature, any registry can be served to the network
//! and consumed from another process:
//!
//! ```rust,ignore
//! // Server process
//! let server = McpServerBuilder::new(Arc::new(registry))
//!     .with_bearer_token("sekrit")
//!     .allow_localhost_only()
//!     .start_on(3000)
//!     .await?;
//!
//! // Client process
//! let remote = Arc::new(McpToolClient::new("http://127.0.0.1:3000".into())
//!     .with_bearer_token("sekrit"));
//! let mut registry = ToolRegistry::new();
//! register_remote_tools(&mut registry, remote).await?;
//! ```
//!
//! See the programs under `demos/` for complete command-line drivers
//! mirroring common setups: a math solver, a file classifier, a one-shot
//! chat, and an arithmetic tool server.

use std::sync::Once;

static INIT_LOGGER: Once = Once::new();

/// Initialise the global [`env_logger`] subscriber exactly once.
///
/// The helper is intentionally lightweight so that applications embedding
/// agentloop can opt in to simple `RUST_LOG` driven diagnostics without
/// having to choose a logging backend upfront.
///
/// ```rust
/// agentloop::init_logger();
/// log::info!("Logger is ready");
/// ```
pub fn init_logger() {
    INIT_LOGGER.call_once(|| {
        env_logger::init();
    });
}

// Import the top-level `agentloop` module.
pub mod agentloop;

// Re-exporting key items for easier external access.
pub use crate::agentloop::client_wrapper;
pub use crate::agentloop::client_wrapper::{
    ClientWrapper, CompletionOutcome, Message, ProviderError, Role, TokenUsage, ToolCall,
};
pub use crate::agentloop::clients;
pub use crate::agentloop::config::SessionConfig;
pub use crate::agentloop::mcp_auth::{AuthConfig, IpFilter};
pub use crate::agentloop::mcp_client;
pub use crate::agentloop::mcp_client::McpToolClient;
#[cfg(feature = "mcp-server")]
pub use crate::agentloop::mcp_server;
pub use crate::agentloop::session::{SessionError, SessionState, ToolCallingSession};
pub use crate::agentloop::tool_protocol;
pub use crate::agentloop::tool_protocol::{
    AsyncToolFunction, ToolError, ToolFunction, ToolParameter, ToolParameterType, ToolRegistry,
    ToolSchema,
};
pub use crate::agentloop::tools;
