// src/agentloop/mod.rs

pub mod client_wrapper;
pub mod clients;
pub mod config;
pub mod mcp_auth;
pub mod mcp_client;
#[cfg(feature = "mcp-server")]
pub mod mcp_server;
pub mod session;
pub mod tool_protocol;
pub mod tools;

// Export the session type directly so callers reach it as
// agentloop::ToolCallingSession instead of agentloop::session::ToolCallingSession.
pub use session::ToolCallingSession;
