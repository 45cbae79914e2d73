//! Configuration for agentloop.
//!
//! Provides the [`SessionConfig`] struct passed into a
//! [`ToolCallingSession`](crate::ToolCallingSession) and the bundled
//! [`OpenAIClient`](crate::clients::openai::OpenAIClient) at construction.
//! Users construct it manually; no file parsing dependencies are required.
//!
//! # Example
//!
//! ```rust
//! use agentloop::SessionConfig;
//! use std::time::Duration;
//!
//! // Use the defaults (public OpenAI endpoint, gpt-4o-mini, 10 iterations)
//! let config = SessionConfig::default();
//!
//! // Or point at a self-hosted OpenAI-compatible deployment
//! let config = SessionConfig {
//!     endpoint: "http://localhost:11434/v1/chat/completions".into(),
//!     model: "qwen3:1.7b".into(),
//!     timeout: Duration::from_secs(120),
//!     max_iterations: 20,
//! };
//! ```

use std::time::Duration;

/// Explicit configuration record for a session, replacing module-level
/// endpoint/model constants.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SessionConfig {
    /// Full URL of the chat-completions endpoint.
    pub endpoint: String,
    /// Model identifier injected into each request.
    pub model: String,
    /// Per-request timeout for completion calls.
    pub timeout: Duration,
    /// Positive bound on request/response round-trips per `run()`.
    pub max_iterations: usize,
}

impl Default for SessionConfig {
    /// Defaults matching the common hosted setup: the public OpenAI
    /// endpoint, `gpt-4o-mini`, a 30 second request timeout, and 10 loop
    /// iterations.
    fn default() -> Self {
        Self {
            endpoint: "https://api.openai.com/v1/chat/completions".to_string(),
            model: "gpt-4o-mini".to_string(),
            timeout: Duration::from_secs(30),
            max_iterations: 10,
        }
    }
}

impl SessionConfig {
    /// Override the model identifier (builder pattern).
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    /// Override the completion endpoint (builder pattern).
    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }

    /// Override the iteration bound (builder pattern).
    pub fn with_max_iterations(mut self, max_iterations: usize) -> Self {
        self.max_iterations = max_iterations;
        self
    }

    /// Override the request timeout (builder pattern).
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_reference_setup() {
        let config = SessionConfig::default();
        assert_eq!(config.endpoint, "https://api.openai.com/v1/chat/completions");
        assert_eq!(config.model, "gpt-4o-mini");
        assert_eq!(config.timeout, Duration::from_secs(30));
        assert_eq!(config.max_iterations, 10);
    }

    #[test]
    fn builders_override_fields() {
        let config = SessionConfig::default()
            .with_model("gpt-4o")
            .with_endpoint("http://localhost:8080/v1/chat/completions")
            .with_max_iterations(3)
            .with_timeout(Duration::from_secs(5));
        assert_eq!(config.model, "gpt-4o");
        assert_eq!(config.endpoint, "http://localhost:8080/v1/chat/completions");
        assert_eq!(config.max_iterations, 3);
        assert_eq!(config.timeout, Duration::from_secs(5));
    }
}
