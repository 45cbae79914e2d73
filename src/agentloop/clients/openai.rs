//! The `OpenAIClient` struct implements [`ClientWrapper`] for OpenAI's Chat
//! Completions API and any compatible endpoint (self-hosted deployments,
//! proxies), capturing both the assistant response and token usage.
//!
//! # Key Features
//!
//! - **complete(...)**: sends `{model, messages, tools, tool_choice:"auto"}`
//!   and maps the first choice into a [`CompletionOutcome`].
//! - **Automatic Usage Capture**: stores the latest [`TokenUsage`]
//!   internally; call `get_last_usage()` after `complete()` to retrieve it.
//! - **Configurable endpoint/model/timeout** via
//!   [`SessionConfig`](crate::SessionConfig); nothing is hardcoded.
//!
//! # Example
//!
//! ```rust,no_run
//! use agentloop::clients::openai::OpenAIClient;
//! use agentloop::{ClientWrapper, Message, SessionConfig};
//!
//! # async fn demo() -> Result<(), Box<dyn std::error::Error>> {
//! let secret_key = std::env::var("OPENAI_API_KEY")?;
//! let client = OpenAIClient::new(&secret_key, &SessionConfig::default());
//!
//! let outcome = client
//!     .complete(
//!         &[Message::system("You are terse."), Message::user("Hello!")],
//!         &[],
//!     )
//!     .await?;
//! # Ok(())
//! # }
//! ```

use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::agentloop::client_wrapper::{
    ClientWrapper, CompletionOutcome, Message, ProviderError, Role, TokenUsage, ToolCall,
};
use crate::agentloop::clients::common::get_shared_http_client;
use crate::agentloop::config::SessionConfig;
use crate::agentloop::tool_protocol::ToolSchema;

/// Client wrapper for OpenAI-compatible chat-completions endpoints.
pub struct OpenAIClient {
    endpoint: String,
    model: String,
    api_key: String,
    timeout: Duration,
    /// Storage for the token usage returned by the most recent request.
    token_usage: Mutex<Option<TokenUsage>>,
}

impl OpenAIClient {
    /// Construct a client from an API key and a [`SessionConfig`], taking
    /// the endpoint, model, and timeout from the config.
    pub fn new(secret_key: &str, config: &SessionConfig) -> Self {
        Self {
            endpoint: config.endpoint.clone(),
            model: config.model.clone(),
            api_key: secret_key.to_string(),
            timeout: config.timeout,
            token_usage: Mutex::new(None),
        }
    }

    /// Construct a client using the provided API key and explicit model
    /// name, with the default endpoint and timeout.
    pub fn new_with_model_string(secret_key: &str, model_name: &str) -> Self {
        Self::new(secret_key, &SessionConfig::default().with_model(model_name))
    }

    /// Construct a client targeting a custom OpenAI-compatible endpoint.
    pub fn new_with_endpoint(secret_key: &str, model_name: &str, endpoint: &str) -> Self {
        Self::new(
            secret_key,
            &SessionConfig::default()
                .with_model(model_name)
                .with_endpoint(endpoint),
        )
    }
}

// ---- Wire types (chat-completions contract) ----

#[derive(Serialize)]
struct ChatRequest {
    model: String,
    messages: Vec<WireMessage>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    tools: Vec<WireTool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    tool_choice: Option<&'static str>,
}

#[derive(Serialize)]
struct WireMessage {
    role: &'static str,
    content: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    tool_calls: Vec<WireToolCall>,
    #[serde(skip_serializing_if = "Option::is_none")]
    tool_call_id: Option<String>,
}

#[derive(Serialize, Deserialize)]
struct WireToolCall {
    id: String,
    #[serde(rename = "type")]
    kind: String,
    function: WireFunctionCall,
}

#[derive(Serialize, Deserialize)]
struct WireFunctionCall {
    name: String,
    /// JSON-encoded on the wire, per the chat-completions contract.
    arguments: String,
}

#[derive(Serialize)]
struct WireTool {
    #[serde(rename = "type")]
    kind: &'static str,
    function: WireFunctionDef,
}

#[derive(Serialize)]
struct WireFunctionDef {
    name: String,
    description: String,
    parameters: serde_json::Value,
}

#[derive(Deserialize)]
struct ChatResponse {
    choices: Vec<Choice>,
    usage: Option<WireUsage>,
}

#[derive(Deserialize)]
struct Choice {
    message: IncomingMessage,
    #[allow(dead_code)]
    finish_reason: Option<String>,
}

#[derive(Deserialize)]
struct IncomingMessage {
    content: Option<String>,
    #[serde(default)]
    tool_calls: Vec<WireToolCall>,
}

#[derive(Deserialize)]
struct WireUsage {
    prompt_tokens: usize,
    completion_tokens: usize,
    total_tokens: usize,
}

fn role_name(role: Role) -> &'static str {
    match role {
        Role::System => "system",
        Role::User => "user",
        Role::Assistant => "assistant",
        Role::Tool => "tool",
    }
}

fn to_wire_message(msg: &Message) -> WireMessage {
    WireMessage {
        role: role_name(msg.role),
        content: msg.content.clone(),
        tool_calls: msg
            .tool_calls
            .iter()
            .map(|call| WireToolCall {
                id: call.id.clone(),
                kind: "function".to_string(),
                function: WireFunctionCall {
                    name: call.name.clone(),
                    arguments: call.arguments.to_string(),
                },
            })
            .collect(),
        tool_call_id: msg.tool_call_id.clone(),
    }
}

fn to_wire_tool(schema: &ToolSchema) -> WireTool {
    WireTool {
        kind: "function",
        function: WireFunctionDef {
            name: schema.name.clone(),
            description: schema.description.clone(),
            parameters: schema.parameters_json(),
        },
    }
}

/// Parse a wire tool call, decoding its JSON-encoded argument string. An
/// empty argument string stands for `{}`.
fn parse_tool_call(wire: WireToolCall) -> Result<ToolCall, ProviderError> {
    let arguments = if wire.function.arguments.trim().is_empty() {
        serde_json::json!({})
    } else {
        serde_json::from_str(&wire.function.arguments).map_err(|err| {
            ProviderError::Malformed(format!(
                "tool call '{}' carried unparseable arguments: {}",
                wire.function.name, err
            ))
        })?
    };
    Ok(ToolCall {
        id: wire.id,
        name: wire.function.name,
        arguments,
    })
}

#[async_trait]
impl ClientWrapper for OpenAIClient {
    async fn complete(
        &self,
        messages: &[Message],
        tools: &[ToolSchema],
    ) -> Result<CompletionOutcome, ProviderError> {
        let request = ChatRequest {
            model: self.model.clone(),
            messages: messages.iter().map(to_wire_message).collect(),
            tools: tools.iter().map(to_wire_tool).collect(),
            tool_choice: if tools.is_empty() { None } else { Some("auto") },
        };

        let response = get_shared_http_client()
            .post(&self.endpoint)
            .bearer_auth(&self.api_key)
            .timeout(self.timeout)
            .json(&request)
            .send()
            .await
            .map_err(|err| ProviderError::Transport(err.to_string()))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|err| ProviderError::Transport(err.to_string()))?;

        if !status.is_success() {
            log::error!("OpenAIClient::complete(...): API error {}: {}", status, body);
            return Err(ProviderError::Http {
                status: status.as_u16(),
                body,
            });
        }

        let parsed: ChatResponse = serde_json::from_str(&body)
            .map_err(|err| ProviderError::Malformed(format!("invalid response body: {}", err)))?;

        if let Some(usage) = parsed.usage {
            if let Ok(mut slot) = self.token_usage.lock() {
                *slot = Some(TokenUsage {
                    input_tokens: usage.prompt_tokens,
                    output_tokens: usage.completion_tokens,
                    total_tokens: usage.total_tokens,
                });
            }
        }

        let choice = parsed
            .choices
            .into_iter()
            .next()
            .ok_or_else(|| ProviderError::Malformed("response contained no choices".into()))?;

        if !choice.message.tool_calls.is_empty() {
            let tool_calls = choice
                .message
                .tool_calls
                .into_iter()
                .map(parse_tool_call)
                .collect::<Result<Vec<_>, _>>()?;
            return Ok(CompletionOutcome::ToolCalls(Message {
                role: Role::Assistant,
                content: choice.message.content,
                tool_calls,
                tool_call_id: None,
            }));
        }

        match choice.message.content {
            Some(content) => Ok(CompletionOutcome::Terminal(Message::assistant(content))),
            None => Err(ProviderError::Malformed(
                "response contained neither text content nor tool calls".into(),
            )),
        }
    }

    fn model_name(&self) -> &str {
        &self.model
    }

    fn usage_slot(&self) -> Option<&Mutex<Option<TokenUsage>>> {
        Some(&self.token_usage)
    }
}
