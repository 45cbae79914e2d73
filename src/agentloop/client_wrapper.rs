use async_trait::async_trait;
use std::error::Error;
use std::fmt;
use std::sync::Mutex;

use crate::agentloop::tool_protocol::ToolSchema;

/// A ClientWrapper is a wrapper around a hosted chat-completion endpoint.
/// It provides a common interface for sending a transcript plus declared
/// tool schemas and receiving the model's next move. It does not keep track
/// of the conversation; for that we use a ToolCallingSession, which owns the
/// transcript and uses a ClientWrapper to talk to the model.

/// Represents the possible roles for a message.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Role {
    /// Set by the developer to steer the model's responses.
    System,
    /// A message sent by a human user (or app user).
    User,
    /// Content generated by the model.
    Assistant,
    /// The result of a tool invocation, answering one ToolCall.
    Tool,
}

/// One tool invocation requested by the model inside a single assistant turn.
///
/// The `id` is opaque and minted by the provider; the matching tool-result
/// message must echo it back as its `tool_call_id`.
#[derive(Clone, Debug, PartialEq)]
pub struct ToolCall {
    pub id: String,
    pub name: String,
    /// Structured arguments, already parsed from the provider's JSON-encoded
    /// `arguments` string at the client boundary.
    pub arguments: serde_json::Value,
}

/// A single transcript entry.
///
/// Invariant: a `Role::Tool` message carries the `tool_call_id` of the
/// ToolCall it answers, and appears after the assistant message that issued
/// that call and before any later assistant turn.
#[derive(Clone, Debug, PartialEq)]
pub struct Message {
    pub role: Role,
    pub content: Option<String>,
    /// Non-empty only on assistant messages that request tool invocations.
    pub tool_calls: Vec<ToolCall>,
    /// Set only on `Role::Tool` messages.
    pub tool_call_id: Option<String>,
}

impl Message {
    /// Build a system message.
    pub fn system(content: impl Into<String>) -> Self {
        Self::text(Role::System, content)
    }

    /// Build a user message.
    pub fn user(content: impl Into<String>) -> Self {
        Self::text(Role::User, content)
    }

    /// Build a plain assistant message.
    pub fn assistant(content: impl Into<String>) -> Self {
        Self::text(Role::Assistant, content)
    }

    /// Build the tool-result message answering the ToolCall with `id`.
    pub fn tool_result(id: impl Into<String>, content: impl Into<String>) -> Self {
        Message {
            role: Role::Tool,
            content: Some(content.into()),
            tool_calls: Vec::new(),
            tool_call_id: Some(id.into()),
        }
    }

    fn text(role: Role, content: impl Into<String>) -> Self {
        Message {
            role,
            content: Some(content.into()),
            tool_calls: Vec::new(),
            tool_call_id: None,
        }
    }
}

/// How many tokens were spent on prompt vs. completion.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct TokenUsage {
    pub input_tokens: usize,
    pub output_tokens: usize,
    pub total_tokens: usize,
}

/// The model's next move, as a tagged variant rather than free text to be
/// sniffed for completion phrases: the absence of tool calls is the one and
/// only terminal signal.
#[derive(Clone, Debug, PartialEq)]
pub enum CompletionOutcome {
    /// The provider produced a final answer; the conversation is over.
    Terminal(Message),
    /// The provider requested one or more tool invocations; the contained
    /// assistant message has a non-empty `tool_calls` list.
    ToolCalls(Message),
}

/// Errors surfaced by a completion provider.
#[derive(Clone, Debug)]
pub enum ProviderError {
    /// Non-success HTTP status, with the response body for diagnosis.
    Http { status: u16, body: String },
    /// The request never produced an HTTP response (connect failure,
    /// timeout, DNS, ...).
    Transport(String),
    /// A 2xx response whose shape fits neither the terminal nor the
    /// tool-call form.
    Malformed(String),
}

impl fmt::Display for ProviderError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProviderError::Http { status, body } => {
                write!(f, "provider returned status {}: {}", status, body)
            }
            ProviderError::Transport(msg) => write!(f, "provider transport error: {}", msg),
            ProviderError::Malformed(msg) => write!(f, "malformed provider response: {}", msg),
        }
    }
}

impl Error for ProviderError {}

/// Trait defining the interface to a chat-completion service.
#[async_trait]
pub trait ClientWrapper: Send + Sync {
    /// Send the full transcript and the declared tool schemas, returning the
    /// model's next move. Implementations pass the schemas unchanged with
    /// every request (`tool_choice: "auto"` semantics).
    async fn complete(
        &self,
        messages: &[Message],
        tools: &[ToolSchema],
    ) -> Result<CompletionOutcome, ProviderError>;

    /// Model identifier injected into each request, for logging.
    fn model_name(&self) -> &str;

    /// Usage from the *last* `complete()` call.
    /// Default impl reads the usage slot, so wrappers without accounting
    /// don't break.
    fn get_last_usage(&self) -> Option<TokenUsage> {
        self.usage_slot()
            .and_then(|slot| slot.lock().ok().and_then(|u| *u))
    }

    /// Wrappers supporting TokenUsage tracking should return their slot by
    /// overriding this method.
    fn usage_slot(&self) -> Option<&Mutex<Option<TokenUsage>>> {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tool_result_carries_originating_id() {
        let msg = Message::tool_result("call_42", "20");
        assert_eq!(msg.role, Role::Tool);
        assert_eq!(msg.tool_call_id.as_deref(), Some("call_42"));
        assert_eq!(msg.content.as_deref(), Some("20"));
        assert!(msg.tool_calls.is_empty());
    }

    #[test]
    fn text_constructors_leave_tool_fields_empty() {
        for msg in [Message::system("s"), Message::user("u"), Message::assistant("a")] {
            assert!(msg.tool_calls.is_empty());
            assert!(msg.tool_call_id.is_none());
        }
    }
}
