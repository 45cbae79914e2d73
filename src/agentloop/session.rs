//! The `session` module drives a bounded request/execute/append loop against
//! a completion provider until the model produces a terminal answer,
//! guaranteeing that every tool call is answered before the loop continues
//! and that the loop cannot run forever.
//!
//! ## Quickstart
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use agentloop::clients::openai::OpenAIClient;
//! use agentloop::tools::register_arithmetic_tools;
//! use agentloop::{SessionConfig, ToolCallingSession, ToolRegistry};
//!
//! # async fn demo() -> Result<(), Box<dyn std::error::Error>> {
//! let config = SessionConfig::default();
//! let client = Arc::new(OpenAIClient::new("YOUR_OPENAI_KEY", &config));
//!
//! let mut registry = ToolRegistry::new();
//! register_arithmetic_tools(&mut registry);
//!
//! let mut session = ToolCallingSession::new(client, Arc::new(registry), config);
//! let answer = session
//!     .run("You are an arithmetic assistant.", "3 * (4 + 5) / 2")
//!     .await?;
//! println!("Answer: {}", answer);
//! # Ok(())
//! # }
//! ```
//!
//! The transcript is owned exclusively by the session and only ever grows;
//! inspect it through [`ToolCallingSession::transcript`] after a run.

use std::error::Error;
use std::fmt;
use std::sync::Arc;

use tokio::sync::watch;

use crate::agentloop::client_wrapper::{
    ClientWrapper, CompletionOutcome, Message, ProviderError, TokenUsage, ToolCall,
};
use crate::agentloop::config::SessionConfig;
use crate::agentloop::tool_protocol::{ToolError, ToolRegistry};

/// Where the loop currently stands.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SessionState {
    /// A completion request is pending or about to be issued.
    AwaitingCompletion,
    /// Tool calls from the last assistant turn are being answered.
    DispatchingTools,
    /// The provider produced a terminal answer.
    TerminatedSuccess,
    /// The run aborted: unknown tool, handler failure, provider error,
    /// cancellation, or iteration-limit exhaustion.
    TerminatedError,
}

/// Errors that abort a run. All fatal; nothing here is retried.
#[derive(Debug)]
pub enum SessionError {
    /// The model requested a tool absent from the registry.
    UnknownTool(String),
    /// A registered handler failed (e.g. division by zero). The session does
    /// not feed the failure back to the model; it propagates to the caller.
    ToolExecution {
        tool: String,
        source: Box<dyn Error + Send + Sync>,
    },
    /// The completion provider failed or answered with a shape that fits
    /// neither the terminal nor the tool-call form.
    Provider(ProviderError),
    /// The loop exhausted its round-trip bound without a terminal response.
    IterationLimitExceeded(usize),
    /// The cancellation signal fired.
    Cancelled,
}

impl fmt::Display for SessionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SessionError::UnknownTool(name) => write!(f, "Unknown tool: {}", name),
            SessionError::ToolExecution { tool, source } => {
                write!(f, "Tool '{}' failed: {}", tool, source)
            }
            SessionError::Provider(err) => write!(f, "{}", err),
            SessionError::IterationLimitExceeded(limit) => {
                write!(f, "Iteration limit of {} reached without a terminal response", limit)
            }
            SessionError::Cancelled => write!(f, "Session cancelled"),
        }
    }
}

impl Error for SessionError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            SessionError::ToolExecution { source, .. } => Some(source.as_ref()),
            SessionError::Provider(err) => Some(err),
            _ => None,
        }
    }
}

impl From<ProviderError> for SessionError {
    fn from(err: ProviderError) -> Self {
        SessionError::Provider(err)
    }
}

/// A tool-calling conversation with a completion provider.
///
/// Owns the transcript for its lifetime; the registry is shared immutably
/// and may be reused across concurrent sessions.
pub struct ToolCallingSession {
    client: Arc<dyn ClientWrapper>,
    registry: Arc<ToolRegistry>,
    config: SessionConfig,
    transcript: Vec<Message>,
    state: SessionState,
    total_input_tokens: usize,
    total_output_tokens: usize,
    cancel: Option<watch::Receiver<bool>>,
}

impl ToolCallingSession {
    /// Create a session over the given provider, registry, and config.
    pub fn new(
        client: Arc<dyn ClientWrapper>,
        registry: Arc<ToolRegistry>,
        config: SessionConfig,
    ) -> Self {
        Self {
            client,
            registry,
            config,
            transcript: Vec::new(),
            state: SessionState::AwaitingCompletion,
            total_input_tokens: 0,
            total_output_tokens: 0,
            cancel: None,
        }
    }

    /// Attach a cancellation signal (builder pattern).
    ///
    /// Send `true` through the paired [`watch::Sender`] to cancel; the
    /// signal is honored at the top of each loop iteration and concurrently
    /// with an in-flight completion request. Dropping the sender also
    /// cancels the run.
    pub fn with_cancellation(mut self, cancel: watch::Receiver<bool>) -> Self {
        self.cancel = Some(cancel);
        self
    }

    /// Drive the loop to completion.
    ///
    /// Seeds the transcript with `[system, user]`, then repeats up to
    /// `config.max_iterations` times:
    ///
    /// 1. Sends the full transcript plus the registry's schemas to the
    ///    provider.
    /// 2. On a terminal response (no tool calls) appends the assistant
    ///    message and returns its text, the single success exit.
    /// 3. Otherwise answers every requested tool call in the order received,
    ///    appending one tool-result message per call, and goes around again.
    ///
    /// An unknown tool name, a handler failure, a provider error, or
    /// exhaustion of the iteration bound aborts the run with the
    /// corresponding [`SessionError`].
    pub async fn run(
        &mut self,
        system_prompt: &str,
        user_message: &str,
    ) -> Result<String, SessionError> {
        self.transcript = vec![Message::system(system_prompt), Message::user(user_message)];
        self.state = SessionState::AwaitingCompletion;
        self.total_input_tokens = 0;
        self.total_output_tokens = 0;

        for iteration in 1..=self.config.max_iterations {
            if self.is_cancelled() {
                return Err(self.fail(SessionError::Cancelled));
            }

            log::debug!(
                "session: iteration {}/{}: requesting completion from {} ({} transcript messages)",
                iteration,
                self.config.max_iterations,
                self.client.model_name(),
                self.transcript.len()
            );

            let outcome = self.request_completion().await?;
            self.accumulate_usage();

            match outcome {
                CompletionOutcome::Terminal(message) => {
                    let answer = message.content.clone().unwrap_or_default();
                    self.transcript.push(message);
                    self.state = SessionState::TerminatedSuccess;
                    log::info!("session: terminal response after {} iteration(s)", iteration);
                    return Ok(answer);
                }
                CompletionOutcome::ToolCalls(message) => {
                    self.state = SessionState::DispatchingTools;
                    let calls = message.tool_calls.clone();
                    self.transcript.push(message);
                    self.dispatch_tool_calls(calls).await?;
                    self.state = SessionState::AwaitingCompletion;
                }
            }
        }

        Err(self.fail(SessionError::IterationLimitExceeded(self.config.max_iterations)))
    }

    /// Issue one completion request, racing it against the cancellation
    /// signal when one is attached.
    async fn request_completion(&mut self) -> Result<CompletionOutcome, SessionError> {
        let request = self.client.complete(&self.transcript, self.registry.schemas());
        let raced = match self.cancel.clone() {
            Some(cancel) => {
                tokio::select! {
                    result = request => Some(result),
                    _ = wait_for_cancel(cancel) => None,
                }
            }
            None => Some(request.await),
        };

        match raced {
            None => Err(self.fail(SessionError::Cancelled)),
            Some(Err(err)) => {
                log::error!("session: provider error: {}", err);
                Err(self.fail(SessionError::Provider(err)))
            }
            Some(Ok(outcome)) => Ok(outcome),
        }
    }

    /// Answer every tool call from one assistant turn, in the order the
    /// provider listed them. Results are appended as tool messages carrying
    /// the originating call id; failures abort the run with no result
    /// appended for the failing call.
    async fn dispatch_tool_calls(&mut self, calls: Vec<ToolCall>) -> Result<(), SessionError> {
        let registry = Arc::clone(&self.registry);
        for call in calls {
            match registry.execute(&call.name, call.arguments.clone()).await {
                Ok(result) => {
                    log::info!("session: tool {}({}) = {}", call.name, call.arguments, result);
                    self.transcript.push(Message::tool_result(call.id, result));
                }
                Err(err) => {
                    log::error!("session: tool '{}' failed: {}", call.name, err);
                    let mapped = match err {
                        ToolError::NotFound(name) => SessionError::UnknownTool(name),
                        ToolError::ExecutionFailed { tool, source } => {
                            SessionError::ToolExecution { tool, source }
                        }
                        other => SessionError::ToolExecution {
                            tool: call.name.clone(),
                            source: Box::new(other),
                        },
                    };
                    return Err(self.fail(mapped));
                }
            }
        }
        Ok(())
    }

    fn is_cancelled(&self) -> bool {
        self.cancel.as_ref().map(|rx| *rx.borrow()).unwrap_or(false)
    }

    fn fail(&mut self, err: SessionError) -> SessionError {
        self.state = SessionState::TerminatedError;
        err
    }

    fn accumulate_usage(&mut self) {
        if let Some(usage) = self.client.get_last_usage() {
            self.total_input_tokens += usage.input_tokens;
            self.total_output_tokens += usage.output_tokens;
        }
    }

    /// The transcript so far: ordered, append-only, seeded with the system
    /// and user message of the last `run()`.
    pub fn transcript(&self) -> &[Message] {
        &self.transcript
    }

    /// Where the loop currently stands.
    pub fn state(&self) -> SessionState {
        self.state
    }

    /// Token usage aggregated across all iterations of the last `run()`.
    pub fn token_usage(&self) -> TokenUsage {
        TokenUsage {
            input_tokens: self.total_input_tokens,
            output_tokens: self.total_output_tokens,
            total_tokens: self.total_input_tokens + self.total_output_tokens,
        }
    }

    /// The configuration this session was constructed with.
    pub fn config(&self) -> &SessionConfig {
        &self.config
    }
}

/// Resolve once the signal reads `true`, or the sender is gone.
async fn wait_for_cancel(mut cancel: watch::Receiver<bool>) {
    loop {
        if *cancel.borrow() {
            return;
        }
        if cancel.changed().await.is_err() {
            return;
        }
    }
}
