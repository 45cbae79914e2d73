//! Tool-calling arithmetic agent.
//!
//! Usage: cargo run --example math_solver -- "3 * (4 + 5) / 2"
//! Requires the OPENAI_API_KEY environment variable.

use std::process;
use std::sync::Arc;

use agentloop::clients::openai::OpenAIClient;
use agentloop::tools::register_arithmetic_tools;
use agentloop::{SessionConfig, ToolCallingSession, ToolRegistry};

const SYSTEM_PROMPT: &str = "You are an arithmetic assistant. Evaluate the user's expression \
step by step using the add, sub, mul and div tools, then reply with the final result.";

#[tokio::main]
async fn main() {
    agentloop::init_logger();

    let expression = std::env::args().skip(1).collect::<Vec<_>>().join(" ");
    if expression.is_empty() {
        eprintln!("Usage: math_solver \"<arithmetic expression>\"");
        process::exit(1);
    }

    let api_key = match std::env::var("OPENAI_API_KEY") {
        Ok(key) => key,
        Err(_) => {
            eprintln!("Error: OPENAI_API_KEY environment variable required");
            process::exit(1);
        }
    };

    let config = SessionConfig::default();
    let client = Arc::new(OpenAIClient::new(&api_key, &config));

    let mut registry = ToolRegistry::new();
    register_arithmetic_tools(&mut registry);

    let mut session = ToolCallingSession::new(client, Arc::new(registry), config);
    match session.run(SYSTEM_PROMPT, &expression).await {
        Ok(answer) => println!("Answer: {}", answer),
        Err(err) => {
            eprintln!("{}", err);
            process::exit(1);
        }
    }
}
