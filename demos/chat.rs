//! One-shot chat: ask a single question, print the answer.
//!
//! With an empty tool registry the first provider response is terminal, so
//! this is the session loop at its smallest.
//!
//! Usage: cargo run --example chat
//! Requires the OPENAI_API_KEY environment variable.

use std::io::{self, BufRead, Write};
use std::process;
use std::sync::Arc;

use agentloop::clients::openai::OpenAIClient;
use agentloop::{SessionConfig, ToolCallingSession, ToolRegistry};

#[tokio::main]
async fn main() {
    agentloop::init_logger();

    let api_key = match std::env::var("OPENAI_API_KEY") {
        Ok(key) => key,
        Err(_) => {
            eprintln!("Error: OPENAI_API_KEY environment variable required");
            process::exit(1);
        }
    };

    print!("You: ");
    let _ = io::stdout().flush();
    let mut question = String::new();
    if io::stdin().lock().read_line(&mut question).is_err() || question.trim().is_empty() {
        println!("No question provided.");
        return;
    }

    let config = SessionConfig::default();
    let client = Arc::new(OpenAIClient::new(&api_key, &config));
    let registry = Arc::new(ToolRegistry::new());

    println!("Thinking...");
    let mut session = ToolCallingSession::new(client, registry, config);
    match session
        .run("You are a concise assistant; answer in bullet points.", question.trim())
        .await
    {
        Ok(answer) => println!("Assistant: {}", answer),
        Err(err) => {
            eprintln!("{}", err);
            process::exit(1);
        }
    }
}
