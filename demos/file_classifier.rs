//! File classifier agent.
//!
//! Points the model at a directory of .txt files; the model lists them,
//! reads enough of each to decide a category, creates category directories,
//! and copies every file into place, all through sandboxed filesystem
//! tools.
//!
//! Usage: cargo run --example file_classifier -- <directory_path>
//! Requires the OPENAI_API_KEY environment variable.

use std::path::Path;
use std::process;
use std::sync::Arc;

use agentloop::clients::openai::OpenAIClient;
use agentloop::tools::{register_filesystem_tools, FileSystemTool};
use agentloop::{SessionConfig, ToolCallingSession, ToolRegistry};

const SYSTEM_PROMPT: &str = "You are a smart file classifier agent. Your job is to:\n\
1. List all .txt files in the working directory\n\
2. Read the content of each file (using read_file_head first, read_full_file if needed)\n\
3. Classify each file into categories: invoice, note, article, log, code, unknown\n\
4. Create a directory for each category you use\n\
5. Copy files into their classified directories\n\
6. For each file moved, explain your reasoning in one clear sentence\n\
\n\
Classification guidelines:\n\
- invoice: Contains billing information, amounts, dates, company names\n\
- note: Personal notes, reminders, short informal text\n\
- article: Longer formatted text, structured content, news articles\n\
- log: System logs, timestamps, error messages, structured data entries\n\
- code: Programming code, scripts, configuration files\n\
- unknown: Ambiguous or unclassifiable content\n\
\n\
All paths are relative to the working directory. Always use the tools \
provided to perform file operations. Be methodical and classify one file at \
a time. When every file is classified, reply with a summary instead of \
calling more tools.";

#[tokio::main]
async fn main() {
    agentloop::init_logger();

    let target_directory = match std::env::args().nth(1) {
        Some(dir) => dir,
        None => {
            eprintln!("Usage: file_classifier <directory_path>");
            process::exit(1);
        }
    };

    if !Path::new(&target_directory).is_dir() {
        eprintln!("Error: directory \"{}\" does not exist", target_directory);
        process::exit(1);
    }

    let api_key = match std::env::var("OPENAI_API_KEY") {
        Ok(key) => key,
        Err(_) => {
            eprintln!("Error: OPENAI_API_KEY environment variable required");
            process::exit(1);
        }
    };

    // Classification needs one round-trip per file plus bookkeeping, so the
    // loop bound is raised well above the default.
    let config = SessionConfig::default().with_max_iterations(50);
    let client = Arc::new(OpenAIClient::new(&api_key, &config));

    let mut registry = ToolRegistry::new();
    register_filesystem_tools(
        &mut registry,
        Arc::new(FileSystemTool::new(&target_directory)),
    );

    println!("Classifying .txt files in {}", target_directory);

    let mut session = ToolCallingSession::new(client, Arc::new(registry), config);
    match session
        .run(SYSTEM_PROMPT, "Please classify all .txt files in the working directory.")
        .await
    {
        Ok(summary) => println!("{}", summary),
        Err(err) => {
            eprintln!("{}", err);
            process::exit(1);
        }
    }
}
