//! Command-line interface for Learn Copilot.

pub mod errors;

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

/// Question asked by `ask` when none is given.
pub const DEFAULT_QUESTION: &str = "How do I create an agent in Azure AI Foundry Agents? \
Include the Microsoft Learn reference and code samples.";

/// Chat with a Microsoft Learn-grounded agent.
#[derive(Parser, Debug)]
#[command(
    name = "learn-copilot",
    version,
    about = "Learn Copilot: chat over Microsoft Learn MCP tools with Azure OpenAI"
)]
pub struct Cli {
    /// Microsoft Learn MCP endpoint (overrides LEARN_MCP_ENDPOINT)
    #[arg(long, global = true)]
    pub mcp_endpoint: Option<String>,

    /// Run without the user memory store
    #[arg(long, global = true)]
    pub no_memory: bool,

    /// Debug logging on stderr
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Top-level CLI commands.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Interactive chat (default)
    Chat(ChatArgs),
    /// Ask a single question and exit
    Ask(AskArgs),
}

/// Arguments for the `chat` subcommand.
#[derive(Args, Debug, Clone)]
pub struct ChatArgs {
    /// Directory where /save writes transcripts
    #[arg(long, default_value = ".")]
    pub output_dir: PathBuf,
}

impl Default for ChatArgs {
    fn default() -> Self {
        Self {
            output_dir: PathBuf::from("."),
        }
    }
}

/// Arguments for the `ask` subcommand.
#[derive(Args, Debug, Clone)]
pub struct AskArgs {
    /// Question to ask
    pub question: Option<String>,
}

impl AskArgs {
    pub fn question(&self) -> &str {
        self.question.as_deref().unwrap_or(DEFAULT_QUESTION)
    }
}

impl Cli {
    /// The command to run, defaulting to interactive chat.
    pub fn command(&self) -> Commands {
        match &self.command {
            Some(Commands::Chat(args)) => Commands::Chat(args.clone()),
            Some(Commands::Ask(args)) => Commands::Ask(args.clone()),
            None => Commands::Chat(ChatArgs::default()),
        }
    }
}
