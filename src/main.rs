//! Learn Copilot binary entry point.

use clap::Parser;
use tracing_subscriber::EnvFilter;

use learn_copilot::cli::errors::format_error_help;
use learn_copilot::cli::{Cli, Commands};
use learn_copilot::config::AppConfig;
use learn_copilot::error::Result;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    if let Err(e) = run(cli).await {
        eprintln!("Error: {}", format_error_help(&e));
        std::process::exit(1);
    }
}

fn init_tracing(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("warn,learn_copilot=debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

async fn run(cli: Cli) -> Result<()> {
    let mut config = AppConfig::from_env()?;
    if let Some(endpoint) = cli.mcp_endpoint.clone() {
        config = config.with_mcp_endpoint(endpoint);
    }
    tracing::debug!(?config, "configuration loaded");

    match cli.command() {
        Commands::Chat(args) => learn_copilot::app::run_chat(config, args, !cli.no_memory).await,
        Commands::Ask(args) => learn_copilot::app::run_ask(config, args).await,
    }
}
