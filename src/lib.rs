//! Learn Copilot: a console chat agent grounded in Microsoft Learn.
//!
//! Tools are discovered at startup from the Microsoft Learn MCP server and
//! handed to an Azure OpenAI chat deployment. The [`session`] module drives
//! the interactive loop: slash commands, an ordered transcript that can be
//! saved to disk, and a small user [`memory`] folded into the agent's
//! instructions.
//!
//! ```no_run
//! use learn_copilot::agent::{ChatAgent, ConversationalAgent};
//! use learn_copilot::app::ToolCatalog;
//! use learn_copilot::config::AppConfig;
//! use learn_copilot::provider::azure::AzureOpenAiProvider;
//! use std::sync::Arc;
//!
//! # async fn example() -> learn_copilot::error::Result<()> {
//! let config = AppConfig::from_env()?;
//! let catalog = ToolCatalog::connect(&config.mcp_endpoint).await?;
//! let provider = Arc::new(AzureOpenAiProvider::from_config(&config));
//! let agent = ChatAgent::new("DocsAgent", "Cite Microsoft Learn.", catalog.tools, provider);
//! let mut thread = agent.new_thread();
//! let answer = agent.run("What is Azure Bicep?", &mut thread).await?;
//! println!("{}", answer.text);
//! # Ok(())
//! # }
//! ```

pub mod agent;
pub mod app;
pub mod cli;
pub mod config;
pub mod error;
pub mod generation;
pub mod mcp;
pub mod memory;
pub mod provider;
pub mod session;
pub mod tools;
pub mod types;
pub mod util;
