//! Startup wiring for the interactive and one-shot modes.

use std::sync::Arc;

use tokio::io::BufReader;
use tracing::{info, warn};

use crate::agent::{ChatAgent, ConversationalAgent};
use crate::cli::{AskArgs, ChatArgs};
use crate::config::AppConfig;
use crate::error::Result;
use crate::mcp::{MCPClient, MCPToolAdapter, StreamableHttpTransport};
use crate::memory::{MemoryStore, NICKNAME, USER_NAME};
use crate::provider::azure::AzureOpenAiProvider;
use crate::session::{
    welcome_banner, ConsolePresenter, Level, Presenter, Session, TranscriptWriter,
};
use crate::tools::{DynamicToolAdapter, DynamicToolProvider, Tool};

pub const AGENT_NAME: &str = "DocsAgent";
pub const MCP_SERVER_NAME: &str = "MicrosoftLearn";

/// Tool names listed at chat startup before the rest are summarized.
const TOOL_PREVIEW: usize = 5;

pub const BASE_INSTRUCTIONS: &str = "You are an expert agent in Microsoft technologies. \
For any question about Azure/.NET/Windows/VS/Entra/M365, \
you MUST first use the Microsoft Learn MCP Server tools \
(search/fetch/code samples) and cite the official URL. \
Be conversational, helpful, and provide practical examples when possible.";

/// Agent instructions, with the memory context appended when there is any.
pub fn build_instructions(memory: Option<&MemoryStore>) -> String {
    let context = memory.map(MemoryStore::render_context).unwrap_or_default();
    if context.is_empty() {
        BASE_INSTRUCTIONS.to_string()
    } else {
        format!("{BASE_INSTRUCTIONS}\n\n{context}")
    }
}

/// Lines listing discovered tools, capped at `limit` names when given.
pub fn tool_listing(names: &[&str], limit: Option<usize>) -> Vec<String> {
    let shown = limit.unwrap_or(names.len()).min(names.len());
    let mut lines: Vec<String> = names[..shown].iter().map(|n| format!("   • {n}")).collect();
    if shown < names.len() {
        lines.push(format!("   ... and {} more", names.len() - shown));
    }
    lines
}

/// A connected MCP session and the tools it exposes.
pub struct ToolCatalog {
    adapter: Arc<MCPToolAdapter>,
    pub tools: Vec<Box<dyn Tool>>,
}

impl ToolCatalog {
    /// Connect to the MCP server at `endpoint` and discover its tools.
    pub async fn connect(endpoint: &str) -> Result<Self> {
        let transport = StreamableHttpTransport::new(MCP_SERVER_NAME, endpoint);
        let adapter = Arc::new(MCPToolAdapter::new(MCPClient::new(Box::new(transport))));
        let provider: Arc<dyn DynamicToolProvider> = adapter.clone();
        let tools = DynamicToolAdapter::discover(provider).await?;
        info!(endpoint, tools = tools.len(), "tool catalog loaded");
        Ok(Self { adapter, tools })
    }

    pub fn names(&self) -> Vec<&str> {
        self.tools.iter().map(|t| t.name()).collect()
    }

    /// Close the MCP session; failures are only logged.
    pub async fn close(&self) {
        if let Err(e) = self.adapter.shutdown().await {
            warn!(error = %e, "closing MCP session failed");
        }
    }
}

fn build_agent(config: &AppConfig, tools: Vec<Box<dyn Tool>>, instructions: String) -> ChatAgent {
    let provider = Arc::new(AzureOpenAiProvider::from_config(config));
    ChatAgent::new(AGENT_NAME, instructions, tools, provider)
}

/// Interactive chat.
pub async fn run_chat(config: AppConfig, args: ChatArgs, use_memory: bool) -> Result<()> {
    let mut out = ConsolePresenter::new();
    out.clear();
    out.notify(Level::Heading, &welcome_banner());

    let memory = if use_memory {
        out.notify(Level::Info, "Initializing memory store...");
        let mut store = MemoryStore::new();
        store.load_default_profile();
        out.notify(Level::Success, "Memory store loaded with user profile");
        out.notify(
            Level::Muted,
            &format!(
                "   Loaded profile: {} ({})",
                store.get(USER_NAME).unwrap_or("-"),
                store.get(NICKNAME).unwrap_or("-")
            ),
        );
        Some(store)
    } else {
        out.notify(Level::Muted, "Memory store disabled");
        None
    };

    out.notify(Level::Info, "Connecting to Microsoft Learn MCP Server...");
    let mut catalog = ToolCatalog::connect(&config.mcp_endpoint).await?;
    let names = catalog.names();
    out.notify(
        Level::Success,
        &format!("Loaded {} tools from Microsoft Learn", names.len()),
    );
    if !names.is_empty() {
        out.notify(Level::Muted, "   Available tools:");
        for line in tool_listing(&names, Some(TOOL_PREVIEW)) {
            out.notify(Level::Muted, &line);
        }
    }

    out.notify(Level::Info, "Initializing agent...");
    let tools = std::mem::take(&mut catalog.tools);
    let agent = build_agent(&config, tools, build_instructions(memory.as_ref()));
    out.notify(Level::Success, "Agent initialized and ready!");

    let mut session = Session::new(agent, out, memory, TranscriptWriter::new(args.output_dir));
    session
        .presenter_mut()
        .notify(Level::Success, "Conversation thread created");

    let result = session.run(BufReader::new(tokio::io::stdin())).await;
    catalog.close().await;
    result
}

/// One question, one answer.
pub async fn run_ask(config: AppConfig, args: AskArgs) -> Result<()> {
    let mut out = ConsolePresenter::new();

    let mut catalog = ToolCatalog::connect(&config.mcp_endpoint).await?;
    out.notify(Level::Success, "Connected to Learn MCP.");
    out.notify(Level::Info, "Tools exposed by Learn MCP:");
    for line in tool_listing(&catalog.names(), None) {
        out.notify(Level::Muted, &line);
    }

    let tools = std::mem::take(&mut catalog.tools);
    let agent = build_agent(&config, tools, build_instructions(None));
    let mut thread = agent.new_thread();

    let outcome = agent.run(args.question(), &mut thread).await;
    catalog.close().await;
    let response = outcome?;

    out.notify(Level::Heading, "\n=== Agent Response ===\n");
    out.notify(Level::Info, &response.text);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn instructions_without_memory_are_base_only() {
        assert_eq!(build_instructions(None), BASE_INSTRUCTIONS);
        assert_eq!(build_instructions(Some(&MemoryStore::new())), BASE_INSTRUCTIONS);
    }

    #[test]
    fn instructions_append_memory_context() {
        let mut store = MemoryStore::new();
        store.load_default_profile();
        let instructions = build_instructions(Some(&store));
        assert!(instructions.starts_with(BASE_INSTRUCTIONS));
        assert!(instructions.contains("\n\n### User Context & Memories:\n- user_name: Pablo Piovano"));
    }

    #[test]
    fn tool_listing_caps_preview() {
        let names = ["a", "b", "c", "d", "e", "f", "g"];
        let lines = tool_listing(&names, Some(5));
        assert_eq!(lines.len(), 6);
        assert_eq!(lines[0], "   • a");
        assert_eq!(lines[5], "   ... and 2 more");
    }

    #[test]
    fn tool_listing_without_limit_lists_all() {
        let names = ["microsoft_docs_search", "microsoft_docs_fetch"];
        assert_eq!(
            tool_listing(&names, None),
            vec!["   • microsoft_docs_search", "   • microsoft_docs_fetch"]
        );
        assert_eq!(tool_listing(&names, Some(5)).len(), 2);
    }
}
