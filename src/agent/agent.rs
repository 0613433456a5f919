//! Chat agent backed by a model provider and a tool set.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::debug;

use crate::error::AppError;
use crate::generation::generate_text;
use crate::provider::ModelProvider;
use crate::tools::tool::Tool;
use crate::types::*;

use super::thread::AgentThread;

/// Outcome of one agent run.
#[derive(Debug, Clone)]
pub struct AgentResponse {
    pub text: String,
    pub usage: Usage,
    /// Tool calls issued while producing the answer.
    pub tool_calls: usize,
}

/// An agent that answers user text within a thread.
#[async_trait]
pub trait ConversationalAgent: Send + Sync {
    /// Start a conversation with no prior context.
    fn new_thread(&self) -> AgentThread;

    /// Answer `text` in the context of `thread`.
    ///
    /// On error the thread is left as it was before the call.
    async fn run(&self, text: &str, thread: &mut AgentThread) -> Result<AgentResponse, AppError>;
}

/// Agent with fixed instructions and tools, using the tool loop for each run.
pub struct ChatAgent {
    name: String,
    instructions: String,
    tools: Vec<Box<dyn Tool>>,
    provider: Arc<dyn ModelProvider>,
}

impl ChatAgent {
    pub fn new(
        name: impl Into<String>,
        instructions: impl Into<String>,
        tools: Vec<Box<dyn Tool>>,
        provider: Arc<dyn ModelProvider>,
    ) -> Self {
        Self {
            name: name.into(),
            instructions: instructions.into(),
            tools,
            provider,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn instructions(&self) -> &str {
        &self.instructions
    }

    pub fn tool_names(&self) -> Vec<&str> {
        self.tools.iter().map(|t| t.name()).collect()
    }
}

#[async_trait]
impl ConversationalAgent for ChatAgent {
    fn new_thread(&self) -> AgentThread {
        AgentThread::new()
    }

    async fn run(&self, text: &str, thread: &mut AgentThread) -> Result<AgentResponse, AppError> {
        let mut messages = Vec::with_capacity(thread.len() + 2);
        messages.push(ModelMessage::system(self.instructions.clone()));
        messages.extend(thread.messages().iter().cloned());
        messages.push(ModelMessage::user(text));

        debug!(
            agent = %self.name,
            thread = %thread.id(),
            history = thread.len(),
            "running agent"
        );

        let result = generate_text(
            self.provider.as_ref(),
            messages,
            GenerationSettings::default(),
            &self.tools,
        )
        .await?;

        let tool_calls = result.tool_call_count();
        let mut history = result.messages;
        history.remove(0);
        thread.replace_messages(history);

        Ok(AgentResponse {
            text: result.text,
            usage: result.usage,
            tool_calls,
        })
    }
}

impl std::fmt::Debug for ChatAgent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ChatAgent")
            .field("name", &self.name)
            .field("provider", &self.provider.provider_name())
            .field("model", &self.provider.model_id())
            .field("tools", &self.tool_names())
            .finish()
    }
}
