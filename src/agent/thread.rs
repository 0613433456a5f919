//! Conversation threads: the continuation state of one chat.

use uuid::Uuid;

use crate::types::ModelMessage;

/// Accumulated conversational context for one chat, excluding the system
/// instructions.
#[derive(Debug, Clone)]
pub struct AgentThread {
    id: Uuid,
    messages: Vec<ModelMessage>,
}

impl Default for AgentThread {
    fn default() -> Self {
        Self::new()
    }
}

impl AgentThread {
    pub fn new() -> Self {
        Self {
            id: Uuid::new_v4(),
            messages: Vec::new(),
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    /// Get all messages.
    pub fn messages(&self) -> &[ModelMessage] {
        &self.messages
    }

    /// Replace the history with a completed exchange.
    pub(crate) fn replace_messages(&mut self, messages: Vec<ModelMessage>) {
        self.messages = messages;
    }

    /// Number of messages.
    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }
}
