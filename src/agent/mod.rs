//! Conversational agent: instructions, tools and per-thread history.

pub mod agent;
pub mod thread;

pub use agent::{AgentResponse, ChatAgent, ConversationalAgent};
pub use thread::AgentThread;
