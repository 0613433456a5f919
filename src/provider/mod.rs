//! Model provider trait and the Azure OpenAI implementation.

pub mod azure;
pub mod credential;
pub mod http;
pub mod openai;

pub use azure::AzureOpenAiProvider;
pub use credential::AzureCredential;

use async_trait::async_trait;

use crate::error::AppError;
use crate::types::{AgentToolCall, FinishReason, GenerationSettings, ModelMessage, Usage};

/// A request sent to a model provider.
#[derive(Debug, Clone)]
pub struct ProviderRequest {
    pub messages: Vec<ModelMessage>,
    pub settings: GenerationSettings,
    pub tools: Option<Vec<ToolDefinition>>,
}

/// Tool definition sent to the provider API.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct ToolDefinition {
    pub name: String,
    pub description: String,
    pub parameters: serde_json::Value,
}

/// Response from a provider.
#[derive(Debug, Clone)]
pub struct ProviderResponse {
    pub text: String,
    pub usage: Usage,
    pub tool_calls: Vec<AgentToolCall>,
    pub finish_reason: Option<FinishReason>,
}

/// Core trait implemented by chat model providers.
#[async_trait]
pub trait ModelProvider: Send + Sync {
    /// Provider name (e.g. "azure-openai").
    fn provider_name(&self) -> &str;

    /// The model or deployment this provider instance serves.
    fn model_id(&self) -> &str;

    /// Generate a single (non-streaming) completion.
    async fn generate_text(&self, request: &ProviderRequest)
        -> Result<ProviderResponse, AppError>;
}
