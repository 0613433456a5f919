//! Dynamic tool provider: tools discovered at runtime (e.g. over MCP).

use std::sync::Arc;

use async_trait::async_trait;

use super::arguments::ToolArguments;
use super::tool::{Tool, ToolExecutionContext};
use super::types::AgentToolParameters;
use crate::error::AppError;

/// Descriptor of a tool discovered at runtime.
///
/// Treated as opaque: name, description and schema are forwarded to the
/// model as-is.
#[derive(Debug, Clone, PartialEq)]
pub struct DynamicTool {
    pub name: String,
    pub description: String,
    pub parameters: AgentToolParameters,
}

/// Source of runtime-discovered tools.
#[async_trait]
pub trait DynamicToolProvider: Send + Sync {
    async fn list_tools(&self) -> Result<Vec<DynamicTool>, AppError>;

    async fn execute_tool(
        &self,
        name: &str,
        args: &ToolArguments,
        ctx: &ToolExecutionContext,
    ) -> Result<serde_json::Value, AppError>;
}

/// Exposes a [`DynamicTool`] through the core [`Tool`] trait.
pub struct DynamicToolAdapter {
    provider: Arc<dyn DynamicToolProvider>,
    name: String,
    description: String,
    parameters: AgentToolParameters,
}

impl DynamicToolAdapter {
    pub fn new(provider: Arc<dyn DynamicToolProvider>, tool: DynamicTool) -> Self {
        Self {
            provider,
            name: tool.name,
            description: tool.description,
            parameters: tool.parameters,
        }
    }

    /// Discover every tool from `provider` and wrap each one.
    pub async fn discover(
        provider: Arc<dyn DynamicToolProvider>,
    ) -> Result<Vec<Box<dyn Tool>>, AppError> {
        let tools = provider.list_tools().await?;
        Ok(tools
            .into_iter()
            .map(|tool| Box::new(Self::new(provider.clone(), tool)) as Box<dyn Tool>)
            .collect())
    }
}

#[async_trait]
impl Tool for DynamicToolAdapter {
    fn name(&self) -> &str {
        &self.name
    }

    fn description(&self) -> &str {
        &self.description
    }

    fn parameters(&self) -> &AgentToolParameters {
        &self.parameters
    }

    async fn execute(
        &self,
        args: &ToolArguments,
        ctx: &ToolExecutionContext,
    ) -> Result<serde_json::Value, AppError> {
        self.provider.execute_tool(&self.name, args, ctx).await
    }
}
