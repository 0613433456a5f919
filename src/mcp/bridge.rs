//! Bridge MCP tools into the crate's tool system.

use async_trait::async_trait;
use tokio::sync::Mutex;

use crate::error::AppError;
use crate::tools::arguments::ToolArguments;
use crate::tools::dynamic::{DynamicTool, DynamicToolProvider};
use crate::tools::tool::ToolExecutionContext;
use crate::tools::types::AgentToolParameters;

use super::client::{MCPClient, MCPToolCallResult};
use super::schema::MCPToolSchema;

#[async_trait]
trait MCPClientOps: Send {
    async fn initialize(&mut self) -> Result<(), AppError>;
    async fn list_tools(&mut self) -> Result<Vec<MCPToolSchema>, AppError>;
    async fn call_tool(
        &mut self,
        name: &str,
        arguments: serde_json::Value,
    ) -> Result<MCPToolCallResult, AppError>;
    async fn shutdown(&mut self) -> Result<(), AppError>;
}

#[async_trait]
impl MCPClientOps for MCPClient {
    async fn initialize(&mut self) -> Result<(), AppError> {
        MCPClient::initialize(self).await
    }

    async fn list_tools(&mut self) -> Result<Vec<MCPToolSchema>, AppError> {
        MCPClient::list_tools(self).await
    }

    async fn call_tool(
        &mut self,
        name: &str,
        arguments: serde_json::Value,
    ) -> Result<MCPToolCallResult, AppError> {
        MCPClient::call_tool(self, name, arguments).await
    }

    async fn shutdown(&mut self) -> Result<(), AppError> {
        MCPClient::shutdown(self).await
    }
}

/// Adapts an MCP client to [`DynamicToolProvider`].
///
/// Tool calls from the agent are serialized through one client session.
pub struct MCPToolAdapter {
    client: Mutex<Box<dyn MCPClientOps>>,
}

impl MCPToolAdapter {
    pub fn new(client: MCPClient) -> Self {
        Self {
            client: Mutex::new(Box::new(client)),
        }
    }

    #[cfg(test)]
    fn from_client_ops(client: Box<dyn MCPClientOps>) -> Self {
        Self {
            client: Mutex::new(client),
        }
    }

    /// Close the underlying MCP session.
    pub async fn shutdown(&self) -> Result<(), AppError> {
        self.client.lock().await.shutdown().await
    }
}

#[async_trait]
impl DynamicToolProvider for MCPToolAdapter {
    async fn list_tools(&self) -> Result<Vec<DynamicTool>, AppError> {
        let mut client = self.client.lock().await;
        client.initialize().await?;
        let tools = client.list_tools().await?;
        Ok(tools.into_iter().map(map_mcp_tool_to_dynamic).collect())
    }

    async fn execute_tool(
        &self,
        name: &str,
        args: &ToolArguments,
        _ctx: &ToolExecutionContext,
    ) -> Result<serde_json::Value, AppError> {
        let mut client = self.client.lock().await;
        client.initialize().await?;
        let result = client.call_tool(name, args.raw().clone()).await?;
        Ok(result.into_value_or_text())
    }
}

fn map_mcp_tool_to_dynamic(tool: MCPToolSchema) -> DynamicTool {
    DynamicTool {
        name: tool.name,
        description: tool.description.unwrap_or_default(),
        parameters: if tool.input_schema.is_object() {
            AgentToolParameters::from_schema(tool.input_schema)
        } else {
            AgentToolParameters::empty()
        },
    }
}
