//! MCP transport layer.

use async_trait::async_trait;
use rmcp::model::ClientInfo;
use rmcp::service::{ClientInitializeError, DynService, RoleClient, RunningService, ServiceExt};
use rmcp::transport::StreamableHttpClientTransport;
use tracing::debug;

pub type DynClientService = Box<dyn DynService<RoleClient>>;
pub type MCPRunningService = RunningService<RoleClient, DynClientService>;

/// Something that can open an initialized MCP client session.
#[async_trait]
pub trait MCPTransport: Send {
    /// Human-readable server label used in logs and errors.
    fn name(&self) -> &str;

    /// Connect and run the MCP initialize handshake.
    async fn connect(
        &mut self,
        client_info: ClientInfo,
    ) -> Result<MCPRunningService, ClientInitializeError>;
}

/// Streamable HTTP transport for remote MCP servers.
#[derive(Debug, Clone)]
pub struct StreamableHttpTransport {
    name: String,
    endpoint: String,
}

impl StreamableHttpTransport {
    pub fn new(name: impl Into<String>, endpoint: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            endpoint: endpoint.into(),
        }
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

#[async_trait]
impl MCPTransport for StreamableHttpTransport {
    fn name(&self) -> &str {
        &self.name
    }

    async fn connect(
        &mut self,
        client_info: ClientInfo,
    ) -> Result<MCPRunningService, ClientInitializeError> {
        debug!(server = %self.name, endpoint = %self.endpoint, "connecting MCP streamable HTTP transport");
        let transport = StreamableHttpClientTransport::from_uri(self.endpoint.clone());
        client_info.into_dyn().serve(transport).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn constructor_keeps_name_and_endpoint() {
        let transport =
            StreamableHttpTransport::new("MicrosoftLearn", "https://learn.microsoft.com/api/mcp");
        assert_eq!(transport.name(), "MicrosoftLearn");
        assert_eq!(transport.endpoint(), "https://learn.microsoft.com/api/mcp");
    }
}
