//! Model Context Protocol (MCP) tool catalog: client, transport and tool bridge.

pub mod bridge;
pub mod client;
pub mod schema;
pub mod transport;

pub use bridge::MCPToolAdapter;
pub use client::MCPClient;
pub use schema::MCPToolSchema;
pub use transport::{MCPTransport, StreamableHttpTransport};
