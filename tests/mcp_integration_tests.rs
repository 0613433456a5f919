//! MCP tool catalog over streamable HTTP against a mock server.

use std::collections::HashSet;
use std::sync::Arc;
use std::time::Duration;

use learn_copilot::error::AppError;
use learn_copilot::mcp::client::MCPConnectionState;
use learn_copilot::mcp::{MCPClient, MCPToolAdapter, StreamableHttpTransport};
use learn_copilot::tools::{
    DynamicToolAdapter, DynamicToolProvider, Tool, ToolArguments, ToolExecutionContext,
};
use serde_json::json;
use tokio::time::timeout;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, Request, ResponseTemplate};

const LEARN_TOOLS: &[(&str, &str)] = &[
    ("microsoft_docs_search", "Search official Microsoft documentation"),
    ("microsoft_docs_fetch", "Fetch a Microsoft Learn page as markdown"),
    ("microsoft_code_sample_search", "Search official code samples"),
];

fn mock_learn_handler() -> impl Fn(&Request) -> ResponseTemplate + Send + Sync {
    move |request: &Request| {
        let body: serde_json::Value = request.body_json().unwrap_or_else(|_| json!({}));
        let method = body.get("method").and_then(|value| value.as_str()).unwrap_or_default();
        let id = body.get("id").cloned().unwrap_or_else(|| json!(1));

        match method {
            "initialize" => ResponseTemplate::new(200).set_body_json(json!({
                "jsonrpc": "2.0",
                "id": id,
                "result": {
                    "protocolVersion": "2025-03-26",
                    "capabilities": { "tools": { "listChanged": false } },
                    "serverInfo": { "name": "MicrosoftLearn", "version": "1.0.0" }
                }
            })),
            "tools/list" => {
                let tools: Vec<_> = LEARN_TOOLS
                    .iter()
                    .map(|(name, description)| {
                        json!({
                            "name": name,
                            "description": description,
                            "inputSchema": {
                                "type": "object",
                                "properties": { "query": { "type": "string" } }
                            }
                        })
                    })
                    .collect();
                ResponseTemplate::new(200).set_body_json(json!({
                    "jsonrpc": "2.0",
                    "id": id,
                    "result": { "tools": tools, "nextCursor": null }
                }))
            }
            "tools/call" => {
                let query = body["params"]["arguments"]["query"]
                    .as_str()
                    .unwrap_or_default()
                    .to_string();
                let is_error = query.is_empty();
                ResponseTemplate::new(200).set_body_json(json!({
                    "jsonrpc": "2.0",
                    "id": id,
                    "result": {
                        "content": [{ "type": "text", "text": format!("results for {query}") }],
                        "isError": is_error
                    }
                }))
            }
            "notifications/initialized" => ResponseTemplate::new(202),
            _ => ResponseTemplate::new(200).set_body_json(json!({
                "jsonrpc": "2.0",
                "id": id,
                "result": {}
            })),
        }
    }
}

async fn learn_server() -> MockServer {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/mcp"))
        .respond_with(mock_learn_handler())
        .mount(&server)
        .await;
    server
}

fn client(server: &MockServer) -> MCPClient {
    MCPClient::new(Box::new(StreamableHttpTransport::new(
        "MicrosoftLearn",
        format!("{}/api/mcp", server.uri()),
    )))
}

fn request_methods(requests: &[Request]) -> HashSet<String> {
    requests
        .iter()
        .filter_map(|request| {
            request
                .body_json::<serde_json::Value>()
                .ok()
                .and_then(|body| body.get("method").and_then(|m| m.as_str()).map(str::to_string))
        })
        .collect()
}

#[tokio::test]
async fn client_initializes_and_lists_tools() {
    let server = learn_server().await;
    let mut client = client(&server);
    assert_eq!(client.connection_state(), MCPConnectionState::Disconnected);

    timeout(Duration::from_secs(5), client.initialize())
        .await
        .expect("initialize should complete before timeout")
        .expect("MCP client should initialize");
    assert_eq!(client.connection_state(), MCPConnectionState::Initialized);

    let tools = timeout(Duration::from_secs(5), client.list_tools())
        .await
        .expect("tools/list should complete before timeout")
        .expect("MCP client should return tools");

    let names: Vec<&str> = tools.iter().map(|t| t.name.as_str()).collect();
    assert_eq!(
        names,
        vec!["microsoft_docs_search", "microsoft_docs_fetch", "microsoft_code_sample_search"]
    );
    assert_eq!(tools[0].input_schema["properties"]["query"]["type"], "string");

    let requests = server.received_requests().await.expect("requests recorded");
    let methods = request_methods(&requests);
    assert!(methods.contains("initialize"));
    assert!(methods.contains("tools/list"));

    client.shutdown().await.expect("shutdown");
    assert_eq!(client.connection_state(), MCPConnectionState::Closed);
}

#[tokio::test]
async fn discovered_tools_execute_through_adapter() {
    let server = learn_server().await;
    let provider: Arc<dyn DynamicToolProvider> = Arc::new(MCPToolAdapter::new(client(&server)));

    let tools = timeout(Duration::from_secs(5), DynamicToolAdapter::discover(provider))
        .await
        .expect("discovery should complete before timeout")
        .expect("tools discovered");
    assert_eq!(tools.len(), 3);

    let search = tools
        .iter()
        .find(|t| t.name() == "microsoft_docs_search")
        .expect("search tool");
    assert_eq!(search.description(), "Search official Microsoft documentation");

    let result = search
        .execute(
            &ToolArguments::new(json!({ "query": "bicep" })),
            &ToolExecutionContext::default(),
        )
        .await
        .expect("tool call succeeds");
    assert_eq!(result, json!("results for bicep"));

    let err = search
        .execute(
            &ToolArguments::new(json!({ "query": "" })),
            &ToolExecutionContext::default(),
        )
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::ToolExecution { ref tool_name, .. } if tool_name == "microsoft_docs_search"));
}
