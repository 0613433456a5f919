//! Text generation with tool loop.

use tracing::{debug, warn};

use crate::error::AppError;
use crate::provider::{ModelProvider, ProviderRequest, ToolDefinition};
use crate::tools::arguments::ToolArguments;
use crate::tools::tool::{Tool, ToolExecutionContext};
use crate::types::*;

/// Maximum model calls per generation, bounding runaway tool loops.
pub const MAX_TOOL_ITERATIONS: usize = 20;

/// Generate text with an optional tool loop.
///
/// If the model returns tool calls, they are executed and fed back
/// until the model produces a final text response or the iteration limit
/// is reached. Tool failures are reported to the model, not to the caller.
pub async fn generate_text(
    provider: &dyn ModelProvider,
    mut messages: Vec<ModelMessage>,
    settings: GenerationSettings,
    tools: &[Box<dyn Tool>],
) -> Result<GenerateTextResult, AppError> {
    let tool_defs: Option<Vec<ToolDefinition>> = if tools.is_empty() {
        None
    } else {
        Some(
            tools
                .iter()
                .map(|t| ToolDefinition {
                    name: t.name().to_string(),
                    description: t.description().to_string(),
                    parameters: t.parameters().schema.clone(),
                })
                .collect(),
        )
    };

    let mut steps = Vec::new();
    let mut total_usage = Usage::default();

    for iteration in 0..MAX_TOOL_ITERATIONS {
        let request = ProviderRequest {
            messages: messages.clone(),
            settings: settings.clone(),
            tools: tool_defs.clone(),
        };

        debug!(iteration, "generate_text: calling provider");
        let response = provider.generate_text(&request).await?;
        total_usage.merge(&response.usage);

        let mut step = GenerationStep {
            text: response.text.clone(),
            tool_calls: response.tool_calls.clone(),
            tool_results: Vec::new(),
            usage: response.usage.clone(),
            finish_reason: response.finish_reason,
        };

        if response.tool_calls.is_empty() {
            messages.push(ModelMessage::assistant(response.text.clone()));
            steps.push(step);
            return Ok(GenerateTextResult {
                text: response.text,
                steps,
                messages,
                usage: total_usage,
                finish_reason: response.finish_reason,
            });
        }

        messages.push(ModelMessage::assistant_tool_calls(
            &response.text,
            &response.tool_calls,
        ));

        for tc in &response.tool_calls {
            let result = execute_tool_call(tools, tc).await;
            step.tool_results.push(result.clone());
            messages.push(ModelMessage::tool_result(result));
        }

        steps.push(step);
    }

    warn!(
        limit = MAX_TOOL_ITERATIONS,
        "generate_text: tool iteration limit reached"
    );
    let last_text = steps.last().map(|s| s.text.clone()).unwrap_or_default();
    Ok(GenerateTextResult {
        text: last_text,
        steps,
        messages,
        usage: total_usage,
        finish_reason: Some(FinishReason::Length),
    })
}

async fn execute_tool_call(tools: &[Box<dyn Tool>], tc: &AgentToolCall) -> AgentToolResult {
    let Some(tool) = tools.iter().find(|t| t.name() == tc.name) else {
        warn!(tool = %tc.name, "Tool not found");
        return AgentToolResult {
            tool_call_id: tc.id.clone(),
            result: serde_json::json!({"error": format!("Tool '{}' not found", tc.name)}),
            is_error: true,
        };
    };

    let ctx = ToolExecutionContext {
        tool_call_id: Some(tc.id.clone()),
    };
    let args = ToolArguments::new(tc.arguments.clone());
    match tool.execute(&args, &ctx).await {
        Ok(value) => {
            debug!(tool = %tc.name, "Tool executed");
            AgentToolResult {
                tool_call_id: tc.id.clone(),
                result: value,
                is_error: false,
            }
        }
        Err(e) => {
            warn!(tool = %tc.name, error = %e, "Tool execution failed");
            AgentToolResult {
                tool_call_id: tc.id.clone(),
                result: serde_json::json!({"error": e.to_string()}),
                is_error: true,
            }
        }
    }
}
