//! OpenAI Chat Completions wire format (shared by Azure OpenAI deployments).

use serde::Deserialize;
use serde_json::{json, Value};

use crate::error::AppError;
use crate::types::*;

use super::{ProviderRequest, ProviderResponse};

/// Build a non-streaming Chat Completions request body.
///
/// `model` is omitted for deployment-addressed endpoints, where the URL
/// already selects the model.
pub(crate) fn build_request_body(model: Option<&str>, request: &ProviderRequest) -> Value {
    let messages = request
        .messages
        .iter()
        .map(message_to_openai)
        .collect::<Vec<_>>();

    let mut obj = serde_json::Map::new();
    if let Some(model) = model {
        obj.insert("model".into(), model.into());
    }
    obj.insert("messages".into(), messages.into());

    let settings = &request.settings;
    if let Some(max) = settings.max_tokens {
        obj.insert("max_tokens".into(), max.into());
    }
    if let Some(temp) = settings.temperature {
        obj.insert("temperature".into(), temp.into());
    }
    if let Some(top_p) = settings.top_p {
        obj.insert("top_p".into(), top_p.into());
    }
    if let Some(ref stops) = settings.stop_sequences {
        obj.insert("stop".into(), json!(stops));
    }
    if let Some(pp) = settings.presence_penalty {
        obj.insert("presence_penalty".into(), pp.into());
    }
    if let Some(fp) = settings.frequency_penalty {
        obj.insert("frequency_penalty".into(), fp.into());
    }
    if let Some(seed) = settings.seed {
        obj.insert("seed".into(), seed.into());
    }
    if let Some(ref user) = settings.user {
        obj.insert("user".into(), user.clone().into());
    }

    if let Some(ref tools) = request.tools {
        if !tools.is_empty() {
            let tool_defs: Vec<Value> = tools
                .iter()
                .map(|t| {
                    json!({
                        "type": "function",
                        "function": {
                            "name": t.name,
                            "description": t.description,
                            "parameters": t.parameters,
                        }
                    })
                })
                .collect();
            obj.insert("tools".into(), tool_defs.into());
        }
    }

    Value::Object(obj)
}

/// Convert a parsed response into the provider-neutral shape.
pub(crate) fn into_provider_response(data: ChatResponse) -> Result<ProviderResponse, AppError> {
    let choice = data
        .choices
        .into_iter()
        .next()
        .ok_or_else(|| AppError::api(200, "No choices in chat completions response"))?;

    let tool_calls = choice
        .message
        .tool_calls
        .unwrap_or_default()
        .into_iter()
        .map(|tc| AgentToolCall {
            id: tc.id,
            name: tc.function.name,
            arguments: serde_json::from_str(&tc.function.arguments)
                .unwrap_or(Value::String(tc.function.arguments)),
        })
        .collect();

    Ok(ProviderResponse {
        text: choice.message.content.unwrap_or_default(),
        usage: data
            .usage
            .map(|u| Usage {
                input_tokens: u.prompt_tokens,
                output_tokens: u.completion_tokens,
                total_tokens: u.total_tokens,
            })
            .unwrap_or_default(),
        tool_calls,
        finish_reason: choice.finish_reason.as_deref().and_then(parse_finish_reason),
    })
}

fn parse_finish_reason(s: &str) -> Option<FinishReason> {
    match s {
        "stop" => Some(FinishReason::Stop),
        "length" => Some(FinishReason::Length),
        "tool_calls" => Some(FinishReason::ToolCalls),
        "content_filter" => Some(FinishReason::ContentFilter),
        _ => None,
    }
}

/// Convert a tool result JSON value into the string payload the API expects.
fn tool_result_to_string(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

fn message_to_openai(msg: &ModelMessage) -> Value {
    if let Some(ContentPart::ToolResult(tr)) = msg.content.first() {
        return json!({
            "role": "tool",
            "tool_call_id": tr.tool_call_id,
            "content": tool_result_to_string(&tr.result),
        });
    }

    let tool_calls = msg.tool_calls();
    if !tool_calls.is_empty() {
        let tc_json: Vec<Value> = tool_calls
            .iter()
            .map(|tc| {
                json!({
                    "id": tc.id,
                    "type": "function",
                    "function": {
                        "name": tc.name,
                        "arguments": tool_result_to_string(&tc.arguments),
                    }
                })
            })
            .collect();
        let text = msg.text();
        return json!({
            "role": msg.role.as_str(),
            "content": if text.is_empty() { Value::Null } else { Value::String(text) },
            "tool_calls": tc_json,
        });
    }

    json!({ "role": msg.role.as_str(), "content": msg.text() })
}

// Chat Completions response types

#[derive(Debug, Deserialize)]
pub(crate) struct ChatResponse {
    choices: Vec<ChatChoice>,
    usage: Option<ChatUsage>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatMessage,
    finish_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ChatMessage {
    content: Option<String>,
    tool_calls: Option<Vec<ChatToolCall>>,
}

#[derive(Debug, Deserialize)]
struct ChatToolCall {
    id: String,
    function: ChatFunction,
}

#[derive(Debug, Deserialize)]
struct ChatFunction {
    name: String,
    arguments: String,
}

#[derive(Debug, Deserialize)]
struct ChatUsage {
    prompt_tokens: u32,
    completion_tokens: u32,
    total_tokens: u32,
}
