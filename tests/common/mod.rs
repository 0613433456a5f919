//! Shared test helpers: a queued mock provider, a scripted agent and a
//! closure-backed tool.

#![allow(dead_code)]

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use learn_copilot::agent::{AgentResponse, AgentThread, ConversationalAgent};
use learn_copilot::error::AppError;
use learn_copilot::provider::{ModelProvider, ProviderRequest, ProviderResponse};
use learn_copilot::tools::{AgentToolParameters, Tool, ToolArguments, ToolExecutionContext};
use learn_copilot::types::*;

/// A mock provider that returns canned responses in order.
pub struct MockProvider {
    model_id: String,
    responses: Mutex<VecDeque<Result<ProviderResponse, AppError>>>,
    requests: Mutex<Vec<ProviderRequest>>,
}

impl MockProvider {
    pub fn new(model_id: &str) -> Self {
        Self {
            model_id: model_id.to_string(),
            responses: Mutex::new(VecDeque::new()),
            requests: Mutex::new(Vec::new()),
        }
    }

    /// Queue a text response.
    pub fn queue_response(&self, text: &str) {
        self.responses.lock().unwrap().push_back(Ok(ProviderResponse {
            text: text.to_string(),
            usage: Usage {
                input_tokens: 10,
                output_tokens: 20,
                total_tokens: 30,
            },
            tool_calls: vec![],
            finish_reason: Some(FinishReason::Stop),
        }));
    }

    /// Queue a tool call response.
    pub fn queue_tool_call(&self, id: &str, name: &str, args: serde_json::Value) {
        self.responses.lock().unwrap().push_back(Ok(ProviderResponse {
            text: String::new(),
            usage: Usage {
                input_tokens: 10,
                output_tokens: 5,
                total_tokens: 15,
            },
            tool_calls: vec![AgentToolCall {
                id: id.to_string(),
                name: name.to_string(),
                arguments: args,
            }],
            finish_reason: Some(FinishReason::ToolCalls),
        }));
    }

    /// Queue a failure.
    pub fn queue_error(&self, error: AppError) {
        self.responses.lock().unwrap().push_back(Err(error));
    }

    pub fn requests(&self) -> Vec<ProviderRequest> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl ModelProvider for MockProvider {
    fn provider_name(&self) -> &str {
        "mock"
    }

    fn model_id(&self) -> &str {
        &self.model_id
    }

    async fn generate_text(&self, request: &ProviderRequest) -> Result<ProviderResponse, AppError> {
        self.requests.lock().unwrap().push(request.clone());
        self.responses
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(AppError::InvalidState("no queued response".into())))
    }
}

/// Agent that answers from a script; an exhausted script echoes the input.
#[derive(Default)]
pub struct ScriptedAgent {
    script: Mutex<VecDeque<Result<String, AppError>>>,
    threads_created: Mutex<usize>,
    seen: Mutex<Vec<String>>,
}

impl ScriptedAgent {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn reply(self, text: &str) -> Self {
        self.script.lock().unwrap().push_back(Ok(text.to_string()));
        self
    }

    pub fn fail(self, error: AppError) -> Self {
        self.script.lock().unwrap().push_back(Err(error));
        self
    }

    pub fn threads_created(&self) -> usize {
        *self.threads_created.lock().unwrap()
    }

    pub fn seen(&self) -> Vec<String> {
        self.seen.lock().unwrap().clone()
    }
}

#[async_trait]
impl ConversationalAgent for ScriptedAgent {
    fn new_thread(&self) -> AgentThread {
        *self.threads_created.lock().unwrap() += 1;
        AgentThread::new()
    }

    async fn run(&self, text: &str, _thread: &mut AgentThread) -> Result<AgentResponse, AppError> {
        self.seen.lock().unwrap().push(text.to_string());
        let next = self
            .script
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Ok(format!("echo: {text}")));
        next.map(|text| AgentResponse {
            text,
            usage: Usage::default(),
            tool_calls: 0,
        })
    }
}

type ToolFn = dyn Fn(&serde_json::Value) -> Result<serde_json::Value, AppError> + Send + Sync;

/// Tool whose result comes from a synchronous closure over the raw arguments.
pub struct FnTool {
    name: String,
    description: String,
    parameters: AgentToolParameters,
    handler: Arc<ToolFn>,
}

impl FnTool {
    pub fn new<F>(name: &str, description: &str, parameters: AgentToolParameters, handler: F) -> Self
    where
        F: Fn(&serde_json::Value) -> Result<serde_json::Value, AppError> + Send + Sync + 'static,
    {
        Self {
            name: name.to_string(),
            description: description.to_string(),
            parameters,
            handler: Arc::new(handler),
        }
    }

    pub fn boxed(self) -> Box<dyn Tool> {
        Box::new(self)
    }
}

/// Required string argument, as a tool would report it to the model.
pub fn required_str<'a>(args: &'a serde_json::Value, key: &str) -> Result<&'a str, AppError> {
    args.get(key)
        .and_then(|v| v.as_str())
        .ok_or_else(|| AppError::InvalidArgument(format!("Missing string argument: {key}")))
}

#[async_trait]
impl Tool for FnTool {
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
        _ctx: &ToolExecutionContext,
    ) -> Result<serde_json::Value, AppError> {
        (self.handler)(args.raw())
    }
}
