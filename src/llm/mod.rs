// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Procdraw-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Procdraw and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Language-model decision backend over an OpenAI-compatible chat completions API.
//!
//! [`LlmDecider`] turns the session history and tool set into a tool-calling chat request, sends
//! it through an [`LlmClient`], and reads the first choice back as a [`Decision`].

use std::sync::Arc;

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION, CONTENT_TYPE};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use smallvec::SmallVec;
use thiserror::Error;

use crate::orchestrator::{Decision, DecisionError, DecisionFn, DecisionRequest, Message, ToolCall};
use crate::schema::ToolDefinition;

pub const DEFAULT_ENDPOINT: &str = "https://api.openai.com/v1/chat/completions";
pub const DEFAULT_MODEL: &str = "gpt-4o-mini";

const MAX_LLM_OUTPUT_LOG_CHARS: usize = 4_000;

#[derive(Debug, Error)]
pub enum LlmError {
    #[error("http error: {0}")]
    Http(String),
    #[error("response error: {0}")]
    Response(String),
    #[error("serialization error: {0}")]
    Serialization(String),
}

impl From<LlmError> for DecisionError {
    fn from(err: LlmError) -> Self {
        match err {
            LlmError::Http(_) | LlmError::Response(_) => Self::Unavailable(err.to_string()),
            LlmError::Serialization(_) => Self::Malformed(err.to_string()),
        }
    }
}

/// `llm` section of the engine config. The API key is read from the environment variable named
/// by `apiKeyEnv`; without one, requests go out unauthenticated (local servers).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase", deny_unknown_fields)]
pub struct LlmConfig {
    pub endpoint: String,
    pub model: String,
    pub api_key_env: Option<String>,
    pub temperature: f32,
    pub timeout_secs: u64,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_owned(),
            model: DEFAULT_MODEL.to_owned(),
            api_key_env: None,
            temperature: 0.2,
            timeout_secs: 30,
        }
    }
}

/// Chat completions request body with tool definitions.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChatRequest {
    pub model: String,
    pub messages: Vec<ChatMessage>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub tools: Vec<ChatTool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tool_choice: Option<&'static str>,
    pub temperature: f32,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChatMessage {
    pub role: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub tool_calls: Vec<ChatToolCall>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tool_call_id: Option<String>,
}

impl ChatMessage {
    fn text(role: &'static str, content: impl Into<String>) -> Self {
        Self { role, content: Some(content.into()), tool_calls: Vec::new(), tool_call_id: None }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChatTool {
    #[serde(rename = "type")]
    pub kind: &'static str,
    pub function: ChatFunction,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChatFunction {
    pub name: String,
    pub description: String,
    pub parameters: Value,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatToolCall {
    pub id: String,
    #[serde(rename = "type", default = "function_kind")]
    pub kind: String,
    pub function: ChatFunctionCall,
}

/// Arguments travel as a JSON-encoded string, as the chat API expects.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatFunctionCall {
    pub name: String,
    #[serde(default)]
    pub arguments: String,
}

fn function_kind() -> String {
    "function".to_owned()
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatReply,
}

#[derive(Debug, Deserialize)]
struct ChatReply {
    #[serde(default)]
    content: Option<String>,
    #[serde(default)]
    tool_calls: Option<Vec<ChatToolCall>>,
}

/// Transport seam. Returns the raw response body; parsing belongs to [`LlmDecider`].
#[async_trait]
pub trait LlmClient: Send + Sync {
    async fn complete(&self, request: &ChatRequest) -> Result<String, LlmError>;
}

#[async_trait]
impl LlmClient for Arc<dyn LlmClient> {
    async fn complete(&self, request: &ChatRequest) -> Result<String, LlmError> {
        (**self).complete(request).await
    }
}

/// Replies with the same body to every request.
pub struct MockLlmClient {
    pub response: String,
}

#[async_trait]
impl LlmClient for MockLlmClient {
    async fn complete(&self, _request: &ChatRequest) -> Result<String, LlmError> {
        Ok(self.response.clone())
    }
}

pub struct HttpLlmClient {
    client: reqwest::Client,
    endpoint: String,
    api_key: Option<String>,
}

impl HttpLlmClient {
    pub fn new(config: &LlmConfig, api_key: Option<String>) -> Result<Self, LlmError> {
        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| LlmError::Http(e.to_string()))?;
        Ok(Self { client, endpoint: config.endpoint.clone(), api_key })
    }
}

#[async_trait]
impl LlmClient for HttpLlmClient {
    async fn complete(&self, request: &ChatRequest) -> Result<String, LlmError> {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        if let Some(key) = &self.api_key {
            let value = format!("Bearer {key}");
            headers.insert(
                AUTHORIZATION,
                HeaderValue::from_str(&value).map_err(|e| LlmError::Http(e.to_string()))?,
            );
        }

        let response = self
            .client
            .post(&self.endpoint)
            .headers(headers)
            .json(request)
            .send()
            .await
            .map_err(|e| LlmError::Http(e.to_string()))?;

        if !response.status().is_success() {
            let status = response.status();
            let text = response.text().await.unwrap_or_default();
            return Err(LlmError::Response(format!("HTTP {status}: {text}")));
        }

        response.text().await.map_err(|e| LlmError::Http(e.to_string()))
    }
}

/// Decision backend that asks a chat model for the next tool calls.
pub struct LlmDecider<C: LlmClient> {
    client: C,
    config: LlmConfig,
}

impl<C: LlmClient> LlmDecider<C> {
    pub fn new(client: C, config: LlmConfig) -> Self {
        Self { client, config }
    }

    pub fn build_request(&self, request: &DecisionRequest<'_>) -> ChatRequest {
        let tools = request.tools.iter().map(chat_tool).collect::<Vec<_>>();
        ChatRequest {
            model: self.config.model.clone(),
            messages: chat_messages(request),
            tool_choice: (!tools.is_empty()).then_some("auto"),
            tools,
            temperature: self.config.temperature,
        }
    }
}

#[async_trait]
impl<C: LlmClient> DecisionFn for LlmDecider<C> {
    async fn decide(&self, request: &DecisionRequest<'_>) -> Result<Decision, DecisionError> {
        let chat = self.build_request(request);
        tracing::info!(
            model = %self.config.model,
            turn = request.turn,
            messages = chat.messages.len(),
            tools = chat.tools.len(),
            "llm decision requested"
        );

        let body = self.client.complete(&chat).await?;
        if tracing::enabled!(tracing::Level::DEBUG) {
            tracing::debug!(
                llm_output = %truncate_for_log(&body, MAX_LLM_OUTPUT_LOG_CHARS),
                "llm raw output"
            );
        }

        let decision = parse_decision(&body, request.turn)?;
        tracing::info!(
            turn = request.turn,
            tool_calls = decision.tool_calls.len(),
            has_text = decision.text.is_some(),
            "llm decision parsed"
        );
        Ok(decision)
    }
}

/// The system message is rebuilt from the current working copy so the model sees live counts.
fn chat_messages(request: &DecisionRequest<'_>) -> Vec<ChatMessage> {
    request
        .messages
        .iter()
        .map(|message| match message {
            Message::System { .. } => ChatMessage::text("system", request.context.system_prompt()),
            Message::User { content } => ChatMessage::text("user", content.clone()),
            Message::Assistant { text, tool_calls } => ChatMessage {
                role: "assistant",
                content: text.clone(),
                tool_calls: tool_calls
                    .iter()
                    .map(|call| ChatToolCall {
                        id: call.id.clone(),
                        kind: function_kind(),
                        function: ChatFunctionCall {
                            name: call.name.clone(),
                            arguments: call.args.to_string(),
                        },
                    })
                    .collect(),
                tool_call_id: None,
            },
            Message::Tool { call_id, result, .. } => ChatMessage {
                tool_call_id: Some(call_id.clone()),
                ..ChatMessage::text("tool", result.to_string())
            },
        })
        .collect()
}

fn chat_tool(definition: &ToolDefinition) -> ChatTool {
    ChatTool {
        kind: "function",
        function: ChatFunction {
            name: definition.name.clone(),
            description: definition.description.clone(),
            parameters: definition.parameters.clone(),
        },
    }
}

/// Reads the first choice of a chat completions body.
pub fn parse_decision(body: &str, turn: usize) -> Result<Decision, DecisionError> {
    let parsed: ChatResponse = serde_json::from_str(body)
        .map_err(|e| DecisionError::Malformed(format!("invalid response JSON: {e}")))?;
    let reply = parsed
        .choices
        .into_iter()
        .next()
        .map(|choice| choice.message)
        .ok_or_else(|| DecisionError::Malformed("response has no choices".to_owned()))?;

    let mut tool_calls = SmallVec::new();
    for (index, call) in reply.tool_calls.unwrap_or_default().into_iter().enumerate() {
        let ChatToolCall { id, function, .. } = call;
        if function.name.trim().is_empty() {
            return Err(DecisionError::Malformed(format!("tool call {index} has no name")));
        }
        let args = if function.arguments.trim().is_empty() {
            Value::Object(Map::new())
        } else {
            serde_json::from_str(&function.arguments).map_err(|e| {
                DecisionError::Malformed(format!(
                    "arguments of '{}' are not valid JSON: {e}",
                    function.name
                ))
            })?
        };
        let id = if id.trim().is_empty() { format!("call-{turn}-{index}") } else { id };
        tool_calls.push(ToolCall::new(id, function.name, args));
    }

    Ok(Decision { text: reply.content, tool_calls })
}

fn truncate_for_log(input: &str, max_chars: usize) -> String {
    let char_count = input.chars().count();
    if char_count <= max_chars {
        return input.to_owned();
    }
    let mut preview: String = input.chars().take(max_chars).collect();
    preview.push_str(&format!("... [truncated, total_chars={char_count}]"));
    preview
}
