//! Chat-completions interaction with an OpenAI-compatible API.
//!
//! # Architecture
//!
//! - [`ChatModel`]: Core trait, one request in, one assistant message out
//! - [`OpenAiClient`]: `POST {base_url}/chat/completions` over reqwest
//! - [`NewsTool`]: The `get_latest_news` function offered to the model
//!
//! The conversation loop that answers tool calls lives in
//! [`crate::summarizer`]; this module only moves single requests.

use crate::error::SummarizeError;
use crate::utils::truncate_for_log;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use std::time::Instant;
use tracing::{debug, instrument, warn};
use url::Url;

/// One conversation message.
///
/// Covers the four shapes we send or receive: user text, assistant text,
/// assistant tool calls (with `content` null) and tool results.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Message {
    /// `"user"`, `"assistant"` or `"tool"`.
    pub role: String,
    #[serde(default)]
    pub content: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tool_calls: Option<Vec<ToolCall>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tool_call_id: Option<String>,
}

impl Message {
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: "user".to_string(),
            content: Some(content.into()),
            tool_calls: None,
            tool_call_id: None,
        }
    }

    #[cfg(test)]
    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: "assistant".to_string(),
            content: Some(content.into()),
            tool_calls: None,
            tool_call_id: None,
        }
    }

    /// Result of a tool call, matched to the call by `tool_call_id`.
    pub fn tool(tool_call_id: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            role: "tool".to_string(),
            content: Some(content.into()),
            tool_calls: None,
            tool_call_id: Some(tool_call_id.into()),
        }
    }

    /// Tool calls requested by this message, if any.
    pub fn requested_tools(&self) -> &[ToolCall] {
        self.tool_calls.as_deref().unwrap_or_default()
    }
}

/// A function call requested by the model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolCall {
    pub id: String,
    #[serde(rename = "type", default = "function_kind")]
    pub kind: String,
    pub function: FunctionCall,
}

fn function_kind() -> String {
    "function".to_string()
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FunctionCall {
    pub name: String,
    /// JSON-encoded arguments.
    #[serde(default)]
    pub arguments: String,
}

/// Chat completion request.
#[derive(Debug, Clone, Serialize)]
pub struct ChatRequest {
    pub model: String,
    pub messages: Vec<Message>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub tools: Vec<Value>,
}

#[derive(Debug, Deserialize)]
struct ChatResponseRaw {
    #[serde(default)]
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: Message,
}

/// Trait for a chat model.
///
/// Implementors take a full request and return the assistant's reply. This
/// abstraction lets the summarizer run against the real API or a stub.
pub trait ChatModel {
    async fn complete(&self, request: &ChatRequest) -> Result<Message, SummarizeError>;
}

/// Client for an OpenAI-compatible chat-completions endpoint.
#[derive(Debug, Clone)]
pub struct OpenAiClient {
    client: Client,
    base_url: String,
    api_key: Option<String>,
}

impl OpenAiClient {
    /// `base_url` is the API root, e.g. `https://api.openai.com/v1`.
    pub fn new(client: Client, base_url: impl Into<String>, api_key: Option<String>) -> Self {
        Self {
            client,
            base_url: base_url.into(),
            api_key,
        }
    }

    fn completions_url(&self) -> Result<Url, SummarizeError> {
        let root = Url::parse(&format!("{}/", self.base_url.trim_end_matches('/')))?;
        Ok(root.join("chat/completions")?)
    }
}

impl ChatModel for OpenAiClient {
    #[instrument(level = "info", skip_all, fields(model = %request.model, messages = request.messages.len()))]
    async fn complete(&self, request: &ChatRequest) -> Result<Message, SummarizeError> {
        let api_key = self.api_key.as_deref().ok_or(SummarizeError::MissingApiKey)?;
        let url = self.completions_url()?;

        let t0 = Instant::now();
        let response = self
            .client
            .post(url)
            .bearer_auth(api_key)
            .json(request)
            .send()
            .await?;
        let status = response.status();
        let dt = t0.elapsed();

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            warn!(elapsed_ms = dt.as_millis(), %status, "Chat API call failed");
            return Err(SummarizeError::Api {
                status,
                body: truncate_for_log(&body, 500),
            });
        }

        let raw: ChatResponseRaw = response.json().await?;
        debug!(elapsed_ms = dt.as_millis(), choices = raw.choices.len(), "Chat API call succeeded");
        raw.choices
            .into_iter()
            .next()
            .map(|choice| choice.message)
            .ok_or(SummarizeError::EmptyResponse)
    }
}

/// The `get_latest_news` tool: hands the prepared news JSON to the model.
#[derive(Debug, Clone)]
pub struct NewsTool {
    payload: String,
}

impl NewsTool {
    pub const NAME: &'static str = "get_latest_news";
    const DESCRIPTION: &'static str =
        "Use this function to return the news from Germany. Returns a JSON string of the news.";

    pub fn new(payload: impl Into<String>) -> Self {
        Self {
            payload: payload.into(),
        }
    }

    /// Tool definition in the chat-completions `tools` format.
    pub fn definition() -> Value {
        json!({
            "type": "function",
            "function": {
                "name": Self::NAME,
                "description": Self::DESCRIPTION,
                "parameters": {"type": "object", "properties": {}}
            }
        })
    }

    /// Output of the tool.
    pub fn call(&self) -> &str {
        &self.payload
    }
}
