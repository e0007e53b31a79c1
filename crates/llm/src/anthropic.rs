//! Anthropic Claude Provider
//!
//! Implementation of the LlmProvider trait for Anthropic's Messages API.

use async_trait::async_trait;
use serde::Deserialize;
use tracing::{debug, warn};

use crate::http_client::build_http_client;
use crate::provider::{missing_api_key_error, parse_http_error, LlmProvider};
use crate::types::{
    LlmError, LlmResponse, LlmResult, Message, MessageContent, MessageRole, ProviderConfig,
    StopReason, UsageStats,
};

/// Messages endpoint, relative to the base URL
const MESSAGES_PATH: &str = "/v1/messages";

/// Current API version
const ANTHROPIC_VERSION: &str = "2023-06-01";

/// Anthropic Claude provider
pub struct AnthropicProvider {
    config: ProviderConfig,
    client: reqwest::Client,
}

impl AnthropicProvider {
    /// Create a new Anthropic provider with the given configuration
    pub fn new(config: ProviderConfig) -> LlmResult<Self> {
        let client = build_http_client(&config.http)?;
        Ok(Self { config, client })
    }

    fn messages_url(&self) -> String {
        format!("{}{}", self.config.base_url(), MESSAGES_PATH)
    }

    fn api_key(&self) -> LlmResult<&str> {
        self.config
            .api_key()
            .ok_or_else(|| missing_api_key_error(self.name()))
    }

    /// Build the request body for the API
    fn build_request_body(&self, messages: &[Message], system: Option<&str>) -> serde_json::Value {
        let mut body = serde_json::json!({
            "model": self.config.model,
            "max_tokens": self.config.max_tokens,
            "temperature": self.config.temperature,
        });

        if let Some(sys) = system.filter(|s| !s.is_empty()) {
            body["system"] = serde_json::json!(sys);
        }

        let claude_messages: Vec<serde_json::Value> =
            messages.iter().map(|m| self.message_to_claude(m)).collect();
        body["messages"] = serde_json::json!(claude_messages);

        body
    }

    /// Convert a Message to Claude API format.
    ///
    /// A lone text part is sent as a plain string; anything else as an array
    /// of content parts.
    fn message_to_claude(&self, message: &Message) -> serde_json::Value {
        let role = match message.role {
            MessageRole::User => "user",
            MessageRole::Assistant => "assistant",
        };

        if let Some(text) = message.as_plain_text() {
            return serde_json::json!({
                "role": role,
                "content": text
            });
        }

        let content: Vec<serde_json::Value> = message
            .content
            .iter()
            .map(|c| match c {
                MessageContent::Text { text } => {
                    serde_json::json!({
                        "type": "text",
                        "text": text
                    })
                }
                MessageContent::Image { media_type, data } => {
                    serde_json::json!({
                        "type": "image",
                        "source": {
                            "type": "base64",
                            "media_type": media_type,
                            "data": data
                        }
                    })
                }
            })
            .collect();

        serde_json::json!({
            "role": role,
            "content": content
        })
    }

    /// Parse a response from Claude API
    fn parse_response(&self, response: &ClaudeResponse) -> LlmResponse {
        let text: String = response
            .content
            .iter()
            .filter_map(|block| match block {
                ContentBlock::Text { text } => Some(text.as_str()),
                ContentBlock::Unsupported => None,
            })
            .collect();

        let stop_reason = response
            .stop_reason
            .as_deref()
            .map(StopReason::from)
            .unwrap_or(StopReason::EndTurn);

        LlmResponse {
            content: if text.is_empty() { None } else { Some(text) },
            stop_reason,
            usage: UsageStats {
                input_tokens: response.usage.input_tokens,
                output_tokens: response.usage.output_tokens,
            },
            model: response.model.clone(),
        }
    }

    async fn post(&self, api_key: &str, body: &serde_json::Value) -> LlmResult<(u16, String)> {
        let response = self
            .client
            .post(self.messages_url())
            .header("x-api-key", api_key)
            .header("anthropic-version", ANTHROPIC_VERSION)
            .header("content-type", "application/json")
            .json(body)
            .send()
            .await
            .map_err(|e| LlmError::NetworkError {
                message: e.to_string(),
            })?;

        let status = response.status().as_u16();
        let body_text = response.text().await.map_err(|e| LlmError::NetworkError {
            message: e.to_string(),
        })?;
        Ok((status, body_text))
    }
}

#[async_trait]
impl LlmProvider for AnthropicProvider {
    fn name(&self) -> &'static str {
        "anthropic"
    }

    fn model(&self) -> &str {
        &self.config.model
    }

    async fn send_message(
        &self,
        messages: Vec<Message>,
        system: Option<String>,
    ) -> LlmResult<LlmResponse> {
        let api_key = self.api_key()?;
        let body = self.build_request_body(&messages, system.as_deref());

        debug!(
            model = %self.config.model,
            messages = messages.len(),
            "Sending request to Anthropic"
        );

        let (status, body_text) = self.post(api_key, &body).await?;
        if !(200..300).contains(&status) {
            warn!(status, "Anthropic request failed");
            return Err(parse_http_error(status, &body_text, self.name()));
        }

        let claude_response: ClaudeResponse =
            serde_json::from_str(&body_text).map_err(|e| LlmError::ParseError {
                message: format!("Failed to parse response: {}", e),
            })?;

        let response = self.parse_response(&claude_response);
        debug!(
            input_tokens = response.usage.input_tokens,
            output_tokens = response.usage.output_tokens,
            "Anthropic response received"
        );
        Ok(response)
    }

    async fn health_check(&self) -> LlmResult<()> {
        let api_key = self.api_key()?;

        // Make a minimal request to verify the API key
        let body = serde_json::json!({
            "model": self.config.model,
            "max_tokens": 1,
            "messages": [{"role": "user", "content": "Hi"}]
        });

        let (status, body_text) = self.post(api_key, &body).await?;
        match status {
            200..=299 => Ok(()),
            401 => Err(LlmError::AuthenticationFailed {
                message: "Invalid API key".to_string(),
            }),
            _ => Err(parse_http_error(status, &body_text, self.name())),
        }
    }

    fn config(&self) -> &ProviderConfig {
        &self.config
    }
}

/// Claude API response format
#[derive(Debug, Deserialize)]
struct ClaudeResponse {
    content: Vec<ContentBlock>,
    model: String,
    stop_reason: Option<String>,
    #[serde(default)]
    usage: ResponseUsage,
}

#[derive(Debug, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
enum ContentBlock {
    Text {
        text: String,
    },
    #[serde(other)]
    Unsupported,
}

#[derive(Debug, Default, Deserialize)]
struct ResponseUsage {
    #[serde(default)]
    input_tokens: u32,
    #[serde(default)]
    output_tokens: u32,
}
