//! Settings Models
//!
//! Per-session chat settings and the partial update applied from the UI.

use serde::{Deserialize, Serialize};

use scratchpad_chat_llm::{is_known_model, HttpSettings, ProviderConfig, DEFAULT_MODEL, KNOWN_MODELS};

/// System prompt a fresh session starts with.
pub const DEFAULT_SYSTEM_PROMPT: &str =
    "You are Claude, an AI assistant created by Anthropic. You're helpful, harmless, and honest.";

/// Inclusive bounds for `max_tokens`.
pub const MIN_MAX_TOKENS: u32 = 100;
pub const MAX_MAX_TOKENS: u32 = 200_000;

/// Chat configuration held by a session
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatSettings {
    /// Model identifier, one of the known Claude models
    #[serde(default = "default_model")]
    pub model: String,
    /// System prompt sent with every request
    #[serde(default = "default_system_prompt")]
    pub system_prompt: String,
    /// Sampling temperature in [0, 1]
    #[serde(default = "default_temperature")]
    pub temperature: f32,
    /// Maximum tokens to generate, in [100, 200000]
    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,
    /// API base URL override
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base_url: Option<String>,
    /// HTTP transport timeouts
    #[serde(default)]
    pub http: HttpSettings,
}

fn default_model() -> String {
    DEFAULT_MODEL.to_string()
}

fn default_system_prompt() -> String {
    DEFAULT_SYSTEM_PROMPT.to_string()
}

fn default_temperature() -> f32 {
    0.7
}

fn default_max_tokens() -> u32 {
    4000
}

impl Default for ChatSettings {
    fn default() -> Self {
        Self {
            model: default_model(),
            system_prompt: default_system_prompt(),
            temperature: default_temperature(),
            max_tokens: default_max_tokens(),
            base_url: None,
            http: HttpSettings::default(),
        }
    }
}

/// Settings update request (partial update)
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct SettingsUpdate {
    pub model: Option<String>,
    pub system_prompt: Option<String>,
    pub temperature: Option<f32>,
    pub max_tokens: Option<u32>,
    pub base_url: Option<String>,
    pub http: Option<HttpSettings>,
}

impl ChatSettings {
    /// Apply a partial update to the settings
    pub fn apply_update(&mut self, update: SettingsUpdate) {
        if let Some(model) = update.model {
            self.model = model;
        }
        if let Some(prompt) = update.system_prompt {
            self.system_prompt = prompt;
        }
        if let Some(temperature) = update.temperature {
            self.temperature = temperature;
        }
        if let Some(max_tokens) = update.max_tokens {
            self.max_tokens = max_tokens;
        }
        if let Some(base_url) = update.base_url {
            self.base_url = if base_url.trim().is_empty() {
                None
            } else {
                Some(base_url)
            };
        }
        if let Some(http) = update.http {
            self.http = http;
        }
    }

    /// Validate the settings
    pub fn validate(&self) -> Result<(), String> {
        if !is_known_model(&self.model) {
            return Err(format!(
                "Invalid model: {}. Must be one of: {}",
                self.model,
                KNOWN_MODELS.join(", ")
            ));
        }

        if !(0.0..=1.0).contains(&self.temperature) {
            return Err(format!(
                "temperature must be between 0 and 1, got {}",
                self.temperature
            ));
        }

        if !(MIN_MAX_TOKENS..=MAX_MAX_TOKENS).contains(&self.max_tokens) {
            return Err(format!(
                "max_tokens must be between {} and {}, got {}",
                MIN_MAX_TOKENS, MAX_MAX_TOKENS, self.max_tokens
            ));
        }

        if self.http.connect_timeout_secs == 0 || self.http.request_timeout_secs == 0 {
            return Err("HTTP timeouts must be at least 1 second".to_string());
        }

        Ok(())
    }

    /// Build the provider configuration for one model call.
    pub fn provider_config(&self, api_key: Option<String>) -> ProviderConfig {
        ProviderConfig {
            api_key,
            base_url: self.base_url.clone(),
            model: self.model.clone(),
            max_tokens: self.max_tokens,
            temperature: self.temperature,
            http: self.http.clone(),
        }
    }
}
