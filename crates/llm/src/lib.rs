//! Scratchpad Chat LLM
//!
//! Provides a provider-agnostic interface for calling a hosted model, with
//! one implementation:
//! - Anthropic Claude (Messages API)
//!
//! Also includes the shared request/response/error types and the HTTP client factory.

pub mod anthropic;
pub mod http_client;
pub mod provider;
pub mod types;

// Re-export main types
pub use anthropic::AnthropicProvider;
pub use http_client::build_http_client;
pub use provider::LlmProvider;
pub use types::*;
