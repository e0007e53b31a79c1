//! HTTP Client Factory
//!
//! Provides a factory function for building reqwest clients with the
//! configured timeouts.

use std::time::Duration;

use crate::types::{HttpSettings, LlmError, LlmResult};

/// Build a `reqwest::Client` from the transport settings.
///
/// Environment proxy variables are ignored (`no_proxy`).
pub fn build_http_client(settings: &HttpSettings) -> LlmResult<reqwest::Client> {
    reqwest::Client::builder()
        .no_proxy()
        .connect_timeout(Duration::from_secs(settings.connect_timeout_secs))
        .timeout(Duration::from_secs(settings.request_timeout_secs))
        .build()
        .map_err(|e| LlmError::NetworkError {
            message: format!("Failed to build HTTP client: {}", e),
        })
}
