/*!
 * Provider implementations for different language model services.
 *
 * This module contains client implementations for various LLM providers:
 * - Gemini: Google Generative Language API (default)
 * - OpenAI: OpenAI API and compatible servers
 * - Anthropic: Anthropic Messages API
 * - Ollama: Local LLM server
 * - Mock: scripted replies for tests
 */

use anyhow::{Result, anyhow};
use async_trait::async_trait;
use log::error;
use reqwest::Client;
use std::fmt::Debug;
use std::sync::Arc;
use std::time::Duration;

use crate::app_config::{TranslationConfig, TranslationProvider};
use crate::errors::ProviderError;

/// Common trait for all LLM providers
///
/// The rest of the application only needs text in, text out: a prompt and a
/// model identifier go in, generated text or a `ProviderError` comes back.
#[async_trait]
pub trait Provider: Send + Sync + Debug {
    /// Short provider name used in logs
    fn name(&self) -> &'static str;

    /// Send a single prompt and return the generated text
    async fn generate(&self, model: &str, prompt: &str) -> Result<String, ProviderError>;

    /// Test the connection to the provider
    async fn test_connection(&self, model: &str) -> Result<(), ProviderError> {
        self.generate(model, "Hello").await.map(|_| ())
    }
}

pub mod anthropic;
pub mod gemini;
pub mod mock;
pub mod ollama;
pub mod openai;

/// Build the provider selected in the configuration
pub fn create_provider(config: &TranslationConfig) -> Result<Arc<dyn Provider>> {
    let api_key = config.get_api_key();
    let endpoint = config.get_endpoint();
    let timeout_secs = config.get_timeout_secs();
    let temperature = config.common.temperature;

    if config.provider.requires_api_key() && api_key.is_empty() {
        return Err(anyhow!(
            "Translation API key is required for {} provider",
            config.provider.display_name()
        ));
    }

    let provider: Arc<dyn Provider> = match config.provider {
        TranslationProvider::Gemini => Arc::new(
            gemini::Gemini::new_with_config(api_key, endpoint, timeout_secs, temperature)
        ),
        TranslationProvider::OpenAI => Arc::new(
            openai::OpenAI::new_with_config(api_key, endpoint, timeout_secs, temperature)
        ),
        TranslationProvider::Anthropic => Arc::new(
            anthropic::Anthropic::new_with_config(api_key, endpoint, timeout_secs, temperature)
        ),
        TranslationProvider::Ollama => Arc::new(
            ollama::Ollama::new_with_config(endpoint, timeout_secs, temperature)
        ),
    };

    Ok(provider)
}

/// HTTP client shared by the provider implementations
pub(crate) fn build_http_client(timeout_secs: u64) -> Client {
    Client::builder()
        .timeout(Duration::from_secs(timeout_secs))
        .build()
        .unwrap_or_default()
}

/// Join an endpoint and a path with exactly one slash between them
pub(crate) fn join_url(endpoint: &str, path: &str) -> String {
    format!("{}/{}", endpoint.trim_end_matches('/'), path.trim_start_matches('/'))
}

/// Turn a non-success HTTP response into a classified error
pub(crate) async fn check_status(
    response: reqwest::Response,
    provider: &str,
) -> Result<reqwest::Response, ProviderError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let error_text = response.text().await
        .unwrap_or_else(|_| "Failed to get error response text".to_string());
    error!("{} API error ({}): {}", provider, status, error_text);
    Err(ProviderError::from_status(status.as_u16(), error_text))
}

/// Reject replies with no usable text
pub(crate) fn non_empty(text: String, provider: &str) -> Result<String, ProviderError> {
    if text.trim().is_empty() {
        return Err(ProviderError::ParseError(format!("{} returned an empty response", provider)));
    }
    Ok(text)
}
