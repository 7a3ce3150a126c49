//! Provider factory - creates clients from descriptors

use super::clients::{AnthropicClient, GeminiClient, OpenAiClient};
use super::traits::ModelClient;
use crate::config::ProviderConfig;
use std::env;
use tracing::warn;

/// Resolve an API key from the environment variable named in the descriptor.
///
/// Resolution happens once, when the client is built; a missing variable
/// leaves the client keyless and its first call fails with `MissingApiKey`.
pub fn resolve_api_key(provider: &str, spec: Option<&str>) -> Option<String> {
    let Some(raw) = spec.map(str::trim) else {
        return None;
    };
    if raw.is_empty() {
        return None;
    }
    match env::var(raw) {
        Ok(value) => Some(value),
        Err(err) => {
            warn!(
                provider,
                env_var = raw,
                %err,
                "API key environment variable is not set"
            );
            None
        }
    }
}

/// Factory for creating model clients from provider descriptors.
pub struct ProviderFactory;

impl ProviderFactory {
    /// Creates a model client based on provider type.
    ///
    /// Supported types:
    /// - `anthropic` → Messages API format
    /// - `gemini`, `google` → Gemini format
    /// - Others → OpenAI-compatible chat completions (default)
    pub fn create(config: &ProviderConfig) -> Box<dyn ModelClient> {
        match config.provider_type.to_lowercase().as_str() {
            "anthropic" => Box::new(AnthropicClient::from_config(config)),
            "gemini" | "google" | "google-ai" => Box::new(GeminiClient::from_config(config)),
            _ => Box::new(OpenAiClient::from_config(config)),
        }
    }
}
