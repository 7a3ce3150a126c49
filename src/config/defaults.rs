//! Built-in provider table, used when no configuration file is present.
//!
//! Mirrors the deployment this gateway fronts: a cost-optimized gateway
//! first, then the vendor APIs in descending reasoning strength, with Groq
//! last for cheap fast inference.

use super::app::AppConfig;
use super::provider::ProviderConfig;
use crate::constants::DEFAULT_REQUEST_TIMEOUT_SECS;
use std::env;

pub const DEFAULT_GATEWAY_ENDPOINT: &str = "https://gateway.ai.cloudflare.com/v1";
pub const DEFAULT_ANTHROPIC_ENDPOINT: &str = "https://api.anthropic.com";
pub const DEFAULT_OPENAI_ENDPOINT: &str = "https://api.openai.com";
pub const DEFAULT_GEMINI_ENDPOINT: &str = "https://generativelanguage.googleapis.com";
pub const DEFAULT_GROQ_ENDPOINT: &str = "https://api.groq.com/openai";

/// Fallback attempt order when the caller does not pin a provider.
pub const DEFAULT_PRIORITY: [&str; 5] = ["vercelGateway", "anthropic", "openai", "google", "groq"];

fn descriptor(
    id: &str,
    provider_type: &str,
    endpoint: String,
    api_key: &str,
    model: &str,
    fallback_model: Option<&str>,
) -> ProviderConfig {
    ProviderConfig {
        id: id.to_string(),
        provider_type: provider_type.to_string(),
        endpoint,
        api_key: Some(api_key.to_string()),
        api_path: None,
        model: model.to_string(),
        fallback_model: fallback_model.map(str::to_string),
    }
}

/// Assemble the built-in configuration. The gateway endpoint is
/// deployment-specific, so it is read from `AI_GATEWAY_URL` when set.
pub fn default_config() -> AppConfig {
    let gateway_endpoint =
        env::var("AI_GATEWAY_URL").unwrap_or_else(|_| DEFAULT_GATEWAY_ENDPOINT.to_string());

    AppConfig {
        providers: vec![
            descriptor(
                "vercelGateway",
                "openai",
                gateway_endpoint,
                "AI_GATEWAY_API_KEY",
                "gpt-4o",
                None,
            ),
            descriptor(
                "anthropic",
                "anthropic",
                DEFAULT_ANTHROPIC_ENDPOINT.to_string(),
                "ANTHROPIC_API_KEY",
                "claude-3-5-sonnet-20241022",
                Some("claude-3-haiku-20240307"),
            ),
            descriptor(
                "openai",
                "openai",
                DEFAULT_OPENAI_ENDPOINT.to_string(),
                "OPENAI_API_KEY",
                "gpt-4o",
                Some("gpt-3.5-turbo"),
            ),
            descriptor(
                "google",
                "gemini",
                DEFAULT_GEMINI_ENDPOINT.to_string(),
                "GOOGLE_VERTEX_API_KEY",
                "gemini-1.5-pro",
                Some("gemini-1.5-flash"),
            ),
            descriptor(
                "groq",
                "openai",
                DEFAULT_GROQ_ENDPOINT.to_string(),
                "GROQ_API_KEY",
                "llama-3.3-70b-versatile",
                Some("llama-3.1-8b-instant"),
            ),
        ],
        priority: DEFAULT_PRIORITY.iter().map(|s| s.to_string()).collect(),
        request_timeout_secs: DEFAULT_REQUEST_TIMEOUT_SECS,
    }
}
