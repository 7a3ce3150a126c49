//! # Provider Configuration
//!
//! Configuration types for hosted LLM backends. Each descriptor pairs a
//! provider id with the API format used to talk to it.
//!
//! ## Provider Types
//!
//! | Type | Description | API Key Required |
//! |------|-------------|-----------------|
//! | `openai` | OpenAI-compatible chat completions (OpenAI, Groq, gateways) | Yes |
//! | `anthropic` | Anthropic Messages API | Yes |
//! | `gemini` | Google Gemini API | Yes |

use serde::{Deserialize, Serialize};

/// Static configuration for a single hosted LLM backend.
///
/// Descriptors are loaded once at process start and never mutated.
/// The `api_key` field names the environment variable holding the
/// credential; the value itself never appears in configuration files.
///
/// # Example
///
/// ```toml
/// [[providers]]
/// id = "groq"
/// type = "openai"
/// endpoint = "https://api.groq.com/openai"
/// api_key = "GROQ_API_KEY"
/// model = "llama-3.3-70b-versatile"
/// fallback_model = "llama-3.1-8b-instant"
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ProviderConfig {
    /// Unique identifier for this provider (e.g., "groq", "anthropic")
    pub id: String,
    /// The provider type determines API format: "openai", "anthropic", "gemini"
    #[serde(rename = "type")]
    pub provider_type: String,
    /// API endpoint URL
    pub endpoint: String,
    /// Name of the environment variable holding the API key
    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,
    /// Custom API path override (e.g., "v1beta/models" for Gemini)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_path: Option<String>,
    /// Default model id used when the caller does not pin one
    pub model: String,
    /// Secondary model id, surfaced to the dashboard's configuration view
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fallback_model: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub(super) struct RawProviderConfig {
    pub(super) id: String,
    #[serde(rename = "type", default)]
    pub(super) provider_type: String,
    pub(super) endpoint: Option<String>,
    pub(super) api_key: Option<String>,
    #[serde(default)]
    pub(super) api_path: Option<String>,
    pub(super) model: Option<String>,
    #[serde(default)]
    pub(super) fallback_model: Option<String>,
}

impl ProviderConfig {
    /// Check if this is an Anthropic provider (case-insensitive).
    pub fn is_anthropic(&self) -> bool {
        self.provider_type.eq_ignore_ascii_case("anthropic")
    }

    /// Check if this is a Gemini provider (case-insensitive).
    ///
    /// # Examples
    ///
    /// ```
    /// use astrolabe_gateway::config::ProviderConfig;
    ///
    /// let provider = ProviderConfig {
    ///     id: "google".to_string(),
    ///     provider_type: "GEMINI".to_string(),
    ///     endpoint: "https://example.com".to_string(),
    ///     api_key: Some("GOOGLE_VERTEX_API_KEY".to_string()),
    ///     api_path: None,
    ///     model: "gemini-1.5-pro".to_string(),
    ///     fallback_model: None,
    /// };
    /// assert!(provider.is_gemini());
    /// assert!(!provider.is_anthropic());
    /// ```
    pub fn is_gemini(&self) -> bool {
        self.provider_type.eq_ignore_ascii_case("gemini")
            || self.provider_type.eq_ignore_ascii_case("google")
    }
}
