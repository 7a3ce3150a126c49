//! Model types - request, completion, and error types shared by all clients

use crate::types::ChatMessage;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use utoipa::ToSchema;

/// Backend-facing request: the conversation plus resolved sampling
/// parameters. The dispatcher has already filled in the model id and
/// temperature before a client sees this.
#[derive(Debug, Clone)]
pub struct ModelRequest {
    pub model: String,
    pub messages: Vec<ChatMessage>,
    pub temperature: f32,
    pub max_tokens: Option<u32>,
}

/// What a backend hands back: generated text and, when the backend reports
/// it, token accounting.
#[derive(Debug, Clone)]
pub struct ModelCompletion {
    pub text: String,
    pub usage: Option<Usage>,
}

/// Token accounting in the uniform response shape. Individual fields are
/// optional because not every backend reports all three counters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Usage {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub prompt_tokens: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub completion_tokens: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total_tokens: Option<u32>,
}

/// Provider-level failures
#[derive(Debug, Error)]
pub enum ModelError {
    #[error("provider '{provider}' requires an API key")]
    MissingApiKey { provider: String },
    #[error("network error calling provider '{provider}': {source}")]
    Network {
        provider: String,
        #[source]
        source: reqwest::Error,
    },
    #[error("provider '{provider}' returned invalid response: {reason}")]
    InvalidResponse { provider: String, reason: String },
    #[error("stream from provider '{provider}' failed: {reason}")]
    Stream { provider: String, reason: String },
    #[error("provider '{provider}' did not answer within {seconds}s")]
    Timeout { provider: String, seconds: u64 },
}

impl ModelError {
    pub fn missing_api_key(provider: impl Into<String>) -> Self {
        Self::MissingApiKey {
            provider: provider.into(),
        }
    }

    pub fn network(provider: impl Into<String>, source: reqwest::Error) -> Self {
        Self::Network {
            provider: provider.into(),
            source,
        }
    }

    pub fn invalid_response(provider: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidResponse {
            provider: provider.into(),
            reason: reason.into(),
        }
    }

    pub fn stream(provider: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Stream {
            provider: provider.into(),
            reason: reason.into(),
        }
    }

    pub fn timeout(provider: impl Into<String>, seconds: u64) -> Self {
        Self::Timeout {
            provider: provider.into(),
            seconds,
        }
    }

    /// Stable label for log lines, so operators can tell credential problems
    /// from outages without branching on it in control flow.
    pub fn kind(&self) -> &'static str {
        match self {
            ModelError::MissingApiKey { .. } => "auth",
            ModelError::Network { .. } => "network",
            ModelError::InvalidResponse { .. } => "invalid-response",
            ModelError::Stream { .. } => "stream",
            ModelError::Timeout { .. } => "timeout",
        }
    }
}
