use crate::application::dispatcher::{AiResponse, HealthReport};
use crate::config::ProviderConfig;
use crate::infrastructure::model::Usage;
use crate::types::ChatMessage;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RestChatRequest {
    pub messages: Vec<ChatMessage>,
    pub provider: Option<String>,
    pub model: Option<String>,
    pub temperature: Option<f32>,
    pub max_tokens: Option<u32>,
    #[serde(default)]
    pub stream: bool,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct RestChatResponse {
    pub text: String,
    pub provider: String,
    pub model: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub usage: Option<Usage>,
}

impl From<AiResponse> for RestChatResponse {
    fn from(response: AiResponse) -> Self {
        Self {
            text: response.text,
            provider: response.provider,
            model: response.model,
            usage: response.usage,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorResponse {
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
    pub code: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct HealthResponse {
    pub status: String,
    pub providers: HealthReport,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ProviderSummary {
    pub id: String,
    #[serde(rename = "type")]
    pub provider_type: String,
    pub endpoint: String,
    pub model: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fallback_model: Option<String>,
}

impl From<&ProviderConfig> for ProviderSummary {
    fn from(config: &ProviderConfig) -> Self {
        Self {
            id: config.id.clone(),
            provider_type: config.provider_type.clone(),
            endpoint: config.endpoint.clone(),
            model: config.model.clone(),
            fallback_model: config.fallback_model.clone(),
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ProvidersResponse {
    pub providers: Vec<ProviderSummary>,
}
