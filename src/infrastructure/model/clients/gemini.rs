//! Gemini client implementation

use async_trait::async_trait;
use futures::StreamExt;
use reqwest_eventsource::{Error as SseError, Event};
use serde::Deserialize;
use serde_json::json;
use tracing::{debug, info};

use super::base::HttpClientBase;
use crate::config::ProviderConfig;
use crate::constants::DEFAULT_GEMINI_API_PATH;
use crate::infrastructure::model::adapter::MessageAdapter;
use crate::infrastructure::model::factory::resolve_api_key;
use crate::infrastructure::model::traits::ModelClient;
use crate::infrastructure::model::types::{ModelCompletion, ModelError, ModelRequest, Usage};

/// Gemini client for Google AI
#[derive(Clone)]
pub struct GeminiClient {
    base: HttpClientBase,
    api_path: String,
}

impl GeminiClient {
    pub fn from_config(config: &ProviderConfig) -> Self {
        let api_key = resolve_api_key(&config.id, config.api_key.as_deref());
        Self {
            base: HttpClientBase::new(config.id.clone(), config.endpoint.clone(), api_key),
            api_path: config
                .api_path
                .clone()
                .unwrap_or_else(|| DEFAULT_GEMINI_API_PATH.to_string()),
        }
    }

    fn build_model_url(&self, model: &str, method: &str) -> String {
        let base = self.base.endpoint.trim_end_matches('/');
        format!("{base}/{}/{model}:{method}", self.api_path)
    }

    fn payload(&self, request: &ModelRequest) -> serde_json::Value {
        let (system_text, contents) = MessageAdapter::to_gemini_format(&request.messages);

        let mut generation_config = json!({
            "temperature": request.temperature,
        });
        if let Some(max_tokens) = request.max_tokens {
            generation_config["maxOutputTokens"] = json!(max_tokens);
        }

        let mut payload = json!({
            "contents": contents,
            "generationConfig": generation_config,
        });
        if let Some(system) = system_text {
            payload["system_instruction"] = json!({
                "parts": [{"text": system}]
            });
        }
        payload
    }

    fn extract_text(&self, response: GeminiResponse) -> Option<(String, Option<Usage>)> {
        let usage = response.usage_metadata.map(Usage::from);
        let text = response
            .candidates
            .unwrap_or_default()
            .into_iter()
            .flat_map(|c| c.content)
            .flat_map(|c| c.parts)
            .find_map(|p| p.text)?;
        Some((text, usage))
    }
}

#[async_trait]
impl ModelClient for GeminiClient {
    fn id(&self) -> &str {
        &self.base.id
    }

    async fn complete(&self, request: ModelRequest) -> Result<ModelCompletion, ModelError> {
        let url = self.build_model_url(&request.model, "generateContent");
        let payload = self.payload(&request);

        info!(
            provider = self.base.id.as_str(),
            model = request.model.as_str(),
            messages = request.messages.len(),
            "Sending request to Gemini"
        );

        let response: GeminiResponse = self.base.post_with_query_key(&url, &payload).await?;
        debug!("Received response from Gemini");

        let (text, usage) = self
            .extract_text(response)
            .ok_or_else(|| ModelError::invalid_response(&self.base.id, "missing text"))?;

        Ok(ModelCompletion { text, usage })
    }

    async fn complete_streaming(
        &self,
        request: ModelRequest,
    ) -> Result<ModelCompletion, ModelError> {
        let url = format!(
            "{}?alt=sse",
            self.build_model_url(&request.model, "streamGenerateContent")
        );
        let payload = self.payload(&request);

        info!(
            provider = self.base.id.as_str(),
            model = request.model.as_str(),
            messages = request.messages.len(),
            "Opening stream to Gemini"
        );

        let mut source = self.base.sse_with_query_key(&url, &payload)?;
        let mut text = String::new();
        let mut usage = None;

        while let Some(event) = source.next().await {
            match event {
                Ok(Event::Open) => {}
                Ok(Event::Message(message)) => {
                    let chunk: GeminiResponse = serde_json::from_str(&message.data)
                        .map_err(|e| ModelError::invalid_response(&self.base.id, e.to_string()))?;
                    if let Some(metadata) = chunk.usage_metadata {
                        usage = Some(Usage::from(metadata));
                    }
                    let fragment = chunk
                        .candidates
                        .unwrap_or_default()
                        .into_iter()
                        .flat_map(|c| c.content)
                        .flat_map(|c| c.parts)
                        .find_map(|p| p.text);
                    if let Some(fragment) = fragment {
                        text.push_str(&fragment);
                    }
                }
                Err(SseError::StreamEnded) => break,
                Err(error) => {
                    source.close();
                    return Err(ModelError::stream(&self.base.id, error.to_string()));
                }
            }
        }
        source.close();
        debug!(chars = text.len(), "Stream from Gemini complete");

        Ok(ModelCompletion { text, usage })
    }
}

#[derive(Deserialize)]
struct GeminiResponse {
    candidates: Option<Vec<GeminiCandidate>>,
    #[serde(rename = "usageMetadata")]
    usage_metadata: Option<GeminiUsageMetadata>,
}

#[derive(Deserialize)]
struct GeminiCandidate {
    content: Option<GeminiContent>,
}

#[derive(Deserialize)]
struct GeminiContent {
    parts: Vec<GeminiPart>,
}

#[derive(Deserialize)]
struct GeminiPart {
    text: Option<String>,
}

#[derive(Deserialize)]
struct GeminiUsageMetadata {
    #[serde(rename = "promptTokenCount")]
    prompt_token_count: Option<u32>,
    #[serde(rename = "candidatesTokenCount")]
    candidates_token_count: Option<u32>,
    #[serde(rename = "totalTokenCount")]
    total_token_count: Option<u32>,
}

impl From<GeminiUsageMetadata> for Usage {
    fn from(value: GeminiUsageMetadata) -> Self {
        Usage {
            prompt_tokens: value.prompt_token_count,
            completion_tokens: value.candidates_token_count,
            total_tokens: value.total_token_count,
        }
    }
}
