//! OpenAI-compatible client (serves OpenAI, Groq, and gateway endpoints)

use async_trait::async_trait;
use futures::StreamExt;
use reqwest_eventsource::{Error as SseError, Event};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use super::base::HttpClientBase;
use crate::config::ProviderConfig;
use crate::constants::DEFAULT_OPENAI_API_PATH;
use crate::infrastructure::model::adapter::MessageAdapter;
use crate::infrastructure::model::factory::resolve_api_key;
use crate::infrastructure::model::traits::ModelClient;
use crate::infrastructure::model::types::{ModelCompletion, ModelError, ModelRequest, Usage};

/// Client for any backend speaking the chat-completions wire format.
#[derive(Clone)]
pub struct OpenAiClient {
    base: HttpClientBase,
    api_path: String,
}

impl OpenAiClient {
    pub fn from_config(config: &ProviderConfig) -> Self {
        let api_key = resolve_api_key(&config.id, config.api_key.as_deref());
        Self {
            base: HttpClientBase::new(config.id.clone(), config.endpoint.clone(), api_key),
            api_path: config
                .api_path
                .clone()
                .unwrap_or_else(|| DEFAULT_OPENAI_API_PATH.to_string()),
        }
    }

    fn payload(&self, request: &ModelRequest, stream: bool) -> OpenAiRequest {
        OpenAiRequest {
            model: request.model.clone(),
            messages: MessageAdapter::to_openai_format(&request.messages),
            temperature: request.temperature,
            max_tokens: request.max_tokens,
            stream,
            // Without this the final stream chunk carries no accounting.
            stream_options: stream.then(|| StreamOptions {
                include_usage: true,
            }),
        }
    }
}

#[async_trait]
impl ModelClient for OpenAiClient {
    fn id(&self) -> &str {
        &self.base.id
    }

    async fn complete(&self, request: ModelRequest) -> Result<ModelCompletion, ModelError> {
        let url = self.base.build_url(&self.api_path);
        let payload = self.payload(&request, false);

        info!(
            provider = self.base.id.as_str(),
            model = request.model.as_str(),
            messages = request.messages.len(),
            "Sending request to OpenAI-compatible provider"
        );

        let response: OpenAiResponse = self.base.post_with_bearer(&url, &payload).await?;
        debug!("Received response from OpenAI-compatible provider");

        let text = response
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message)
            .and_then(|m| m.content)
            .ok_or_else(|| ModelError::invalid_response(&self.base.id, "missing content"))?;

        Ok(ModelCompletion {
            text,
            usage: response.usage.map(Usage::from),
        })
    }

    async fn complete_streaming(
        &self,
        request: ModelRequest,
    ) -> Result<ModelCompletion, ModelError> {
        let url = self.base.build_url(&self.api_path);
        let payload = self.payload(&request, true);

        info!(
            provider = self.base.id.as_str(),
            model = request.model.as_str(),
            messages = request.messages.len(),
            "Opening stream to OpenAI-compatible provider"
        );

        let mut source = self.base.sse_with_bearer(&url, &payload)?;
        let mut text = String::new();
        let mut usage = None;

        while let Some(event) = source.next().await {
            match event {
                Ok(Event::Open) => {}
                Ok(Event::Message(message)) => {
                    if message.data.trim() == "[DONE]" {
                        break;
                    }
                    let chunk: OpenAiStreamChunk = serde_json::from_str(&message.data)
                        .map_err(|e| ModelError::invalid_response(&self.base.id, e.to_string()))?;
                    if let Some(delta) = chunk
                        .choices
                        .into_iter()
                        .next()
                        .and_then(|c| c.delta)
                        .and_then(|d| d.content)
                    {
                        text.push_str(&delta);
                    }
                    if let Some(chunk_usage) = chunk.usage {
                        usage = Some(Usage::from(chunk_usage));
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
        debug!(chars = text.len(), "Stream from OpenAI-compatible provider complete");

        Ok(ModelCompletion { text, usage })
    }
}

#[derive(Serialize)]
struct OpenAiRequest {
    model: String,
    messages: Vec<serde_json::Value>,
    temperature: f32,
    #[serde(skip_serializing_if = "Option::is_none")]
    max_tokens: Option<u32>,
    stream: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    stream_options: Option<StreamOptions>,
}

#[derive(Serialize)]
struct StreamOptions {
    include_usage: bool,
}

#[derive(Deserialize)]
struct OpenAiResponse {
    choices: Vec<OpenAiChoice>,
    usage: Option<OpenAiUsage>,
}

#[derive(Deserialize)]
struct OpenAiChoice {
    message: Option<OpenAiMessage>,
}

#[derive(Deserialize)]
struct OpenAiMessage {
    content: Option<String>,
}

#[derive(Deserialize)]
struct OpenAiStreamChunk {
    #[serde(default)]
    choices: Vec<OpenAiStreamChoice>,
    usage: Option<OpenAiUsage>,
}

#[derive(Deserialize)]
struct OpenAiStreamChoice {
    delta: Option<OpenAiDelta>,
}

#[derive(Deserialize)]
struct OpenAiDelta {
    content: Option<String>,
}

#[derive(Deserialize)]
struct OpenAiUsage {
    prompt_tokens: Option<u32>,
    completion_tokens: Option<u32>,
    total_tokens: Option<u32>,
}

impl From<OpenAiUsage> for Usage {
    fn from(value: OpenAiUsage) -> Self {
        Usage {
            prompt_tokens: value.prompt_tokens,
            completion_tokens: value.completion_tokens,
            total_tokens: value.total_tokens,
        }
    }
}
