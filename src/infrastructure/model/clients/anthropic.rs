//! Anthropic Messages API client

use async_trait::async_trait;
use futures::StreamExt;
use reqwest_eventsource::{Error as SseError, Event};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use super::base::HttpClientBase;
use crate::config::ProviderConfig;
use crate::constants::{
    ANTHROPIC_DEFAULT_MAX_TOKENS, ANTHROPIC_VERSION, DEFAULT_ANTHROPIC_API_PATH,
};
use crate::infrastructure::model::adapter::MessageAdapter;
use crate::infrastructure::model::factory::resolve_api_key;
use crate::infrastructure::model::traits::ModelClient;
use crate::infrastructure::model::types::{ModelCompletion, ModelError, ModelRequest, Usage};

#[derive(Clone)]
pub struct AnthropicClient {
    base: HttpClientBase,
    api_path: String,
}

impl AnthropicClient {
    pub fn from_config(config: &ProviderConfig) -> Self {
        let api_key = resolve_api_key(&config.id, config.api_key.as_deref());
        Self {
            base: HttpClientBase::new(config.id.clone(), config.endpoint.clone(), api_key),
            api_path: config
                .api_path
                .clone()
                .unwrap_or_else(|| DEFAULT_ANTHROPIC_API_PATH.to_string()),
        }
    }

    fn payload(&self, request: &ModelRequest, stream: bool) -> AnthropicRequest {
        let (system, messages) = MessageAdapter::to_anthropic_format(&request.messages);
        AnthropicRequest {
            model: request.model.clone(),
            // The Messages API rejects requests without max_tokens.
            max_tokens: request.max_tokens.unwrap_or(ANTHROPIC_DEFAULT_MAX_TOKENS),
            messages,
            system,
            temperature: request.temperature,
            stream,
        }
    }
}

#[async_trait]
impl ModelClient for AnthropicClient {
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
            "Sending request to Anthropic"
        );

        let response: AnthropicResponse = self
            .base
            .post_with_api_key(&url, ANTHROPIC_VERSION, &payload)
            .await?;
        debug!("Received response from Anthropic");

        let text = response
            .content
            .into_iter()
            .find_map(|block| block.text)
            .ok_or_else(|| ModelError::invalid_response(&self.base.id, "missing text block"))?;

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
            "Opening stream to Anthropic"
        );

        let mut source = self
            .base
            .sse_with_api_key(&url, ANTHROPIC_VERSION, &payload)?;
        let mut text = String::new();
        let mut input_tokens = None;
        let mut output_tokens = None;

        while let Some(event) = source.next().await {
            match event {
                Ok(Event::Open) => {}
                Ok(Event::Message(message)) => match message.event.as_str() {
                    "content_block_delta" => {
                        let frame: ContentBlockDelta = serde_json::from_str(&message.data)
                            .map_err(|e| {
                                ModelError::invalid_response(&self.base.id, e.to_string())
                            })?;
                        if let Some(fragment) = frame.delta.text {
                            text.push_str(&fragment);
                        }
                    }
                    "message_start" => {
                        let frame: MessageStart = serde_json::from_str(&message.data).map_err(
                            |e| ModelError::invalid_response(&self.base.id, e.to_string()),
                        )?;
                        input_tokens = frame.message.usage.and_then(|u| u.input_tokens);
                    }
                    "message_delta" => {
                        let frame: MessageDelta = serde_json::from_str(&message.data).map_err(
                            |e| ModelError::invalid_response(&self.base.id, e.to_string()),
                        )?;
                        output_tokens = frame.usage.and_then(|u| u.output_tokens);
                    }
                    "message_stop" => break,
                    _ => {}
                },
                Err(SseError::StreamEnded) => break,
                Err(error) => {
                    source.close();
                    return Err(ModelError::stream(&self.base.id, error.to_string()));
                }
            }
        }
        source.close();
        debug!(chars = text.len(), "Stream from Anthropic complete");

        let usage = (input_tokens.is_some() || output_tokens.is_some()).then(|| {
            Usage::from(AnthropicUsage {
                input_tokens,
                output_tokens,
            })
        });

        Ok(ModelCompletion { text, usage })
    }
}

#[derive(Serialize)]
struct AnthropicRequest {
    model: String,
    max_tokens: u32,
    messages: Vec<serde_json::Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    system: Option<String>,
    temperature: f32,
    stream: bool,
}

#[derive(Deserialize)]
struct AnthropicResponse {
    content: Vec<AnthropicContentBlock>,
    usage: Option<AnthropicUsage>,
}

#[derive(Deserialize)]
struct AnthropicContentBlock {
    text: Option<String>,
}

#[derive(Deserialize)]
struct AnthropicUsage {
    input_tokens: Option<u32>,
    output_tokens: Option<u32>,
}

#[derive(Deserialize)]
struct ContentBlockDelta {
    delta: DeltaPayload,
}

#[derive(Deserialize)]
struct DeltaPayload {
    text: Option<String>,
}

#[derive(Deserialize)]
struct MessageStart {
    message: MessageStartBody,
}

#[derive(Deserialize)]
struct MessageStartBody {
    usage: Option<AnthropicUsage>,
}

#[derive(Deserialize)]
struct MessageDelta {
    usage: Option<AnthropicUsage>,
}

impl From<AnthropicUsage> for Usage {
    fn from(value: AnthropicUsage) -> Self {
        let total = match (value.input_tokens, value.output_tokens) {
            (Some(input), Some(output)) => Some(input + output),
            _ => None,
        };
        Usage {
            prompt_tokens: value.input_tokens,
            completion_tokens: value.output_tokens,
            total_tokens: total,
        }
    }
}
