//! Request dispatcher - provider selection, priority fallback, health sweep
//!
//! The dispatcher owns an immutable table of provider backends and routes
//! each chat request to exactly one of them. With an explicit provider the
//! single attempt's outcome is final; without one the priority list is
//! walked in order and the first reachable provider wins.

use crate::config::{AppConfig, ProviderConfig};
use crate::constants::{DEFAULT_TEMPERATURE, HEALTH_PROBE_MAX_TOKENS, HEALTH_PROBE_PROMPT};
use crate::infrastructure::model::{
    ModelClient, ModelError, ModelRequest, ProviderFactory, Usage,
};
use crate::types::{ChatMessage, MessageRole};
use futures::future::join_all;
use serde::Serialize;
use std::collections::{BTreeMap, HashMap};
use std::time::Duration;
use thiserror::Error;
use tokio::time::timeout;
use tracing::{debug, info, warn};
use utoipa::ToSchema;

/// Caller-facing request parameters.
#[derive(Debug, Clone, Default)]
pub struct ChatRequest {
    pub messages: Vec<ChatMessage>,
    pub provider: Option<String>,
    pub model: Option<String>,
    pub temperature: Option<f32>,
    pub max_tokens: Option<u32>,
    pub stream: bool,
}

/// Uniform response shape returned regardless of which backend served the
/// request.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct AiResponse {
    pub text: String,
    pub provider: String,
    pub model: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub usage: Option<Usage>,
}

/// Reachability report, one entry per fallback-eligible provider.
pub type HealthReport = BTreeMap<String, bool>;

/// Dispatch failures
#[derive(Debug, Error)]
pub enum DispatchError {
    #[error("invalid request: {reason}")]
    Validation { reason: String },
    #[error("unknown provider '{provider}'")]
    UnknownProvider { provider: String },
    #[error("provider '{provider}' failed: {source}")]
    Provider {
        provider: String,
        #[source]
        source: ModelError,
    },
    #[error("all providers in the priority list failed")]
    AllProvidersExhausted,
}

impl DispatchError {
    pub fn validation(reason: impl Into<String>) -> Self {
        Self::Validation {
            reason: reason.into(),
        }
    }

    pub fn unknown_provider(provider: impl Into<String>) -> Self {
        Self::UnknownProvider {
            provider: provider.into(),
        }
    }

    pub fn provider(provider: impl Into<String>, source: ModelError) -> Self {
        Self::Provider {
            provider: provider.into(),
            source,
        }
    }

    /// Machine-readable discriminator for the HTTP error payload.
    pub fn code(&self) -> &'static str {
        match self {
            DispatchError::Validation { .. } => "validation",
            DispatchError::UnknownProvider { .. } => "unknown_provider",
            DispatchError::Provider { .. } => "provider_error",
            DispatchError::AllProvidersExhausted => "all_providers_exhausted",
        }
    }
}

struct Backend {
    default_model: String,
    client: Box<dyn ModelClient>,
}

/// Stateless request router over an immutable provider table.
///
/// Construct one instance at startup and share it behind an `Arc`; every
/// method takes `&self` and no mutable state survives a call.
pub struct Dispatcher {
    backends: HashMap<String, Backend>,
    descriptors: Vec<ProviderConfig>,
    priority: Vec<String>,
    attempt_timeout: Duration,
}

impl Dispatcher {
    /// Build a dispatcher from descriptor/client pairs. Useful directly in
    /// tests, where fake clients stand in for the HTTP implementations.
    pub fn new(
        backends: Vec<(ProviderConfig, Box<dyn ModelClient>)>,
        priority: Vec<String>,
        attempt_timeout: Duration,
    ) -> Self {
        let mut table = HashMap::new();
        let mut descriptors = Vec::with_capacity(backends.len());
        for (descriptor, client) in backends {
            table.insert(
                descriptor.id.clone(),
                Backend {
                    default_model: descriptor.model.clone(),
                    client,
                },
            );
            descriptors.push(descriptor);
        }
        Self {
            backends: table,
            descriptors,
            priority,
            attempt_timeout,
        }
    }

    /// Build a dispatcher from loaded configuration, instantiating the HTTP
    /// client for each descriptor through the factory.
    pub fn from_config(config: &AppConfig) -> Self {
        let backends = config
            .providers
            .iter()
            .map(|descriptor| (descriptor.clone(), ProviderFactory::create(descriptor)))
            .collect();
        Self::new(
            backends,
            config.priority.clone(),
            Duration::from_secs(config.request_timeout_secs),
        )
    }

    /// The configured descriptor table, in declaration order.
    pub fn descriptors(&self) -> &[ProviderConfig] {
        &self.descriptors
    }

    /// The fallback priority list.
    pub fn priority(&self) -> &[String] {
        &self.priority
    }

    /// Route a request to exactly one backend.
    ///
    /// An explicit `provider` pins the attempt to that backend and its
    /// failure propagates untouched. Otherwise the priority list is walked
    /// in order: first success wins, each failure is demoted to a warning,
    /// and only total exhaustion surfaces as an error.
    pub async fn process_request(&self, request: ChatRequest) -> Result<AiResponse, DispatchError> {
        self.validate(&request)?;

        if let Some(provider) = request.provider.clone() {
            return self.call_provider(&provider, &request).await;
        }

        for name in &self.priority {
            match self.call_provider(name, &request).await {
                Ok(response) => {
                    info!(provider = name.as_str(), "Fallback sweep satisfied");
                    return Ok(response);
                }
                Err(error) => {
                    let kind = match &error {
                        DispatchError::Provider { source, .. } => source.kind(),
                        _ => "dispatch",
                    };
                    warn!(
                        provider = name.as_str(),
                        kind,
                        %error,
                        "Provider failed, trying next in priority order"
                    );
                }
            }
        }

        Err(DispatchError::AllProvidersExhausted)
    }

    /// Invoke a single named backend and shape its result.
    pub async fn call_provider(
        &self,
        name: &str,
        request: &ChatRequest,
    ) -> Result<AiResponse, DispatchError> {
        let backend = self
            .backends
            .get(name)
            .ok_or_else(|| DispatchError::unknown_provider(name))?;

        let model = request
            .model
            .clone()
            .unwrap_or_else(|| backend.default_model.clone());
        let model_request = ModelRequest {
            model: model.clone(),
            messages: request.messages.clone(),
            temperature: request.temperature.unwrap_or(DEFAULT_TEMPERATURE),
            max_tokens: request.max_tokens,
        };

        debug!(
            provider = name,
            model = model.as_str(),
            stream = request.stream,
            "Dispatching request to provider"
        );

        let call = async {
            if request.stream {
                backend.client.complete_streaming(model_request).await
            } else {
                backend.client.complete(model_request).await
            }
        };
        let completion = match timeout(self.attempt_timeout, call).await {
            Ok(result) => result,
            Err(_) => Err(ModelError::timeout(name, self.attempt_timeout.as_secs())),
        }
        .map_err(|source| DispatchError::provider(name, source))?;

        info!(
            provider = name,
            model = model.as_str(),
            "Provider call completed"
        );

        Ok(AiResponse {
            text: completion.text,
            provider: name.to_string(),
            model,
            usage: completion.usage,
        })
    }

    /// Probe every provider in the priority list with a minimal request.
    ///
    /// Probes run concurrently; a failing probe flips its entry to `false`
    /// and never aborts the sweep, so the report always carries exactly one
    /// entry per priority-list provider.
    pub async fn health_check(&self) -> HealthReport {
        let probes = self.priority.iter().map(|name| {
            let request = Self::probe_request();
            async move {
                let healthy = match self.call_provider(name, &request).await {
                    Ok(_) => true,
                    Err(error) => {
                        warn!(provider = name.as_str(), %error, "Health probe failed");
                        false
                    }
                };
                (name.clone(), healthy)
            }
        });
        join_all(probes).await.into_iter().collect()
    }

    fn probe_request() -> ChatRequest {
        ChatRequest {
            messages: vec![ChatMessage::text(MessageRole::User, HEALTH_PROBE_PROMPT)],
            max_tokens: Some(HEALTH_PROBE_MAX_TOKENS),
            ..ChatRequest::default()
        }
    }

    fn validate(&self, request: &ChatRequest) -> Result<(), DispatchError> {
        if request.messages.is_empty() {
            return Err(DispatchError::validation(
                "messages must be a non-empty sequence",
            ));
        }
        if let Some(temperature) = request.temperature {
            if !temperature.is_finite() {
                return Err(DispatchError::validation(
                    "temperature must be a finite number",
                ));
            }
        }
        if let Some(max_tokens) = request.max_tokens {
            if max_tokens == 0 {
                return Err(DispatchError::validation(
                    "maxTokens must be a positive integer",
                ));
            }
        }
        Ok(())
    }
}
