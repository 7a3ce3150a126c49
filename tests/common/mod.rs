//! Shared fakes for dispatcher and server tests.
#![allow(dead_code)]

use astrolabe_gateway::ProviderConfig;
use astrolabe_gateway::dispatcher::Dispatcher;
use astrolabe_gateway::model::{ModelClient, ModelCompletion, ModelError, ModelRequest, Usage};
use async_trait::async_trait;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

/// Scripted stand-in for an HTTP provider client.
pub struct FakeClient {
    id: String,
    fail: bool,
    delay: Option<Duration>,
    pub calls: Arc<AtomicUsize>,
    pub streaming_calls: Arc<AtomicUsize>,
    pub last_request: Arc<Mutex<Option<ModelRequest>>>,
}

impl FakeClient {
    fn new(id: &str, fail: bool, delay: Option<Duration>) -> Self {
        Self {
            id: id.to_string(),
            fail,
            delay,
            calls: Arc::new(AtomicUsize::new(0)),
            streaming_calls: Arc::new(AtomicUsize::new(0)),
            last_request: Arc::new(Mutex::new(None)),
        }
    }

    pub fn healthy(id: &str) -> Self {
        Self::new(id, false, None)
    }

    pub fn failing(id: &str) -> Self {
        Self::new(id, true, None)
    }

    pub fn slow(id: &str, delay: Duration) -> Self {
        Self::new(id, false, Some(delay))
    }

    async fn respond(&self, request: ModelRequest) -> Result<ModelCompletion, ModelError> {
        *self.last_request.lock().unwrap() = Some(request);
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        if self.fail {
            return Err(ModelError::invalid_response(&self.id, "scripted failure"));
        }
        Ok(ModelCompletion {
            text: format!("response from {}", self.id),
            usage: Some(Usage {
                prompt_tokens: Some(12),
                completion_tokens: Some(34),
                total_tokens: Some(46),
            }),
        })
    }
}

#[async_trait]
impl ModelClient for FakeClient {
    fn id(&self) -> &str {
        &self.id
    }

    async fn complete(&self, request: ModelRequest) -> Result<ModelCompletion, ModelError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.respond(request).await
    }

    async fn complete_streaming(
        &self,
        request: ModelRequest,
    ) -> Result<ModelCompletion, ModelError> {
        self.streaming_calls.fetch_add(1, Ordering::SeqCst);
        self.respond(request).await
    }
}

pub fn descriptor(id: &str, model: &str) -> ProviderConfig {
    ProviderConfig {
        id: id.to_string(),
        provider_type: "openai".to_string(),
        endpoint: "http://127.0.0.1:9".to_string(),
        api_key: None,
        api_path: None,
        model: model.to_string(),
        fallback_model: None,
    }
}

/// Assemble a dispatcher whose priority list follows the backend order.
pub fn dispatcher(backends: Vec<(ProviderConfig, Box<dyn ModelClient>)>) -> Dispatcher {
    let priority = backends.iter().map(|(d, _)| d.id.clone()).collect();
    Dispatcher::new(backends, priority, Duration::from_secs(5))
}
