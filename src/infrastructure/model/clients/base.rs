//! Base HTTP client with shared logic

use crate::infrastructure::model::types::ModelError;
use reqwest::Client;
use reqwest_eventsource::EventSource;
use serde::Serialize;
use serde::de::DeserializeOwned;

/// Base HTTP client with shared functionality
#[derive(Clone)]
pub struct HttpClientBase {
    pub id: String,
    pub endpoint: String,
    pub api_key: Option<String>,
    pub http: Client,
}

impl HttpClientBase {
    pub fn new(id: String, endpoint: String, api_key: Option<String>) -> Self {
        Self {
            id,
            endpoint,
            api_key,
            http: Client::new(),
        }
    }

    /// Build URL from endpoint and path
    pub fn build_url(&self, path: &str) -> String {
        let base = self.endpoint.trim_end_matches('/');
        let path = path.trim_start_matches('/');
        format!("{base}/{path}")
    }

    /// Post JSON with bearer auth
    pub async fn post_with_bearer<Req, Res>(&self, url: &str, body: &Req) -> Result<Res, ModelError>
    where
        Req: Serialize,
        Res: DeserializeOwned,
    {
        let api_key = self.require_api_key()?;

        self.http
            .post(url)
            .header("Authorization", format!("Bearer {}", api_key))
            .header("Content-Type", "application/json")
            .json(body)
            .send()
            .await
            .map_err(|e| ModelError::network(&self.id, e))?
            .error_for_status()
            .map_err(|e| ModelError::network(&self.id, e))?
            .json()
            .await
            .map_err(|e| ModelError::network(&self.id, e))
    }

    /// Post JSON with x-api-key header auth (Anthropic)
    pub async fn post_with_api_key<Req, Res>(
        &self,
        url: &str,
        version: &str,
        body: &Req,
    ) -> Result<Res, ModelError>
    where
        Req: Serialize,
        Res: DeserializeOwned,
    {
        let api_key = self.require_api_key()?;

        self.http
            .post(url)
            .header("x-api-key", api_key)
            .header("anthropic-version", version)
            .header("Content-Type", "application/json")
            .json(body)
            .send()
            .await
            .map_err(|e| ModelError::network(&self.id, e))?
            .error_for_status()
            .map_err(|e| ModelError::network(&self.id, e))?
            .json()
            .await
            .map_err(|e| ModelError::network(&self.id, e))
    }

    /// Post JSON with query param auth (Gemini)
    pub async fn post_with_query_key<Req, Res>(
        &self,
        url: &str,
        body: &Req,
    ) -> Result<Res, ModelError>
    where
        Req: Serialize,
        Res: DeserializeOwned,
    {
        let url_with_key = self.url_with_query_key(url)?;

        self.http
            .post(&url_with_key)
            .json(body)
            .send()
            .await
            .map_err(|e| ModelError::network(&self.id, e))?
            .error_for_status()
            .map_err(|e| ModelError::network(&self.id, e))?
            .json()
            .await
            .map_err(|e| ModelError::network(&self.id, e))
    }

    /// Open an SSE stream with bearer auth
    pub fn sse_with_bearer<Req>(&self, url: &str, body: &Req) -> Result<EventSource, ModelError>
    where
        Req: Serialize,
    {
        let api_key = self.require_api_key()?;
        let builder = self
            .http
            .post(url)
            .header("Authorization", format!("Bearer {}", api_key))
            .header("Content-Type", "application/json")
            .json(body);
        EventSource::new(builder).map_err(|e| ModelError::stream(&self.id, e.to_string()))
    }

    /// Open an SSE stream with x-api-key header auth (Anthropic)
    pub fn sse_with_api_key<Req>(
        &self,
        url: &str,
        version: &str,
        body: &Req,
    ) -> Result<EventSource, ModelError>
    where
        Req: Serialize,
    {
        let api_key = self.require_api_key()?;
        let builder = self
            .http
            .post(url)
            .header("x-api-key", api_key)
            .header("anthropic-version", version)
            .header("Content-Type", "application/json")
            .json(body);
        EventSource::new(builder).map_err(|e| ModelError::stream(&self.id, e.to_string()))
    }

    /// Open an SSE stream with query param auth (Gemini)
    pub fn sse_with_query_key<Req>(&self, url: &str, body: &Req) -> Result<EventSource, ModelError>
    where
        Req: Serialize,
    {
        let url_with_key = self.url_with_query_key(url)?;
        let builder = self.http.post(&url_with_key).json(body);
        EventSource::new(builder).map_err(|e| ModelError::stream(&self.id, e.to_string()))
    }

    fn url_with_query_key(&self, url: &str) -> Result<String, ModelError> {
        let api_key = self.require_api_key()?;
        let separator = if url.contains('?') { '&' } else { '?' };
        Ok(format!("{url}{separator}key={api_key}"))
    }

    fn require_api_key(&self) -> Result<&str, ModelError> {
        self.api_key
            .as_deref()
            .filter(|k| !k.trim().is_empty())
            .ok_or_else(|| ModelError::missing_api_key(&self.id))
    }
}
