//! Model traits

use super::types::{ModelCompletion, ModelError, ModelRequest};
use async_trait::async_trait;

/// Uniform capability interface over heterogeneous provider APIs.
///
/// One implementation exists per wire format; the dispatcher selects the
/// implementation through its backend table, never by branching on provider
/// names at the call site.
#[async_trait]
pub trait ModelClient: Send + Sync {
    /// The provider id this client serves
    fn id(&self) -> &str;

    /// Single round trip: blocks until the backend returns the full text
    /// and whatever usage accounting it supplies.
    async fn complete(&self, request: ModelRequest) -> Result<ModelCompletion, ModelError>;

    /// Consume the backend's incremental token stream to completion and
    /// return the concatenated text with the terminal usage summary.
    async fn complete_streaming(
        &self,
        request: ModelRequest,
    ) -> Result<ModelCompletion, ModelError>;
}
