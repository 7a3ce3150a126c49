use super::dto::{
    ErrorResponse, HealthResponse, ProviderSummary, ProvidersResponse, RestChatRequest,
    RestChatResponse,
};
use super::routes;
use crate::infrastructure::model::Usage;
use crate::types::{ChatMessage, MessageContent, MessageRole};
use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(
    paths(
        routes::chat::chat_handler,
        routes::health::health_handler,
        routes::providers::providers_handler
    ),
    components(
        schemas(
            RestChatRequest,
            RestChatResponse,
            ErrorResponse,
            HealthResponse,
            ProvidersResponse,
            ProviderSummary,
            ChatMessage,
            MessageContent,
            MessageRole,
            Usage
        )
    ),
    tags(
        (name = "chat", description = "Route chat requests across providers"),
        (name = "health", description = "Provider reachability probes"),
        (name = "providers", description = "Configured provider table")
    )
)]
pub(super) struct ApiDoc;
