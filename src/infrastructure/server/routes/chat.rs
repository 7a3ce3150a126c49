use super::super::dto::{ErrorResponse, RestChatRequest, RestChatResponse};
use super::super::state::ServerState;
use crate::application::dispatcher::{ChatRequest, DispatchError};
use axum::Json;
use axum::extract::State;
use axum::http::StatusCode;
use std::sync::Arc;
use tracing::{error, info};
use uuid::Uuid;

#[utoipa::path(
    post,
    path = "/chat",
    tag = "chat",
    request_body = RestChatRequest,
    responses(
        (status = 200, description = "Request served by a provider", body = RestChatResponse),
        (status = 400, description = "Malformed request or unknown provider", body = ErrorResponse),
        (status = 502, description = "Provider failure or priority list exhausted", body = ErrorResponse)
    )
)]
pub async fn chat_handler(
    State(state): State<Arc<ServerState>>,
    Json(payload): Json<RestChatRequest>,
) -> Result<Json<RestChatResponse>, (StatusCode, Json<ErrorResponse>)> {
    let request_id = Uuid::new_v4();
    info!(
        %request_id,
        provider = payload.provider.as_deref(),
        messages = payload.messages.len(),
        stream = payload.stream,
        "Received /chat request"
    );

    let request = ChatRequest {
        messages: payload.messages,
        provider: payload.provider,
        model: payload.model,
        temperature: payload.temperature,
        max_tokens: payload.max_tokens,
        stream: payload.stream,
    };

    match state.dispatcher().process_request(request).await {
        Ok(response) => {
            info!(
                %request_id,
                provider = response.provider.as_str(),
                model = response.model.as_str(),
                "Chat request completed successfully"
            );
            Ok(Json(RestChatResponse::from(response)))
        }
        Err(dispatch_error) => {
            error!(
                %request_id,
                code = dispatch_error.code(),
                %dispatch_error,
                "AI request failed"
            );
            Err(error_response(dispatch_error))
        }
    }
}

fn error_response(error: DispatchError) -> (StatusCode, Json<ErrorResponse>) {
    let status = match &error {
        DispatchError::Validation { .. } | DispatchError::UnknownProvider { .. } => {
            StatusCode::BAD_REQUEST
        }
        DispatchError::Provider { .. } | DispatchError::AllProvidersExhausted => {
            StatusCode::BAD_GATEWAY
        }
    };
    let body = ErrorResponse {
        error: "failed to process AI request".to_string(),
        details: Some(error.to_string()),
        code: error.code().to_string(),
    };
    (status, Json(body))
}
