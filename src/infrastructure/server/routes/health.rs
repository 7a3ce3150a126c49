use super::super::dto::HealthResponse;
use super::super::state::ServerState;
use axum::Json;
use axum::extract::State;
use std::sync::Arc;
use tracing::info;

#[utoipa::path(
    get,
    path = "/health",
    tag = "health",
    responses(
        (status = 200, description = "Per-provider reachability report", body = HealthResponse)
    )
)]
pub async fn health_handler(State(state): State<Arc<ServerState>>) -> Json<HealthResponse> {
    info!("Running provider health sweep");
    let providers = state.dispatcher().health_check().await;
    Json(HealthResponse {
        status: "ok".to_string(),
        providers,
    })
}
