use super::super::dto::{ProviderSummary, ProvidersResponse};
use super::super::state::ServerState;
use axum::Json;
use axum::extract::State;
use std::sync::Arc;

#[utoipa::path(
    get,
    path = "/providers",
    tag = "providers",
    responses(
        (status = 200, description = "Configured provider table", body = ProvidersResponse)
    )
)]
pub async fn providers_handler(State(state): State<Arc<ServerState>>) -> Json<ProvidersResponse> {
    let dispatcher = state.dispatcher();
    let providers = dispatcher
        .descriptors()
        .iter()
        .map(ProviderSummary::from)
        .collect();
    Json(ProvidersResponse { providers })
}
