use axum::{Json, extract::State};
use serde::Serialize;

use crate::state::AppState;

/// The health check response.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthResponse {
    pub conexion: &'static str,
    pub base_url: String,
}

/// Reports that the service is up and which base URL it advertises.
pub async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        conexion: "ok",
        base_url: state.config.base_url.clone(),
    })
}
