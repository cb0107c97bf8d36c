//! Health check handler

use std::sync::Arc;

use axum::{extract::State, Json};
use serde::Serialize;

use crate::AppState;

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub narrative_backend: &'static str,
    pub products: usize,
}

/// GET /health - Liveness plus the configured narrative backend
///
/// Does not call the backend; use `homeplan ai` for a reachability check.
pub async fn health(State(state): State<Arc<AppState>>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        narrative_backend: state.narrator.name(),
        products: state.engine.catalog().len(),
    })
}
