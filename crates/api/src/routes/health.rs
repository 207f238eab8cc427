//! Health check endpoint.

use std::sync::Arc;

use axum::Json;
use axum::extract::State;
use counter_store::CounterStore;
use serde::Serialize;

use crate::routes::seats::AppState;

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    #[serde(rename = "reservationsOpen")]
    pub reservations_open: bool,
}

/// GET /health — liveness plus whether reservations are being admitted.
pub async fn check<S: CounterStore + Clone + 'static>(
    State(state): State<Arc<AppState<S>>>,
) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        reservations_open: state.gate.is_open(),
    })
}
