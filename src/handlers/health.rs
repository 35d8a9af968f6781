use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};

use crate::http::server::AppState;
use crate::lifecycle::Phase;

#[derive(Debug, Serialize, Deserialize)]
pub struct HealthStatus {
    pub status: String,
    pub version: String,
}

/// 200 while the server is Running, 503 in every other phase.
pub async fn health(State(state): State<AppState>) -> Response {
    let phase = *state.phase.borrow();
    let status = if phase == Phase::Running {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    let body = HealthStatus {
        status: phase.as_str().to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    };
    (status, Json(body)).into_response()
}
