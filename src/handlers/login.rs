//! Login exchange: username + password for a signed credential.

use axum::{
    body::Bytes,
    extract::State,
    http::{header::AUTHORIZATION, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use tracing::{error, info, warn};

use crate::http::response::ApiError;
use crate::http::server::AppState;
use crate::models::user::password_digest;
use crate::observability::metrics;
use crate::security::BEARER_PREFIX;

#[derive(Debug, Default, Serialize, Deserialize)]
pub struct LoginRequest {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub password: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct LoginResponse {
    pub token: String,
}

fn missing_fields() -> Response {
    ApiError::bad_request(
        "invalid_login",
        "please provide username and password to get the token",
    )
    .into_response()
}

fn issue_failed() -> Response {
    ApiError::new(
        StatusCode::INTERNAL_SERVER_ERROR,
        "signing_failed",
        "token could not be issued",
    )
    .into_response()
}

pub async fn login(State(state): State<AppState>, body: Bytes) -> Response {
    let request: LoginRequest = match serde_json::from_slice(&body) {
        Ok(request) => request,
        Err(_) => return missing_fields(),
    };
    if request.username.is_empty() || request.password.is_empty() {
        return missing_fields();
    }

    info!(username = %request.username, "Login attempt");

    let digest = password_digest(&request.password);
    let user = match state.store.find_user(&request.username, &digest).await {
        Ok(Some(user)) => user,
        Ok(None) => {
            warn!(username = %request.username, "Authentication failed");
            metrics::record_login("rejected");
            return ApiError::unauthorized("authentication_failed", "authentication failed")
                .into_response();
        }
        Err(e) => {
            warn!(error = %e, "Credential check failed");
            metrics::record_login("error");
            return ApiError::from(e).into_response();
        }
    };

    let role = if user.role.is_empty() {
        state.auth.role.as_str()
    } else {
        user.role.as_str()
    };

    let token = match state.codec.issue(&user.username, role, state.auth.token_ttl()) {
        Ok(token) => token,
        Err(e) => {
            error!(error = %e, "Token issuance failed");
            metrics::record_login("error");
            return issue_failed();
        }
    };

    let header = match HeaderValue::from_str(&format!("{}{}", BEARER_PREFIX, token)) {
        Ok(header) => header,
        Err(_) => return issue_failed(),
    };

    metrics::record_login("issued");
    (
        StatusCode::CREATED,
        [(AUTHORIZATION, header)],
        Json(LoginResponse { token }),
    )
        .into_response()
}
