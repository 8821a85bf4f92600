// handlers/public/auth/login.rs - POST /api/login handler

use axum::extract::State;
use serde::{Deserialize, Serialize};

use crate::api::ApiJson;
use crate::middleware::{ApiResponse, ApiResult};
use crate::services::requests::FieldErrors;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub username: Option<String>,
    pub password: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginResponse {
    pub token: String,
    /// Seconds until the token expires
    pub expires_in: u64,
}

/// POST /api/login - Authenticate user and receive JWT token
///
/// Expected Input:
/// ```json
/// { "username": "admin", "password": "..." }
/// ```
///
/// Expected Output (Success):
/// ```json
/// { "success": true, "data": { "token": "eyJhbGciOiJIUzI1NiI...", "expiresIn": 3600 } }
/// ```
///
/// Unknown user or wrong password is 401 with no token.
pub async fn login_post(
    State(state): State<AppState>,
    ApiJson(body): ApiJson<LoginRequest>,
) -> ApiResult<LoginResponse> {
    let mut errors = FieldErrors::default();
    let username = errors.text("username", body.username);
    // Passwords are compared verbatim, never trimmed
    let password = body.password.filter(|p| !p.is_empty());
    if password.is_none() {
        errors.reject("password", "This field is required");
    }

    let (Some(username), Some(password)) = (username, password) else {
        return Err(errors.into_error().into());
    };

    let token = state.auth.login(&username, &password).await?;

    Ok(ApiResponse::success(LoginResponse {
        token,
        expires_in: state.config.security.jwt_expiry_hours * 3600,
    }))
}
