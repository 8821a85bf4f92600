use axum::Extension;
use serde::Serialize;

use crate::middleware::{ApiResponse, ApiResult, AuthUser};

#[derive(Debug, Serialize)]
pub struct WhoamiResponse {
    pub message: String,
    pub username: String,
    pub role: String,
}

/// GET /api/protected - Echo the identity carried by the caller's token
pub async fn whoami(Extension(user): Extension<AuthUser>) -> ApiResult<WhoamiResponse> {
    Ok(ApiResponse::success(WhoamiResponse {
        message: format!("Hello {}, you're authorized.", user.username),
        username: user.username,
        role: user.role,
    }))
}
