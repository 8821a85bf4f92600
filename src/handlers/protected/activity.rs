// handlers/protected/activity.rs - Audit log read and client-reported events

use axum::{extract::State, Extension};
use serde::Deserialize;
use serde_json::{Map, Value};

use crate::api::ApiJson;
use crate::middleware::{ApiResponse, ApiResult, AuthUser};
use crate::state::AppState;
use crate::types::ActivityEntry;

#[derive(Debug, Deserialize)]
pub struct ClientActivityRequest {
    pub username: Option<String>,
    pub action: Option<String>,
    pub filters: Option<Map<String, Value>>,
}

/// GET /api/activity-log - The full audit log, oldest first
pub async fn activity_log_get(State(state): State<AppState>) -> ApiResult<Vec<ActivityEntry>> {
    Ok(ApiResponse::success(state.activity.entries().await))
}

/// POST /api/activity-log - Record a client-side event such as a filtered search.
///
/// The entry is attributed to the body's `username` when given, else to the caller.
pub async fn activity_log_post(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    ApiJson(body): ApiJson<ClientActivityRequest>,
) -> ApiResult<ActivityEntry> {
    let username = body
        .username
        .filter(|u| !u.trim().is_empty())
        .unwrap_or(user.username);
    let action = body
        .action
        .filter(|a| !a.trim().is_empty())
        .unwrap_or_else(|| "unknown".to_string());

    let entry = ActivityEntry::new(username, action)
        .with("filtersUsed", Value::Object(body.filters.unwrap_or_default()));

    // Not best-effort: the entry is the result of this request
    let written = state.activity.try_append(entry).await?;
    Ok(ApiResponse::created(written))
}

/// POST /api/log-export - Record that the caller exported the log as CSV
pub async fn log_export_post(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
) -> ApiResult<ActivityEntry> {
    let written = state
        .activity
        .try_append(ActivityEntry::new(user.username, "export_csv"))
        .await?;
    Ok(ApiResponse::created(written))
}
