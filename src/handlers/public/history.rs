// handlers/public/history.rs - POST /api/auto-update-history handler

use axum::extract::State;
use serde::Serialize;

use crate::middleware::{ApiResponse, ApiResult};
use crate::services::history::today_utc;
use crate::state::AppState;
use crate::types::ActivityEntry;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RollupResponse {
    pub date: chrono::NaiveDate,
    pub updated: usize,
}

/// POST /api/auto-update-history - Run the daily history rollup now.
///
/// Produces exactly what the scheduled job would for the same day, so calling it
/// again on the same day changes nothing.
pub async fn auto_update_history_post(State(state): State<AppState>) -> ApiResult<RollupResponse> {
    let today = today_utc();
    let updated = state.inventory.rollup_history(today).await?;

    state
        .activity
        .record(ActivityEntry::new("system", "history_rollup").with("updated", updated))
        .await;

    Ok(ApiResponse::success(RollupResponse { date: today, updated })
        .with_message("History auto-filled for today."))
}
