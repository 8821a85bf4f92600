use axum::{extract::State, Extension};

use crate::api::ApiJson;
use crate::middleware::{ApiResponse, ApiResult, AuthUser};
use crate::services::requests::AddWarehouseRequest;
use crate::state::AppState;
use crate::types::{ActivityEntry, Warehouse};

/// POST /api/add-warehouse - Register a warehouse; 400 `CONFLICT` if the id is taken
pub async fn add_warehouse_post(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    ApiJson(body): ApiJson<AddWarehouseRequest>,
) -> ApiResult<Warehouse> {
    let warehouse = body.validate()?;
    let added = state.inventory.add_warehouse(warehouse).await?;

    state
        .activity
        .record(
            ActivityEntry::new(&user.username, "Add Warehouse")
                .with("warehouseId", added.id.as_str())
                .with("location", added.location.as_str()),
        )
        .await;

    Ok(ApiResponse::created(added))
}
