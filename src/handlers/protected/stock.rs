// handlers/protected/stock.rs - Stock edits and warehouse transfers

use axum::{extract::State, Extension};

use crate::api::ApiJson;
use crate::middleware::{ApiResponse, ApiResult, AuthUser};
use crate::services::history::today_utc;
use crate::services::requests::{TransferStockRequest, UpdateStockRequest};
use crate::services::TransferOutcome;
use crate::state::AppState;
use crate::types::{ActivityEntry, Product};

/// POST /api/update-stock - Set the stock of one product in one warehouse
///
/// Body: `{ "productId": "P001", "warehouseId": "W1", "currentStock": 10 }`.
/// 400 when a field is missing, 404 when no such record exists.
pub async fn update_stock_post(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    ApiJson(body): ApiJson<UpdateStockRequest>,
) -> ApiResult<Product> {
    let edit = body.validate()?;
    let updated = state.inventory.edit_stock(edit, today_utc()).await?;

    state
        .activity
        .record(
            ActivityEntry::new(&user.username, "edit_stock")
                .with("productId", updated.product_id.as_str())
                .with("warehouseId", updated.warehouse_id.as_str())
                .with("newStock", updated.current_stock),
        )
        .await;

    Ok(ApiResponse::success(updated))
}

/// POST /api/transfer-stock - Move stock between warehouses
///
/// Body: `{ "productId", "fromWarehouseId", "toWarehouseId", "quantity" }`.
/// The destination record is created when the product is not stocked there yet.
pub async fn transfer_stock_post(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    ApiJson(body): ApiJson<TransferStockRequest>,
) -> ApiResult<TransferOutcome> {
    let transfer = body.validate()?;
    let entry = ActivityEntry::new(&user.username, "Transfer Stock")
        .with("productId", transfer.product_id.as_str())
        .with("fromWarehouseId", transfer.from_warehouse_id.as_str())
        .with("toWarehouseId", transfer.to_warehouse_id.as_str())
        .with("quantity", transfer.quantity);

    let outcome = state.inventory.transfer_stock(transfer, today_utc()).await?;
    state.activity.record(entry).await;

    Ok(ApiResponse::success(outcome))
}
