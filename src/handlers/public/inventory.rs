// handlers/public/inventory.rs - Read-only inventory views

use axum::extract::{Path, State};

use crate::middleware::{ApiResponse, ApiResult};
use crate::state::AppState;
use crate::types::{Product, Warehouse};

/// GET /api/inventory - Every product record
pub async fn inventory_get(State(state): State<AppState>) -> ApiResult<Vec<Product>> {
    Ok(ApiResponse::success(state.inventory.list_products().await))
}

/// GET /api/warehouse/:id - Products stocked in one warehouse
pub async fn warehouse_products_get(
    State(state): State<AppState>,
    Path(warehouse_id): Path<String>,
) -> ApiResult<Vec<Product>> {
    Ok(ApiResponse::success(
        state.inventory.products_in_warehouse(&warehouse_id).await,
    ))
}

/// GET /api/alerts - Products below their minimum threshold
pub async fn alerts_get(State(state): State<AppState>) -> ApiResult<Vec<Product>> {
    Ok(ApiResponse::success(state.inventory.low_stock_alerts().await))
}

/// GET /api/warehouses
pub async fn warehouses_get(State(state): State<AppState>) -> ApiResult<Vec<Warehouse>> {
    Ok(ApiResponse::success(state.inventory.list_warehouses().await))
}
