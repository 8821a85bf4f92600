// handlers/protected/products.rs - Product creation, bulk upload and deletion

use axum::{
    extract::{Multipart, State},
    Extension,
};
use serde::Serialize;

use crate::api::ApiJson;
use crate::error::ApiError;
use crate::middleware::{ApiResponse, ApiResult, AuthUser};
use crate::services::history::today_utc;
use crate::services::requests::{AddProductRequest, DeleteProductRequest};
use crate::services::upload::parse_products_csv;
use crate::state::AppState;
use crate::types::{ActivityEntry, Product};

/// Multipart field carrying the CSV file
const UPLOAD_FIELD: &str = "file";

#[derive(Debug, Serialize)]
pub struct UploadResponse {
    pub added: usize,
}

/// POST /api/add-product - Create a product; the server assigns `productId`
///
/// Required: `productName`, `warehouseId`, `currentStock`. Thresholds default to 0 and
/// `warehouseLocation` is looked up from the warehouse list when omitted.
pub async fn add_product_post(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    ApiJson(body): ApiJson<AddProductRequest>,
) -> ApiResult<Product> {
    let new = body.validate()?;
    let product = state.inventory.add_product(new, today_utc()).await?;

    state
        .activity
        .record(
            ActivityEntry::new(&user.username, "Add Product")
                .with("productId", product.product_id.as_str())
                .with("warehouseId", product.warehouse_id.as_str()),
        )
        .await;

    Ok(ApiResponse::created(product))
}

/// DELETE /api/delete-product - Remove one product record
pub async fn delete_product(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    ApiJson(body): ApiJson<DeleteProductRequest>,
) -> ApiResult<Product> {
    let (product_id, warehouse_id) = body.validate()?;
    let removed = state.inventory.delete_product(&product_id, &warehouse_id).await?;

    state
        .activity
        .record(
            ActivityEntry::new(&user.username, "Delete Product")
                .with("productId", product_id)
                .with("warehouseId", warehouse_id),
        )
        .await;

    Ok(ApiResponse::success(removed))
}

/// POST /api/upload-products - Bulk ingest from a CSV file in the `file` field
pub async fn upload_products_post(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    mut multipart: Multipart,
) -> ApiResult<UploadResponse> {
    let mut data = None;
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::bad_request(format!("Malformed multipart body: {}", e)))?
    {
        if field.name() == Some(UPLOAD_FIELD) {
            let bytes = field
                .bytes()
                .await
                .map_err(|e| ApiError::bad_request(format!("Failed to read upload: {}", e)))?;
            data = Some(bytes);
            break;
        }
    }

    let data = data.ok_or_else(|| ApiError::bad_request("Missing 'file' field in upload"))?;
    let products = parse_products_csv(&data, today_utc(), &state.history)?;
    let added = state.inventory.import_products(products).await?;

    state
        .activity
        .record(ActivityEntry::new(&user.username, "bulk_upload_products").with("count", added))
        .await;

    Ok(ApiResponse::success(UploadResponse { added }))
}
