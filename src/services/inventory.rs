use chrono::NaiveDate;
use serde::Serialize;
use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, info};

use crate::store::{Store, StoreError};
use crate::types::{Product, Warehouse, MAX_STOCK};

use super::history::HistoryTracker;
use super::requests::{NewProduct, StockEdit, StockTransfer};

/// Location recorded for a product whose warehouse is not registered
pub const UNKNOWN_LOCATION: &str = "Unknown";

#[derive(Debug, Error)]
pub enum InventoryError {
    #[error("{message}")]
    Validation {
        message: String,
        field_errors: HashMap<String, String>,
    },

    #[error("Product {product_id} not found in warehouse {warehouse_id}")]
    NotFound {
        product_id: String,
        warehouse_id: String,
    },

    #[error("Source product {product_id} not found in warehouse {warehouse_id}")]
    SourceNotFound {
        product_id: String,
        warehouse_id: String,
    },

    #[error("Warehouse ID already exists: {0}")]
    WarehouseExists(String),

    #[error("Product {product_id} already exists in warehouse {warehouse_id}")]
    DuplicateProduct {
        product_id: String,
        warehouse_id: String,
    },

    #[error("Insufficient stock in source: {available} available, {requested} requested")]
    InsufficientStock { available: i64, requested: i64 },

    #[error("No product ids left to assign")]
    IdsExhausted,

    #[error(transparent)]
    Store(#[from] StoreError),
}

impl InventoryError {
    /// Validation failure on a single field
    pub fn validation(field: &str, reason: &str) -> Self {
        InventoryError::Validation {
            message: reason.to_string(),
            field_errors: HashMap::from([(field.to_string(), reason.to_string())]),
        }
    }
}

/// Result of a successful transfer, both records as persisted
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TransferOutcome {
    pub source: Product,
    pub destination: Product,
    pub created_destination: bool,
}

/// Product and warehouse operations over the document store.
///
/// Each mutating call runs as a single read-modify-write of the inventory
/// document, so concurrent requests and the scheduler never interleave.
#[derive(Clone)]
pub struct InventoryService {
    store: Arc<Store>,
    history: HistoryTracker,
}

impl InventoryService {
    pub fn new(store: Arc<Store>, history: HistoryTracker) -> Self {
        Self { store, history }
    }

    pub async fn list_products(&self) -> Vec<Product> {
        self.store.inventory.read(|inv| inv.products.clone()).await
    }

    pub async fn products_in_warehouse(&self, warehouse_id: &str) -> Vec<Product> {
        self.store
            .inventory
            .read(|inv| {
                inv.products
                    .iter()
                    .filter(|p| p.warehouse_id == warehouse_id)
                    .cloned()
                    .collect()
            })
            .await
    }

    /// Products whose stock has dropped below their minimum threshold
    pub async fn low_stock_alerts(&self) -> Vec<Product> {
        self.store
            .inventory
            .read(|inv| inv.products.iter().filter(|p| p.is_low_stock()).cloned().collect())
            .await
    }

    pub async fn list_warehouses(&self) -> Vec<Warehouse> {
        self.store.warehouses.snapshot().await
    }

    pub async fn add_warehouse(&self, warehouse: Warehouse) -> Result<Warehouse, InventoryError> {
        self.store
            .warehouses
            .mutate(|warehouses| {
                if warehouses.iter().any(|w| w.id == warehouse.id) {
                    return Err(InventoryError::WarehouseExists(warehouse.id.clone()));
                }
                warehouses.push(warehouse.clone());
                Ok(warehouse)
            })
            .await
    }

    /// Set a product's stock and record it as today's history value
    pub async fn edit_stock(&self, edit: StockEdit, today: NaiveDate) -> Result<Product, InventoryError> {
        let history = self.history;
        let updated = self
            .store
            .inventory
            .mutate(|inv| {
                let idx = inv
                    .position(&edit.product_id, &edit.warehouse_id)
                    .ok_or_else(|| InventoryError::NotFound {
                        product_id: edit.product_id.clone(),
                        warehouse_id: edit.warehouse_id.clone(),
                    })?;
                let product = &mut inv.products[idx];
                history.record_stock_change(product, today, edit.new_stock);
                Ok::<_, InventoryError>(product.clone())
            })
            .await?;

        debug!(
            "Stock of {} at {} set to {}",
            updated.product_id, updated.warehouse_id, updated.current_stock
        );
        Ok(updated)
    }

    /// Move `quantity` of a product between warehouses, creating the destination
    /// record when the product is not yet stocked there.
    ///
    /// Both records are written in the same document update; on any error neither changes.
    pub async fn transfer_stock(
        &self,
        transfer: StockTransfer,
        today: NaiveDate,
    ) -> Result<TransferOutcome, InventoryError> {
        let destination_location = self.warehouse_location(&transfer.to_warehouse_id).await;
        let history = self.history;

        let outcome = self
            .store
            .inventory
            .mutate(|inv| {
                let from_idx = inv
                    .position(&transfer.product_id, &transfer.from_warehouse_id)
                    .ok_or_else(|| InventoryError::SourceNotFound {
                        product_id: transfer.product_id.clone(),
                        warehouse_id: transfer.from_warehouse_id.clone(),
                    })?;

                let available = inv.products[from_idx].current_stock;
                if available < transfer.quantity {
                    return Err(InventoryError::InsufficientStock {
                        available,
                        requested: transfer.quantity,
                    });
                }

                let to_idx = inv.position(&transfer.product_id, &transfer.to_warehouse_id);
                let dest_stock = match to_idx {
                    Some(to_idx) => inv.products[to_idx]
                        .current_stock
                        .checked_add(transfer.quantity)
                        .filter(|stock| *stock <= MAX_STOCK)
                        .ok_or_else(|| {
                            InventoryError::validation(
                                "quantity",
                                "Destination stock would exceed the maximum stock quantity",
                            )
                        })?,
                    None => transfer.quantity,
                };

                let source = &mut inv.products[from_idx];
                history.record_stock_change(source, today, available - transfer.quantity);
                let source = source.clone();

                let (destination, created_destination) = match to_idx {
                    Some(to_idx) => {
                        let dest = &mut inv.products[to_idx];
                        history.record_stock_change(dest, today, dest_stock);
                        (dest.clone(), false)
                    }
                    None => {
                        let dest = Product {
                            warehouse_id: transfer.to_warehouse_id.clone(),
                            warehouse_location: destination_location
                                .clone()
                                .unwrap_or_else(|| UNKNOWN_LOCATION.to_string()),
                            current_stock: transfer.quantity,
                            history: history.seed(today, transfer.quantity),
                            ..source.clone()
                        };
                            inv.products.push(dest.clone());
                            (dest, true)
                        }
                    };

                Ok(TransferOutcome {
                    source,
                    destination,
                    created_destination,
                })
            })
            .await?;

        info!(
            "Transferred {} of {} from {} to {}",
            transfer.quantity, transfer.product_id, transfer.from_warehouse_id, transfer.to_warehouse_id
        );
        Ok(outcome)
    }

    /// Create a product under the next sequential id
    pub async fn add_product(&self, new: NewProduct, today: NaiveDate) -> Result<Product, InventoryError> {
        let warehouse_location = match new.warehouse_location {
            Some(location) => location,
            None => self
                .warehouse_location(&new.warehouse_id)
                .await
                .unwrap_or_else(|| UNKNOWN_LOCATION.to_string()),
        };
        let history = self.history;

        self.store
            .inventory
            .mutate(|inv| {
                let product = Product {
                    product_id: inv.allocate_product_id().ok_or(InventoryError::IdsExhausted)?,
                    product_name: new.product_name,
                    category: new.category,
                    warehouse_id: new.warehouse_id,
                    warehouse_location,
                    current_stock: new.current_stock,
                    min_threshold: new.min_threshold,
                    max_capacity: new.max_capacity,
                    expected_demand: new.expected_demand,
                    history: history.seed(today, new.current_stock),
                };
                inv.products.push(product.clone());
                Ok(product)
            })
            .await
    }

    /// Append externally supplied products (bulk upload). All or nothing.
    pub async fn import_products(&self, products: Vec<Product>) -> Result<usize, InventoryError> {
        self.store
            .inventory
            .mutate(|inv| {
                let mut seen = HashSet::new();
                for product in &products {
                    let key = (product.product_id.as_str(), product.warehouse_id.as_str());
                    if !seen.insert(key) || inv.find(key.0, key.1).is_some() {
                        return Err(InventoryError::DuplicateProduct {
                            product_id: product.product_id.clone(),
                            warehouse_id: product.warehouse_id.clone(),
                        });
                    }
                }

                for product in &products {
                    if !inv.observe_product_id(&product.product_id) {
                        return Err(InventoryError::validation(
                            "productId",
                            &format!("Product id {} is out of range", product.product_id),
                        ));
                    }
                }
                let count = products.len();
                inv.products.extend(products);
                Ok(count)
            })
            .await
    }

    pub async fn delete_product(&self, product_id: &str, warehouse_id: &str) -> Result<Product, InventoryError> {
        self.store
            .inventory
            .mutate(|inv| {
                let idx = inv
                    .position(product_id, warehouse_id)
                    .ok_or_else(|| InventoryError::NotFound {
                        product_id: product_id.to_string(),
                        warehouse_id: warehouse_id.to_string(),
                    })?;
                Ok(inv.products.remove(idx))
            })
            .await
    }

    /// Daily rollup over every product. Returns how many products gained an entry for `today`.
    pub async fn rollup_history(&self, today: NaiveDate) -> Result<usize, InventoryError> {
        let history = self.history;
        let added = self
            .store
            .inventory
            .mutate(|inv| {
                let added = inv
                    .products
                    .iter_mut()
                    .map(|p| history.apply_daily_rollup(p, today))
                    .filter(|added| *added)
                    .count();
                Ok::<_, InventoryError>(added)
            })
            .await?;

        info!(
            "History rollup for {}: {} products updated ({}-day window)",
            today,
            added,
            history.window_days()
        );
        Ok(added)
    }

    async fn warehouse_location(&self, warehouse_id: &str) -> Option<String> {
        self.store
            .warehouses
            .read(|warehouses| {
                warehouses
                    .iter()
                    .find(|w| w.id == warehouse_id)
                    .map(|w| w.location.clone())
            })
            .await
    }
}
