//! Request bodies accepted by the mutating endpoints and their validated forms.
//!
//! Every field is optional on the wire so that a missing field turns into a
//! `VALIDATION_ERROR` naming it, rather than an opaque deserialization failure.

use serde::Deserialize;
use std::collections::HashMap;

use super::inventory::InventoryError;
use crate::types::MAX_STOCK;

/// Collects per-field problems while a request is validated
#[derive(Debug, Default)]
pub struct FieldErrors(HashMap<String, String>);

impl FieldErrors {
    pub fn text(&mut self, field: &str, value: Option<String>) -> Option<String> {
        match value.map(|v| v.trim().to_string()) {
            Some(v) if !v.is_empty() => Some(v),
            _ => {
                self.reject(field, "This field is required");
                None
            }
        }
    }

    pub fn non_negative(&mut self, field: &str, value: Option<i64>) -> Option<i64> {
        match value {
            Some(v) if (0..=MAX_STOCK).contains(&v) => Some(v),
            Some(v) if v < 0 => {
                self.reject(field, "Must not be negative");
                None
            }
            Some(_) => {
                self.reject(field, "Exceeds the maximum stock quantity");
                None
            }
            None => {
                self.reject(field, "This field is required");
                None
            }
        }
    }

    pub fn positive(&mut self, field: &str, value: Option<i64>) -> Option<i64> {
        match value {
            Some(v) if (1..=MAX_STOCK).contains(&v) => Some(v),
            Some(v) if v < 1 => {
                self.reject(field, "Must be greater than zero");
                None
            }
            Some(_) => {
                self.reject(field, "Exceeds the maximum stock quantity");
                None
            }
            None => {
                self.reject(field, "This field is required");
                None
            }
        }
    }

    pub fn reject(&mut self, field: &str, reason: &str) {
        self.0.insert(field.to_string(), reason.to_string());
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn into_error(self) -> InventoryError {
        InventoryError::Validation {
            message: "Missing or invalid required fields.".to_string(),
            field_errors: self.0,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateStockRequest {
    pub product_id: Option<String>,
    pub warehouse_id: Option<String>,
    pub current_stock: Option<i64>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StockEdit {
    pub product_id: String,
    pub warehouse_id: String,
    pub new_stock: i64,
}

impl UpdateStockRequest {
    pub fn validate(self) -> Result<StockEdit, InventoryError> {
        let mut errors = FieldErrors::default();
        let product_id = errors.text("productId", self.product_id);
        let warehouse_id = errors.text("warehouseId", self.warehouse_id);
        let new_stock = errors.non_negative("currentStock", self.current_stock);

        match (product_id, warehouse_id, new_stock) {
            (Some(product_id), Some(warehouse_id), Some(new_stock)) => Ok(StockEdit {
                product_id,
                warehouse_id,
                new_stock,
            }),
            _ => Err(errors.into_error()),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransferStockRequest {
    pub product_id: Option<String>,
    pub from_warehouse_id: Option<String>,
    pub to_warehouse_id: Option<String>,
    pub quantity: Option<i64>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StockTransfer {
    pub product_id: String,
    pub from_warehouse_id: String,
    pub to_warehouse_id: String,
    pub quantity: i64,
}

impl TransferStockRequest {
    pub fn validate(self) -> Result<StockTransfer, InventoryError> {
        let mut errors = FieldErrors::default();
        let product_id = errors.text("productId", self.product_id);
        let from = errors.text("fromWarehouseId", self.from_warehouse_id);
        let to = errors.text("toWarehouseId", self.to_warehouse_id);
        let quantity = errors.positive("quantity", self.quantity);

        if let (Some(from), Some(to)) = (&from, &to) {
            if from == to {
                errors.reject("toWarehouseId", "Must differ from fromWarehouseId");
            }
        }

        match (product_id, from, to, quantity) {
            (Some(product_id), Some(from_warehouse_id), Some(to_warehouse_id), Some(quantity))
                if errors.is_empty() =>
            {
                Ok(StockTransfer {
                    product_id,
                    from_warehouse_id,
                    to_warehouse_id,
                    quantity,
                })
            }
            _ => Err(errors.into_error()),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddProductRequest {
    pub product_name: Option<String>,
    pub category: Option<String>,
    pub warehouse_id: Option<String>,
    pub warehouse_location: Option<String>,
    pub current_stock: Option<i64>,
    pub min_threshold: Option<i64>,
    pub max_capacity: Option<i64>,
    pub expected_demand: Option<i64>,
}

/// Descriptive fields of a product to be created; the id is assigned by the store
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewProduct {
    pub product_name: String,
    pub category: String,
    pub warehouse_id: String,
    /// Resolved from the warehouse list when absent
    pub warehouse_location: Option<String>,
    pub current_stock: i64,
    pub min_threshold: i64,
    pub max_capacity: i64,
    pub expected_demand: i64,
}

impl AddProductRequest {
    pub fn validate(self) -> Result<NewProduct, InventoryError> {
        let mut errors = FieldErrors::default();
        let product_name = errors.text("productName", self.product_name);
        let warehouse_id = errors.text("warehouseId", self.warehouse_id);
        let current_stock = errors.non_negative("currentStock", self.current_stock);
        let min_threshold = errors.non_negative("minThreshold", Some(self.min_threshold.unwrap_or(0)));
        let max_capacity = errors.non_negative("maxCapacity", Some(self.max_capacity.unwrap_or(0)));
        let expected_demand = errors.non_negative("expectedDemand", Some(self.expected_demand.unwrap_or(0)));

        match (product_name, warehouse_id, current_stock, min_threshold, max_capacity, expected_demand) {
            (
                Some(product_name),
                Some(warehouse_id),
                Some(current_stock),
                Some(min_threshold),
                Some(max_capacity),
                Some(expected_demand),
            ) => Ok(NewProduct {
                product_name,
                category: self.category.unwrap_or_default(),
                warehouse_id,
                warehouse_location: self.warehouse_location.filter(|l| !l.trim().is_empty()),
                current_stock,
                min_threshold,
                max_capacity,
                expected_demand,
            }),
            _ => Err(errors.into_error()),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddWarehouseRequest {
    pub id: Option<String>,
    pub location: Option<String>,
}

impl AddWarehouseRequest {
    pub fn validate(self) -> Result<crate::types::Warehouse, InventoryError> {
        let mut errors = FieldErrors::default();
        let id = errors.text("id", self.id);
        let location = errors.text("location", self.location);

        match (id, location) {
            (Some(id), Some(location)) => Ok(crate::types::Warehouse { id, location }),
            _ => Err(errors.into_error()),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeleteProductRequest {
    pub product_id: Option<String>,
    pub warehouse_id: Option<String>,
}

impl DeleteProductRequest {
    /// Returns `(product_id, warehouse_id)`
    pub fn validate(self) -> Result<(String, String), InventoryError> {
        let mut errors = FieldErrors::default();
        let product_id = errors.text("productId", self.product_id);
        let warehouse_id = errors.text("warehouseId", self.warehouse_id);

        match (product_id, warehouse_id) {
            (Some(product_id), Some(warehouse_id)) => Ok((product_id, warehouse_id)),
            _ => Err(errors.into_error()),
        }
    }
}
