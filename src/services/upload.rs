use chrono::NaiveDate;
use serde::Deserialize;

use crate::types::{Product, MAX_STOCK};

use super::history::HistoryTracker;
use super::inventory::InventoryError;

/// One row of a bulk product upload
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ProductRow {
    product_id: String,
    product_name: String,
    #[serde(default)]
    category: String,
    warehouse_id: String,
    #[serde(default)]
    warehouse_location: String,
    current_stock: i64,
    min_threshold: i64,
    max_capacity: i64,
    expected_demand: i64,
}

/// Parse a CSV upload into new product records seeded with today's stock.
///
/// Any bad row rejects the whole file; the error names the data row (1-based).
pub fn parse_products_csv(
    data: &[u8],
    today: NaiveDate,
    history: &HistoryTracker,
) -> Result<Vec<Product>, InventoryError> {
    let mut reader = csv::ReaderBuilder::new().trim(csv::Trim::All).from_reader(data);

    let mut products = Vec::new();
    for (idx, row) in reader.deserialize::<ProductRow>().enumerate() {
        let row = row.map_err(|e| row_error(idx + 1, e.to_string()))?;
        if row.product_id.is_empty() || row.warehouse_id.is_empty() {
            return Err(row_error(idx + 1, "productId and warehouseId are required".to_string()));
        }
        if row.current_stock < 0 {
            return Err(row_error(idx + 1, "currentStock must not be negative".to_string()));
        }
        if row.current_stock > MAX_STOCK {
            return Err(row_error(idx + 1, "currentStock exceeds the maximum stock quantity".to_string()));
        }

        products.push(Product {
            history: history.seed(today, row.current_stock),
            product_id: row.product_id,
            product_name: row.product_name,
            category: row.category,
            warehouse_id: row.warehouse_id,
            warehouse_location: row.warehouse_location,
            current_stock: row.current_stock,
            min_threshold: row.min_threshold,
            max_capacity: row.max_capacity,
            expected_demand: row.expected_demand,
        });
    }

    Ok(products)
}

fn row_error(row: usize, reason: String) -> InventoryError {
    let mut field_errors = std::collections::HashMap::new();
    field_errors.insert(format!("row {}", row), reason);
    InventoryError::Validation {
        message: format!("Invalid product data in row {}", row),
        field_errors,
    }
}
