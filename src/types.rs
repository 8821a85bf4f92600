//! Shared record types persisted in the JSON documents and returned by the API

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Largest stock quantity accepted for a single record
pub const MAX_STOCK: i64 = 1_000_000_000_000;

/// One day of stock history for a product
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryEntry {
    pub date: NaiveDate,
    pub stock: i64,
}

/// A product stocked in one warehouse. Identity is `(product_id, warehouse_id)`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub product_id: String,
    pub product_name: String,
    #[serde(default)]
    pub category: String,
    pub warehouse_id: String,
    #[serde(default)]
    pub warehouse_location: String,
    pub current_stock: i64,
    #[serde(default)]
    pub min_threshold: i64,
    #[serde(default)]
    pub max_capacity: i64,
    #[serde(default)]
    pub expected_demand: i64,
    /// Most recent last, one entry per date
    #[serde(default)]
    pub history: Vec<HistoryEntry>,
}

impl Product {
    pub fn matches(&self, product_id: &str, warehouse_id: &str) -> bool {
        self.product_id == product_id && self.warehouse_id == warehouse_id
    }

    pub fn is_low_stock(&self) -> bool {
        self.current_stock < self.min_threshold
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Warehouse {
    pub id: String,
    pub location: String,
}

/// Stored user credentials. `password_hash` is produced by `auth::password::hash_password`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub username: String,
    pub password_hash: String,
    pub role: String,
}

/// Append-only audit record. Action-specific fields are flattened into the entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActivityEntry {
    pub username: String,
    pub action: String,
    #[serde(flatten)]
    pub details: Map<String, Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<DateTime<Utc>>,
}

impl ActivityEntry {
    pub fn new(username: impl Into<String>, action: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            action: action.into(),
            details: Map::new(),
            timestamp: None,
        }
    }

    /// Attach an action-specific field
    pub fn with(mut self, key: &str, value: impl Into<Value>) -> Self {
        self.details.insert(key.to_string(), value.into());
        self
    }
}
