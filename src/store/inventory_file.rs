use serde::{Deserialize, Serialize};

use crate::types::Product;

/// Highest ordinal the id counter hands out or advances past
pub const MAX_PRODUCT_ORDINAL: u64 = 999_999_999_999;

/// On-disk shape of `inventory.json`.
///
/// Older deployments wrote a bare array of products; that form is still accepted
/// and the id counter is recovered from the highest `P` ordinal in it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", from = "InventoryRepr")]
pub struct InventoryFile {
    pub next_product_ordinal: u64,
    pub products: Vec<Product>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum InventoryRepr {
    Current {
        #[serde(rename = "nextProductOrdinal", default)]
        next_product_ordinal: u64,
        products: Vec<Product>,
    },
    Legacy(Vec<Product>),
}

impl From<InventoryRepr> for InventoryFile {
    fn from(repr: InventoryRepr) -> Self {
        let (next, products) = match repr {
            InventoryRepr::Current {
                next_product_ordinal,
                products,
            } => (next_product_ordinal, products),
            InventoryRepr::Legacy(products) => (0, products),
        };

        let mut file = InventoryFile {
            next_product_ordinal: next.max(1),
            products,
        };
        let ids: Vec<String> = file.products.iter().map(|p| p.product_id.clone()).collect();
        for id in &ids {
            // Out-of-range ids stay in the file but never drive the counter
            file.observe_product_id(id);
        }
        file
    }
}

impl Default for InventoryFile {
    fn default() -> Self {
        Self {
            next_product_ordinal: 1,
            products: Vec::new(),
        }
    }
}

impl InventoryFile {
    pub fn position(&self, product_id: &str, warehouse_id: &str) -> Option<usize> {
        self.products
            .iter()
            .position(|p| p.matches(product_id, warehouse_id))
    }

    pub fn find(&self, product_id: &str, warehouse_id: &str) -> Option<&Product> {
        self.products.iter().find(|p| p.matches(product_id, warehouse_id))
    }

    /// Hand out the next `P###` id. Never reuses an ordinal, even after deletes.
    /// `None` once the counter is past `MAX_PRODUCT_ORDINAL`.
    pub fn allocate_product_id(&mut self) -> Option<String> {
        let ordinal = self.next_product_ordinal;
        if ordinal > MAX_PRODUCT_ORDINAL {
            return None;
        }
        self.next_product_ordinal = ordinal + 1;
        Some(format!("P{:03}", ordinal))
    }

    /// Advance the counter past an externally supplied id such as `P042`.
    ///
    /// Returns `false` for a `P` id whose ordinal is above `MAX_PRODUCT_ORDINAL`;
    /// the counter is left alone. Ids not of the `P<digits>` form are accepted as-is.
    pub fn observe_product_id(&mut self, product_id: &str) -> bool {
        match product_ordinal(product_id) {
            Some(ordinal) if ordinal > MAX_PRODUCT_ORDINAL => false,
            Some(ordinal) => {
                if ordinal >= self.next_product_ordinal {
                    self.next_product_ordinal = ordinal + 1;
                }
                true
            }
            None => true,
        }
    }
}

fn product_ordinal(product_id: &str) -> Option<u64> {
    product_id.strip_prefix('P')?.parse().ok()
}
