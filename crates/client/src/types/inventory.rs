//! Inventory records.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tillpoint_core::{InventoryItemId, ProductId};

/// Supplier attached to an inventory record.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Supplier {
    pub id: i64,
    pub name: String,
    #[serde(default)]
    pub contact: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub phone: String,
}

/// Stock record for one product.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct InventoryItem {
    pub id: InventoryItemId,
    pub product: ProductId,
    #[serde(default)]
    pub stock: u32,
    #[serde(default)]
    pub min_stock: u32,
    #[serde(default)]
    pub supplier: Option<Supplier>,
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
}

/// Inventory update body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct InventoryUpdate {
    pub product: ProductId,
    pub stock: u32,
    pub min_stock: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub supplier_id: Option<i64>,
}

/// Entry of an inventory bulk update.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct InventoryBulkEntry {
    pub id: InventoryItemId,
    pub stock: u32,
}
