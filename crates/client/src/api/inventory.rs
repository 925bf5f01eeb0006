//! Inventory records.

use tillpoint_core::{InventoryItemId, ProductId};
use tracing::instrument;

use super::records::Listing;
use super::{ApiClient, ApiError, ApiRequest, Query};
use crate::types::{InventoryBulkEntry, InventoryItem, InventoryUpdate, Page};

/// Threshold used by [`ApiClient::low_stock_inventory`] when none is given.
pub const DEFAULT_LOW_STOCK_THRESHOLD: u32 = 10;

impl ApiClient {
    /// List inventory records, optionally filtered by raw query pairs.
    ///
    /// # Errors
    ///
    /// Returns `ApiError` on transport, status or decode failure.
    #[instrument(skip(self, query))]
    pub async fn list_inventory(&self, query: Query) -> Result<Page<InventoryItem>, ApiError> {
        let listing: Listing<InventoryItem> = self
            .send_json(ApiRequest::get("inventory/").query(query))
            .await?;
        Ok(listing.into_page())
    }

    /// Fetch an inventory record.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::Status` with 404 if the record does not exist.
    #[instrument(skip(self), fields(inventory_id = %id))]
    pub async fn get_inventory_item(&self, id: InventoryItemId) -> Result<InventoryItem, ApiError> {
        self.send_json(ApiRequest::get(format!("inventory/{id}/")))
            .await
    }

    /// Replace an inventory record.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::Status` with the server's field errors on rejection.
    #[instrument(skip(self, update), fields(inventory_id = %id))]
    pub async fn update_inventory_item(
        &self,
        id: InventoryItemId,
        update: &InventoryUpdate,
    ) -> Result<InventoryItem, ApiError> {
        let request = ApiRequest::put(format!("inventory/{id}/")).json(update)?;
        self.send_json(request).await
    }

    /// Update several inventory records at once.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::Status` if the server rejects the update.
    #[instrument(skip(self, entries), fields(count = entries.len()))]
    pub async fn bulk_update_inventory(&self, entries: &[InventoryBulkEntry]) -> Result<(), ApiError> {
        let request = ApiRequest::post("inventory/bulk-update/").json(entries)?;
        self.send_empty(request).await
    }

    /// Inventory records with stock at or below `threshold` (default 10).
    ///
    /// # Errors
    ///
    /// Returns `ApiError` on transport, status or decode failure.
    pub async fn low_stock_inventory(
        &self,
        threshold: Option<u32>,
    ) -> Result<Page<InventoryItem>, ApiError> {
        let threshold = threshold.unwrap_or(DEFAULT_LOW_STOCK_THRESHOLD);
        self.list_inventory(Query::new().push("stock_quantity__lte", threshold))
            .await
    }

    /// Inventory records for one product.
    ///
    /// # Errors
    ///
    /// Returns `ApiError` on transport, status or decode failure.
    pub async fn inventory_for_product(
        &self,
        product: ProductId,
    ) -> Result<Page<InventoryItem>, ApiError> {
        self.list_inventory(Query::new().push("product", product))
            .await
    }
}
