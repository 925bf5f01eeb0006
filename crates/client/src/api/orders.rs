//! Orders and order items.

use serde::Serialize;
use serde_json::Value;
use tillpoint_core::{Money, OrderId, OrderItemId, ProductId};
use tracing::{info, instrument};

use super::conversions::{order_from_record, order_item_from_record};
use super::records::{Listing, OrderItemRecord, OrderRecord};
use super::{ApiClient, ApiError, ApiRequest, Query};
use crate::types::{NewOrder, Order, OrderFilters, OrderItem, Page};

/// Body for adding or replacing a single order item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OrderItemDraft {
    pub order: OrderId,
    pub product: ProductId,
    pub quantity: u32,
    pub price: Money,
}

impl ApiClient {
    /// List orders matching the filters.
    ///
    /// # Errors
    ///
    /// Returns `ApiError` on transport, status or translation failure.
    #[instrument(skip(self, filters))]
    pub async fn list_orders(&self, filters: &OrderFilters) -> Result<Page<Order>, ApiError> {
        let query = Query::new()
            .push_opt("search", filters.search.as_deref())
            .push_opt("status", filters.status.as_ref())
            .push_opt("payment_status", filters.payment_status.as_ref())
            .push_opt("start_date", filters.start_date)
            .push_opt("end_date", filters.end_date)
            .push_opt("customer", filters.customer)
            .push("ordering", &filters.ordering)
            .push("page", filters.page.max(1));

        let listing: Listing<OrderRecord> = self
            .send_json(ApiRequest::get("orders/").query(query))
            .await?;
        Ok(listing.into_page().try_map(order_from_record)?)
    }

    /// Fetch an order with its items.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::Status` with 404 if the order does not exist.
    #[instrument(skip(self), fields(order_id = %id))]
    pub async fn get_order(&self, id: OrderId) -> Result<Order, ApiError> {
        let record: OrderRecord = self
            .send_json(ApiRequest::get(format!("orders/{id}/")))
            .await?;
        Ok(order_from_record(record)?)
    }

    /// Create an order.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::Status` with the server's message on rejection
    /// (for example insufficient stock), `ApiError::Translate` if the order
    /// was created but the response holds a malformed value.
    pub async fn create_order(&self, order: &NewOrder) -> Result<Order, ApiError> {
        let record = self.create_order_record(order).await?;
        Ok(order_from_record(record)?)
    }

    /// Create an order and return the server's record untranslated.
    ///
    /// A successful return means the server stored the order, whatever the
    /// record's field values look like.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::Status` with the server's message on rejection.
    #[instrument(skip(self, order), fields(items = order.items.len()))]
    pub async fn create_order_record(&self, order: &NewOrder) -> Result<OrderRecord, ApiError> {
        let request = ApiRequest::post("orders/").json(order)?;
        let record: OrderRecord = self.send_json(request).await?;
        info!(order_id = %record.id, "Order created");
        Ok(record)
    }

    /// Replace an order with raw field values.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::Status` with the server's field errors on rejection.
    #[instrument(skip(self, changes), fields(order_id = %id))]
    pub async fn update_order(&self, id: OrderId, changes: &Value) -> Result<Order, ApiError> {
        let request = ApiRequest::put(format!("orders/{id}/")).json(changes)?;
        let record: OrderRecord = self.send_json(request).await?;
        Ok(order_from_record(record)?)
    }

    /// Delete an order.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::Status` with 404 if the order does not exist.
    #[instrument(skip(self), fields(order_id = %id))]
    pub async fn delete_order(&self, id: OrderId) -> Result<(), ApiError> {
        self.send_empty(ApiRequest::delete(format!("orders/{id}/")))
            .await
    }

    /// Cancel an order.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::Status` if the order cannot be cancelled.
    #[instrument(skip(self), fields(order_id = %id))]
    pub async fn cancel_order(&self, id: OrderId) -> Result<(), ApiError> {
        self.send_empty(ApiRequest::post(format!("orders/{id}/cancel/")))
            .await
    }

    /// Mark an order completed.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::Status` if the order cannot be completed.
    #[instrument(skip(self), fields(order_id = %id))]
    pub async fn complete_order(&self, id: OrderId) -> Result<(), ApiError> {
        self.send_empty(ApiRequest::post(format!("orders/{id}/complete/")))
            .await
    }

    /// Items of an order.
    ///
    /// # Errors
    ///
    /// Returns `ApiError` on transport, status or translation failure.
    #[instrument(skip(self), fields(order_id = %id))]
    pub async fn order_items(&self, id: OrderId) -> Result<Vec<OrderItem>, ApiError> {
        let listing: Listing<OrderItemRecord> = self
            .send_json(ApiRequest::get(format!("orders/{id}/items/")))
            .await?;
        Ok(listing
            .into_items()
            .into_iter()
            .enumerate()
            .map(|(index, item)| order_item_from_record(index, item))
            .collect::<Result<_, _>>()?)
    }

    /// Add an item to an existing order.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::Status` with the server's field errors on rejection.
    #[instrument(skip(self, item), fields(order_id = %item.order))]
    pub async fn add_order_item(&self, item: &OrderItemDraft) -> Result<OrderItem, ApiError> {
        let request = ApiRequest::post("order-items/").json(item)?;
        let record: OrderItemRecord = self.send_json(request).await?;
        Ok(order_item_from_record(0, record)?)
    }

    /// Replace an order item.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::Status` with the server's field errors on rejection.
    #[instrument(skip(self, item), fields(order_item_id = %id))]
    pub async fn update_order_item(
        &self,
        id: OrderItemId,
        item: &OrderItemDraft,
    ) -> Result<OrderItem, ApiError> {
        let request = ApiRequest::put(format!("order-items/{id}/")).json(item)?;
        let record: OrderItemRecord = self.send_json(request).await?;
        Ok(order_item_from_record(0, record)?)
    }

    /// Remove an item from its order.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::Status` with 404 if the item does not exist.
    #[instrument(skip(self), fields(order_item_id = %id))]
    pub async fn remove_order_item(&self, id: OrderItemId) -> Result<(), ApiError> {
        self.send_empty(ApiRequest::delete(format!("order-items/{id}/")))
            .await
    }
}
