//! Product catalogue and categories.

use serde::Serialize;
use serde_json::Value;
use tillpoint_core::{ProductId, ProductStatus};
use tracing::{debug, instrument};

use super::client::MultipartField;
use super::conversions::{category_from_record, product_draft_to_payload, product_from_record};
use super::records::{CategoryRecord, Listing, ProductPayload, ProductRecord};
use super::{ApiClient, ApiError, ApiRequest, Query};
use crate::types::{Category, Page, Product, ProductDraft, ProductFilters, StockUpdate};

#[derive(Serialize)]
struct BulkStockRequest<'a> {
    updates: &'a [StockUpdate],
}

#[derive(Serialize)]
struct BulkStatusRequest<'a> {
    product_ids: &'a [ProductId],
    status: &'a ProductStatus,
}

impl ApiClient {
    /// List products matching the filters.
    ///
    /// # Errors
    ///
    /// Returns `ApiError` on transport, status or translation failure.
    #[instrument(skip(self, filters))]
    pub async fn list_products(&self, filters: &ProductFilters) -> Result<Page<Product>, ApiError> {
        let query = Query::new()
            .push_opt("search", filters.search.as_deref())
            .push_opt("category", filters.category)
            .push_opt("stock_status", filters.stock_status.map(|s| s.as_str()))
            .push_opt("status", filters.status.as_ref())
            .push_opt("min_price", filters.min_price)
            .push_opt("max_price", filters.max_price)
            .push("ordering", &filters.ordering)
            .push("page", filters.page.max(1));

        let listing: Listing<ProductRecord> = self
            .send_json(ApiRequest::get("products/").query(query))
            .await?;
        let page = listing.into_page().try_map(product_from_record)?;
        debug!(count = page.items.len(), total = page.count, "Fetched products");
        Ok(page)
    }

    /// Free-text product search (first page, default ordering).
    ///
    /// # Errors
    ///
    /// Returns `ApiError` on transport, status or translation failure.
    pub async fn search_products(&self, search: &str) -> Result<Page<Product>, ApiError> {
        self.list_products(&ProductFilters {
            search: Some(search.to_string()),
            ..ProductFilters::default()
        })
        .await
    }

    /// Fetch a product.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::Status` with 404 if the product does not exist.
    #[instrument(skip(self), fields(product_id = %id))]
    pub async fn get_product(&self, id: ProductId) -> Result<Product, ApiError> {
        let record: ProductRecord = self
            .send_json(ApiRequest::get(format!("products/{id}/")))
            .await?;
        Ok(product_from_record(record)?)
    }

    /// Create a product. Sent as multipart when the draft carries an image.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::Status` with the server's field errors on rejection.
    #[instrument(skip(self, draft), fields(name = %draft.name))]
    pub async fn create_product(&self, draft: &ProductDraft) -> Result<Product, ApiError> {
        let request = product_request(ApiRequest::post("products/"), draft)?;
        let record: ProductRecord = self.send_json(request).await?;
        Ok(product_from_record(record)?)
    }

    /// Replace a product. Sent as multipart when the draft carries an image.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::Status` with the server's field errors on rejection.
    #[instrument(skip(self, draft), fields(product_id = %id))]
    pub async fn update_product(
        &self,
        id: ProductId,
        draft: &ProductDraft,
    ) -> Result<Product, ApiError> {
        let request = product_request(ApiRequest::put(format!("products/{id}/")), draft)?;
        let record: ProductRecord = self.send_json(request).await?;
        Ok(product_from_record(record)?)
    }

    /// Partially update a product with raw field values.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::Status` with the server's field errors on rejection.
    #[instrument(skip(self, changes), fields(product_id = %id))]
    pub async fn patch_product(&self, id: ProductId, changes: &Value) -> Result<Product, ApiError> {
        let request = ApiRequest::patch(format!("products/{id}/")).json(changes)?;
        let record: ProductRecord = self.send_json(request).await?;
        Ok(product_from_record(record)?)
    }

    /// Delete a product.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::Status` with 404 if the product does not exist.
    #[instrument(skip(self), fields(product_id = %id))]
    pub async fn delete_product(&self, id: ProductId) -> Result<(), ApiError> {
        self.send_empty(ApiRequest::delete(format!("products/{id}/")))
            .await
    }

    /// Products at or below their reorder level.
    ///
    /// # Errors
    ///
    /// Returns `ApiError` on transport, status or translation failure.
    pub async fn low_stock_products(&self) -> Result<Vec<Product>, ApiError> {
        self.product_list("products/low_stock/").await
    }

    /// Products with no stock.
    ///
    /// # Errors
    ///
    /// Returns `ApiError` on transport, status or translation failure.
    pub async fn out_of_stock_products(&self) -> Result<Vec<Product>, ApiError> {
        self.product_list("products/out_of_stock/").await
    }

    /// Set stock levels for several products at once.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::Status` if the server rejects any update.
    #[instrument(skip(self, updates), fields(count = updates.len()))]
    pub async fn bulk_update_stock(&self, updates: &[StockUpdate]) -> Result<(), ApiError> {
        let request =
            ApiRequest::post("products/bulk_stock_update/").json(&BulkStockRequest { updates })?;
        self.send_empty(request).await
    }

    /// Set the status of several products at once.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::Status` if the server rejects the update.
    #[instrument(skip(self, product_ids), fields(count = product_ids.len(), status = %status))]
    pub async fn bulk_update_status(
        &self,
        product_ids: &[ProductId],
        status: &ProductStatus,
    ) -> Result<(), ApiError> {
        let request = ApiRequest::post("products/bulk_status_update/")
            .json(&BulkStatusRequest {
                product_ids,
                status,
            })?;
        self.send_empty(request).await
    }

    /// All product categories.
    ///
    /// # Errors
    ///
    /// Returns `ApiError` on transport or status failure.
    pub async fn categories(&self) -> Result<Vec<Category>, ApiError> {
        let listing: Listing<CategoryRecord> = self
            .send_json(ApiRequest::get("products/categories/"))
            .await?;
        Ok(listing
            .into_items()
            .into_iter()
            .map(category_from_record)
            .collect())
    }

    async fn product_list(&self, path: &str) -> Result<Vec<Product>, ApiError> {
        let listing: Listing<ProductRecord> = self.send_json(ApiRequest::get(path)).await?;
        Ok(listing
            .into_items()
            .into_iter()
            .map(product_from_record)
            .collect::<Result<_, _>>()?)
    }
}

/// Attach a draft to a request as JSON, or as multipart when it has an image.
fn product_request(request: ApiRequest, draft: &ProductDraft) -> Result<ApiRequest, ApiError> {
    let payload = product_draft_to_payload(draft);
    match &draft.image {
        None => request.json(&payload),
        Some(image) => {
            let mut fields = payload_fields(&payload);
            fields.push(MultipartField::File {
                name: "image".to_string(),
                file_name: image.file_name.clone(),
                content_type: image.content_type.clone(),
                bytes: image.bytes.clone(),
            });
            Ok(request.multipart(fields))
        }
    }
}

fn payload_fields(payload: &ProductPayload) -> Vec<MultipartField> {
    let text = |name: &str, value: String| MultipartField::Text {
        name: name.to_string(),
        value,
    };

    let mut fields = vec![
        text("name", payload.name.clone()),
        text("description", payload.description.clone()),
        text("price", payload.price.clone()),
    ];
    if let Some(sale_price) = &payload.sale_price {
        fields.push(text("sale_price", sale_price.clone()));
    }
    fields.extend([
        text("stock", payload.stock.to_string()),
        text("min_stock", payload.min_stock.to_string()),
        text("category_id", payload.category_id.to_string()),
        text("status", payload.status.to_string()),
    ]);
    fields
}
