//! Product display types and form drafts.

use chrono::{DateTime, Utc};
use tillpoint_core::{CategoryId, Money, ProductId, ProductStatus, StockStatus};

/// Product as shown to the operator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Product {
    pub id: ProductId,
    pub name: String,
    pub description: String,
    /// Absolute image URL, when the product has one.
    pub image: Option<String>,
    pub sku: Option<String>,
    pub price: Money,
    pub sale_price: Option<Money>,
    /// Price a sale is rung up at: the sale price when on sale.
    pub effective_price: Money,
    pub is_on_sale: bool,
    pub stock: u32,
    pub min_stock: u32,
    pub category_id: Option<CategoryId>,
    pub category_name: String,
    pub status: ProductStatus,
    pub stock_status: StockStatus,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
}

impl Product {
    /// Whether the product can be added to a cart at all.
    #[must_use]
    pub fn is_sellable(&self) -> bool {
        self.status == ProductStatus::Active && self.stock > 0
    }
}

/// Product category.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Category {
    pub id: CategoryId,
    pub name: String,
    pub description: String,
}

/// An image file attached to a product create/update.
#[derive(Clone, PartialEq, Eq)]
pub struct ImageUpload {
    pub file_name: String,
    pub content_type: String,
    pub bytes: Vec<u8>,
}

impl std::fmt::Debug for ImageUpload {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ImageUpload")
            .field("file_name", &self.file_name)
            .field("content_type", &self.content_type)
            .field("len", &self.bytes.len())
            .finish()
    }
}

/// Product create/update form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProductDraft {
    pub name: String,
    pub description: Option<String>,
    pub price: Money,
    pub sale_price: Option<Money>,
    pub stock: u32,
    pub min_stock: Option<u32>,
    pub category_id: CategoryId,
    pub status: Option<ProductStatus>,
    /// When present the request is sent as `multipart/form-data`.
    pub image: Option<ImageUpload>,
}

/// Filters for the product listing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProductFilters {
    pub search: Option<String>,
    pub category: Option<CategoryId>,
    pub stock_status: Option<StockStatus>,
    pub status: Option<ProductStatus>,
    pub min_price: Option<Money>,
    pub max_price: Option<Money>,
    pub ordering: String,
    pub page: u32,
}

impl Default for ProductFilters {
    fn default() -> Self {
        Self {
            search: None,
            category: None,
            stock_status: None,
            status: None,
            min_price: None,
            max_price: None,
            ordering: "-created_at".to_string(),
            page: 1,
        }
    }
}

/// One entry of a bulk stock update.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
pub struct StockUpdate {
    pub product_id: ProductId,
    pub stock: u32,
}
