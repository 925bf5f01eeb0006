//! Wire-format records as the API sends and accepts them.
//!
//! Everything optional is optional here; defaults and validation are
//! applied when records are translated to display types (see
//! [`conversions`](super::conversions)). Decimal fields arrive either as
//! JSON strings (`"12.50"`) or numbers, so they are held as [`WireNumber`].

use serde::{Deserialize, Serialize};
use tillpoint_core::{
    CategoryId, CustomerId, CustomerStatus, OrderId, OrderItemId, OrderStatus, PaymentMethod,
    PaymentStatus, ProductId, ProductStatus,
};

use crate::types::Page;

/// A number as it appears on the wire: integer, float, or decimal string.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum WireNumber {
    Int(i64),
    Float(f64),
    Text(String),
}

impl std::fmt::Display for WireNumber {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Int(n) => write!(f, "{n}"),
            Self::Float(n) => write!(f, "{n}"),
            Self::Text(s) => f.write_str(s),
        }
    }
}

/// Paginated listing envelope.
#[derive(Debug, Clone, Deserialize)]
pub struct PageRecord<T> {
    pub results: Vec<T>,
    #[serde(default)]
    pub count: Option<u64>,
    #[serde(default)]
    pub num_pages: Option<u32>,
    #[serde(default)]
    pub current_page: Option<u32>,
    #[serde(default)]
    pub has_next: Option<bool>,
    #[serde(default)]
    pub has_previous: Option<bool>,
    #[serde(default)]
    pub next: Option<String>,
    #[serde(default)]
    pub previous: Option<String>,
}

/// A listing is either a page envelope or a bare array.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum Listing<T> {
    Page(PageRecord<T>),
    Bare(Vec<T>),
}

impl<T> Listing<T> {
    /// Normalise into a [`Page`].
    #[must_use]
    pub fn into_page(self) -> Page<T> {
        match self {
            Self::Bare(items) => Page::single(items),
            Self::Page(page) => {
                let count = page.count.unwrap_or(page.results.len() as u64);
                let current_page = page.current_page.unwrap_or(1);
                let has_next = page.has_next.unwrap_or(page.next.is_some());
                let has_previous = page.has_previous.unwrap_or(page.previous.is_some());
                Page {
                    items: page.results,
                    count,
                    current_page,
                    num_pages: page.num_pages.unwrap_or(current_page),
                    has_next,
                    has_previous,
                }
            }
        }
    }

    /// Items only, dropping pagination metadata.
    #[must_use]
    pub fn into_items(self) -> Vec<T> {
        match self {
            Self::Bare(items) => items,
            Self::Page(page) => page.results,
        }
    }
}

/// Category, standalone or nested in a product.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryRecord {
    pub id: CategoryId,
    #[serde(default)]
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// Product as the server represents it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductRecord {
    pub id: ProductId,
    #[serde(default)]
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sku: Option<String>,
    #[serde(default)]
    pub price: Option<WireNumber>,
    #[serde(default)]
    pub sale_price: Option<WireNumber>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub effective_price: Option<WireNumber>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_on_sale: Option<bool>,
    #[serde(default)]
    pub stock: Option<WireNumber>,
    #[serde(default)]
    pub min_stock: Option<WireNumber>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<CategoryRecord>,
    #[serde(default)]
    pub status: Option<ProductStatus>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stock_status: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<String>,
}

/// Product create/update body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProductPayload {
    pub name: String,
    pub description: String,
    pub price: String,
    pub sale_price: Option<String>,
    pub stock: u32,
    pub min_stock: u32,
    pub category_id: CategoryId,
    pub status: ProductStatus,
}

/// Customer as the server represents it.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct CustomerRecord {
    pub id: CustomerId,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub address: Option<String>,
    #[serde(default)]
    pub status: Option<CustomerStatus>,
    #[serde(default)]
    pub is_vip: Option<bool>,
    #[serde(default)]
    pub total_orders: Option<WireNumber>,
    #[serde(default)]
    pub total_spent: Option<WireNumber>,
    #[serde(default)]
    pub last_order_date: Option<String>,
    #[serde(default)]
    pub gender: Option<String>,
    #[serde(default)]
    pub date_of_birth: Option<String>,
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(default)]
    pub updated_at: Option<String>,
}

/// Customer create/update body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CustomerPayload {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub address: String,
    pub status: CustomerStatus,
    pub gender: String,
    pub date_of_birth: Option<String>,
}

/// Customer nested in an order.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct OrderCustomerRecord {
    #[serde(default)]
    pub id: Option<CustomerId>,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
}

/// An order's customer: a bare foreign key or a nested summary.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum CustomerRef {
    Id(CustomerId),
    Nested(OrderCustomerRecord),
}

/// Product nested in an order item.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ProductSummaryRecord {
    pub id: ProductId,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub sku: Option<String>,
}

/// An order item's product: a bare foreign key or a nested summary.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum ProductRef {
    Id(ProductId),
    Nested(ProductSummaryRecord),
}

/// Order line as the server represents it.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct OrderItemRecord {
    #[serde(default)]
    pub id: Option<OrderItemId>,
    #[serde(default)]
    pub product: Option<ProductRef>,
    #[serde(default)]
    pub product_name: Option<String>,
    #[serde(default, alias = "product_sku")]
    pub sku: Option<String>,
    #[serde(default)]
    pub quantity: Option<WireNumber>,
    #[serde(default, alias = "unit_price")]
    pub price: Option<WireNumber>,
    #[serde(default)]
    pub discount: Option<WireNumber>,
    #[serde(default, alias = "total")]
    pub line_total: Option<WireNumber>,
}

/// Order as the server represents it.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct OrderRecord {
    pub id: OrderId,
    #[serde(default)]
    pub order_number: Option<String>,
    #[serde(default)]
    pub customer: Option<CustomerRef>,
    #[serde(default)]
    pub customer_name: Option<String>,
    #[serde(default)]
    pub items: Vec<OrderItemRecord>,
    #[serde(default)]
    pub subtotal: Option<WireNumber>,
    #[serde(default)]
    pub tax_amount: Option<WireNumber>,
    #[serde(default)]
    pub discount_amount: Option<WireNumber>,
    #[serde(default)]
    pub total: Option<WireNumber>,
    #[serde(default)]
    pub status: Option<OrderStatus>,
    #[serde(default)]
    pub payment_method: Option<PaymentMethod>,
    #[serde(default)]
    pub payment_status: Option<PaymentStatus>,
    #[serde(default)]
    pub notes: Option<String>,
    #[serde(default)]
    pub served_by: Option<String>,
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(default)]
    pub updated_at: Option<String>,
}

/// Headline analytics.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct AnalyticsSummaryRecord {
    pub total_revenue: Option<WireNumber>,
    pub total_orders: Option<WireNumber>,
    pub average_order_value: Option<WireNumber>,
    pub products_sold: Option<WireNumber>,
    pub total_customers: Option<WireNumber>,
    pub returning_customers: Option<WireNumber>,
    pub new_customers: Option<WireNumber>,
    pub revenue_growth: Option<WireNumber>,
    pub order_growth: Option<WireNumber>,
    pub customer_growth: Option<WireNumber>,
}

/// `dashboard/sales-summary/` body.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct SalesSummaryRecord {
    pub date: Option<String>,
    pub total_orders: Option<WireNumber>,
    pub total_sales: Option<WireNumber>,
    pub total_items: Option<WireNumber>,
    pub pending_orders: Option<WireNumber>,
    pub cash_sales: Option<WireNumber>,
    pub card_sales: Option<WireNumber>,
}

/// Metrics block of the dashboard overview.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct PeriodMetricsRecord {
    pub orders_count: Option<WireNumber>,
    #[serde(alias = "total_revenue")]
    pub total_sales: Option<WireNumber>,
    pub avg_order_value: Option<WireNumber>,
    pub items_sold: Option<WireNumber>,
}

/// Recent-order row of the dashboard overview.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct RecentOrderRecord {
    pub id: WireNumber,
    #[serde(default)]
    pub order_number: Option<String>,
    #[serde(default)]
    pub customer_name: Option<String>,
    #[serde(default)]
    pub total: Option<WireNumber>,
    #[serde(default)]
    pub status: Option<OrderStatus>,
    #[serde(default)]
    pub payment_method: Option<PaymentMethod>,
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(default)]
    pub items_count: Option<WireNumber>,
}

/// Low-stock entry.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct StockAlertRecord {
    pub id: ProductId,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub stock: Option<WireNumber>,
    #[serde(default)]
    pub min_stock: Option<WireNumber>,
}

/// `dashboard/overview/` body.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct DashboardOverviewRecord {
    pub today_metrics: Option<PeriodMetricsRecord>,
    pub month_metrics: Option<PeriodMetricsRecord>,
    pub recent_orders: Vec<RecentOrderRecord>,
    pub inventory_alerts: Vec<StockAlertRecord>,
}

/// `dashboard/inventory-alerts/` body.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct InventoryAlertsRecord {
    pub low_stock_products: Vec<StockAlertRecord>,
    pub out_of_stock_products: Vec<StockAlertRecord>,
}

/// One bucket of a trend or report series.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct SalesPointRecord {
    #[serde(alias = "date", alias = "week", alias = "month")]
    pub period: Option<String>,
    #[serde(alias = "revenue", alias = "total_revenue")]
    pub total_sales: Option<WireNumber>,
    #[serde(alias = "orders", alias = "orders_count")]
    pub total_orders: Option<WireNumber>,
    #[serde(alias = "total_items")]
    pub items_sold: Option<WireNumber>,
}

/// Best-seller row.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct TopProductRecord {
    #[serde(alias = "product")]
    pub product_id: Option<ProductId>,
    #[serde(alias = "name", alias = "product__name")]
    pub product_name: Option<String>,
    #[serde(alias = "quantity_sold")]
    pub total_quantity: Option<WireNumber>,
    #[serde(alias = "revenue")]
    pub total_revenue: Option<WireNumber>,
}

/// Payment method breakdown row.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct PaymentMethodRecord {
    pub payment_method: Option<PaymentMethod>,
    #[serde(alias = "order_count")]
    pub count: Option<WireNumber>,
    #[serde(alias = "total_amount")]
    pub total: Option<WireNumber>,
}

/// `customer_stats/` body.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct CustomerStatsRecord {
    pub total_customers: Option<WireNumber>,
    pub new_customers: Option<WireNumber>,
    pub returning_customers: Option<WireNumber>,
    pub vip_customers: Option<WireNumber>,
}
