//! Dashboard and analytics display types.

use chrono::{DateTime, NaiveDate, Utc};
use tillpoint_core::{Money, OrderStatus, PaymentMethod, ProductId};

/// Headline analytics for a reporting period.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct AnalyticsSummary {
    pub total_revenue: Money,
    pub total_orders: u64,
    pub average_order_value: Money,
    pub products_sold: u64,
    pub total_customers: u64,
    pub returning_customers: u64,
    pub new_customers: u64,
    /// Percentage change against the previous period.
    pub revenue_growth: f64,
    pub order_growth: f64,
    pub customer_growth: f64,
}

/// Sales figures for a single day.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SalesSummary {
    pub date: Option<NaiveDate>,
    pub total_orders: u64,
    pub total_sales: Money,
    pub total_items: u64,
    pub pending_orders: u64,
    pub cash_sales: Money,
    pub card_sales: Money,
}

/// Order counts and takings over a window.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct PeriodMetrics {
    pub orders_count: u64,
    pub total_sales: Money,
    pub avg_order_value: Money,
    pub items_sold: u64,
}

/// Row of the dashboard's recent-orders table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecentOrder {
    pub id: String,
    pub order_number: String,
    pub customer_name: String,
    pub total: Money,
    pub status: OrderStatus,
    pub payment_method: PaymentMethod,
    pub created_at: Option<DateTime<Utc>>,
    pub items_count: u32,
}

/// A product at or below its reorder level.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StockAlert {
    pub id: ProductId,
    pub name: String,
    pub stock: u32,
    pub min_stock: u32,
}

/// Dashboard landing page.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct DashboardOverview {
    pub today: PeriodMetrics,
    pub month: PeriodMetrics,
    pub recent_orders: Vec<RecentOrder>,
    pub inventory_alerts: Vec<StockAlert>,
}

/// Low and out-of-stock products.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct InventoryAlerts {
    pub low_stock: Vec<StockAlert>,
    pub out_of_stock: Vec<StockAlert>,
}

/// One bucket of a sales trend or report series.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SalesPoint {
    /// Bucket label as sent by the server (a date, week or month).
    pub period: String,
    pub total_sales: Money,
    pub total_orders: u64,
    pub items_sold: u64,
}

/// Best-selling product over a period.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TopProduct {
    pub product_id: Option<ProductId>,
    pub product_name: String,
    pub total_quantity: u64,
    pub total_revenue: Money,
}

/// Takings per payment method.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PaymentMethodStat {
    pub payment_method: PaymentMethod,
    pub count: u64,
    pub total: Money,
}

impl PaymentMethodStat {
    /// Display label for the payment method.
    #[must_use]
    pub fn label(&self) -> &str {
        self.payment_method.label()
    }
}

/// Customer acquisition figures.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct CustomerStats {
    pub total_customers: u64,
    pub new_customers: u64,
    pub returning_customers: u64,
    pub vip_customers: u64,
}
