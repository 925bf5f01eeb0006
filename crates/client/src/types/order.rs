//! Order display types and the outbound order-creation request.

use chrono::{DateTime, NaiveDate, Utc};
use serde::Serialize;
use tillpoint_core::{
    CustomerId, Money, OrderId, OrderItemId, OrderStatus, PaymentMethod, PaymentStatus, ProductId,
};

/// Customer summary embedded in an order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderCustomer {
    pub id: Option<CustomerId>,
    pub name: String,
    pub email: String,
    pub phone: String,
}

/// Order line as shown to the operator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderItem {
    pub id: Option<OrderItemId>,
    pub product_id: Option<ProductId>,
    pub product_name: String,
    /// Product SKU, `N/A` when the server has none.
    pub sku: String,
    pub quantity: u32,
    pub price: Money,
    pub discount: Money,
    pub line_total: Money,
}

/// Order as shown to the operator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Order {
    pub id: OrderId,
    pub order_number: String,
    pub customer: Option<OrderCustomer>,
    /// Walk-in name recorded at the till; may be set without a customer record.
    pub customer_name: String,
    pub items: Vec<OrderItem>,
    pub subtotal: Money,
    pub tax_amount: Money,
    pub discount_amount: Money,
    pub total: Money,
    pub status: OrderStatus,
    pub payment_method: PaymentMethod,
    pub payment_status: PaymentStatus,
    pub notes: String,
    pub served_by: String,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
}

impl Order {
    /// Status label for display (`Pending`, `Completed`, ...).
    #[must_use]
    pub fn status_label(&self) -> &str {
        self.status.label()
    }

    /// Payment method label for display (`Cash`, `Credit/Debit Card`, ...).
    #[must_use]
    pub fn payment_method_label(&self) -> &str {
        self.payment_method.label()
    }

    /// Total number of units across all lines.
    #[must_use]
    pub fn item_count(&self) -> u32 {
        self.items.iter().map(|item| item.quantity).sum()
    }
}

/// Line of an order-creation request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NewOrderItem {
    pub product_id: ProductId,
    pub quantity: u32,
    pub price: Money,
}

/// Order-creation request body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NewOrder {
    pub customer: Option<CustomerId>,
    pub customer_name: String,
    pub payment_method: PaymentMethod,
    pub tax_amount: Money,
    pub discount_amount: Money,
    pub notes: String,
    pub items: Vec<NewOrderItem>,
    pub status: OrderStatus,
    pub payment_status: PaymentStatus,
    pub served_by: String,
}

/// Filters for the order listing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderFilters {
    pub search: Option<String>,
    pub status: Option<OrderStatus>,
    pub payment_status: Option<PaymentStatus>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub customer: Option<CustomerId>,
    pub ordering: String,
    pub page: u32,
}

impl Default for OrderFilters {
    fn default() -> Self {
        Self {
            search: None,
            status: None,
            payment_status: None,
            start_date: None,
            end_date: None,
            customer: None,
            ordering: "-created_at".to_string(),
            page: 1,
        }
    }
}
