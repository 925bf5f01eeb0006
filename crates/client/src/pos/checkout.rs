//! Turning a cart into a submitted order.
//!
//! [`Checkout`] tracks a single submission through
//! `Idle -> Submitting -> Success | Failed`. The cart is cleared only when
//! the server has accepted the order; on failure it is left exactly as it
//! was so the operator can retry. An accepted order whose response cannot be
//! translated still counts as a completed sale.

use std::future::Future;

use thiserror::Error;
use tillpoint_core::{CustomerId, Money, OrderId, OrderStatus, PaymentMethod, PaymentStatus};
use tracing::{info, instrument, warn};

use super::cart::{Cart, CartLine};
use crate::api::conversions::order_from_record;
use crate::api::records::OrderRecord;
use crate::api::{ApiClient, ApiError, ValidationError};
use crate::types::{NewOrder, NewOrderItem, Order};

/// Operator name recorded when the sale does not name one.
pub const DEFAULT_SERVED_BY: &str = "POS System";

/// Where a submission is.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum CheckoutState {
    #[default]
    Idle,
    Submitting,
    Success(OrderId),
    /// Error message from the failed attempt.
    Failed(String),
}

/// Errors that can occur when submitting a cart.
#[derive(Debug, Error)]
pub enum CheckoutError {
    #[error("cart is empty")]
    EmptyCart,

    #[error("a submission is already in progress")]
    InProgress,

    /// A line is outside `1..=stock`.
    #[error(transparent)]
    InvalidLine(#[from] ValidationError),

    #[error(transparent)]
    Api(#[from] ApiError),

    /// The server recorded the sale but its response could not be read.
    /// The cart has been cleared; do not resubmit.
    #[error("order {order_id} was recorded but its details could not be read: {source}")]
    ReceiptUnreadable {
        order_id: OrderId,
        #[source]
        source: ValidationError,
    },
}

/// Payment and customer details entered at the till.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SaleDetails {
    pub customer: Option<CustomerId>,
    pub customer_name: String,
    pub payment_method: PaymentMethod,
    pub tax_amount: Money,
    pub discount_amount: Money,
    pub notes: String,
    /// Defaults to [`DEFAULT_SERVED_BY`].
    pub served_by: Option<String>,
}

impl SaleDetails {
    /// A walk-in sale with no tax or discount.
    #[must_use]
    pub fn new(payment_method: PaymentMethod) -> Self {
        Self {
            customer: None,
            customer_name: String::new(),
            payment_method,
            tax_amount: Money::ZERO,
            discount_amount: Money::ZERO,
            notes: String::new(),
            served_by: None,
        }
    }
}

/// Something that can create orders.
pub trait OrderGateway {
    /// Create an order and return the server's record of it.
    ///
    /// `Ok` means the order was stored, even if the record holds values
    /// that fail translation.
    fn submit_order(
        &self,
        order: &NewOrder,
    ) -> impl Future<Output = Result<OrderRecord, ApiError>> + Send;
}

impl OrderGateway for ApiClient {
    fn submit_order(
        &self,
        order: &NewOrder,
    ) -> impl Future<Output = Result<OrderRecord, ApiError>> + Send {
        self.create_order_record(order)
    }
}

/// Submission workflow for one till.
#[derive(Debug, Default)]
pub struct Checkout {
    state: CheckoutState,
}

impl Checkout {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            state: CheckoutState::Idle,
        }
    }

    #[must_use]
    pub const fn state(&self) -> &CheckoutState {
        &self.state
    }

    /// Return to `Idle` after a finished submission.
    pub fn reset(&mut self) {
        self.state = CheckoutState::Idle;
    }

    /// Submit the cart as a completed, paid order.
    ///
    /// On success the cart is cleared and the created order is returned.
    /// On failure the cart is untouched and the state records the message.
    ///
    /// # Errors
    ///
    /// - `EmptyCart` or `InvalidLine` before any request is made; the state
    ///   is left unchanged.
    /// - `InProgress` if the state is still `Submitting`.
    /// - `Api` when the gateway rejects the order.
    /// - `ReceiptUnreadable` when the order was stored but the response
    ///   fails translation; the state is `Success` and the cart is cleared.
    #[instrument(skip_all, fields(lines = cart.len(), total = %cart.total()))]
    pub async fn submit<G: OrderGateway>(
        &mut self,
        cart: &mut Cart,
        details: &SaleDetails,
        gateway: &G,
    ) -> Result<Order, CheckoutError> {
        if self.state == CheckoutState::Submitting {
            return Err(CheckoutError::InProgress);
        }
        if cart.is_empty() {
            return Err(CheckoutError::EmptyCart);
        }
        let order = build_order(cart, details)?;

        self.state = CheckoutState::Submitting;
        match gateway.submit_order(&order).await {
            Ok(record) => {
                let order_id = record.id;
                info!(order_id = %order_id, "Sale completed");
                self.state = CheckoutState::Success(order_id);
                cart.clear();
                order_from_record(record).map_err(|source| {
                    warn!(order_id = %order_id, error = %source, "Unreadable order response");
                    CheckoutError::ReceiptUnreadable { order_id, source }
                })
            }
            Err(e) => {
                warn!(error = %e, "Sale submission failed");
                self.state = CheckoutState::Failed(e.to_string());
                Err(e.into())
            }
        }
    }
}

/// Build the order-creation request for a cart.
///
/// # Errors
///
/// Returns a `ValidationError` naming the first line whose quantity is
/// outside `1..=stock`.
pub fn build_order(cart: &Cart, details: &SaleDetails) -> Result<NewOrder, ValidationError> {
    let items = cart
        .lines()
        .iter()
        .enumerate()
        .map(|(index, line)| order_item(index, line))
        .collect::<Result<Vec<_>, _>>()?;

    Ok(NewOrder {
        customer: details.customer,
        customer_name: details.customer_name.clone(),
        payment_method: details.payment_method.clone(),
        tax_amount: details.tax_amount,
        discount_amount: details.discount_amount,
        notes: details.notes.clone(),
        items,
        status: OrderStatus::Completed,
        payment_status: PaymentStatus::Paid,
        served_by: details
            .served_by
            .clone()
            .filter(|name| !name.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_SERVED_BY.to_string()),
    })
}

fn order_item(index: usize, line: &CartLine) -> Result<NewOrderItem, ValidationError> {
    if !line.is_valid() {
        return Err(ValidationError {
            field: format!("items[{index}].quantity"),
            value: format!("{} (stock {})", line.quantity, line.stock),
        });
    }
    Ok(NewOrderItem {
        product_id: line.product_id,
        quantity: line.quantity,
        price: line.unit_price,
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::sync::Mutex;

    use reqwest::StatusCode;
    use serde_json::json;
    use tillpoint_core::{ProductId, ProductStatus, StockStatus};

    use super::*;
    use crate::types::Product;

    #[derive(Default)]
    struct FakeGateway {
        reject: bool,
        garbled_total: bool,
        received: Mutex<Vec<NewOrder>>,
    }

    impl OrderGateway for FakeGateway {
        async fn submit_order(&self, order: &NewOrder) -> Result<OrderRecord, ApiError> {
            self.received.lock().unwrap().push(order.clone());
            if self.reject {
                return Err(ApiError::Status {
                    status: StatusCode::BAD_REQUEST,
                    message: "Insufficient stock".to_string(),
                });
            }
            let total = if self.garbled_total { "n/a" } else { "25.00" };
            Ok(serde_json::from_value(json!({
                "id": 101,
                "order_number": "ORD-101",
                "customer_name": order.customer_name,
                "items": [],
                "total": total,
                "status": order.status,
                "payment_method": order.payment_method,
                "payment_status": order.payment_status,
                "served_by": order.served_by,
            }))
            .unwrap())
        }
    }

    fn product(stock: u32) -> Product {
        let price = Money::from_minor(1250);
        Product {
            id: ProductId::random(),
            name: "Cocoa butter".to_string(),
            description: String::new(),
            image: None,
            sku: Some("CB-01".to_string()),
            price,
            sale_price: None,
            effective_price: price,
            is_on_sale: false,
            stock,
            min_stock: 2,
            category_id: None,
            category_name: String::new(),
            status: ProductStatus::Active,
            stock_status: StockStatus::classify(stock, 2),
            created_at: None,
            updated_at: None,
        }
    }

    fn filled_cart() -> Cart {
        let mut cart = Cart::new();
        cart.add_item(&product(5), 2).unwrap();
        cart
    }

    #[tokio::test]
    async fn test_success_clears_cart() {
        let gateway = FakeGateway::default();
        let mut checkout = Checkout::new();
        let mut cart = filled_cart();

        let order = checkout
            .submit(&mut cart, &SaleDetails::new(PaymentMethod::Cash), &gateway)
            .await
            .unwrap();

        assert_eq!(order.id, OrderId::new(101));
        assert_eq!(checkout.state(), &CheckoutState::Success(OrderId::new(101)));
        assert!(cart.is_empty());

        let sent = gateway.received.lock().unwrap();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].status, OrderStatus::Completed);
        assert_eq!(sent[0].payment_status, PaymentStatus::Paid);
        assert_eq!(sent[0].served_by, DEFAULT_SERVED_BY);
        assert_eq!(sent[0].items[0].quantity, 2);
        assert_eq!(sent[0].items[0].price, Money::from_minor(1250));
    }

    #[tokio::test]
    async fn test_failure_preserves_cart() {
        let gateway = FakeGateway {
            reject: true,
            ..FakeGateway::default()
        };
        let mut checkout = Checkout::new();
        let mut cart = filled_cart();
        let before = cart.clone();

        let err = checkout
            .submit(&mut cart, &SaleDetails::new(PaymentMethod::Card), &gateway)
            .await
            .unwrap_err();

        assert!(matches!(err, CheckoutError::Api(ApiError::Status { .. })));
        assert_eq!(cart, before);
        match checkout.state() {
            CheckoutState::Failed(message) => assert!(message.contains("Insufficient stock")),
            other => panic!("unexpected state {other:?}"),
        }

        checkout.reset();
        assert_eq!(checkout.state(), &CheckoutState::Idle);
    }

    #[tokio::test]
    async fn test_unreadable_response_still_completes_sale() {
        let gateway = FakeGateway {
            garbled_total: true,
            ..FakeGateway::default()
        };
        let mut checkout = Checkout::new();
        let mut cart = filled_cart();

        let err = checkout
            .submit(&mut cart, &SaleDetails::new(PaymentMethod::Cash), &gateway)
            .await
            .unwrap_err();

        match err {
            CheckoutError::ReceiptUnreadable { order_id, source } => {
                assert_eq!(order_id, OrderId::new(101));
                assert_eq!(source.field, "total");
            }
            other => panic!("unexpected error {other:?}"),
        }
        assert_eq!(checkout.state(), &CheckoutState::Success(OrderId::new(101)));
        assert!(cart.is_empty());

        // Nothing left to resubmit
        let again = checkout
            .submit(&mut cart, &SaleDetails::new(PaymentMethod::Cash), &gateway)
            .await
            .unwrap_err();
        assert!(matches!(again, CheckoutError::EmptyCart));
        assert_eq!(gateway.received.lock().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_empty_cart_makes_no_request() {
        let gateway = FakeGateway::default();
        let mut checkout = Checkout::new();
        let mut cart = Cart::new();

        let err = checkout
            .submit(&mut cart, &SaleDetails::new(PaymentMethod::Cash), &gateway)
            .await
            .unwrap_err();

        assert!(matches!(err, CheckoutError::EmptyCart));
        assert_eq!(checkout.state(), &CheckoutState::Idle);
        assert!(gateway.received.lock().unwrap().is_empty());
    }

    #[test]
    fn test_build_order_uses_operator_name() {
        let mut details = SaleDetails::new(PaymentMethod::Transfer);
        details.served_by = Some("Ama".to_string());
        details.customer = Some(CustomerId::new(7));
        let order = build_order(&filled_cart(), &details).unwrap();
        assert_eq!(order.served_by, "Ama");
        assert_eq!(order.customer, Some(CustomerId::new(7)));

        details.served_by = Some("  ".to_string());
        let order = build_order(&filled_cart(), &details).unwrap();
        assert_eq!(order.served_by, DEFAULT_SERVED_BY);
    }

    #[test]
    fn test_invalid_line_is_rejected() {
        let mut cart = Cart::new();
        cart.add_item(&product(5), 2).unwrap();
        let mut lines = cart.lines().to_vec();
        lines[0].stock = 1;
        let err = order_item(0, &lines[0]).unwrap_err();
        assert_eq!(err.field, "items[0].quantity");
    }
}
