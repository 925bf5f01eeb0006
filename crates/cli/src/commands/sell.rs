//! Ring up a sale from the command line.

use thiserror::Error;
use tillpoint_client::pos::{Cart, CartError, Checkout, CheckoutError, SaleDetails};
use tillpoint_client::{ApiClient, ApiError};
use tillpoint_core::{CustomerId, Money, PaymentMethod, ProductId};

use super::emit;

/// One `PRODUCT_ID:QUANTITY` argument.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SaleLine {
    pub product_id: ProductId,
    pub quantity: u32,
}

/// Parse `PRODUCT_ID:QUANTITY`; a bare id means quantity 1.
pub fn parse_line(raw: &str) -> Result<SaleLine, String> {
    let (id, quantity) = raw.split_once(':').unwrap_or((raw, "1"));
    let product_id = id
        .parse::<ProductId>()
        .map_err(|e| format!("invalid product id {id:?}: {e}"))?;
    let quantity = quantity
        .trim()
        .parse::<u32>()
        .map_err(|e| format!("invalid quantity {quantity:?}: {e}"))?;
    Ok(SaleLine {
        product_id,
        quantity,
    })
}

#[derive(Debug)]
pub struct SellArgs {
    pub lines: Vec<SaleLine>,
    pub payment: PaymentMethod,
    pub tax: Option<Money>,
    pub discount: Option<Money>,
    pub customer: Option<CustomerId>,
    pub customer_name: String,
    pub served_by: Option<String>,
}

#[derive(Debug, Error)]
pub enum SellError {
    #[error("{0}")]
    Cart(#[from] CartError),

    #[error("{0}")]
    Checkout(#[from] CheckoutError),

    #[error(transparent)]
    Api(#[from] ApiError),
}

/// Look up each product, build the cart and submit it.
pub async fn sell(client: &ApiClient, args: SellArgs) -> Result<(), SellError> {
    let mut cart = Cart::new();
    for line in &args.lines {
        let product = client.get_product(line.product_id).await?;
        cart.add_item(&product, line.quantity)?;
    }

    emit(format_args!(
        "{} item(s), subtotal {}",
        cart.item_count(),
        cart.total()
    ));

    let details = SaleDetails {
        customer: args.customer,
        customer_name: args.customer_name,
        payment_method: args.payment,
        tax_amount: args.tax.unwrap_or(Money::ZERO),
        discount_amount: args.discount.unwrap_or(Money::ZERO),
        notes: String::new(),
        served_by: args.served_by,
    };

    let mut checkout = Checkout::new();
    let order = checkout.submit(&mut cart, &details, client).await?;

    emit(format_args!(
        "Order {} {} - {} item(s), total {}, {}",
        order.order_number,
        order.status_label(),
        order.item_count(),
        order.total,
        order.payment_method_label(),
    ));
    Ok(())
}
