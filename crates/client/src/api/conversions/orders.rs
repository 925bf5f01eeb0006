//! Order translation.

use tillpoint_core::{Money, PaymentMethod};

use super::{ValidationError, count, money, optional_money, text, timestamp};
use crate::api::records::{CustomerRef, OrderItemRecord, OrderRecord, ProductRef};
use crate::types::{Order, OrderCustomer, OrderItem};

const MISSING_SKU: &str = "N/A";

/// Wire order to display order.
///
/// The order number falls back to the id, and a missing subtotal is the
/// sum of line totals.
///
/// # Errors
///
/// Returns `ValidationError` for malformed amounts, quantities or timestamps,
/// naming the offending line for item fields (`items[1].price`).
pub fn order_from_record(record: OrderRecord) -> Result<Order, ValidationError> {
    let items = record
        .items
        .into_iter()
        .enumerate()
        .map(|(index, item)| order_item_from_record(index, item))
        .collect::<Result<Vec<_>, _>>()?;

    let subtotal = match optional_money("subtotal", record.subtotal.as_ref())? {
        Some(subtotal) => subtotal,
        None => items.iter().map(|item| item.line_total).sum(),
    };

    let customer = record.customer.map(|customer| match customer {
        CustomerRef::Id(id) => OrderCustomer {
            id: Some(id),
            name: String::new(),
            email: String::new(),
            phone: String::new(),
        },
        CustomerRef::Nested(nested) => OrderCustomer {
            id: nested.id,
            name: nested.name,
            email: text(nested.email.as_ref()),
            phone: text(nested.phone.as_ref()),
        },
    });

    let customer_name = record
        .customer_name
        .filter(|name| !name.is_empty())
        .or_else(|| {
            customer
                .as_ref()
                .map(|c| c.name.clone())
                .filter(|name| !name.is_empty())
        })
        .unwrap_or_default();

    Ok(Order {
        id: record.id,
        order_number: record
            .order_number
            .filter(|n| !n.is_empty())
            .unwrap_or_else(|| record.id.to_string()),
        customer,
        customer_name,
        items,
        subtotal,
        tax_amount: money("tax_amount", record.tax_amount.as_ref())?,
        discount_amount: money("discount_amount", record.discount_amount.as_ref())?,
        total: money("total", record.total.as_ref())?,
        status: record.status.unwrap_or_default(),
        payment_method: record.payment_method.unwrap_or(PaymentMethod::Cash),
        payment_status: record.payment_status.unwrap_or_default(),
        notes: record.notes.unwrap_or_default(),
        served_by: record.served_by.unwrap_or_default(),
        created_at: timestamp("created_at", record.created_at.as_deref())?,
        updated_at: timestamp("updated_at", record.updated_at.as_deref())?,
    })
}

/// Wire order line to display line. `index` is used in error field paths.
///
/// # Errors
///
/// Returns `ValidationError` for a malformed quantity or amount.
pub fn order_item_from_record(
    index: usize,
    record: OrderItemRecord,
) -> Result<OrderItem, ValidationError> {
    let field = |name: &str| format!("items[{index}].{name}");

    let quantity = count(&field("quantity"), record.quantity.as_ref())?;
    let price = money(&field("price"), record.price.as_ref())?;
    let discount = money(&field("discount"), record.discount.as_ref())?;
    let line_total = optional_money(&field("line_total"), record.line_total.as_ref())?
        .unwrap_or_else(|| price.times(quantity));

    let (product_id, nested_name, nested_sku) = match record.product {
        Some(ProductRef::Id(id)) => (Some(id), None, None),
        Some(ProductRef::Nested(p)) => (Some(p.id), Some(p.name), p.sku),
        None => (None, None, None),
    };

    Ok(OrderItem {
        id: record.id,
        product_id,
        product_name: record
            .product_name
            .filter(|name| !name.is_empty())
            .or(nested_name)
            .unwrap_or_default(),
        sku: record
            .sku
            .or(nested_sku)
            .filter(|sku| !sku.is_empty())
            .unwrap_or_else(|| MISSING_SKU.to_string()),
        quantity,
        price,
        discount,
        line_total,
    })
}

/// Sum of line totals less line discounts.
#[must_use]
pub fn items_net_total(items: &[OrderItem]) -> Money {
    items
        .iter()
        .map(|item| item.line_total - item.discount)
        .sum()
}
