//! Product and category translation.

use tillpoint_core::{Money, ProductStatus, StockStatus};

use super::{ValidationError, count, money, optional_money, timestamp};
use crate::api::records::{CategoryRecord, ProductPayload, ProductRecord, WireNumber};
use crate::types::{Category, Product, ProductDraft};

/// Wire product to display product.
///
/// Derived values the server may omit are filled in: the sale flag is set
/// when a positive sale price exists, the effective price is the sale price
/// when on sale, and the stock status is bucketed from stock and min stock.
///
/// # Errors
///
/// Returns `ValidationError` for malformed prices, stock levels or timestamps.
pub fn product_from_record(record: ProductRecord) -> Result<Product, ValidationError> {
    let price = money("price", record.price.as_ref())?;
    let sale_price = optional_money("sale_price", record.sale_price.as_ref())?;
    let stock = count("stock", record.stock.as_ref())?;
    let min_stock = count("min_stock", record.min_stock.as_ref())?;

    let is_on_sale = record
        .is_on_sale
        .unwrap_or_else(|| sale_price.is_some_and(|sale| sale > Money::ZERO));
    let effective_price = match optional_money("effective_price", record.effective_price.as_ref())? {
        Some(effective) => effective,
        None => match sale_price {
            Some(sale) if is_on_sale => sale,
            _ => price,
        },
    };

    let stock_status = record
        .stock_status
        .as_deref()
        .and_then(parse_stock_status)
        .unwrap_or_else(|| StockStatus::classify(stock, min_stock));

    let (category_id, category_name) = record
        .category
        .map_or((None, String::new()), |c| (Some(c.id), c.name));

    Ok(Product {
        id: record.id,
        name: record.name,
        description: record.description.unwrap_or_default(),
        image: record.image.filter(|url| !url.is_empty()),
        sku: record.sku.filter(|sku| !sku.is_empty()),
        price,
        sale_price,
        effective_price,
        is_on_sale,
        stock,
        min_stock,
        category_id,
        category_name,
        status: record.status.unwrap_or_default(),
        stock_status,
        created_at: timestamp("created_at", record.created_at.as_deref())?,
        updated_at: timestamp("updated_at", record.updated_at.as_deref())?,
    })
}

/// Display product back to its wire form.
///
/// Prices keep their full decimal precision so a round trip is exact.
#[must_use]
pub fn product_to_record(product: &Product) -> ProductRecord {
    ProductRecord {
        id: product.id,
        name: product.name.clone(),
        description: Some(product.description.clone()),
        image: product.image.clone(),
        sku: product.sku.clone(),
        price: Some(decimal_text(product.price)),
        sale_price: product.sale_price.map(decimal_text),
        effective_price: Some(decimal_text(product.effective_price)),
        is_on_sale: Some(product.is_on_sale),
        stock: Some(WireNumber::Int(i64::from(product.stock))),
        min_stock: Some(WireNumber::Int(i64::from(product.min_stock))),
        category: product.category_id.map(|id| CategoryRecord {
            id,
            name: product.category_name.clone(),
            description: None,
        }),
        status: Some(product.status.clone()),
        stock_status: Some(product.stock_status.as_str().to_string()),
        created_at: product.created_at.map(|ts| ts.to_rfc3339()),
        updated_at: product.updated_at.map(|ts| ts.to_rfc3339()),
    }
}

/// Create/update form to request body.
///
/// Description defaults to empty, min stock to 0 and status to `active`.
#[must_use]
pub fn product_draft_to_payload(draft: &ProductDraft) -> ProductPayload {
    ProductPayload {
        name: draft.name.trim().to_string(),
        description: draft.description.clone().unwrap_or_default(),
        price: draft.price.amount().to_string(),
        sale_price: draft
            .sale_price
            .filter(|sale| !sale.is_zero())
            .map(|sale| sale.amount().to_string()),
        stock: draft.stock,
        min_stock: draft.min_stock.unwrap_or(0),
        category_id: draft.category_id,
        status: draft.status.clone().unwrap_or(ProductStatus::Active),
    }
}

/// Wire category to display category.
#[must_use]
pub fn category_from_record(record: CategoryRecord) -> Category {
    Category {
        id: record.id,
        name: record.name,
        description: record.description.unwrap_or_default(),
    }
}

/// Accepts `low_stock` as well as the label form `Low Stock`.
fn parse_stock_status(raw: &str) -> Option<StockStatus> {
    let normalised: String = raw
        .trim()
        .chars()
        .map(|c| match c {
            ' ' | '-' => '_',
            other => other.to_ascii_lowercase(),
        })
        .collect();
    match normalised.as_str() {
        "in_stock" => Some(StockStatus::InStock),
        "low_stock" => Some(StockStatus::LowStock),
        "out_of_stock" => Some(StockStatus::OutOfStock),
        _ => None,
    }
}

fn decimal_text(amount: Money) -> WireNumber {
    WireNumber::Text(amount.amount().to_string())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use rust_decimal::Decimal;
    use tillpoint_core::{CategoryId, ProductId};

    fn record(json: &str) -> ProductRecord {
        serde_json::from_str(json).unwrap()
    }

    const FULL: &str = r#"{
        "id": "7c9e6679-7425-40de-944b-e07fc1f90ae7",
        "name": "Shea Butter 250g",
        "description": "Unrefined",
        "image": "http://localhost:8000/media/shea.jpg",
        "price": "45.00",
        "sale_price": "39.90",
        "stock": 4,
        "min_stock": 5,
        "category": {"id": "0f8fad5b-d9cb-469f-a165-70867728950e", "name": "Beauty"},
        "status": "active",
        "stock_status": "Low Stock",
        "is_on_sale": true,
        "effective_price": "39.90",
        "created_at": "2024-05-01T08:00:00Z"
    }"#;

    #[test]
    fn test_full_record() {
        let product = product_from_record(record(FULL)).unwrap();
        assert_eq!(product.name, "Shea Butter 250g");
        assert_eq!(product.price, Money::from_minor(4500));
        assert_eq!(product.sale_price, Some(Money::from_minor(3990)));
        assert_eq!(product.effective_price, Money::from_minor(3990));
        assert!(product.is_on_sale);
        assert_eq!(product.stock, 4);
        assert_eq!(product.category_name, "Beauty");
        assert!(product.category_id.is_some());
        assert_eq!(product.stock_status, StockStatus::LowStock);
        assert!(product.created_at.is_some());
    }

    #[test]
    fn test_minimal_record_defaults() {
        let product =
            product_from_record(record(r#"{"id": "7c9e6679-7425-40de-944b-e07fc1f90ae7"}"#))
                .unwrap();
        assert_eq!(product.name, "");
        assert_eq!(product.price, Money::ZERO);
        assert_eq!(product.effective_price, Money::ZERO);
        assert!(!product.is_on_sale);
        assert_eq!(product.status, ProductStatus::Active);
        assert_eq!(product.stock_status, StockStatus::OutOfStock);
        assert_eq!(product.category_name, "");
        assert!(product.category_id.is_none());
    }

    #[test]
    fn test_derived_values_when_server_omits_them() {
        let product = product_from_record(record(
            r#"{"id": "7c9e6679-7425-40de-944b-e07fc1f90ae7",
                "price": 20, "sale_price": 15.5, "stock": "30", "min_stock": 5}"#,
        ))
        .unwrap();
        assert!(product.is_on_sale);
        assert_eq!(product.effective_price, Money::from_minor(1550));
        assert_eq!(product.stock_status, StockStatus::InStock);
    }

    #[test]
    fn test_malformed_price_fails() {
        let err = product_from_record(record(
            r#"{"id": "7c9e6679-7425-40de-944b-e07fc1f90ae7", "price": "abc"}"#,
        ))
        .unwrap_err();
        assert_eq!(err.field, "price");
        assert_eq!(err.value, "abc");
    }

    #[test]
    fn test_negative_stock_fails() {
        let err = product_from_record(record(
            r#"{"id": "7c9e6679-7425-40de-944b-e07fc1f90ae7", "stock": -2}"#,
        ))
        .unwrap_err();
        assert_eq!(err.field, "stock");
    }

    #[test]
    fn test_draft_defaults() {
        let draft = ProductDraft {
            name: " Kente Scarf ".to_string(),
            description: None,
            price: Money::parse("120").unwrap(),
            sale_price: None,
            stock: 8,
            min_stock: None,
            category_id: CategoryId::random(),
            status: None,
            image: None,
        };
        let payload = product_draft_to_payload(&draft);
        assert_eq!(payload.name, "Kente Scarf");
        assert_eq!(payload.description, "");
        assert_eq!(payload.min_stock, 0);
        assert_eq!(payload.status, ProductStatus::Active);

        let json = serde_json::to_value(&payload).unwrap();
        assert_eq!(json["price"], "120");
        assert_eq!(json["sale_price"], serde_json::Value::Null);
    }

    proptest! {
        #[test]
        fn round_trip_preserves_identity_price_and_stock(
            minor in 0_i64..10_000_000,
            scale in 0_u32..4,
            stock in 0_u32..100_000,
            name in "[A-Za-z0-9 ]{0,40}",
        ) {
            let original = Product {
                id: ProductId::random(),
                name,
                description: String::new(),
                image: None,
                sku: None,
                price: Money::new(Decimal::new(minor, scale)),
                sale_price: None,
                effective_price: Money::new(Decimal::new(minor, scale)),
                is_on_sale: false,
                stock,
                min_stock: 0,
                category_id: None,
                category_name: String::new(),
                status: ProductStatus::Active,
                stock_status: StockStatus::classify(stock, 0),
                created_at: None,
                updated_at: None,
            };

            let wire = serde_json::to_string(&product_to_record(&original)).unwrap();
            let back = product_from_record(serde_json::from_str(&wire).unwrap()).unwrap();

            prop_assert_eq!(back.id, original.id);
            prop_assert_eq!(&back.name, &original.name);
            prop_assert_eq!(back.price, original.price);
            prop_assert_eq!(back.price.amount().scale(), original.price.amount().scale());
            prop_assert_eq!(back.stock, original.stock);
        }
    }
}
