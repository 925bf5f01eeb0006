//! In-memory cart.
//!
//! Each line snapshots the product's stock when it was first added; every
//! mutation is checked against that snapshot and a rejected mutation leaves
//! the cart untouched.

use thiserror::Error;
use tillpoint_core::{Money, ProductId};

use crate::types::Product;

/// Errors that can occur when changing the cart.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CartError {
    #[error("quantity must be at least 1")]
    InvalidQuantity,
    #[error("only {available} of {product} in stock, {requested} requested")]
    StockExceeded {
        product: String,
        requested: u64,
        available: u32,
    },
}

/// One product in the cart.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CartLine {
    pub product_id: ProductId,
    pub name: String,
    pub unit_price: Money,
    pub quantity: u32,
    /// Stock level when the line was created.
    pub stock: u32,
}

impl CartLine {
    /// `unit_price × quantity`.
    #[must_use]
    pub fn line_total(&self) -> Money {
        self.unit_price.times(self.quantity)
    }

    /// Whether the quantity is within `1..=stock`.
    #[must_use]
    pub const fn is_valid(&self) -> bool {
        self.quantity >= 1 && self.quantity <= self.stock
    }

    fn exceeded(&self, requested: u64) -> CartError {
        CartError::StockExceeded {
            product: self.name.clone(),
            requested,
            available: self.stock,
        }
    }
}

/// Lines being rung up, in the order they were added.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Cart {
    lines: Vec<CartLine>,
}

impl Cart {
    #[must_use]
    pub const fn new() -> Self {
        Self { lines: Vec::new() }
    }

    /// Add `quantity` of a product, merging with an existing line.
    ///
    /// The line is priced at the product's effective price.
    ///
    /// # Errors
    ///
    /// `InvalidQuantity` for a zero quantity, `StockExceeded` when the
    /// resulting quantity would be above the stock snapshot.
    pub fn add_item(&mut self, product: &Product, quantity: u32) -> Result<(), CartError> {
        if quantity == 0 {
            return Err(CartError::InvalidQuantity);
        }

        if let Some(line) = self.line_mut(product.id) {
            let requested = u64::from(line.quantity) + u64::from(quantity);
            let new_quantity = u32::try_from(requested)
                .ok()
                .filter(|q| *q <= line.stock)
                .ok_or_else(|| line.exceeded(requested))?;
            line.quantity = new_quantity;
            return Ok(());
        }

        let line = CartLine {
            product_id: product.id,
            name: product.name.clone(),
            unit_price: product.effective_price,
            quantity,
            stock: product.stock,
        };
        if quantity > product.stock {
            return Err(line.exceeded(u64::from(quantity)));
        }
        self.lines.push(line);
        Ok(())
    }

    /// Remove a product's line. Unknown products are ignored.
    pub fn remove_item(&mut self, product_id: ProductId) {
        self.lines.retain(|line| line.product_id != product_id);
    }

    /// Set a line's quantity. Zero or less removes the line; unknown
    /// products are ignored.
    ///
    /// # Errors
    ///
    /// `StockExceeded` when `quantity` is above the line's stock snapshot.
    pub fn set_quantity(&mut self, product_id: ProductId, quantity: i64) -> Result<(), CartError> {
        if quantity <= 0 {
            self.remove_item(product_id);
            return Ok(());
        }
        let Some(line) = self.line_mut(product_id) else {
            return Ok(());
        };
        let requested = quantity.unsigned_abs();
        line.quantity = u32::try_from(requested)
            .ok()
            .filter(|q| *q <= line.stock)
            .ok_or_else(|| line.exceeded(requested))?;
        Ok(())
    }

    pub fn clear(&mut self) {
        self.lines.clear();
    }

    /// Sum of line totals.
    #[must_use]
    pub fn total(&self) -> Money {
        self.lines.iter().map(CartLine::line_total).sum()
    }

    /// Sum of quantities.
    #[must_use]
    pub fn item_count(&self) -> u64 {
        self.lines.iter().map(|line| u64::from(line.quantity)).sum()
    }

    #[must_use]
    pub fn lines(&self) -> &[CartLine] {
        &self.lines
    }

    #[must_use]
    pub fn line(&self, product_id: ProductId) -> Option<&CartLine> {
        self.lines.iter().find(|line| line.product_id == product_id)
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Number of distinct products.
    #[must_use]
    pub fn len(&self) -> usize {
        self.lines.len()
    }

    fn line_mut(&mut self, product_id: ProductId) -> Option<&mut CartLine> {
        self.lines
            .iter_mut()
            .find(|line| line.product_id == product_id)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use tillpoint_core::{ProductStatus, StockStatus};

    fn product(name: &str, price_minor: i64, stock: u32) -> Product {
        let price = Money::from_minor(price_minor);
        Product {
            id: ProductId::random(),
            name: name.to_string(),
            description: String::new(),
            image: None,
            sku: None,
            price,
            sale_price: None,
            effective_price: price,
            is_on_sale: false,
            stock,
            min_stock: 0,
            category_id: None,
            category_name: String::new(),
            status: ProductStatus::Active,
            stock_status: StockStatus::classify(stock, 0),
            created_at: None,
            updated_at: None,
        }
    }

    #[test]
    fn test_add_then_overflow_then_zero() {
        let a = product("Shea butter", 1500, 5);
        let mut cart = Cart::new();

        cart.add_item(&a, 3).unwrap();
        assert_eq!(cart.item_count(), 3);

        let err = cart.add_item(&a, 3).unwrap_err();
        assert_eq!(
            err,
            CartError::StockExceeded {
                product: "Shea butter".to_string(),
                requested: 6,
                available: 5,
            }
        );
        assert_eq!(cart.item_count(), 3);

        cart.set_quantity(a.id, 0).unwrap();
        assert!(cart.is_empty());
    }

    #[test]
    fn test_new_line_over_stock_is_rejected() {
        let a = product("Kente scarf", 9000, 2);
        let mut cart = Cart::new();
        assert!(matches!(
            cart.add_item(&a, 3),
            Err(CartError::StockExceeded { .. })
        ));
        assert!(cart.is_empty());
    }

    #[test]
    fn test_zero_quantity_is_invalid() {
        let a = product("Soap", 300, 10);
        let mut cart = Cart::new();
        assert_eq!(cart.add_item(&a, 0), Err(CartError::InvalidQuantity));
        assert!(cart.is_empty());
    }

    #[test]
    fn test_sale_price_is_used() {
        let mut a = product("Tea", 1000, 10);
        a.sale_price = Some(Money::from_minor(800));
        a.effective_price = Money::from_minor(800);
        a.is_on_sale = true;

        let mut cart = Cart::new();
        cart.add_item(&a, 2).unwrap();
        assert_eq!(cart.total(), Money::from_minor(1600));
    }

    #[test]
    fn test_totals_and_order() {
        let a = product("A", 250, 10);
        let b = product("B", 1000, 10);
        let mut cart = Cart::new();
        cart.add_item(&b, 1).unwrap();
        cart.add_item(&a, 4).unwrap();
        cart.add_item(&b, 1).unwrap();

        assert_eq!(cart.len(), 2);
        assert_eq!(cart.item_count(), 6);
        assert_eq!(cart.total(), Money::from_minor(3000));
        assert_eq!(cart.lines()[0].product_id, b.id);
        assert_eq!(cart.line(a.id).unwrap().quantity, 4);
    }

    #[test]
    fn test_set_quantity_rules() {
        let a = product("A", 100, 4);
        let mut cart = Cart::new();
        cart.add_item(&a, 1).unwrap();

        cart.set_quantity(a.id, 4).unwrap();
        assert_eq!(cart.line(a.id).unwrap().quantity, 4);

        assert!(cart.set_quantity(a.id, 5).is_err());
        assert_eq!(cart.line(a.id).unwrap().quantity, 4);

        cart.set_quantity(ProductId::random(), 2).unwrap();
        assert_eq!(cart.len(), 1);

        cart.set_quantity(a.id, -3).unwrap();
        assert!(cart.is_empty());
    }

    #[test]
    fn test_remove_and_clear() {
        let a = product("A", 100, 4);
        let b = product("B", 100, 4);
        let mut cart = Cart::new();
        cart.add_item(&a, 1).unwrap();
        cart.add_item(&b, 1).unwrap();

        cart.remove_item(ProductId::random());
        assert_eq!(cart.len(), 2);
        cart.remove_item(a.id);
        assert_eq!(cart.len(), 1);
        cart.clear();
        assert!(cart.is_empty());
        assert_eq!(cart.total(), Money::ZERO);
    }

    #[derive(Debug, Clone)]
    enum Op {
        Add(usize, u32),
        Remove(usize),
        Set(usize, i64),
        Clear,
    }

    fn op() -> impl Strategy<Value = Op> {
        prop_oneof![
            (0..3usize, 0..8u32).prop_map(|(p, q)| Op::Add(p, q)),
            (0..3usize).prop_map(Op::Remove),
            (0..3usize, -2..10i64).prop_map(|(p, q)| Op::Set(p, q)),
            Just(Op::Clear),
        ]
    }

    proptest! {
        #[test]
        fn prop_lines_stay_within_stock(ops in prop::collection::vec(op(), 0..40)) {
            let products = [product("A", 100, 3), product("B", 250, 7), product("C", 5, 1)];
            let mut cart = Cart::new();

            for op in ops {
                let before = cart.clone();
                let result = match op {
                    Op::Add(p, q) => cart.add_item(&products[p], q),
                    Op::Remove(p) => { cart.remove_item(products[p].id); Ok(()) }
                    Op::Set(p, q) => cart.set_quantity(products[p].id, q),
                    Op::Clear => { cart.clear(); prop_assert!(cart.is_empty()); Ok(()) }
                };
                if result.is_err() {
                    prop_assert_eq!(&cart, &before);
                }
                prop_assert!(cart.lines().iter().all(CartLine::is_valid));
                let sum: u64 = cart.lines().iter().map(|l| u64::from(l.quantity)).sum();
                prop_assert_eq!(cart.item_count(), sum);
            }
        }
    }
}
