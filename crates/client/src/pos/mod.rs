//! Point-of-sale workflow: the cart being rung up and its submission as an
//! order.

pub mod cart;
pub mod checkout;

pub use cart::{Cart, CartError, CartLine};
pub use checkout::{Checkout, CheckoutError, CheckoutState, OrderGateway, SaleDetails};
