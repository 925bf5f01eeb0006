//! Tillpoint client library.
//!
//! Everything a till needs to talk to the Tillpoint REST API:
//!
//! - [`api`] - the gateway client with bearer auth and one-shot credential
//!   refresh, plus typed operations for every resource
//! - [`session`] - the credential pair and cached profile, persisted through
//!   a [`session::TokenStore`]
//! - [`pos`] - the cart and the checkout workflow
//! - [`types`] - display types produced by the API translators
//! - [`config`] - environment-driven configuration
//!
//! # Example
//!
//! ```rust,no_run
//! use tillpoint_client::{ApiClient, ClientConfig, Session};
//! use tillpoint_client::pos::{Cart, Checkout, SaleDetails};
//! use tillpoint_core::PaymentMethod;
//!
//! # async fn run() -> Result<(), Box<dyn std::error::Error>> {
//! let config = ClientConfig::from_env()?;
//! let client = ApiClient::new(&config, Session::in_memory())?;
//!
//! let page = client.search_products("shea").await?;
//! let mut cart = Cart::new();
//! if let Some(product) = page.items.first() {
//!     cart.add_item(product, 1)?;
//! }
//!
//! let mut checkout = Checkout::new();
//! let order = checkout
//!     .submit(&mut cart, &SaleDetails::new(PaymentMethod::Cash), &client)
//!     .await?;
//! println!("created {}", order.order_number);
//! # Ok(())
//! # }
//! ```

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod api;
pub mod config;
pub mod pos;
pub mod session;
pub mod types;

pub use api::{ApiClient, ApiError};
pub use config::{ClientConfig, ConfigError};
pub use session::{FileTokenStore, MemoryTokenStore, Session, TokenStore};
