//! Display-format types returned by the API client.

pub mod analytics;
pub mod auth;
pub mod common;
pub mod customer;
pub mod inventory;
pub mod order;
pub mod product;
pub mod staff;

pub use analytics::*;
pub use auth::*;
pub use common::*;
pub use customer::*;
pub use inventory::*;
pub use order::*;
pub use product::*;
pub use staff::*;
