//! Tillpoint Core - Shared types library.
//!
//! This crate provides common types used across all Tillpoint components:
//! - `client` - API gateway client, session, cart and checkout workflow
//! - `cli` - Command-line point-of-sale front end
//!
//! # Architecture
//!
//! The core crate contains only types - no I/O, no HTTP clients. This keeps
//! it lightweight and allows it to be used anywhere.
//!
//! # Modules
//!
//! - [`types`] - Newtype wrappers for type-safe IDs, money, and statuses

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
