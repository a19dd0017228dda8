//! ITX Store Core - Shared types library.
//!
//! This crate provides the catalog and cart types used across the ITX store
//! components:
//! - `client` - Caching API client and local cart store
//! - `cli` - Terminal storefront
//!
//! # Architecture
//!
//! The core crate contains only types - no I/O, no HTTP clients. The shapes
//! mirror what the remote product API emits (camelCase JSON), so decoding a
//! response and re-encoding it for the cache is lossless.
//!
//! # Modules
//!
//! - [`types`] - `Product`, variant options, prices, and cart line items

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
