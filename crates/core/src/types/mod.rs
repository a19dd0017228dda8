//! Core types for the ITX store.
//!
//! This module provides the wire-level domain types shared by the API client
//! and its consumers.

pub mod cart;
pub mod options;
pub mod price;
pub mod product;

pub use cart::{CartAddition, CartAdditionReceipt, CartLineItem};
pub use options::{OptionCode, OptionItem, ProductOptions};
pub use price::Price;
pub use product::Product;
