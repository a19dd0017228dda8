//! ITX Store Client - caching API client and local cart store.
//!
//! # Architecture
//!
//! - The remote product API is the source of truth for the catalog; the two
//!   read endpoints go through a one-hour read-through cache persisted in a
//!   pluggable key-value store (see [`storage`]).
//! - Cart submissions always hit the network; the locally persisted
//!   [`CartStore`] keeps the denormalized line items and derives its count.
//! - HTTP is abstracted behind [`transport::Transport`] so tests run against
//!   scripted responses instead of a live server.
//!
//! # Example
//!
//! ```rust,ignore
//! use itx_store_client::{CachedApiClient, CartStore, StoreConfig};
//!
//! let config = StoreConfig::from_env()?;
//! let client = CachedApiClient::from_config(&config)?;
//!
//! let products = client.fetch_product_list().await?;
//! let product = client.fetch_product(&products[0].id).await?;
//! ```

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod api;
pub mod cache;
pub mod cart;
pub mod config;
pub mod search;
pub mod storage;
pub mod transport;

pub use api::{ApiError, CachedApiClient};
pub use cart::{CART_KEY, CartStore, SubscriptionId};
pub use config::{ConfigError, StoreConfig};
pub use storage::{FileStore, KeyValueStore, MemoryStore, StorageError};
pub use transport::{ReqwestTransport, Transport, TransportError};
