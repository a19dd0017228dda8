//! CLI command implementations.

pub mod cart;
pub mod products;

use thiserror::Error;

/// Errors a command can surface to `main`.
#[derive(Debug, Error)]
pub enum CliError {
    /// API call failed.
    #[error(transparent)]
    Api(#[from] itx_store_client::ApiError),

    /// A product id was empty or whitespace.
    #[error("a product id is required")]
    MissingProductId,

    /// The product has no options in the requested group.
    #[error("product {id} has no selectable {group} options")]
    NoOptions { id: String, group: &'static str },

    /// The requested option code is not offered by the product.
    #[error("product {id} has no {group} option with code {code}")]
    UnknownOption {
        id: String,
        group: &'static str,
        code: itx_store_core::OptionCode,
    },
}
