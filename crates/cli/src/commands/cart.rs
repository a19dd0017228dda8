//! Local cart commands.

use itx_store_client::{CachedApiClient, CartStore, KeyValueStore, Transport};
use itx_store_core::{CartAddition, OptionCode};

use super::{CliError, products::format_price};

/// `itx cart add <id>` - submit an addition to the remote cart, then snapshot
/// the line item locally.
///
/// Unspecified codes default to the product's first option, matching the
/// detail page's pre-selection. The local snapshot is only taken after the
/// server accepted the addition; a rejected POST leaves the cart untouched.
///
/// # Errors
///
/// Returns an error when the id is blank, the variant selection is invalid
/// for the product, or either network call fails.
pub async fn add<T: Transport, S: KeyValueStore, C: KeyValueStore>(
    client: &CachedApiClient<T, S>,
    cart: &CartStore<C>,
    id: &str,
    color: Option<OptionCode>,
    storage: Option<OptionCode>,
) -> Result<(), CliError> {
    let id = id.trim();
    if id.is_empty() {
        return Err(CliError::MissingProductId);
    }

    let product = client.fetch_product(id).await?;

    let color = resolve(color, product.options.default_color(), &product.id, "color")?;
    let storage = resolve(storage, product.options.default_storage(), &product.id, "storage")?;

    let item = product
        .line_item(color, storage)
        .ok_or_else(|| unknown_option(&product.id, &product.options, color, storage))?;

    let receipt = client
        .add_to_cart(&CartAddition::new(id, color, storage))
        .await?;

    cart.add_item(item);
    println!(
        "Added {} to the cart ({} item(s) locally, server count {}).",
        product.full_name(),
        cart.count(),
        receipt.count
    );
    Ok(())
}

/// `itx cart list` - print the cart with positional indices.
pub fn list<S: KeyValueStore>(cart: &CartStore<S>) {
    let items = cart.items();
    if items.is_empty() {
        println!("The cart is empty.");
        return;
    }

    for (index, item) in items.iter().enumerate() {
        println!("{index:>3}  {:<40} {:>12}", item.label(), format_price(item.price));
    }
    println!("\n{} item(s)", items.len());
}

/// `itx cart remove <index>` - positional removal; out of range is a no-op.
pub fn remove<S: KeyValueStore>(cart: &CartStore<S>, index: usize) {
    let before = cart.count();
    cart.remove_item(index);
    if cart.count() == before {
        println!("No item at position {index}.");
    } else {
        println!("Removed item {index}; {} item(s) left.", cart.count());
    }
}

/// `itx cart clear` - drop everything.
pub fn clear<S: KeyValueStore>(cart: &CartStore<S>) {
    cart.clear();
    println!("Cart cleared.");
}

fn resolve(
    requested: Option<OptionCode>,
    default: Option<&itx_store_core::OptionItem>,
    id: &str,
    group: &'static str,
) -> Result<OptionCode, CliError> {
    requested
        .or_else(|| default.map(|item| item.code))
        .ok_or_else(|| CliError::NoOptions {
            id: id.to_owned(),
            group,
        })
}

fn unknown_option(
    id: &str,
    options: &itx_store_core::ProductOptions,
    color: OptionCode,
    storage: OptionCode,
) -> CliError {
    // line_item refused one of the two codes; report the first that misses.
    if options.color(color).is_none() {
        CliError::UnknownOption {
            id: id.to_owned(),
            group: "color",
            code: color,
        }
    } else {
        CliError::UnknownOption {
            id: id.to_owned(),
            group: "storage",
            code: storage,
        }
    }
}
