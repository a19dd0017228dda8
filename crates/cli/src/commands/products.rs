//! Catalog browsing commands.

use itx_store_client::search::filter_products;
use itx_store_client::{CachedApiClient, KeyValueStore, Transport};
use itx_store_core::{OptionItem, Price, Product};

use super::CliError;

/// `itx products [--search <q>]` - print the (optionally filtered) catalog.
///
/// # Errors
///
/// Returns an error when the product list cannot be fetched.
pub async fn list<T: Transport, S: KeyValueStore>(
    client: &CachedApiClient<T, S>,
    search: Option<&str>,
) -> Result<(), CliError> {
    let products = client.fetch_product_list().await?;
    let products = match search {
        Some(query) => filter_products(&products, query),
        None => products,
    };

    if products.is_empty() {
        println!("No products found.");
        return Ok(());
    }

    println!("{:<24} {:<12} {:<24} {:>12}", "ID", "BRAND", "MODEL", "PRICE");
    for product in &products {
        println!(
            "{:<24} {:<12} {:<24} {:>12}",
            product.id,
            product.brand,
            product.model,
            format_price(product.price)
        );
    }
    println!("\n{} product(s)", products.len());
    Ok(())
}

/// `itx product <id>` - print one product's details and variant options.
///
/// # Errors
///
/// Returns an error when the id is blank or the fetch fails for a reason
/// other than the product not existing.
pub async fn show<T: Transport, S: KeyValueStore>(
    client: &CachedApiClient<T, S>,
    id: &str,
) -> Result<(), CliError> {
    let id = id.trim();
    if id.is_empty() {
        return Err(CliError::MissingProductId);
    }

    let product = match client.fetch_product(id).await {
        Ok(product) => product,
        Err(err) if err.status() == Some(404) => {
            println!("Product not found: {id}");
            return Ok(());
        }
        Err(err) => return Err(CliError::Api(err)),
    };

    print_details(&product);
    Ok(())
}

fn print_details(product: &Product) {
    println!("{}", product.full_name());
    println!("  id:      {}", product.id);
    println!("  price:   {}", format_price(product.price));

    for (label, value) in [
        ("cpu", &product.cpu),
        ("ram", &product.ram),
        ("os", &product.os),
        ("display", &product.display_resolution),
        ("battery", &product.battery),
        ("camera", &product.primary_camera),
    ] {
        if let Some(value) = value {
            println!("  {label:<8}{value}");
        }
    }

    print_options("colors", &product.options.colors);
    print_options("storages", &product.options.storages);
}

fn print_options(group: &str, items: &[OptionItem]) {
    if items.is_empty() {
        return;
    }
    println!("  {group}:");
    // The first option is the default selection.
    for (position, item) in items.iter().enumerate() {
        let marker = if position == 0 { "*" } else { " " };
        println!("  {marker} [{}] {}", item.code, item.name);
    }
}

pub(super) fn format_price(price: Option<Price>) -> String {
    price.map_or_else(|| "-".to_owned(), |price| format!("{price} €"))
}
