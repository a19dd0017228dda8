//! Catalog product as served by the remote API.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::cart::CartLineItem;
use super::options::{OptionCode, ProductOptions};
use super::price::{self, Price};

/// A product from the catalog.
///
/// The shape is owned by the remote API; beyond the identifying fields we
/// only pick out the attributes the store presents. Anything unrecognized
/// lands in `extra`, so re-encoding a product for the response cache loses
/// nothing from the original payload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    /// Opaque catalog identifier.
    pub id: String,
    #[serde(default)]
    pub brand: String,
    #[serde(default)]
    pub model: String,
    /// Published price; the catalog leaves this empty for some models.
    #[serde(default, deserialize_with = "price::option_price")]
    pub price: Option<Price>,
    #[serde(default)]
    pub img_url: String,

    // Technical attributes shown on the detail page.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cpu: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ram: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub os: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display_resolution: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub battery: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub primary_camera: Option<String>,

    /// Variant option groups; empty in list responses.
    #[serde(default, skip_serializing_if = "ProductOptions::is_empty")]
    pub options: ProductOptions,

    /// Attributes we do not model explicitly, preserved verbatim.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Product {
    /// Brand and model as one display string.
    #[must_use]
    pub fn full_name(&self) -> String {
        format!("{} {}", self.brand, self.model)
    }

    /// Take a denormalized cart snapshot for the given variant selection.
    ///
    /// Returns `None` when either code does not belong to this product's
    /// option groups. The snapshot carries copies of everything the cart
    /// displays, so later catalog changes never reach items already added.
    #[must_use]
    pub fn line_item(&self, color: OptionCode, storage: OptionCode) -> Option<CartLineItem> {
        let color = self.options.color(color)?;
        let storage = self.options.storage(storage)?;

        Some(CartLineItem {
            id: self.id.clone(),
            brand: self.brand.clone(),
            model: self.model.clone(),
            price: self.price,
            img_url: self.img_url.clone(),
            color_name: color.name.clone(),
            storage_name: storage.name.clone(),
        })
    }
}
