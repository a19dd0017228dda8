//! Cart types: line-item snapshots and the add-to-cart wire exchange.

use serde::{Deserialize, Serialize};

use super::options::OptionCode;
use super::price::{self, Price};

/// One entry in the local cart.
///
/// A denormalized snapshot taken when the item is added: it keeps no
/// reference to the [`Product`](super::Product) it came from, and the same
/// product/variant pair may appear any number of times. Identity inside the
/// cart is positional.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartLineItem {
    pub id: String,
    #[serde(default)]
    pub brand: String,
    #[serde(default)]
    pub model: String,
    #[serde(default, deserialize_with = "price::option_price")]
    pub price: Option<Price>,
    #[serde(default)]
    pub img_url: String,
    #[serde(default)]
    pub color_name: String,
    #[serde(default)]
    pub storage_name: String,
}

impl CartLineItem {
    /// Display label, e.g. `Acer Iconia Talk S (Black, 32 GB)`.
    #[must_use]
    pub fn label(&self) -> String {
        format!(
            "{} {} ({}, {})",
            self.brand, self.model, self.color_name, self.storage_name
        )
    }
}

/// Body of `POST /api/cart`.
///
/// The option codes serialize as JSON numbers regardless of how they were
/// entered; the API rejects string codes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartAddition {
    pub id: String,
    pub color_code: OptionCode,
    pub storage_code: OptionCode,
}

impl CartAddition {
    /// Build an addition for one product variant.
    #[must_use]
    pub fn new(id: impl Into<String>, color_code: OptionCode, storage_code: OptionCode) -> Self {
        Self {
            id: id.into(),
            color_code,
            storage_code,
        }
    }
}

/// Response of `POST /api/cart`.
///
/// The server-side count is informational only; the local cart derives its
/// own count from its items.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartAdditionReceipt {
    pub count: u32,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn addition_serializes_codes_as_numbers() {
        // Codes parsed from form strings still reach the wire as numbers.
        let addition = CartAddition::new(
            "abc",
            "1000".parse().unwrap(),
            "2000".parse().unwrap(),
        );
        let body: serde_json::Value = serde_json::to_value(&addition).unwrap();
        assert_eq!(
            body,
            serde_json::json!({"id": "abc", "colorCode": 1000, "storageCode": 2000})
        );
    }

    #[test]
    fn line_item_round_trips_through_json() {
        let item = CartLineItem {
            id: "abc".into(),
            brand: "Google".into(),
            model: "Pixel 8".into(),
            price: Some("750".parse().unwrap()),
            img_url: "https://example.test/pixel8.jpg".into(),
            color_name: "Obsidian".into(),
            storage_name: "128 GB".into(),
        };
        let json = serde_json::to_string(&item).unwrap();
        assert!(json.contains("\"colorName\""));
        let back: CartLineItem = serde_json::from_str(&json).unwrap();
        assert_eq!(back, item);
    }
}
