//! Variant options (colors and storage sizes) for a product.

use std::fmt;
use std::num::ParseIntError;
use std::str::FromStr;

use serde::de::{self, Deserializer, Visitor};
use serde::{Deserialize, Serialize};

/// Numeric code identifying one variant option within its group.
///
/// The API expects these as JSON numbers, but form and CLI input arrives as
/// strings, so deserialization accepts both. Serialization always emits a
/// number, which is what keeps cart submissions well-formed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct OptionCode(i64);

impl OptionCode {
    /// Create a code from its numeric value.
    #[must_use]
    pub const fn new(code: i64) -> Self {
        Self(code)
    }

    /// The underlying numeric value.
    #[must_use]
    pub const fn as_i64(&self) -> i64 {
        self.0
    }
}

impl fmt::Display for OptionCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<i64> for OptionCode {
    fn from(code: i64) -> Self {
        Self(code)
    }
}

impl FromStr for OptionCode {
    type Err = ParseIntError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim().parse().map(Self)
    }
}

struct OptionCodeVisitor;

impl Visitor<'_> for OptionCodeVisitor {
    type Value = OptionCode;

    fn expecting(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str("an integer or a numeric string")
    }

    fn visit_i64<E: de::Error>(self, value: i64) -> Result<OptionCode, E> {
        Ok(OptionCode(value))
    }

    fn visit_u64<E: de::Error>(self, value: u64) -> Result<OptionCode, E> {
        i64::try_from(value)
            .map(OptionCode)
            .map_err(|_| E::custom(format!("option code {value} out of range")))
    }

    fn visit_str<E: de::Error>(self, value: &str) -> Result<OptionCode, E> {
        value
            .parse()
            .map_err(|err| E::custom(format!("invalid option code {value:?}: {err}")))
    }
}

impl<'de> Deserialize<'de> for OptionCode {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_any(OptionCodeVisitor)
    }
}

/// One selectable option: a code the API understands plus a display name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OptionItem {
    pub code: OptionCode,
    pub name: String,
}

/// The two option groups a product carries.
///
/// Order matters: the first entry of each group is the default selection on
/// the detail page.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductOptions {
    #[serde(default)]
    pub colors: Vec<OptionItem>,
    #[serde(default)]
    pub storages: Vec<OptionItem>,
}

impl ProductOptions {
    /// True when neither group has entries (the shape list responses carry).
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.colors.is_empty() && self.storages.is_empty()
    }

    /// Look up a color by code.
    #[must_use]
    pub fn color(&self, code: OptionCode) -> Option<&OptionItem> {
        self.colors.iter().find(|item| item.code == code)
    }

    /// Look up a storage size by code.
    #[must_use]
    pub fn storage(&self, code: OptionCode) -> Option<&OptionItem> {
        self.storages.iter().find(|item| item.code == code)
    }

    /// The pre-selected color (first in catalog order), if any.
    #[must_use]
    pub fn default_color(&self) -> Option<&OptionItem> {
        self.colors.first()
    }

    /// The pre-selected storage size (first in catalog order), if any.
    #[must_use]
    pub fn default_storage(&self) -> Option<&OptionItem> {
        self.storages.first()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn code_deserializes_from_number_and_string() {
        let from_number: OptionCode = serde_json::from_str("1000").unwrap();
        let from_string: OptionCode = serde_json::from_str("\"1000\"").unwrap();
        assert_eq!(from_number, from_string);
        assert_eq!(from_number.as_i64(), 1000);
    }

    #[test]
    fn code_serializes_as_number() {
        assert_eq!(serde_json::to_string(&OptionCode::new(2000)).unwrap(), "2000");
    }

    #[test]
    fn lookup_and_defaults_follow_catalog_order() {
        let options: ProductOptions = serde_json::from_str(
            r#"{
                "colors": [{"code": 1, "name": "Black"}],
                "storages": [{"code": 2, "name": "64 GB"}, {"code": 3, "name": "128 GB"}]
            }"#,
        )
        .unwrap();

        assert_eq!(options.default_storage().map(|s| s.name.as_str()), Some("64 GB"));
        assert_eq!(options.storage(OptionCode::new(3)).map(|s| s.name.as_str()), Some("128 GB"));
        assert!(options.color(OptionCode::new(9)).is_none());
    }
}
