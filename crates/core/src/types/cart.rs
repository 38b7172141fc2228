//! Cart line items.
//!
//! A line item is one distinct purchasable configuration (phone, storage,
//! color). Display fields and the unit price are copied from the catalog when
//! the item is added and never refreshed afterwards.

use serde::{Deserialize, Serialize};

use super::id::{LineId, PhoneId};
use super::phone::{ColorOption, PhoneDetail, StorageOption};
use super::price::Price;

const UNKNOWN_PRODUCT: &str = "Unknown Product";

/// One line of the shopping cart.
///
/// The JSON shape is the persisted cart format, so field names are stable.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartLineItem {
    /// Identity of the line; see [`LineId::from_parts`].
    #[serde(default)]
    pub line_id: LineId,
    pub phone_id: PhoneId,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub brand: Option<String>,
    #[serde(default)]
    pub image_url: Option<String>,
    #[serde(rename = "storage")]
    pub storage_capacity: String,
    pub color_name: String,
    pub color_hex: String,
    /// Price frozen at add-time.
    pub unit_price: Price,
}

impl CartLineItem {
    /// Build the line item for a resolved configuration of `phone`.
    ///
    /// The unit price is the storage option's price at this moment.
    #[must_use]
    pub fn for_configuration(
        phone: &PhoneDetail,
        storage: &StorageOption,
        color: &ColorOption,
    ) -> Self {
        Self {
            line_id: LineId::from_parts(&phone.id, &storage.capacity, &color.hex_code),
            phone_id: phone.id.clone(),
            name: Some(phone.name.clone()),
            brand: Some(phone.brand.clone()),
            image_url: Some(color.image_url.clone()).filter(|url| !url.is_empty()),
            storage_capacity: storage.capacity.clone(),
            color_name: color.name.clone(),
            color_hex: color.hex_code.clone(),
            unit_price: storage.price,
        }
    }

    /// The line's identity.
    ///
    /// Items persisted without a `lineId` fall back to the id recomputed from
    /// their configuration.
    #[must_use]
    pub fn key(&self) -> LineId {
        if self.line_id.is_empty() {
            LineId::from_parts(&self.phone_id, &self.storage_capacity, &self.color_hex)
        } else {
            self.line_id.clone()
        }
    }

    /// Name shown in the cart list.
    #[must_use]
    pub fn display_name(&self) -> String {
        if let Some(name) = self.name.as_deref().filter(|n| !n.is_empty()) {
            return name.to_string();
        }
        let joined = format!(
            "{} {}",
            self.brand.as_deref().unwrap_or_default(),
            self.name.as_deref().unwrap_or_default()
        );
        let trimmed = joined.trim();
        if trimmed.is_empty() {
            UNKNOWN_PRODUCT.to_string()
        } else {
            trimmed.to_string()
        }
    }

    /// Secondary line in the cart list, e.g. `256 GB | Titanium Black`.
    #[must_use]
    pub fn configuration_label(&self) -> String {
        format!("{} | {}", self.storage_capacity, self.color_name)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn item() -> CartLineItem {
        CartLineItem {
            line_id: LineId::new("p1-128GB-#000000"),
            phone_id: PhoneId::new("p1"),
            name: Some("Galaxy S24".to_string()),
            brand: Some("Samsung".to_string()),
            image_url: None,
            storage_capacity: "128GB".to_string(),
            color_name: "Black".to_string(),
            color_hex: "#000000".to_string(),
            unit_price: Price::from_units(999),
        }
    }

    #[test]
    fn test_persisted_shape_round_trips() {
        let json = serde_json::to_value(item()).unwrap();
        assert_eq!(json["lineId"], "p1-128GB-#000000");
        assert_eq!(json["storage"], "128GB");
        assert_eq!(json["colorHex"], "#000000");
        let back: CartLineItem = serde_json::from_value(json).unwrap();
        assert_eq!(back, item());
    }

    #[test]
    fn test_lenient_display_fields() {
        let json = r##"{
            "lineId": "p1-128GB-#000000",
            "phoneId": "p1",
            "name": null,
            "storage": "128GB",
            "colorName": "Black",
            "colorHex": "#000000",
            "unitPrice": 999
        }"##;
        let parsed: CartLineItem = serde_json::from_str(json).unwrap();
        assert!(parsed.name.is_none());
        assert!(parsed.brand.is_none());
        assert!(parsed.image_url.is_none());
    }

    #[test]
    fn test_key_falls_back_to_parts() {
        let mut legacy = item();
        legacy.line_id = LineId::default();
        assert_eq!(legacy.key(), LineId::new("p1-128GB-#000000"));
        assert_eq!(item().key(), item().line_id);
    }

    #[test]
    fn test_display_name_fallbacks() {
        let mut it = item();
        assert_eq!(it.display_name(), "Galaxy S24");

        it.name = Some(String::new());
        assert_eq!(it.display_name(), "Samsung");

        it.name = None;
        it.brand = None;
        assert_eq!(it.display_name(), "Unknown Product");
    }

    #[test]
    fn test_configuration_label() {
        assert_eq!(item().configuration_label(), "128GB | Black");
    }

    #[test]
    fn test_for_configuration_freezes_storage_price() {
        let phone: PhoneDetail = serde_json::from_str(
            r#"{"id": "p1", "brand": "Samsung", "name": "Galaxy S24", "basePrice": 899}"#,
        )
        .unwrap();
        let storage = StorageOption {
            capacity: "128GB".to_string(),
            price: Price::from_units(999),
        };
        let color = ColorOption {
            name: "Black".to_string(),
            hex_code: "#000000".to_string(),
            image_url: String::new(),
        };

        let line = CartLineItem::for_configuration(&phone, &storage, &color);
        assert_eq!(line, item());
    }
}
