//! Catalog records returned by the product catalog service.
//!
//! These are read-only snapshots owned by the remote catalog; nothing in the
//! storefront mutates them.

use serde::{Deserialize, Serialize};

use super::dedupe::HasId;
use super::id::PhoneId;
use super::price::Price;

// =============================================================================
// Option Types
// =============================================================================

/// A storage capacity a phone can be bought with.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StorageOption {
    /// Capacity label (e.g., "256 GB").
    pub capacity: String,
    /// Price of the phone in this capacity.
    pub price: Price,
}

/// A color a phone can be bought in.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ColorOption {
    /// Display name (e.g., "Titanium Black").
    pub name: String,
    /// CSS hex code (e.g., "#1A1A1A").
    pub hex_code: String,
    /// Product image in this color.
    pub image_url: String,
}

// =============================================================================
// Phone Types
// =============================================================================

/// Catalog listing entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Phone {
    pub id: PhoneId,
    #[serde(default)]
    pub brand: String,
    #[serde(default)]
    pub name: String,
    pub base_price: Price,
    #[serde(default)]
    pub image_url: String,
}

impl HasId for Phone {
    type Id = PhoneId;

    fn id(&self) -> &PhoneId {
        &self.id
    }
}

/// Technical specifications of a phone. Every field may be missing.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PhoneSpecs {
    pub screen: Option<String>,
    pub resolution: Option<String>,
    pub processor: Option<String>,
    pub main_camera: Option<String>,
    pub selfie_camera: Option<String>,
    pub battery: Option<String>,
    pub os: Option<String>,
    pub screen_refresh_rate: Option<String>,
}

/// One labelled row of the specification table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SpecRow<'a> {
    pub label: &'static str,
    pub value: &'a str,
}

/// Full product record for the detail view.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PhoneDetail {
    pub id: PhoneId,
    #[serde(default)]
    pub brand: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub base_price: Price,
    #[serde(default)]
    pub rating: f64,
    #[serde(default)]
    pub specs: PhoneSpecs,
    #[serde(default)]
    pub color_options: Vec<ColorOption>,
    #[serde(default)]
    pub storage_options: Vec<StorageOption>,
    #[serde(default)]
    pub similar_products: Vec<Phone>,
}

impl PhoneDetail {
    /// Labelled specification rows in display order.
    ///
    /// Rows with a missing or empty value are dropped.
    #[must_use]
    pub fn spec_rows(&self) -> Vec<SpecRow<'_>> {
        let specs = &self.specs;
        let rows: [(&'static str, Option<&str>); 11] = [
            ("Brand", Some(self.brand.as_str())),
            ("Name", Some(self.name.as_str())),
            ("Description", Some(self.description.as_str())),
            ("Screen", specs.screen.as_deref()),
            ("Resolution", specs.resolution.as_deref()),
            ("Processor", specs.processor.as_deref()),
            ("Main camera", specs.main_camera.as_deref()),
            ("Selfie camera", specs.selfie_camera.as_deref()),
            ("Battery", specs.battery.as_deref()),
            ("OS", specs.os.as_deref()),
            ("Screen refresh rate", specs.screen_refresh_rate.as_deref()),
        ];

        rows.into_iter()
            .filter_map(|(label, value)| {
                value
                    .filter(|v| !v.is_empty())
                    .map(|value| SpecRow { label, value })
            })
            .collect()
    }

    /// Price line for the detail view.
    ///
    /// Shows the exact price once a storage option is chosen, otherwise the
    /// "From" base price.
    #[must_use]
    pub fn price_label(&self, selected: Option<&StorageOption>) -> String {
        selected.map_or_else(
            || format!("From {}", self.base_price),
            |storage| storage.price.to_string(),
        )
    }
}
