//! Storage/color selection for one product view.
//!
//! Two independent slots, each set or unset. Choosing either slot fills the
//! other with its first option when that slot is still empty, so a single
//! choice yields a configuration that can be added to the cart. A choice the
//! user already made is never replaced by the auto-fill.

use mobile_store_core::{CartLineItem, ColorOption, PhoneDetail, Price, StorageOption};
use thiserror::Error;

/// Errors from resolving user input against the product's options.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SelectionError {
    #[error("Unknown storage option: {0}")]
    UnknownStorage(String),

    #[error("Unknown color option: {0}")]
    UnknownColor(String),

    #[error("Select a storage option and a color first")]
    Incomplete,
}

/// Construction parameters for a [`ProductSelection`].
#[derive(Debug, Clone, Default)]
pub struct SelectionConfig {
    pub default_storage: Option<StorageOption>,
    pub default_color: Option<ColorOption>,
    pub storage_options: Vec<StorageOption>,
    pub color_options: Vec<ColorOption>,
    pub base_price: Price,
}

/// Selection state for one product view.
#[derive(Debug, Clone)]
pub struct ProductSelection {
    config: SelectionConfig,
    storage: Option<StorageOption>,
    color: Option<ColorOption>,
}

impl ProductSelection {
    /// Start from the configured defaults.
    #[must_use]
    pub fn new(config: SelectionConfig) -> Self {
        Self {
            storage: config.default_storage.clone(),
            color: config.default_color.clone(),
            config,
        }
    }

    /// Empty selection over `phone`'s options.
    #[must_use]
    pub fn for_product(phone: &PhoneDetail) -> Self {
        Self::new(SelectionConfig {
            default_storage: None,
            default_color: None,
            storage_options: phone.storage_options.clone(),
            color_options: phone.color_options.clone(),
            base_price: phone.base_price,
        })
    }

    #[must_use]
    pub const fn selected_storage(&self) -> Option<&StorageOption> {
        self.storage.as_ref()
    }

    #[must_use]
    pub const fn selected_color(&self) -> Option<&ColorOption> {
        self.color.as_ref()
    }

    /// Choose a storage option. Fills an empty color slot with the first color.
    pub fn select_storage(&mut self, storage: StorageOption) {
        self.storage = Some(storage);
        if self.color.is_none() {
            self.color = self.config.color_options.first().cloned();
        }
    }

    /// Choose a color. Fills an empty storage slot with the first storage option.
    pub fn select_color(&mut self, color: ColorOption) {
        self.color = Some(color);
        if self.storage.is_none() {
            self.storage = self.config.storage_options.first().cloned();
        }
    }

    /// Restore the construction defaults.
    pub fn reset(&mut self) {
        self.storage = self.config.default_storage.clone();
        self.color = self.config.default_color.clone();
    }

    /// Both slots are set.
    #[must_use]
    pub const fn can_add_to_cart(&self) -> bool {
        self.storage.is_some() && self.color.is_some()
    }

    /// Selected storage price, or the base price before a choice is made.
    #[must_use]
    pub fn display_price(&self) -> Price {
        self.storage
            .as_ref()
            .map_or(self.config.base_price, |s| s.price)
    }

    /// Image of the selected color, else of the first color option.
    #[must_use]
    pub fn display_image(&self) -> Option<&str> {
        self.color
            .as_ref()
            .or_else(|| self.config.color_options.first())
            .map(|c| c.image_url.as_str())
    }

    /// Line item for the current configuration of `phone`.
    ///
    /// `None` until both slots are set.
    #[must_use]
    pub fn line_item(&self, phone: &PhoneDetail) -> Option<CartLineItem> {
        match (&self.storage, &self.color) {
            (Some(storage), Some(color)) => {
                Some(CartLineItem::for_configuration(phone, storage, color))
            }
            _ => None,
        }
    }

    /// Like [`Self::line_item`], but reports why nothing can be added.
    ///
    /// # Errors
    ///
    /// Returns [`SelectionError::Incomplete`] if either slot is unset.
    pub fn require_line_item(&self, phone: &PhoneDetail) -> Result<CartLineItem, SelectionError> {
        self.line_item(phone).ok_or(SelectionError::Incomplete)
    }

    /// Find a storage option by capacity, ignoring case and spaces.
    ///
    /// # Errors
    ///
    /// Returns [`SelectionError::UnknownStorage`] if no option matches.
    pub fn storage_option(&self, capacity: &str) -> Result<StorageOption, SelectionError> {
        let wanted = compact(capacity);
        self.config
            .storage_options
            .iter()
            .find(|s| compact(&s.capacity) == wanted)
            .cloned()
            .ok_or_else(|| SelectionError::UnknownStorage(capacity.to_string()))
    }

    /// Find a color option by name or hex code, ignoring case.
    ///
    /// # Errors
    ///
    /// Returns [`SelectionError::UnknownColor`] if no option matches.
    pub fn color_option(&self, name_or_hex: &str) -> Result<ColorOption, SelectionError> {
        let wanted = name_or_hex.trim();
        self.config
            .color_options
            .iter()
            .find(|c| c.name.eq_ignore_ascii_case(wanted) || c.hex_code.eq_ignore_ascii_case(wanted))
            .cloned()
            .ok_or_else(|| SelectionError::UnknownColor(name_or_hex.to_string()))
    }
}

fn compact(value: &str) -> String {
    value
        .chars()
        .filter(|c| !c.is_whitespace())
        .flat_map(char::to_lowercase)
        .collect()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use mobile_store_core::PhoneId;

    use super::*;

    fn storage(capacity: &str, price: i64) -> StorageOption {
        StorageOption {
            capacity: capacity.to_string(),
            price: Price::from_units(price),
        }
    }

    fn color(name: &str, hex: &str) -> ColorOption {
        ColorOption {
            name: name.to_string(),
            hex_code: hex.to_string(),
            image_url: format!("https://img.test/{name}.png"),
        }
    }

    fn phone() -> PhoneDetail {
        PhoneDetail {
            id: PhoneId::new("p1"),
            brand: "Samsung".to_string(),
            name: "Galaxy S24".to_string(),
            description: String::new(),
            base_price: Price::from_units(899),
            rating: 4.5,
            specs: mobile_store_core::PhoneSpecs::default(),
            color_options: vec![color("Black", "#000000"), color("Violet", "#8A2BE2")],
            storage_options: vec![storage("128 GB", 899), storage("256 GB", 959)],
            similar_products: Vec::new(),
        }
    }

    #[test]
    fn test_starts_empty() {
        let selection = ProductSelection::for_product(&phone());
        assert!(selection.selected_storage().is_none());
        assert!(selection.selected_color().is_none());
        assert!(!selection.can_add_to_cart());
        assert_eq!(selection.display_price(), Price::from_units(899));
        assert_eq!(selection.display_image(), Some("https://img.test/Black.png"));
    }

    #[test]
    fn test_select_storage_autofills_color() {
        let mut selection = ProductSelection::for_product(&phone());
        selection.select_storage(storage("256 GB", 959));

        assert_eq!(selection.selected_color(), Some(&color("Black", "#000000")));
        assert!(selection.can_add_to_cart());
        assert_eq!(selection.display_price(), Price::from_units(959));
    }

    #[test]
    fn test_select_color_autofills_storage() {
        let mut selection = ProductSelection::for_product(&phone());
        selection.select_color(color("Violet", "#8A2BE2"));

        assert_eq!(selection.selected_storage(), Some(&storage("128 GB", 899)));
        assert_eq!(selection.display_image(), Some("https://img.test/Violet.png"));
    }

    #[test]
    fn test_autofill_never_overwrites() {
        let mut selection = ProductSelection::for_product(&phone());
        selection.select_color(color("Violet", "#8A2BE2"));
        selection.select_storage(storage("256 GB", 959));

        assert_eq!(selection.selected_color(), Some(&color("Violet", "#8A2BE2")));

        selection.select_color(color("Black", "#000000"));
        assert_eq!(selection.selected_storage(), Some(&storage("256 GB", 959)));
    }

    #[test]
    fn test_autofill_with_no_options_leaves_slot_empty() {
        let mut selection = ProductSelection::new(SelectionConfig {
            storage_options: vec![storage("128 GB", 100)],
            ..SelectionConfig::default()
        });
        selection.select_storage(storage("128 GB", 100));

        assert!(selection.selected_color().is_none());
        assert!(!selection.can_add_to_cart());
        assert_eq!(selection.display_image(), None);
    }

    #[test]
    fn test_reset_restores_defaults() {
        let mut selection = ProductSelection::new(SelectionConfig {
            default_storage: Some(storage("256 GB", 959)),
            default_color: Some(color("Violet", "#8A2BE2")),
            storage_options: vec![storage("128 GB", 899), storage("256 GB", 959)],
            color_options: vec![color("Black", "#000000"), color("Violet", "#8A2BE2")],
            base_price: Price::from_units(899),
        });
        selection.select_storage(storage("128 GB", 899));
        selection.select_color(color("Black", "#000000"));

        selection.reset();
        assert_eq!(selection.selected_storage(), Some(&storage("256 GB", 959)));
        assert_eq!(selection.selected_color(), Some(&color("Violet", "#8A2BE2")));
    }

    #[test]
    fn test_reset_to_empty_defaults() {
        let mut selection = ProductSelection::for_product(&phone());
        selection.select_storage(storage("128 GB", 899));
        selection.reset();
        assert!(!selection.can_add_to_cart());
        assert!(selection.selected_color().is_none());
    }

    #[test]
    fn test_line_item_requires_both_slots() {
        let detail = phone();
        let selection = ProductSelection::for_product(&detail);
        assert!(selection.line_item(&detail).is_none());
        assert_eq!(
            selection.require_line_item(&detail).unwrap_err(),
            SelectionError::Incomplete
        );
    }

    #[test]
    fn test_line_item_freezes_storage_price() {
        let detail = phone();
        let mut selection = ProductSelection::for_product(&detail);
        selection.select_storage(storage("256 GB", 959));

        let item = selection.line_item(&detail).unwrap();
        assert_eq!(item.line_id.as_str(), "p1-256 GB-#000000");
        assert_eq!(item.unit_price, selection.display_price());
        assert_eq!(item.image_url.as_deref(), Some("https://img.test/Black.png"));
    }

    #[test]
    fn test_option_lookup() {
        let selection = ProductSelection::for_product(&phone());

        assert_eq!(selection.storage_option("256gb").unwrap().capacity, "256 GB");
        assert_eq!(selection.color_option("violet").unwrap().hex_code, "#8A2BE2");
        assert_eq!(selection.color_option("#8a2be2").unwrap().name, "Violet");
        assert_eq!(
            selection.storage_option("1 TB").unwrap_err(),
            SelectionError::UnknownStorage("1 TB".to_string())
        );
        assert!(matches!(
            selection.color_option("Gold"),
            Err(SelectionError::UnknownColor(_))
        ));
    }
}
