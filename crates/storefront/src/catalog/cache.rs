//! Cache types for catalog API responses.

use mobile_store_core::{Phone, PhoneDetail, PhoneId};

/// Cache key for products.
///
/// Search results are never cached, so the listing has a single key.
#[derive(Debug, Clone, Hash, PartialEq, Eq)]
pub enum CacheKey {
    Products,
    Product(PhoneId),
}

/// Cached value types.
#[derive(Debug, Clone)]
pub enum CacheValue {
    Products(Vec<Phone>),
    Product(Box<PhoneDetail>),
}
