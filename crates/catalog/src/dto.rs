//! Catalog response shapes.
//!
//! Only the fields the storefront reads are modelled. Everything is
//! defaulted so sparse upstream records still decode.

use serde::{Deserialize, Serialize};

/// Product identifier. The upstream sends numbers but strings are accepted.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ProductId {
    Number(i64),
    Text(String),
}

impl Default for ProductId {
    fn default() -> Self {
        ProductId::Number(0)
    }
}

impl std::fmt::Display for ProductId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ProductId::Number(n) => write!(f, "{}", n),
            ProductId::Text(s) => write!(f, "{}", s),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Price {
    #[serde(default)]
    pub price: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProductAttributes {
    pub name: Option<String>,
    pub brand: Option<String>,
    pub image: Option<String>,
    pub thumbnail: Option<String>,
    pub small_image: Option<String>,
    /// Comma-separated category names.
    pub category_names: Option<String>,
    pub description: Option<String>,
    pub short_description: Option<String>,
    /// JSON-encoded highlight list, see [`crate::parse_highlights`].
    pub listing_highlights_section: Option<String>,
    pub stock_msg: Option<String>,
    pub manufacturer: Option<String>,
    pub model: Option<String>,
    pub fivetech_sku: Option<String>,
    pub sku: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MediaEntry {
    #[serde(default)]
    pub file: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Product {
    pub id: ProductId,
    pub sku: String,
    pub name: String,
    pub price: Option<Price>,
    pub attributes: Option<ProductAttributes>,
    pub media_gallery: Vec<MediaEntry>,
    pub brand: Option<String>,
    pub image: Option<String>,
}

impl Product {
    /// Long description, falling back to the short one.
    pub fn description(&self) -> &str {
        self.attributes
            .as_ref()
            .and_then(|a| {
                non_empty(a.description.as_deref()).or(non_empty(a.short_description.as_deref()))
            })
            .unwrap_or("")
    }

    pub fn has_highlights(&self) -> bool {
        self.attributes
            .as_ref()
            .and_then(|a| non_empty(a.listing_highlights_section.as_deref()))
            .is_some()
    }
}

/// Listing and detail responses share this envelope.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProductListing {
    pub products: Vec<Product>,
    pub total: u64,
}

/// Category tile derived from product data.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    pub id: String,
    pub name: String,
    pub image: Option<String>,
}

/// Treats empty strings like missing values.
pub(crate) fn non_empty(value: Option<&str>) -> Option<&str> {
    value.filter(|s| !s.is_empty())
}
