//! Catalog endpoints and listing defaults.

use serde::{Deserialize, Serialize};

pub const DEFAULT_PDP_URL: &str = "https://admin.box.co.uk/api-buster/product-detail-page";
pub const DEFAULT_PLP_URL: &str = "https://admin.box.co.uk/api-buster/products";
pub const DEFAULT_CATEGORY_ID: &str = "55873";
pub const DEFAULT_PAGE_SIZE: u32 = 24;

/// Where catalog requests go and what the listing asks for.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CatalogConfig {
    /// Product detail endpoint.
    pub pdp_url: String,
    /// Product listing endpoint.
    pub plp_url: String,
    /// Pass-through proxy. When set, requests go here with the upstream
    /// URL in an `endpoint` parameter.
    pub proxy_url: Option<String>,
    pub category_id: String,
    pub page_size: u32,
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            pdp_url: DEFAULT_PDP_URL.to_string(),
            plp_url: DEFAULT_PLP_URL.to_string(),
            proxy_url: None,
            category_id: DEFAULT_CATEGORY_ID.to_string(),
            page_size: DEFAULT_PAGE_SIZE,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_json_keeps_defaults() {
        let config: CatalogConfig =
            serde_json::from_str(r#"{"proxy_url": "http://localhost:3000/api/proxy"}"#).unwrap();
        assert_eq!(config.proxy_url.as_deref(), Some("http://localhost:3000/api/proxy"));
        assert_eq!(config.category_id, "55873");
        assert_eq!(config.page_size, 24);
        assert_eq!(config.plp_url, DEFAULT_PLP_URL);
    }
}
