//! HTTP client for the product catalog.

use crate::categories::derive_categories;
use crate::config::CatalogConfig;
use crate::dto::{Category, Product, ProductListing};
use crate::error::{CatalogError, Result};
use crate::query::{DetailQuery, ProductQuery, RequestTarget};
use rivo_mode::CacheMode;
use serde::de::DeserializeOwned;

const USER_AGENT: &str = concat!("rivo/", env!("CARGO_PKG_VERSION"));

/// Listing size used when deriving categories.
pub const CATEGORY_SAMPLE_LIMIT: u32 = 100;

/// Catalog consumer. Each call issues a single request; there is no retry.
#[derive(Debug, Clone)]
pub struct CatalogClient {
    http: reqwest::Client,
    config: CatalogConfig,
}

impl CatalogClient {
    pub fn new(config: CatalogConfig) -> Self {
        Self {
            http: reqwest::Client::new(),
            config,
        }
    }

    /// Use a preconfigured HTTP client (timeouts, proxies).
    pub fn with_http(config: CatalogConfig, http: reqwest::Client) -> Self {
        Self { http, config }
    }

    pub fn config(&self) -> &CatalogConfig {
        &self.config
    }

    /// Where a listing request for `page` would go.
    pub fn products_target(&self, page: u32, limit: u32, mode: CacheMode) -> RequestTarget {
        let query = ProductQuery::new(self.config.category_id.clone(), page, limit);
        RequestTarget::resolve(&self.config, &self.config.plp_url, query.params(mode))
    }

    /// Where a detail request for `id` would go.
    pub fn detail_target(&self, id: &str, mode: CacheMode) -> RequestTarget {
        let query = DetailQuery::new(id);
        RequestTarget::resolve(&self.config, &self.config.pdp_url, query.params(mode))
    }

    pub async fn get_products(
        &self,
        page: u32,
        limit: u32,
        mode: CacheMode,
    ) -> Result<ProductListing> {
        self.fetch(self.products_target(page, limit, mode))
            .await
            .inspect_err(|e| tracing::error!(page, error = %e, "getProducts failed"))
    }

    /// First product of the detail response, if any.
    pub async fn get_product_detail(&self, id: &str, mode: CacheMode) -> Result<Option<Product>> {
        let listing: ProductListing = self
            .fetch(self.detail_target(id, mode))
            .await
            .inspect_err(|e| tracing::error!(id, error = %e, "getProductDetail failed"))?;
        Ok(listing.products.into_iter().next())
    }

    /// Category tiles for the home view. Failures yield an empty list.
    pub async fn get_categories(&self, mode: CacheMode) -> Vec<Category> {
        match self.get_products(1, CATEGORY_SAMPLE_LIMIT, mode).await {
            Ok(listing) => derive_categories(&listing.products),
            Err(e) => {
                tracing::warn!(error = %e, "failed to fetch categories");
                Vec::new()
            }
        }
    }

    async fn fetch<T: DeserializeOwned>(&self, target: RequestTarget) -> Result<T> {
        let url = target.to_url()?;
        tracing::debug!(%url, "catalog request");

        let resp = self
            .http
            .get(url)
            .header("User-Agent", USER_AGENT)
            .send()
            .await
            .map_err(|e| CatalogError::RequestFailed(e.to_string()))?;

        if !resp.status().is_success() {
            return Err(CatalogError::Status(resp.status().as_u16()));
        }

        resp.json::<T>()
            .await
            .map_err(|e| CatalogError::Decode(e.to_string()))
    }
}

impl Default for CatalogClient {
    fn default() -> Self {
        Self::new(CatalogConfig::default())
    }
}
