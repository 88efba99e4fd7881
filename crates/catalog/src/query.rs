//! Query construction for catalog requests.
//!
//! Every request carries `use_redis=true` as its final upstream parameter
//! when the cache mode is on, and omits it entirely otherwise.

use crate::config::CatalogConfig;
use crate::error::{CatalogError, Result};
use rivo_mode::CacheMode;

pub type QueryParams = Vec<(&'static str, String)>;

/// Parameter asking the upstream to serve from its cache.
pub const USE_REDIS_PARAM: &str = "use_redis";

/// Parameter carrying the upstream URL through the proxy.
pub const ENDPOINT_PARAM: &str = "endpoint";

fn append_mode(params: &mut QueryParams, mode: CacheMode) {
    if mode.is_enabled() {
        params.push((USE_REDIS_PARAM, "true".to_string()));
    }
}

/// One page of the product listing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProductQuery {
    pub category_id: String,
    pub page: u32,
    pub limit: u32,
}

impl ProductQuery {
    pub fn new(category_id: impl Into<String>, page: u32, limit: u32) -> Self {
        Self {
            category_id: category_id.into(),
            page,
            limit,
        }
    }

    pub fn params(&self, mode: CacheMode) -> QueryParams {
        let mut params = vec![
            ("category_id", self.category_id.clone()),
            ("page", self.page.to_string()),
            ("limit", self.limit.to_string()),
            ("showBy", "price".to_string()),
            ("sort_by", "desc".to_string()),
            ("priceRange", "0_905".to_string()),
        ];
        append_mode(&mut params, mode);
        params
    }
}

/// A single product's detail page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DetailQuery {
    pub id: String,
}

impl DetailQuery {
    pub fn new(id: impl Into<String>) -> Self {
        Self { id: id.into() }
    }

    pub fn params(&self, mode: CacheMode) -> QueryParams {
        let mut params = vec![("id", self.id.clone())];
        append_mode(&mut params, mode);
        params
    }
}

/// Resolved destination of a request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestTarget {
    pub url: String,
    pub params: QueryParams,
}

impl RequestTarget {
    /// Route `params` for `upstream` directly or through the configured proxy.
    pub fn resolve(config: &CatalogConfig, upstream: &str, mut params: QueryParams) -> Self {
        match &config.proxy_url {
            Some(proxy) => {
                params.push((ENDPOINT_PARAM, upstream.to_string()));
                Self {
                    url: proxy.clone(),
                    params,
                }
            }
            None => Self {
                url: upstream.to_string(),
                params,
            },
        }
    }

    /// Full URL with the query string encoded in parameter order.
    pub fn to_url(&self) -> Result<reqwest::Url> {
        reqwest::Url::parse_with_params(
            &self.url,
            self.params.iter().map(|(k, v)| (*k, v.as_str())),
        )
        .map_err(|e| CatalogError::InvalidUrl(format!("{}: {}", self.url, e)))
    }

    pub fn has_param(&self, name: &str) -> bool {
        self.params.iter().any(|(k, _)| *k == name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn keys(params: &QueryParams) -> Vec<&'static str> {
        params.iter().map(|(k, _)| *k).collect()
    }

    #[test]
    fn test_listing_params_cache_off() {
        let params = ProductQuery::new("55873", 2, 24).params(CacheMode::Off);
        assert_eq!(
            keys(&params),
            vec!["category_id", "page", "limit", "showBy", "sort_by", "priceRange"]
        );
        assert_eq!(params[1].1, "2");
        assert_eq!(params[5].1, "0_905");
    }

    #[test]
    fn test_listing_params_cache_on_appends_last() {
        let params = ProductQuery::new("55873", 1, 24).params(CacheMode::On);
        assert_eq!(params.last(), Some(&("use_redis", "true".to_string())));
        assert_eq!(params.len(), 7);
    }

    #[test]
    fn test_detail_params() {
        let off = DetailQuery::new("8123").params(CacheMode::Off);
        assert_eq!(off, vec![("id", "8123".to_string())]);

        let on = DetailQuery::new("8123").params(CacheMode::On);
        assert_eq!(
            on,
            vec![("id", "8123".to_string()), ("use_redis", "true".to_string())]
        );
    }

    #[test]
    fn test_direct_target_url() {
        let config = CatalogConfig::default();
        let target = RequestTarget::resolve(
            &config,
            &config.pdp_url,
            DetailQuery::new("42").params(CacheMode::On),
        );
        let url = target.to_url().unwrap();
        assert_eq!(url.query(), Some("id=42&use_redis=true"));
        assert!(url.as_str().starts_with(&config.pdp_url));
    }

    #[test]
    fn test_proxy_target_carries_endpoint() {
        let config = CatalogConfig {
            proxy_url: Some("http://localhost:3000/api/proxy".to_string()),
            ..Default::default()
        };
        let target = RequestTarget::resolve(
            &config,
            &config.plp_url,
            ProductQuery::new("55873", 1, 24).params(CacheMode::Off),
        );

        assert_eq!(target.url, "http://localhost:3000/api/proxy");
        assert_eq!(target.params.last().unwrap().0, ENDPOINT_PARAM);
        assert_eq!(target.params.last().unwrap().1, config.plp_url);
        assert!(!target.has_param(USE_REDIS_PARAM));
    }

    #[test]
    fn test_invalid_base_url() {
        let target = RequestTarget {
            url: "not a url".to_string(),
            params: Vec::new(),
        };
        assert!(matches!(target.to_url(), Err(CatalogError::InvalidUrl(_))));
    }
}
