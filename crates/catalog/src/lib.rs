//! Storefront catalog consumer.
//!
//! Builds listing and detail requests that honor the cache mode, fetches
//! them with `reqwest`, and derives the category tiles and product
//! highlights the views show.
//!
//! ```text
//! CacheMode ──► ProductQuery / DetailQuery ──► RequestTarget ──► CatalogClient
//!                                              (direct | proxy)      │
//!                                                                    ▼
//!                                   derive_categories ◄── ProductListing
//! ```

mod categories;
mod client;
mod config;
mod dto;
mod error;
mod highlights;
mod query;

pub use categories::{derive_categories, EXCLUDED_CATEGORIES, MAX_CATEGORIES};
pub use client::{CatalogClient, CATEGORY_SAMPLE_LIMIT};
pub use config::{
    CatalogConfig, DEFAULT_CATEGORY_ID, DEFAULT_PAGE_SIZE, DEFAULT_PDP_URL, DEFAULT_PLP_URL,
};
pub use dto::{Category, MediaEntry, Price, Product, ProductAttributes, ProductId, ProductListing};
pub use error::{CatalogError, Result};
pub use highlights::parse_highlights;
pub use query::{
    DetailQuery, ProductQuery, QueryParams, RequestTarget, ENDPOINT_PARAM, USE_REDIS_PARAM,
};
