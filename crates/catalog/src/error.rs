use thiserror::Error;

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("invalid url: {0}")]
    InvalidUrl(String),

    #[error("request failed: {0}")]
    RequestFailed(String),

    #[error("HTTP error! status: {0}")]
    Status(u16),

    #[error("failed to decode response: {0}")]
    Decode(String),
}

pub type Result<T> = std::result::Result<T, CatalogError>;
