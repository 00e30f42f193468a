use storefront_core::{DomainError, ProductId};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("network error: {0}")]
    Network(String),
    #[error("API error ({0}): {1}")]
    Api(u16, String),
    #[error("parse error: {0}")]
    Parse(String),
    #[error("product {0} not found")]
    NotFound(ProductId),
    #[error(transparent)]
    Invalid(#[from] DomainError),
}
