use thiserror::Error;

use storefront_cart::CartError;
use storefront_catalog::CatalogError;
use storefront_core::DomainError;
use storefront_sync::SyncError;

use crate::store::StoreError;

#[derive(Debug, Error)]
pub enum ShellError {
    #[error(transparent)]
    Cart(#[from] CartError),

    #[error(transparent)]
    Catalog(#[from] CatalogError),

    #[error(transparent)]
    Sync(#[from] SyncError),

    #[error("local store: {0}")]
    Store(#[from] StoreError),

    #[error(transparent)]
    Invalid(#[from] DomainError),

    #[error("cart is empty")]
    EmptyCart,

    #[error("remote cart sync is not configured")]
    SyncDisabled,
}
