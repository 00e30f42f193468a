//! Async seams between the catalog and whatever serves it.

use async_trait::async_trait;
use storefront_core::ProductId;

use crate::error::CatalogError;
use crate::product::{NewProduct, Product};

/// Read side: what listing pages and the cart need.
#[async_trait]
pub trait CatalogSource: Send + Sync {
    async fn list_products(&self) -> Result<Vec<Product>, CatalogError>;

    async fn get_product(&self, id: ProductId) -> Result<Product, CatalogError>;
}

/// Write side: the admin panel's CRUD operations.
#[async_trait]
pub trait CatalogAdmin: Send + Sync {
    async fn create_product(&self, product: NewProduct) -> Result<Product, CatalogError>;

    async fn update_product(
        &self,
        id: ProductId,
        product: NewProduct,
    ) -> Result<Product, CatalogError>;

    async fn delete_product(&self, id: ProductId) -> Result<(), CatalogError>;
}
