//! In-memory catalog for tests and offline hosts.

use std::sync::{Mutex, MutexGuard, PoisonError};

use async_trait::async_trait;
use storefront_core::{DomainError, ProductId};

use crate::error::CatalogError;
use crate::product::{NewProduct, Product};
use crate::source::{CatalogAdmin, CatalogSource};

#[derive(Debug, Default)]
pub struct InMemoryCatalog {
    inner: Mutex<Inner>,
}

#[derive(Debug)]
struct Inner {
    products: Vec<Product>,
    /// `None` once `u64::MAX` has been handed out.
    next_id: Option<u64>,
}

impl Default for Inner {
    fn default() -> Self {
        Self {
            products: Vec::new(),
            next_id: Some(1),
        }
    }
}

impl InMemoryCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed with existing products; new ids continue after the largest one.
    pub fn with_products(products: Vec<Product>) -> Self {
        let next_id = products
            .iter()
            .map(|p| p.id.get())
            .max()
            .map_or(Some(1), |max| max.checked_add(1));
        Self {
            inner: Mutex::new(Inner { products, next_id }),
        }
    }

    fn lock(&self) -> MutexGuard<'_, Inner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[async_trait]
impl CatalogSource for InMemoryCatalog {
    async fn list_products(&self) -> Result<Vec<Product>, CatalogError> {
        Ok(self.lock().products.clone())
    }

    async fn get_product(&self, id: ProductId) -> Result<Product, CatalogError> {
        self.lock()
            .products
            .iter()
            .find(|p| p.id == id)
            .cloned()
            .ok_or(CatalogError::NotFound(id))
    }
}

#[async_trait]
impl CatalogAdmin for InMemoryCatalog {
    async fn create_product(&self, product: NewProduct) -> Result<Product, CatalogError> {
        product.validate()?;
        let mut inner = self.lock();
        let next = inner
            .next_id
            .ok_or_else(|| DomainError::validation("no product ids left"))?;
        let id = ProductId::new(next.max(1));
        inner.next_id = id.get().checked_add(1);
        let created = product.into_product(id);
        inner.products.push(created.clone());
        Ok(created)
    }

    async fn update_product(
        &self,
        id: ProductId,
        product: NewProduct,
    ) -> Result<Product, CatalogError> {
        product.validate()?;
        let mut inner = self.lock();
        let slot = inner
            .products
            .iter_mut()
            .find(|p| p.id == id)
            .ok_or(CatalogError::NotFound(id))?;
        let rating = slot.rating;
        *slot = product.into_product(id);
        slot.rating = rating;
        Ok(slot.clone())
    }

    async fn delete_product(&self, id: ProductId) -> Result<(), CatalogError> {
        let mut inner = self.lock();
        let before = inner.products.len();
        inner.products.retain(|p| p.id != id);
        if inner.products.len() == before {
            return Err(CatalogError::NotFound(id));
        }
        Ok(())
    }
}
