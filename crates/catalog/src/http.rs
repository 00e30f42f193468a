//! Fake Store API client for catalog reads and admin CRUD.

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use storefront_core::ProductId;

use crate::error::CatalogError;
use crate::product::{NewProduct, Product};
use crate::source::{CatalogAdmin, CatalogSource};

pub const DEFAULT_BASE_URL: &str = "https://fakestoreapi.com";

/// HTTP-backed catalog (`{base}/products`).
#[derive(Debug, Clone)]
pub struct HttpCatalog {
    base_url: String,
    client: reqwest::Client,
}

impl HttpCatalog {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::with_client(base_url, reqwest::Client::new())
    }

    /// Share a connection pool with other clients of the same host.
    pub fn with_client(base_url: impl Into<String>, client: reqwest::Client) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self { base_url, client }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn products_url(&self) -> String {
        format!("{}/products", self.base_url)
    }

    fn product_url(&self, id: ProductId) -> String {
        format!("{}/products/{}", self.base_url, id)
    }
}

impl Default for HttpCatalog {
    fn default() -> Self {
        Self::new(DEFAULT_BASE_URL)
    }
}

/// Decode a response body; `Ok(None)` when the API answers with an empty body or `null`.
///
/// The Fake Store API replies `200` with no body for ids it doesn't know.
async fn decode<T: DeserializeOwned>(resp: reqwest::Response) -> Result<Option<T>, CatalogError> {
    let status = resp.status();
    if !status.is_success() {
        let body = resp.text().await.unwrap_or_default();
        return Err(CatalogError::Api(status.as_u16(), body));
    }

    let body = resp
        .text()
        .await
        .map_err(|e| CatalogError::Network(e.to_string()))?;
    let trimmed = body.trim();
    if trimmed.is_empty() || trimmed == "null" {
        return Ok(None);
    }

    serde_json::from_str(trimmed)
        .map(Some)
        .map_err(|e| CatalogError::Parse(e.to_string()))
}

fn network(e: reqwest::Error) -> CatalogError {
    CatalogError::Network(e.to_string())
}

#[async_trait]
impl CatalogSource for HttpCatalog {
    async fn list_products(&self) -> Result<Vec<Product>, CatalogError> {
        let resp = self
            .client
            .get(self.products_url())
            .send()
            .await
            .map_err(network)?;

        let products: Vec<Product> = decode(resp).await?.unwrap_or_default();
        tracing::debug!(count = products.len(), "catalog fetched");
        Ok(products)
    }

    async fn get_product(&self, id: ProductId) -> Result<Product, CatalogError> {
        let resp = self
            .client
            .get(self.product_url(id))
            .send()
            .await
            .map_err(network)?;

        decode(resp).await?.ok_or(CatalogError::NotFound(id))
    }
}

#[async_trait]
impl CatalogAdmin for HttpCatalog {
    async fn create_product(&self, product: NewProduct) -> Result<Product, CatalogError> {
        product.validate()?;
        let resp = self
            .client
            .post(self.products_url())
            .json(&product)
            .send()
            .await
            .map_err(network)?;

        let created: Product = decode(resp)
            .await?
            .ok_or_else(|| CatalogError::Parse("empty response to product create".into()))?;
        tracing::info!(product_id = %created.id, "product created");
        Ok(created)
    }

    async fn update_product(
        &self,
        id: ProductId,
        product: NewProduct,
    ) -> Result<Product, CatalogError> {
        product.validate()?;
        let resp = self
            .client
            .put(self.product_url(id))
            .json(&product)
            .send()
            .await
            .map_err(network)?;

        let updated: Product = decode(resp).await?.ok_or(CatalogError::NotFound(id))?;
        tracing::info!(product_id = %id, "product updated");
        Ok(updated)
    }

    async fn delete_product(&self, id: ProductId) -> Result<(), CatalogError> {
        let resp = self
            .client
            .delete(self.product_url(id))
            .send()
            .await
            .map_err(network)?;

        // The body echoes the deleted product (or nothing); only the status matters.
        let _: Option<serde_json::Value> = decode(resp).await?;
        tracing::info!(product_id = %id, "product deleted");
        Ok(())
    }
}
