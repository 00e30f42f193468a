//! Fake Store API cart endpoint.

use async_trait::async_trait;
use chrono::Utc;
use serde::Deserialize;

use storefront_core::{CartId, UserId};

use crate::client::{CartSyncClient, RemoteCart, SyncError};

pub const DEFAULT_BASE_URL: &str = "https://fakestoreapi.com";

#[derive(Debug, Clone)]
pub struct HttpCartSync {
    base_url: String,
    client: reqwest::Client,
}

#[derive(Debug, Deserialize)]
struct CreatedCart {
    id: CartId,
}

impl HttpCartSync {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::with_client(base_url, reqwest::Client::new())
    }

    pub fn with_client(base_url: impl Into<String>, client: reqwest::Client) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self { base_url, client }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }
}

impl Default for HttpCartSync {
    fn default() -> Self {
        Self::new(DEFAULT_BASE_URL)
    }
}

async fn ensure_success(resp: reqwest::Response) -> Result<reqwest::Response, SyncError> {
    let status = resp.status();
    if status.is_success() {
        return Ok(resp);
    }
    let body = resp.text().await.unwrap_or_default();
    Err(SyncError::Api(status.as_u16(), body))
}

#[async_trait]
impl CartSyncClient for HttpCartSync {
    async fn create_cart(&self, user_id: UserId) -> Result<CartId, SyncError> {
        let url = format!("{}/carts", self.base_url);
        let resp = self
            .client
            .post(&url)
            .json(&RemoteCart::empty(user_id, Utc::now()))
            .send()
            .await
            .map_err(|e| SyncError::Network(e.to_string()))?;

        let created: CreatedCart = ensure_success(resp)
            .await?
            .json()
            .await
            .map_err(|e| SyncError::Parse(e.to_string()))?;

        tracing::info!(cart_id = %created.id, user_id = %user_id, "remote cart created");
        Ok(created.id)
    }

    async fn push_cart(&self, cart_id: CartId, cart: &RemoteCart) -> Result<(), SyncError> {
        let url = format!("{}/carts/{}", self.base_url, cart_id);
        let resp = self
            .client
            .put(&url)
            .json(cart)
            .send()
            .await
            .map_err(|e| SyncError::Network(e.to_string()))?;

        ensure_success(resp).await?;
        Ok(())
    }
}
