use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use storefront_cart::CartSnapshot;
use storefront_core::{CartId, ProductId, UserId};

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SyncError {
    #[error("no async runtime available to run the sync")]
    NoRuntime,
    #[error("network error: {0}")]
    Network(String),
    #[error("API error ({0}): {1}")]
    Api(u16, String),
    #[error("parse error: {0}")]
    Parse(String),
}

/// Wire body of `POST /carts` and `PUT /carts/{id}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RemoteCart {
    pub user_id: UserId,
    pub date: DateTime<Utc>,
    pub products: Vec<RemoteCartLine>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RemoteCartLine {
    pub product_id: ProductId,
    pub quantity: u32,
}

impl RemoteCart {
    pub fn empty(user_id: UserId, date: DateTime<Utc>) -> Self {
        Self {
            user_id,
            date,
            products: Vec::new(),
        }
    }

    /// Only ids and quantities travel; titles and prices stay local.
    pub fn from_snapshot(user_id: UserId, snapshot: &CartSnapshot, date: DateTime<Utc>) -> Self {
        Self {
            user_id,
            date,
            products: snapshot
                .lines
                .iter()
                .map(|line| RemoteCartLine {
                    product_id: line.product_id,
                    quantity: line.quantity,
                })
                .collect(),
        }
    }
}

/// Remote cart store.
#[async_trait]
pub trait CartSyncClient: Send + Sync {
    /// Create an empty remote cart for `user_id` and return its id.
    async fn create_cart(&self, user_id: UserId) -> Result<CartId, SyncError>;

    /// Replace the remote cart's contents.
    async fn push_cart(&self, cart_id: CartId, cart: &RemoteCart) -> Result<(), SyncError>;
}
