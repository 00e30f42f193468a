use serde::{Deserialize, Serialize};

use storefront_catalog::Product;
use storefront_core::{Entity, Money, ProductId};

/// One distinct product in the cart.
///
/// `title`, `unit_price` and `image_ref` are captured when the product is
/// first added and never refreshed from the catalog afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartLine {
    pub product_id: ProductId,
    pub title: String,
    pub unit_price: Money,
    #[serde(default)]
    pub image_ref: String,
    pub quantity: u32,
}

impl CartLine {
    pub fn from_product(product: &Product, quantity: u32) -> Self {
        Self {
            product_id: product.id,
            title: product.title.clone(),
            unit_price: product.price,
            image_ref: product.image.clone(),
            quantity,
        }
    }

    pub fn line_total(&self) -> Money {
        self.unit_price.times(u64::from(self.quantity))
    }
}

impl Entity for CartLine {
    type Id = ProductId;

    fn id(&self) -> &Self::Id {
        &self.product_id
    }
}
