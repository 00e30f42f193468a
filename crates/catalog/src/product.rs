use serde::{Deserialize, Serialize};

use storefront_core::{DomainError, DomainResult, Entity, Money, ProductId};

/// Catalog read model, shaped like the Fake Store `/products` payload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    pub id: ProductId,
    pub title: String,
    pub price: Money,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub image: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rating: Option<Rating>,
}

impl Entity for Product {
    type Id = ProductId;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}

/// Customer rating as reported by the remote catalog.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rating {
    pub rate: f64,
    pub count: u64,
}

/// Admin form payload for creating or replacing a product.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewProduct {
    pub title: String,
    pub price: Money,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub image: String,
}

impl NewProduct {
    pub fn validate(&self) -> DomainResult<()> {
        if self.title.trim().is_empty() {
            return Err(DomainError::validation("title must not be empty"));
        }
        Ok(())
    }

    pub fn into_product(self, id: ProductId) -> Product {
        Product {
            id,
            title: self.title,
            price: self.price,
            description: self.description,
            category: self.category,
            image: self.image,
            rating: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_fake_store_payload() {
        let json = r#"{
            "id": 1,
            "title": "Fjallraven - Foldsack No. 1 Backpack, Fits 15 Laptops",
            "price": 109.95,
            "description": "Your perfect pack for everyday use",
            "category": "men's clothing",
            "image": "https://fakestoreapi.com/img/81fPKd-2AYL._AC_SL1500_.jpg",
            "rating": { "rate": 3.9, "count": 120 }
        }"#;

        let product: Product = serde_json::from_str(json).unwrap();
        assert_eq!(product.id, ProductId::new(1));
        assert_eq!(product.price.cents(), 10_995);
        assert_eq!(product.category, "men's clothing");
        assert_eq!(product.rating.map(|r| r.count), Some(120));
    }

    #[test]
    fn missing_descriptive_fields_default_to_empty() {
        let product: Product =
            serde_json::from_str(r#"{ "id": 5, "title": "Mug", "price": 3 }"#).unwrap();
        assert!(product.description.is_empty());
        assert!(product.rating.is_none());
    }

    #[test]
    fn negative_price_is_rejected() {
        let err = serde_json::from_str::<Product>(r#"{ "id": 5, "title": "Mug", "price": -3 }"#);
        assert!(err.is_err());
    }

    #[test]
    fn blank_title_fails_validation() {
        let draft = NewProduct {
            title: "   ".into(),
            price: Money::from_cents(100),
            description: String::new(),
            category: String::new(),
            image: String::new(),
        };
        assert!(matches!(draft.validate(), Err(DomainError::Validation(_))));
    }
}
