//! Listing queries: free-text search, category filter, sort order.

use core::str::FromStr;

use serde::{Deserialize, Serialize};
use storefront_core::DomainError;

use crate::product::Product;

/// Category label the listing UI uses for "no filter".
pub const ALL_CATEGORIES: &str = "all";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SortOrder {
    /// Keep the order the source returned.
    #[default]
    Default,
    PriceLow,
    PriceHigh,
    Name,
}

impl SortOrder {
    pub fn as_str(&self) -> &'static str {
        match self {
            SortOrder::Default => "default",
            SortOrder::PriceLow => "price-low",
            SortOrder::PriceHigh => "price-high",
            SortOrder::Name => "name",
        }
    }
}

impl FromStr for SortOrder {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "" | "default" => Ok(SortOrder::Default),
            "price-low" => Ok(SortOrder::PriceLow),
            "price-high" => Ok(SortOrder::PriceHigh),
            "name" => Ok(SortOrder::Name),
            other => Err(DomainError::validation(format!("unknown sort order: {other}"))),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CatalogQuery {
    search: Option<String>,
    category: Option<String>,
    sort: SortOrder,
}

impl CatalogQuery {
    pub fn new() -> Self {
        Self::default()
    }

    /// Case-insensitive match against title or description. Blank terms are ignored.
    pub fn search(mut self, term: impl Into<String>) -> Self {
        let term = term.into().trim().to_lowercase();
        self.search = (!term.is_empty()).then_some(term);
        self
    }

    /// Exact category match; `"all"` clears the filter.
    pub fn category(mut self, category: impl Into<String>) -> Self {
        let category = category.into();
        self.category = (category != ALL_CATEGORIES && !category.is_empty()).then_some(category);
        self
    }

    pub fn sort(mut self, sort: SortOrder) -> Self {
        self.sort = sort;
        self
    }

    pub fn matches(&self, product: &Product) -> bool {
        let matches_search = self.search.as_deref().is_none_or(|term| {
            product.title.to_lowercase().contains(term)
                || product.description.to_lowercase().contains(term)
        });
        let matches_category = self
            .category
            .as_deref()
            .is_none_or(|category| product.category == category);
        matches_search && matches_category
    }

    pub fn apply(&self, products: &[Product]) -> Vec<Product> {
        let mut filtered: Vec<Product> = products
            .iter()
            .filter(|p| self.matches(p))
            .cloned()
            .collect();

        // Stable sorts: ties keep source order.
        match self.sort {
            SortOrder::Default => {}
            SortOrder::PriceLow => filtered.sort_by_key(|p| p.price),
            SortOrder::PriceHigh => filtered.sort_by(|a, b| b.price.cmp(&a.price)),
            SortOrder::Name => filtered.sort_by_cached_key(|p| p.title.to_lowercase()),
        }

        filtered
    }
}

/// Distinct categories in first-seen order.
pub fn categories(products: &[Product]) -> Vec<String> {
    let mut seen: Vec<String> = Vec::new();
    for product in products {
        if !seen.iter().any(|c| c == &product.category) {
            seen.push(product.category.clone());
        }
    }
    seen
}
