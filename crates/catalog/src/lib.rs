//! Product catalog: read model, queries, and the sources that supply it.
//!
//! The cart only needs `id`, `title`, `price` and `image` from a product; the
//! rest feeds listing pages (search, category filter, sorting) and the admin
//! CRUD screens.

pub mod error;
pub mod http;
pub mod memory;
pub mod product;
pub mod query;
pub mod source;

pub use error::CatalogError;
pub use http::HttpCatalog;
pub use memory::InMemoryCatalog;
pub use product::{NewProduct, Product, Rating};
pub use query::{CatalogQuery, SortOrder, categories};
pub use source::{CatalogAdmin, CatalogSource};
