//! `storefront-core`: domain building blocks for the cart and catalog.
//!
//! This crate contains **pure domain** primitives (no IO, no HTTP, no storage).

pub mod aggregate;
pub mod entity;
pub mod error;
pub mod id;
pub mod money;
pub mod value_object;

pub use aggregate::{Aggregate, AggregateRoot};
pub use entity::Entity;
pub use error::{DomainError, DomainResult};
pub use id::{CartId, ProductId, UserId};
pub use money::Money;
pub use value_object::ValueObject;
