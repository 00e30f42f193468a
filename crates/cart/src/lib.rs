//! Cart aggregate.
//!
//! Holds the lines a shopper selected and derives totals and the order
//! summary from them. Pure domain logic: no IO, no HTTP, no storage. Hosts
//! persist [`CartSnapshot`]s and forward [`CartEvent`]s as they see fit.

pub mod cart;
pub mod error;
pub mod line;
pub mod pricing;
pub mod snapshot;

pub use cart::{
    AddItem, Cart, CartCleared, CartCommand, CartEvent, ClearCart, ItemAdded, ItemRemoved,
    QuantityChanged, RemoveItem, SetQuantity,
};
pub use error::CartError;
pub use line::CartLine;
pub use pricing::{OrderSummary, PricingPolicy};
pub use snapshot::CartSnapshot;
