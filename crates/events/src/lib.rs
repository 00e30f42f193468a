//! Domain events and the notification side channel.
//!
//! Aggregates describe what happened through [`Event`] values; hosts fan
//! those (and other notifications) out to listeners through an [`EventBus`].

pub mod bus;
pub mod event;
pub mod in_memory_bus;

pub use bus::{EventBus, Subscription};
pub use event::Event;
pub use in_memory_bus::{InMemoryBusError, InMemoryEventBus};
