//! `storefront`: host application shell.
//!
//! Owns the session state explicitly: the cart, the remote cart id, the auth
//! signal, and the local key/value store they persist to. Presentation layers
//! (CLI, UI) hold a [`Storefront`] and call into it; nothing here is global.

pub mod config;
pub mod error;
pub mod session;
pub mod shell;
pub mod store;

pub use config::{ConfigError, StorefrontConfig};
pub use error::ShellError;
pub use session::AuthSession;
pub use shell::Storefront;
pub use store::{FileStore, LocalStore, MemoryStore, StoreError};
