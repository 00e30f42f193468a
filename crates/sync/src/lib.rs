//! Best-effort remote cart synchronisation.
//!
//! Local cart state is authoritative. After each local mutation the host may
//! hand the fresh snapshot to a [`SyncDispatcher`], which pushes it to the
//! remote store on a background task and reports the outcome as a
//! [`SyncNotification`]. Nothing here retries, reconciles, or rolls back.

pub mod client;
pub mod dispatcher;
pub mod http;

pub use client::{CartSyncClient, RemoteCart, RemoteCartLine, SyncError};
pub use dispatcher::{SyncDispatcher, SyncNotification, SyncTicket};
pub use http::HttpCartSync;
