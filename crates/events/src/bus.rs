//! Publish/subscribe abstraction (mechanics only).
//!
//! The bus distributes facts that already happened: cart events after they
//! were applied, sync outcomes after the remote call finished. It never
//! stores anything and never feeds back into the cart.
//!
//! - **Broadcast**: every subscription receives a copy of every message
//!   published after it subscribed.
//! - **Best-effort**: a publish that finds no live subscriber is not an error.
//! - **Per-publisher ordering**: messages from one publisher arrive in
//!   publish order; concurrent publishers interleave arbitrarily.

use std::sync::Arc;
use std::sync::mpsc::{Receiver, RecvError, RecvTimeoutError, TryRecvError};
use std::time::Duration;

/// A subscription to a message stream.
///
/// Designed for single-consumer use: one UI loop (or one test) reads it.
///
/// ```ignore
/// let notifications = bus.subscribe();
/// for note in notifications.drain() {
///     show_toast(note);
/// }
/// ```
#[derive(Debug)]
pub struct Subscription<M> {
    receiver: Receiver<M>,
}

impl<M> Subscription<M> {
    pub fn new(receiver: Receiver<M>) -> Self {
        Self { receiver }
    }

    /// Block until the next message is available.
    pub fn recv(&self) -> Result<M, RecvError> {
        self.receiver.recv()
    }

    /// Try to receive a message without blocking.
    pub fn try_recv(&self) -> Result<M, TryRecvError> {
        self.receiver.try_recv()
    }

    /// Block for up to `timeout` waiting for a message.
    pub fn recv_timeout(&self, timeout: Duration) -> Result<M, RecvTimeoutError> {
        self.receiver.recv_timeout(timeout)
    }

    /// Take every message that is already queued, without blocking.
    pub fn drain(&self) -> Vec<M> {
        self.receiver.try_iter().collect()
    }
}

/// Domain-agnostic pub/sub bus.
///
/// `publish()` may fail (lock poisoning, a full transport). Callers on the
/// cart path log such failures and carry on: local state is already
/// consistent by the time anything is published.
pub trait EventBus<M>: Send + Sync {
    type Error: core::fmt::Debug + Send + Sync + 'static;

    fn publish(&self, message: M) -> Result<(), Self::Error>;

    fn subscribe(&self) -> Subscription<M>;
}

impl<M, B> EventBus<M> for Arc<B>
where
    B: EventBus<M> + ?Sized,
{
    type Error = B::Error;

    fn publish(&self, message: M) -> Result<(), Self::Error> {
        (**self).publish(message)
    }

    fn subscribe(&self) -> Subscription<M> {
        (**self).subscribe()
    }
}
