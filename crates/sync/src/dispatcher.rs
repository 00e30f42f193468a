//! Fire-and-forget dispatch of cart snapshots to the remote store.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use chrono::Utc;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use storefront_cart::CartSnapshot;
use storefront_core::{CartId, UserId};
use storefront_events::{EventBus, InMemoryEventBus};

use crate::client::{CartSyncClient, RemoteCart, SyncError};

/// Identifies one sync attempt in logs and notifications.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SyncTicket(Uuid);

impl SyncTicket {
    fn new() -> Self {
        Self(Uuid::now_v7())
    }

    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl core::fmt::Display for SyncTicket {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        core::fmt::Display::fmt(&self.0, f)
    }
}

/// Outcome of a sync attempt, published on the notification bus.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SyncNotification {
    Synced {
        ticket: SyncTicket,
        cart_id: CartId,
        lines: usize,
    },
    Failed {
        ticket: SyncTicket,
        cart_id: CartId,
        error: SyncError,
    },
    /// A newer snapshot for the same cart was dispatched before this one
    /// reached the network, so this push was skipped.
    Superseded {
        ticket: SyncTicket,
        cart_id: CartId,
    },
}

impl SyncNotification {
    pub fn ticket(&self) -> SyncTicket {
        match self {
            SyncNotification::Synced { ticket, .. }
            | SyncNotification::Failed { ticket, .. }
            | SyncNotification::Superseded { ticket, .. } => *ticket,
        }
    }

    pub fn is_failure(&self) -> bool {
        matches!(self, SyncNotification::Failed { .. })
    }
}

/// Dispatch order per cart. Pushes run one at a time, and a push whose
/// cart has a newer dispatch is skipped, so an older snapshot never lands
/// after a newer one.
#[derive(Debug, Default)]
struct PushOrder {
    dispatched: Mutex<Dispatched>,
    gate: tokio::sync::Mutex<()>,
}

#[derive(Debug, Default)]
struct Dispatched {
    next_seq: u64,
    latest: HashMap<CartId, u64>,
}

impl PushOrder {
    fn dispatched(&self) -> MutexGuard<'_, Dispatched> {
        self.dispatched.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn register(&self, cart_id: CartId) -> u64 {
        let mut dispatched = self.dispatched();
        let seq = dispatched.next_seq;
        dispatched.next_seq += 1;
        dispatched.latest.insert(cart_id, seq);
        seq
    }

    fn is_latest(&self, cart_id: CartId, seq: u64) -> bool {
        self.dispatched().latest.get(&cart_id) == Some(&seq)
    }
}

/// Pushes snapshots on background tasks; callers never wait on the network.
///
/// Delivery is at-most-once: a failed push is logged and reported, never
/// retried, and never touches local state. Only the newest pending snapshot
/// of a cart is pushed; older ones are reported as `Superseded`.
pub struct SyncDispatcher<B = InMemoryEventBus<SyncNotification>> {
    client: Arc<dyn CartSyncClient>,
    notifications: Arc<B>,
    user_id: UserId,
    order: Arc<PushOrder>,
}

impl<B> Clone for SyncDispatcher<B> {
    fn clone(&self) -> Self {
        Self {
            client: Arc::clone(&self.client),
            notifications: Arc::clone(&self.notifications),
            user_id: self.user_id,
            order: Arc::clone(&self.order),
        }
    }
}

impl<B> SyncDispatcher<B>
where
    B: EventBus<SyncNotification> + 'static,
{
    pub fn new(client: Arc<dyn CartSyncClient>, notifications: Arc<B>, user_id: UserId) -> Self {
        Self {
            client,
            notifications,
            user_id,
            order: Arc::new(PushOrder::default()),
        }
    }

    pub fn user_id(&self) -> UserId {
        self.user_id
    }

    pub fn notifications(&self) -> &Arc<B> {
        &self.notifications
    }

    /// Create the remote cart. Awaited: the caller needs the id before any push.
    pub async fn open_cart(&self) -> Result<CartId, SyncError> {
        self.client.create_cart(self.user_id).await
    }

    /// Push `snapshot` to `cart_id` in the background and return immediately.
    ///
    /// Without a tokio runtime the attempt fails at once and is reported
    /// like any other sync failure.
    pub fn dispatch(&self, cart_id: CartId, snapshot: &CartSnapshot) -> SyncTicket {
        let ticket = SyncTicket::new();
        let payload = RemoteCart::from_snapshot(self.user_id, snapshot, Utc::now());

        let handle = match tokio::runtime::Handle::try_current() {
            Ok(handle) => handle,
            Err(_) => {
                report(
                    self.notifications.as_ref(),
                    SyncNotification::Failed {
                        ticket,
                        cart_id,
                        error: SyncError::NoRuntime,
                    },
                );
                return ticket;
            }
        };

        let client = Arc::clone(&self.client);
        let notifications = Arc::clone(&self.notifications);
        let order = Arc::clone(&self.order);
        let seq = order.register(cart_id);
        tracing::debug!(%ticket, %cart_id, lines = payload.products.len(), "cart sync dispatched");

        let _task = handle.spawn(async move {
            let _gate = order.gate.lock().await;
            if !order.is_latest(cart_id, seq) {
                report(
                    notifications.as_ref(),
                    SyncNotification::Superseded { ticket, cart_id },
                );
                return;
            }

            let outcome = match client.push_cart(cart_id, &payload).await {
                Ok(()) => SyncNotification::Synced {
                    ticket,
                    cart_id,
                    lines: payload.products.len(),
                },
                Err(error) => SyncNotification::Failed {
                    ticket,
                    cart_id,
                    error,
                },
            };
            report(notifications.as_ref(), outcome);
        });

        ticket
    }
}

fn report<B>(notifications: &B, outcome: SyncNotification)
where
    B: EventBus<SyncNotification>,
{
    match &outcome {
        SyncNotification::Synced {
            ticket,
            cart_id,
            lines,
        } => tracing::info!(%ticket, %cart_id, lines, "cart synced"),
        SyncNotification::Failed {
            ticket,
            cart_id,
            error,
        } => tracing::warn!(%ticket, %cart_id, %error, "cart sync failed; local cart kept"),
        SyncNotification::Superseded { ticket, cart_id } => {
            tracing::debug!(%ticket, %cart_id, "cart sync skipped; newer snapshot pending")
        }
    }

    if let Err(err) = notifications.publish(outcome) {
        tracing::error!(?err, "failed to publish sync notification");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::sync::Mutex;
    use std::time::Duration;
    use storefront_core::{Money, ProductId};

    #[derive(Default)]
    struct RecordingClient {
        fail_with: Option<SyncError>,
        pushed: Mutex<Vec<(CartId, RemoteCart)>>,
    }

    #[async_trait]
    impl CartSyncClient for RecordingClient {
        async fn create_cart(&self, _user_id: UserId) -> Result<CartId, SyncError> {
            Ok(CartId::new(11))
        }

        async fn push_cart(&self, cart_id: CartId, cart: &RemoteCart) -> Result<(), SyncError> {
            self.pushed.lock().unwrap().push((cart_id, cart.clone()));
            match &self.fail_with {
                Some(err) => Err(err.clone()),
                None => Ok(()),
            }
        }
    }

    fn snapshot() -> CartSnapshot {
        snapshot_with_quantity(2)
    }

    fn snapshot_with_quantity(quantity: u32) -> CartSnapshot {
        CartSnapshot {
            lines: vec![storefront_cart::CartLine {
                product_id: ProductId::new(1),
                title: "Backpack".into(),
                unit_price: Money::from_cents(10_995),
                image_ref: String::new(),
                quantity,
            }],
        }
    }

    async fn next_notification(
        sub: &storefront_events::Subscription<SyncNotification>,
    ) -> SyncNotification {
        for _ in 0..100 {
            if let Ok(note) = sub.try_recv() {
                return note;
            }
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
        panic!("no sync notification within timeout");
    }

    #[tokio::test]
    async fn successful_push_reports_synced() {
        let client = Arc::new(RecordingClient::default());
        let bus: Arc<InMemoryEventBus<SyncNotification>> = Arc::new(InMemoryEventBus::new());
        let sub = bus.subscribe();
        let dispatcher = SyncDispatcher::new(client.clone(), bus, UserId::new(1));

        let ticket = dispatcher.dispatch(CartId::new(5), &snapshot());
        let note = next_notification(&sub).await;

        assert_eq!(note.ticket(), ticket);
        assert_eq!(
            note,
            SyncNotification::Synced {
                ticket,
                cart_id: CartId::new(5),
                lines: 1
            }
        );
        let pushed = client.pushed.lock().unwrap();
        assert_eq!(pushed[0].1.products[0].quantity, 2);
        assert_eq!(pushed[0].1.user_id, UserId::new(1));
    }

    #[tokio::test]
    async fn only_the_newest_pending_snapshot_is_pushed() {
        let client = Arc::new(RecordingClient::default());
        let bus: Arc<InMemoryEventBus<SyncNotification>> = Arc::new(InMemoryEventBus::new());
        let sub = bus.subscribe();
        let dispatcher = SyncDispatcher::new(client.clone(), bus, UserId::new(1));

        let first = dispatcher.dispatch(CartId::new(5), &snapshot_with_quantity(1));
        let second = dispatcher.dispatch(CartId::new(5), &snapshot_with_quantity(2));
        let third = dispatcher.dispatch(CartId::new(5), &snapshot_with_quantity(3));

        let mut notes = Vec::new();
        for _ in 0..3 {
            notes.push(next_notification(&sub).await);
        }
        let outcome_of = |ticket: SyncTicket| notes.iter().find(|n| n.ticket() == ticket).unwrap().clone();

        assert!(matches!(outcome_of(first), SyncNotification::Superseded { .. }));
        assert!(matches!(outcome_of(second), SyncNotification::Superseded { .. }));
        assert!(matches!(outcome_of(third), SyncNotification::Synced { .. }));

        let pushed = client.pushed.lock().unwrap();
        assert_eq!(pushed.len(), 1);
        assert_eq!(pushed[0].1.products[0].quantity, 3);
    }

    #[tokio::test]
    async fn carts_are_ordered_independently() {
        let client = Arc::new(RecordingClient::default());
        let bus: Arc<InMemoryEventBus<SyncNotification>> = Arc::new(InMemoryEventBus::new());
        let sub = bus.subscribe();
        let dispatcher = SyncDispatcher::new(client.clone(), bus, UserId::new(1));

        dispatcher.dispatch(CartId::new(5), &snapshot());
        dispatcher.dispatch(CartId::new(6), &snapshot());

        for _ in 0..2 {
            assert!(matches!(
                next_notification(&sub).await,
                SyncNotification::Synced { .. }
            ));
        }
        assert_eq!(client.pushed.lock().unwrap().len(), 2);
    }

    #[tokio::test]
    async fn failed_push_reports_failure() {
        let client = Arc::new(RecordingClient {
            fail_with: Some(SyncError::Network("connection reset".into())),
            ..Default::default()
        });
        let bus: Arc<InMemoryEventBus<SyncNotification>> = Arc::new(InMemoryEventBus::new());
        let sub = bus.subscribe();
        let dispatcher = SyncDispatcher::new(client, bus, UserId::new(1));

        dispatcher.dispatch(CartId::new(5), &snapshot());
        let note = next_notification(&sub).await;

        assert!(note.is_failure());
        assert!(matches!(
            note,
            SyncNotification::Failed { error: SyncError::Network(_), .. }
        ));
    }

    #[test]
    fn dispatch_without_runtime_reports_failure_immediately() {
        let bus: Arc<InMemoryEventBus<SyncNotification>> = Arc::new(InMemoryEventBus::new());
        let sub = bus.subscribe();
        let dispatcher = SyncDispatcher::new(
            Arc::new(RecordingClient::default()),
            bus,
            UserId::new(1),
        );

        dispatcher.dispatch(CartId::new(5), &snapshot());

        assert!(matches!(
            sub.try_recv().unwrap(),
            SyncNotification::Failed { error: SyncError::NoRuntime, .. }
        ));
    }

    #[tokio::test]
    async fn open_cart_returns_remote_id() {
        let dispatcher = SyncDispatcher::new(
            Arc::new(RecordingClient::default()),
            Arc::new(InMemoryEventBus::<SyncNotification>::new()),
            UserId::new(1),
        );
        assert_eq!(dispatcher.open_cart().await.unwrap(), CartId::new(11));
    }
}
