//! The host-owned storefront state object.
//!
//! A [`Storefront`] ties the cart aggregate to the things around it: the
//! local store it persists to, the demo auth session, the pricing policy and
//! the optional remote sync. Every successful cart mutation is persisted
//! first, then pushed to the remote cart in the background when one exists.

use std::sync::Arc;

use storefront_cart::{Cart, CartEvent, CartSnapshot, OrderSummary, PricingPolicy};
use storefront_catalog::{CatalogSource, Product};
use storefront_core::{CartId, Money, ProductId};
use storefront_events::{EventBus, InMemoryEventBus, Subscription};
use storefront_sync::{SyncDispatcher, SyncTicket};

use crate::error::ShellError;
use crate::session::AuthSession;
use crate::store::{CART_ID_KEY, CART_KEY, LocalStore, StoreError};

pub struct Storefront {
    cart: Cart,
    cart_id: Option<CartId>,
    session: AuthSession,
    store: Arc<dyn LocalStore>,
    pricing: PricingPolicy,
    sync: Option<SyncDispatcher>,
    cart_events: Arc<InMemoryEventBus<CartEvent>>,
    last_sync: Option<SyncTicket>,
}

impl core::fmt::Debug for Storefront {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Storefront")
            .field("cart", &self.cart)
            .field("cart_id", &self.cart_id)
            .field("authenticated", &self.session.is_authenticated())
            .field("pricing", &self.pricing)
            .field("sync_enabled", &self.sync.is_some())
            .finish()
    }
}

impl Storefront {
    /// A fresh session with an empty cart. Nothing is read from `store`.
    pub fn new(store: Arc<dyn LocalStore>) -> Self {
        Self {
            cart: Cart::new(),
            cart_id: None,
            session: AuthSession::new(),
            store,
            pricing: PricingPolicy::default(),
            sync: None,
            cart_events: Arc::new(InMemoryEventBus::new()),
            last_sync: None,
        }
    }

    /// Restore cart, remote cart id and token from `store`.
    ///
    /// A persisted cart or cart id that no longer parses is logged and
    /// dropped; the session starts empty instead of failing.
    pub fn load(store: Arc<dyn LocalStore>) -> Result<Self, ShellError> {
        let session = AuthSession::load(store.as_ref())?;

        let cart = match store.get(CART_KEY)? {
            Some(json) => match CartSnapshot::from_json(&json).and_then(Cart::restore) {
                Ok(cart) => cart,
                Err(err) => {
                    tracing::warn!(%err, "discarding unreadable persisted cart");
                    Cart::new()
                }
            },
            None => Cart::new(),
        };

        let cart_id = match store.get(CART_ID_KEY)? {
            Some(raw) => match raw.trim().parse::<CartId>() {
                Ok(id) => Some(id),
                Err(err) => {
                    tracing::warn!(%err, "discarding unreadable remote cart id");
                    None
                }
            },
            None => None,
        };

        tracing::debug!(
            lines = cart.line_count(),
            cart_id = ?cart_id,
            authenticated = session.is_authenticated(),
            "storefront state loaded"
        );

        Ok(Self {
            cart,
            cart_id,
            session,
            ..Self::new(store)
        })
    }

    pub fn with_pricing(mut self, pricing: PricingPolicy) -> Self {
        self.pricing = pricing;
        self
    }

    pub fn with_sync(mut self, sync: SyncDispatcher) -> Self {
        self.sync = Some(sync);
        self
    }

    pub fn cart(&self) -> &Cart {
        &self.cart
    }

    pub fn cart_id(&self) -> Option<CartId> {
        self.cart_id
    }

    pub fn session(&self) -> &AuthSession {
        &self.session
    }

    pub fn is_authenticated(&self) -> bool {
        self.session.is_authenticated()
    }

    pub fn pricing(&self) -> &PricingPolicy {
        &self.pricing
    }

    pub fn sync(&self) -> Option<&SyncDispatcher> {
        self.sync.as_ref()
    }

    /// Ticket of the most recent background sync, if any was dispatched.
    pub fn last_sync_ticket(&self) -> Option<SyncTicket> {
        self.last_sync
    }

    /// Cart events applied from now on.
    pub fn subscribe_cart_events(&self) -> Subscription<CartEvent> {
        self.cart_events.subscribe()
    }

    pub fn add_item(&mut self, product: &Product, quantity: u32) -> Result<Vec<CartEvent>, ShellError> {
        let events = self.cart.add_item(product, quantity)?;
        self.after_mutation(events)
    }

    /// Fetch `product_id` from `catalog` and add it.
    pub async fn add_product_by_id<C>(
        &mut self,
        catalog: &C,
        product_id: ProductId,
        quantity: u32,
    ) -> Result<Vec<CartEvent>, ShellError>
    where
        C: CatalogSource + ?Sized,
    {
        let product = catalog.get_product(product_id).await?;
        self.add_item(&product, quantity)
    }

    pub fn remove_item(&mut self, product_id: ProductId) -> Result<Vec<CartEvent>, ShellError> {
        let events = self.cart.remove_item(product_id);
        self.after_mutation(events)
    }

    pub fn set_quantity(
        &mut self,
        product_id: ProductId,
        quantity: i64,
    ) -> Result<Vec<CartEvent>, ShellError> {
        let events = self.cart.set_quantity(product_id, quantity)?;
        self.after_mutation(events)
    }

    pub fn clear(&mut self) -> Result<Vec<CartEvent>, ShellError> {
        let events = self.cart.clear();
        self.after_mutation(events)
    }

    pub fn total(&self) -> Money {
        self.cart.total()
    }

    pub fn item_count(&self) -> u64 {
        self.cart.item_count()
    }

    pub fn summary(&self) -> OrderSummary {
        self.cart.summary_with(&self.pricing)
    }

    /// Create the remote cart for the configured user and remember its id.
    pub async fn open_remote_cart(&mut self) -> Result<CartId, ShellError> {
        let sync = self.sync.as_ref().ok_or(ShellError::SyncDisabled)?;
        let cart_id = sync.open_cart().await?;
        self.cart_id = Some(cart_id);
        self.store.set(CART_ID_KEY, &cart_id.to_string())?;
        tracing::info!(%cart_id, user_id = %sync.user_id(), "remote cart opened");
        Ok(cart_id)
    }

    /// Place the order: returns the final summary and empties the cart.
    ///
    /// The emptied cart is persisted before the in-memory cart is cleared.
    /// If that write fails the order is not placed and nothing changes.
    pub fn checkout(&mut self) -> Result<OrderSummary, ShellError> {
        if self.cart.is_empty() {
            return Err(ShellError::EmptyCart);
        }
        let summary = self.summary();
        self.persist(&CartSnapshot::default()).map_err(|err| {
            tracing::error!(%err, "failed to persist checkout; order not placed");
            err
        })?;

        let events = self.cart.clear();
        tracing::info!(
            total = %summary.total,
            items = summary.item_count,
            "order placed"
        );
        self.publish(&events);
        self.dispatch_sync();
        Ok(summary)
    }

    pub fn sign_in(&mut self, token: impl Into<String>) -> Result<(), ShellError> {
        self.session.sign_in(self.store.as_ref(), token)?;
        Ok(())
    }

    pub fn sign_out(&mut self) -> Result<(), ShellError> {
        self.session.sign_out(self.store.as_ref())?;
        Ok(())
    }

    /// Publish, persist, then sync. A no-op mutation does none of these.
    fn after_mutation(&mut self, events: Vec<CartEvent>) -> Result<Vec<CartEvent>, ShellError> {
        if events.is_empty() {
            return Ok(events);
        }

        self.publish(&events);
        let persisted = self.persist(&self.cart.snapshot()).map_err(|err| {
            tracing::error!(%err, "failed to persist cart; in-memory cart kept");
            err
        });
        self.dispatch_sync();

        persisted?;
        Ok(events)
    }

    fn publish(&self, events: &[CartEvent]) {
        for event in events {
            if let Err(err) = self.cart_events.publish(event.clone()) {
                tracing::error!(?err, "failed to publish cart event");
            }
        }
    }

    fn dispatch_sync(&mut self) {
        if let (Some(sync), Some(cart_id)) = (&self.sync, self.cart_id) {
            self.last_sync = Some(sync.dispatch(cart_id, &self.cart.snapshot()));
        }
    }

    fn persist(&self, snapshot: &CartSnapshot) -> Result<(), ShellError> {
        let json = snapshot
            .to_json()
            .map_err(|e| StoreError::Corrupt(e.to_string()))?;
        self.store.set(CART_KEY, &json)?;
        Ok(())
    }
}
