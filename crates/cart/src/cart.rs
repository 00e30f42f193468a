use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use storefront_catalog::Product;
use storefront_core::{Aggregate, AggregateRoot, Money, ProductId};
use storefront_events::Event;

use crate::error::CartError;
use crate::line::CartLine;
use crate::pricing::{OrderSummary, PricingPolicy};
use crate::snapshot::CartSnapshot;

/// Aggregate root: Cart.
///
/// Lines keep insertion order and are unique per product. Totals are always
/// computed from the lines on demand.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Cart {
    lines: Vec<CartLine>,
    version: u64,
}

impl AggregateRoot for Cart {
    fn version(&self) -> u64 {
        self.version
    }
}

/// Command: AddItem.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AddItem {
    pub product_id: ProductId,
    pub title: String,
    pub unit_price: Money,
    pub image_ref: String,
    pub quantity: u32,
    pub occurred_at: DateTime<Utc>,
}

impl AddItem {
    pub fn from_product(product: &Product, quantity: u32, occurred_at: DateTime<Utc>) -> Self {
        Self {
            product_id: product.id,
            title: product.title.clone(),
            unit_price: product.price,
            image_ref: product.image.clone(),
            quantity,
            occurred_at,
        }
    }
}

/// Command: RemoveItem.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RemoveItem {
    pub product_id: ProductId,
    pub occurred_at: DateTime<Utc>,
}

/// Command: SetQuantity. Signed so callers can pass `quantity - 1` from a stepper.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SetQuantity {
    pub product_id: ProductId,
    pub quantity: i64,
    pub occurred_at: DateTime<Utc>,
}

/// Command: ClearCart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClearCart {
    pub occurred_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum CartCommand {
    AddItem(AddItem),
    RemoveItem(RemoveItem),
    SetQuantity(SetQuantity),
    ClearCart(ClearCart),
}

/// Event: ItemAdded (a new line).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemAdded {
    pub line: CartLine,
    pub occurred_at: DateTime<Utc>,
}

/// Event: QuantityChanged (existing line, new absolute quantity).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuantityChanged {
    pub product_id: ProductId,
    pub previous: u32,
    pub quantity: u32,
    pub occurred_at: DateTime<Utc>,
}

/// Event: ItemRemoved.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemRemoved {
    pub product_id: ProductId,
    pub occurred_at: DateTime<Utc>,
}

/// Event: CartCleared.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartCleared {
    pub removed_lines: usize,
    pub occurred_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum CartEvent {
    ItemAdded(ItemAdded),
    QuantityChanged(QuantityChanged),
    ItemRemoved(ItemRemoved),
    CartCleared(CartCleared),
}

impl Event for CartEvent {
    fn event_type(&self) -> &'static str {
        match self {
            CartEvent::ItemAdded(_) => "cart.item_added",
            CartEvent::QuantityChanged(_) => "cart.quantity_changed",
            CartEvent::ItemRemoved(_) => "cart.item_removed",
            CartEvent::CartCleared(_) => "cart.cleared",
        }
    }

    fn version(&self) -> u32 {
        1
    }

    fn occurred_at(&self) -> DateTime<Utc> {
        match self {
            CartEvent::ItemAdded(e) => e.occurred_at,
            CartEvent::QuantityChanged(e) => e.occurred_at,
            CartEvent::ItemRemoved(e) => e.occurred_at,
            CartEvent::CartCleared(e) => e.occurred_at,
        }
    }
}

impl Aggregate for Cart {
    type Command = CartCommand;
    type Event = CartEvent;
    type Error = CartError;

    fn apply(&mut self, event: &Self::Event) {
        match event {
            CartEvent::ItemAdded(e) => match self.position(e.line.product_id) {
                Some(idx) => self.lines[idx] = e.line.clone(),
                None => self.lines.push(e.line.clone()),
            },
            CartEvent::QuantityChanged(e) => {
                if let Some(idx) = self.position(e.product_id) {
                    self.lines[idx].quantity = e.quantity;
                }
            }
            CartEvent::ItemRemoved(e) => {
                self.lines.retain(|line| line.product_id != e.product_id);
            }
            CartEvent::CartCleared(_) => {
                self.lines.clear();
            }
        }

        // Deterministic version tracking: +1 per applied event.
        self.version += 1;
    }

    fn handle(&self, command: &Self::Command) -> Result<Vec<Self::Event>, Self::Error> {
        match command {
            CartCommand::AddItem(cmd) => self.handle_add(cmd),
            CartCommand::RemoveItem(cmd) => Ok(self.handle_remove(cmd)),
            CartCommand::SetQuantity(cmd) => self.handle_set_quantity(cmd),
            CartCommand::ClearCart(cmd) => Ok(self.handle_clear(cmd)),
        }
    }
}

impl Cart {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuild a cart from persisted state. The version restarts at 0.
    pub fn restore(snapshot: CartSnapshot) -> Result<Self, CartError> {
        snapshot.validate()?;
        Ok(Self {
            lines: snapshot.lines,
            version: 0,
        })
    }

    pub fn snapshot(&self) -> CartSnapshot {
        CartSnapshot {
            lines: self.lines.clone(),
        }
    }

    pub fn lines(&self) -> &[CartLine] {
        &self.lines
    }

    pub fn line(&self, product_id: ProductId) -> Option<&CartLine> {
        self.lines.iter().find(|line| line.product_id == product_id)
    }

    pub fn contains(&self, product_id: ProductId) -> bool {
        self.position(product_id).is_some()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Number of distinct products.
    pub fn line_count(&self) -> usize {
        self.lines.len()
    }

    /// Sum of quantities across all lines.
    pub fn item_count(&self) -> u64 {
        self.lines.iter().map(|line| u64::from(line.quantity)).sum()
    }

    /// Subtotal: Σ unit price × quantity.
    pub fn total(&self) -> Money {
        self.lines.iter().map(CartLine::line_total).sum()
    }

    pub fn summary(&self) -> OrderSummary {
        self.summary_with(&PricingPolicy::default())
    }

    pub fn summary_with(&self, policy: &PricingPolicy) -> OrderSummary {
        policy.summarize(self.total(), self.item_count())
    }

    /// Add `quantity` of `product`, merging into an existing line.
    pub fn add_item(&mut self, product: &Product, quantity: u32) -> Result<Vec<CartEvent>, CartError> {
        let cmd = AddItem::from_product(product, quantity, Utc::now());
        self.execute(&CartCommand::AddItem(cmd))
    }

    /// Remove the line for `product_id`; unknown ids yield no events.
    pub fn remove_item(&mut self, product_id: ProductId) -> Vec<CartEvent> {
        let events = self.handle_remove(&RemoveItem {
            product_id,
            occurred_at: Utc::now(),
        });
        self.apply_all(&events);
        events
    }

    /// Replace a line's quantity; `quantity <= 0` removes the line.
    pub fn set_quantity(
        &mut self,
        product_id: ProductId,
        quantity: i64,
    ) -> Result<Vec<CartEvent>, CartError> {
        self.execute(&CartCommand::SetQuantity(SetQuantity {
            product_id,
            quantity,
            occurred_at: Utc::now(),
        }))
    }

    pub fn clear(&mut self) -> Vec<CartEvent> {
        let events = self.handle_clear(&ClearCart {
            occurred_at: Utc::now(),
        });
        self.apply_all(&events);
        events
    }

    fn apply_all(&mut self, events: &[CartEvent]) {
        for event in events {
            self.apply(event);
        }
    }

    fn position(&self, product_id: ProductId) -> Option<usize> {
        self.lines.iter().position(|line| line.product_id == product_id)
    }

    fn handle_add(&self, cmd: &AddItem) -> Result<Vec<CartEvent>, CartError> {
        if cmd.quantity == 0 {
            return Err(CartError::InvalidQuantity(0));
        }

        let event = match self.line(cmd.product_id) {
            Some(existing) => CartEvent::QuantityChanged(QuantityChanged {
                product_id: cmd.product_id,
                previous: existing.quantity,
                quantity: existing.quantity.saturating_add(cmd.quantity),
                occurred_at: cmd.occurred_at,
            }),
            None => CartEvent::ItemAdded(ItemAdded {
                line: CartLine {
                    product_id: cmd.product_id,
                    title: cmd.title.clone(),
                    unit_price: cmd.unit_price,
                    image_ref: cmd.image_ref.clone(),
                    quantity: cmd.quantity,
                },
                occurred_at: cmd.occurred_at,
            }),
        };

        Ok(vec![event])
    }

    fn handle_remove(&self, cmd: &RemoveItem) -> Vec<CartEvent> {
        if !self.contains(cmd.product_id) {
            return Vec::new();
        }
        vec![CartEvent::ItemRemoved(ItemRemoved {
            product_id: cmd.product_id,
            occurred_at: cmd.occurred_at,
        })]
    }

    fn handle_set_quantity(&self, cmd: &SetQuantity) -> Result<Vec<CartEvent>, CartError> {
        if cmd.quantity <= 0 {
            return Ok(self.handle_remove(&RemoveItem {
                product_id: cmd.product_id,
                occurred_at: cmd.occurred_at,
            }));
        }

        let quantity =
            u32::try_from(cmd.quantity).map_err(|_| CartError::InvalidQuantity(cmd.quantity))?;

        let Some(existing) = self.line(cmd.product_id) else {
            return Ok(Vec::new());
        };
        if existing.quantity == quantity {
            return Ok(Vec::new());
        }

        Ok(vec![CartEvent::QuantityChanged(QuantityChanged {
            product_id: cmd.product_id,
            previous: existing.quantity,
            quantity,
            occurred_at: cmd.occurred_at,
        })])
    }

    fn handle_clear(&self, cmd: &ClearCart) -> Vec<CartEvent> {
        if self.lines.is_empty() {
            return Vec::new();
        }
        vec![CartEvent::CartCleared(CartCleared {
            removed_lines: self.lines.len(),
            occurred_at: cmd.occurred_at,
        })]
    }
}
