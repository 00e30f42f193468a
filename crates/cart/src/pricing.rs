//! Order-summary policy: flat shipping with a free-shipping threshold, flat tax.

use serde::{Deserialize, Serialize};

use storefront_core::{Money, ValueObject};

pub const DEFAULT_FREE_SHIPPING_THRESHOLD: Money = Money::from_cents(5_000);
pub const DEFAULT_SHIPPING_FEE: Money = Money::from_cents(499);
/// 8% expressed in basis points.
pub const DEFAULT_TAX_RATE_BPS: u32 = 800;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PricingPolicy {
    /// Shipping is waived once the subtotal is strictly above this amount.
    pub free_shipping_threshold: Money,
    pub shipping_fee: Money,
    pub tax_rate_bps: u32,
}

impl ValueObject for PricingPolicy {}

impl Default for PricingPolicy {
    fn default() -> Self {
        Self {
            free_shipping_threshold: DEFAULT_FREE_SHIPPING_THRESHOLD,
            shipping_fee: DEFAULT_SHIPPING_FEE,
            tax_rate_bps: DEFAULT_TAX_RATE_BPS,
        }
    }
}

impl PricingPolicy {
    pub fn free_shipping_eligible(&self, subtotal: Money) -> bool {
        subtotal > self.free_shipping_threshold
    }

    pub fn shipping_for(&self, subtotal: Money) -> Money {
        if self.free_shipping_eligible(subtotal) {
            Money::ZERO
        } else {
            self.shipping_fee
        }
    }

    /// Tax on the subtotal only, rounded half-up to the cent.
    pub fn tax_for(&self, subtotal: Money) -> Money {
        subtotal.apply_rate_bps(self.tax_rate_bps)
    }

    pub fn summarize(&self, subtotal: Money, item_count: u64) -> OrderSummary {
        let shipping_cost = self.shipping_for(subtotal);
        let tax = self.tax_for(subtotal);
        OrderSummary {
            subtotal,
            shipping_cost,
            tax,
            total: subtotal + shipping_cost + tax,
            item_count,
            free_shipping_eligible: self.free_shipping_eligible(subtotal),
        }
    }
}

/// Checkout figures derived from the current lines. Never stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderSummary {
    pub subtotal: Money,
    pub shipping_cost: Money,
    pub tax: Money,
    pub total: Money,
    pub item_count: u64,
    pub free_shipping_eligible: bool,
}

impl ValueObject for OrderSummary {}

#[cfg(test)]
mod tests {
    use super::*;

    fn dollars(cents: u64) -> Money {
        Money::from_cents(cents)
    }

    #[test]
    fn below_threshold_pays_flat_shipping() {
        let summary = PricingPolicy::default().summarize(dollars(4_000), 4);
        assert_eq!(summary.shipping_cost, dollars(499));
        assert!(!summary.free_shipping_eligible);
    }

    #[test]
    fn above_threshold_ships_free() {
        let summary = PricingPolicy::default().summarize(dollars(6_000), 2);
        assert_eq!(summary.shipping_cost, Money::ZERO);
        assert!(summary.free_shipping_eligible);
    }

    #[test]
    fn exactly_at_threshold_still_pays_shipping() {
        let summary = PricingPolicy::default().summarize(dollars(5_000), 1);
        assert_eq!(summary.shipping_cost, dollars(499));
        assert!(!summary.free_shipping_eligible);
    }

    #[test]
    fn hundred_dollars_totals_one_hundred_eight() {
        let summary = PricingPolicy::default().summarize(dollars(10_000), 1);
        assert_eq!(summary.tax, dollars(800));
        assert_eq!(summary.total, dollars(10_800));
    }

    #[test]
    fn custom_policy_is_honoured() {
        let policy = PricingPolicy {
            free_shipping_threshold: dollars(10_000),
            shipping_fee: dollars(999),
            tax_rate_bps: 0,
        };
        let summary = policy.summarize(dollars(6_000), 3);
        assert_eq!(summary.shipping_cost, dollars(999));
        assert_eq!(summary.tax, Money::ZERO);
        assert_eq!(summary.total, dollars(6_999));
    }

    #[test]
    fn summary_serializes_camel_case_decimals() {
        let json = serde_json::to_value(PricingPolicy::default().summarize(dollars(2_500), 3))
            .unwrap();
        assert_eq!(json["subtotal"], serde_json::json!(25.0));
        assert_eq!(json["shippingCost"], serde_json::json!(4.99));
        assert_eq!(json["freeShippingEligible"], serde_json::json!(false));
        assert_eq!(json["itemCount"], serde_json::json!(3));
    }
}
