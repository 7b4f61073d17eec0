//! Order total computation.
//!
//! [`compute_total`] is the single authority for an order's total. It is a
//! pure function over its inputs: it never mutates promotions, never
//! consumes usage, and never reads the clock. The same computation backs
//! both a cart preview (no usage consumed) and order finalization (usage
//! consumed afterwards, exactly once, via `tally-usage`).

use crate::error::PricingError;
use crate::ids::{OrderLineItemId, ProductId, PromotionId};
use crate::money::{Currency, Money};
use crate::order::{Order, OrderLineItem};
use crate::promotion::Promotion;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Resolves the canonical unit price of a product.
///
/// Consumed by the pricing engine for lines that do not pin a price.
/// `None` means the product reference could not be resolved.
pub trait PriceResolver {
    fn resolve_price(&self, product_id: &ProductId) -> Option<Money>;
}

/// Resolves the promotion currently attached to a product, if any.
pub trait PromotionResolver {
    fn resolve_promotion(&self, product_id: &ProductId) -> Option<Promotion>;
}

/// Pricing breakdown for a single order line.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LinePricing {
    /// Line item this entry prices.
    pub line_item_id: OrderLineItemId,
    /// Product reference.
    pub product_id: ProductId,
    /// Quantity ordered.
    pub quantity: i64,
    /// Resolved unit price before any discount.
    pub unit_price: Money,
    /// Unit price after the promotion, equal to `unit_price` when no
    /// promotion applied. The discount is per unit, applied before
    /// multiplying by quantity.
    pub discounted_unit_price: Money,
    /// Promotion that applied to this line, if any.
    pub promotion_id: Option<PromotionId>,
    /// Line subtotal: `discounted_unit_price * quantity`.
    pub subtotal: Money,
}

impl LinePricing {
    /// Per-unit discount amount.
    pub fn discount_per_unit(&self) -> Money {
        self.unit_price
            .try_subtract(&self.discounted_unit_price)
            .unwrap_or_else(|| Money::zero(self.unit_price.currency))
    }

    /// Check if a promotion applied to this line.
    pub fn has_discount(&self) -> bool {
        self.promotion_id.is_some()
    }
}

/// Complete pricing breakdown for an order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderPricing {
    /// Order currency.
    pub currency: Currency,
    /// Sum of line subtotals before discounts.
    pub subtotal: Money,
    /// Total amount discounted across all lines.
    pub discount_total: Money,
    /// Tax addition.
    pub tax_total: Money,
    /// Shipping addition.
    pub shipping_total: Money,
    /// The authoritative total: discounted line subtotals + tax + shipping.
    pub grand_total: Money,
    /// Per-line breakdown, in input order.
    pub line_items: Vec<LinePricing>,
}

impl OrderPricing {
    /// Check if any promotion applied.
    pub fn has_discounts(&self) -> bool {
        self.line_items.iter().any(LinePricing::has_discount)
    }

    /// Promotions that applied to this pricing, deduplicated, in line
    /// order. This is the finalize path's input: each of these is charged
    /// exactly one usage when the order is confirmed.
    pub fn applied_promotions(&self) -> Vec<PromotionId> {
        let mut seen = Vec::new();
        for line in &self.line_items {
            if let Some(id) = &line.promotion_id {
                if !seen.contains(id) {
                    seen.push(id.clone());
                }
            }
        }
        seen
    }
}

/// Compute the authoritative order total.
///
/// Fails with:
/// - [`PricingError::EmptyOrder`] when `items` is empty;
/// - [`PricingError::InvalidQuantity`] when any line's quantity is below 1;
/// - [`PricingError::InvalidAdjustment`] when tax, shipping, or a pinned
///   unit price is negative;
/// - [`PricingError::ProductNotFound`] when a line pins no price and the
///   resolver cannot supply one;
/// - [`PricingError::CurrencyMismatch`] / [`PricingError::Overflow`] from
///   the money arithmetic.
///
/// A promotion applies to a line when the resolver attaches one to the
/// line's product, it is valid at `now`, and the order's pre-discount
/// subtotal meets its minimum purchase floor. Invalid or ineligible
/// promotions are silently skipped, not errors.
pub fn compute_total(
    items: &[OrderLineItem],
    prices: &impl PriceResolver,
    promotions: &impl PromotionResolver,
    tax_total: Money,
    shipping_total: Money,
    now: DateTime<Utc>,
) -> Result<OrderPricing, PricingError> {
    if items.is_empty() {
        return Err(PricingError::EmptyOrder);
    }
    if tax_total.is_negative() {
        return Err(PricingError::InvalidAdjustment {
            kind: "tax",
            amount_cents: tax_total.amount_cents,
        });
    }
    if shipping_total.is_negative() {
        return Err(PricingError::InvalidAdjustment {
            kind: "shipping",
            amount_cents: shipping_total.amount_cents,
        });
    }

    // First pass: validate lines and resolve unit prices, so the
    // pre-discount subtotal is known before any minimum-purchase check.
    let mut resolved: Vec<(&OrderLineItem, Money)> = Vec::with_capacity(items.len());
    for item in items {
        if item.quantity < 1 {
            return Err(PricingError::InvalidQuantity(item.quantity));
        }
        let unit_price = match item.unit_price {
            Some(pinned) => pinned,
            None => prices
                .resolve_price(&item.product_id)
                .ok_or_else(|| PricingError::ProductNotFound(item.product_id.to_string()))?,
        };
        if unit_price.is_negative() {
            return Err(PricingError::InvalidAdjustment {
                kind: "unit price",
                amount_cents: unit_price.amount_cents,
            });
        }
        resolved.push((item, unit_price));
    }

    let currency = resolved[0].1.currency;
    for (_, unit_price) in &resolved {
        check_currency(currency, unit_price.currency)?;
    }
    check_currency(currency, tax_total.currency)?;
    check_currency(currency, shipping_total.currency)?;

    let mut subtotal = Money::zero(currency);
    for (item, unit_price) in &resolved {
        let line_total = unit_price
            .try_multiply(item.quantity)
            .ok_or(PricingError::Overflow)?;
        subtotal = subtotal.try_add(&line_total).ok_or(PricingError::Overflow)?;
    }

    // Second pass: apply promotions per unit, then multiply. Discounting
    // the unit price first keeps the rounding consistent with the
    // displayed per-unit price.
    let mut line_items = Vec::with_capacity(resolved.len());
    let mut discounted_sum = Money::zero(currency);
    for (item, unit_price) in &resolved {
        let applied = promotions
            .resolve_promotion(&item.product_id)
            .filter(|p| p.is_valid_at(now) && p.meets_min_purchase(&subtotal));

        let discounted_unit_price = match &applied {
            Some(promo) => promo.apply_at(*unit_price, now),
            None => *unit_price,
        };
        let line_subtotal = discounted_unit_price
            .try_multiply(item.quantity)
            .ok_or(PricingError::Overflow)?;
        discounted_sum = discounted_sum
            .try_add(&line_subtotal)
            .ok_or(PricingError::Overflow)?;

        line_items.push(LinePricing {
            line_item_id: item.id.clone(),
            product_id: item.product_id.clone(),
            quantity: item.quantity,
            unit_price: *unit_price,
            discounted_unit_price,
            promotion_id: applied.map(|p| p.id),
            subtotal: line_subtotal,
        });
    }

    let discount_total = subtotal
        .try_subtract(&discounted_sum)
        .ok_or(PricingError::Overflow)?;
    let grand_total = discounted_sum
        .try_add(&tax_total)
        .and_then(|t| t.try_add(&shipping_total))
        .ok_or(PricingError::Overflow)?;

    Ok(OrderPricing {
        currency,
        subtotal,
        discount_total,
        tax_total,
        shipping_total,
        grand_total,
        line_items,
    })
}

fn check_currency(expected: Currency, got: Currency) -> Result<(), PricingError> {
    if expected != got {
        return Err(PricingError::CurrencyMismatch {
            expected: expected.code(),
            got: got.code(),
        });
    }
    Ok(())
}

impl Order {
    /// Compute this order's pricing from its items and adjustments.
    ///
    /// The result is not written back; use [`Order::apply_pricing`] once
    /// the caller decides to persist it.
    pub fn compute_pricing(
        &self,
        prices: &impl PriceResolver,
        promotions: &impl PromotionResolver,
        now: DateTime<Utc>,
    ) -> Result<OrderPricing, PricingError> {
        compute_total(
            &self.items,
            prices,
            promotions,
            self.tax_total,
            self.shipping_total,
            now,
        )
    }
}
