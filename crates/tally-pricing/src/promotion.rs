//! Promotion definition and evaluation.
//!
//! A promotion is a time- and usage-bounded discount rule attached to a
//! product. Evaluation is pure: validity and price transformation never
//! touch storage. Usage accounting is an explicit, separate step
//! (`record_usage` here, serialized across orders by `tally-usage`).

use crate::error::PricingError;
use crate::ids::{ProductId, PromotionId};
use crate::money::Money;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// The discount a promotion applies to a unit price.
///
/// Bounds are enforced at construction: percentage values must be in
/// `(0, 100]` and fixed amounts must be strictly positive.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum DiscountRule {
    /// Percentage off the unit price.
    Percentage(f64),
    /// Fixed amount off the unit price, floored at zero.
    Fixed(Money),
}

impl DiscountRule {
    /// Validate the rule's value bounds.
    fn validate(&self) -> Result<(), PricingError> {
        match self {
            DiscountRule::Percentage(value) => {
                // written so NaN fails the check too
                if !(*value > 0.0 && *value <= 100.0) {
                    return Err(PricingError::InvalidPromotion(format!(
                        "percentage must be in (0, 100], got {value}"
                    )));
                }
            }
            DiscountRule::Fixed(amount) => {
                if !amount.is_positive() {
                    return Err(PricingError::InvalidPromotion(format!(
                        "fixed discount must be positive, got {} cents",
                        amount.amount_cents
                    )));
                }
            }
        }
        Ok(())
    }
}

/// A time- and usage-bounded discount attached to a product.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Promotion {
    /// Unique promotion identifier.
    pub id: PromotionId,
    /// Product this promotion applies to.
    pub product_id: ProductId,
    /// The discount rule.
    pub rule: DiscountRule,
    /// Start of the validity window (inclusive).
    pub starts_at: DateTime<Utc>,
    /// End of the validity window (inclusive).
    pub ends_at: DateTime<Utc>,
    /// Whether the promotion is active. Flipped to `false` by the system
    /// once the usage cap is reached.
    pub active: bool,
    /// Optional floor on order subtotal for eligibility.
    pub min_purchase: Option<Money>,
    /// Optional usage cap.
    pub max_usage: Option<u32>,
    /// Running usage counter.
    pub current_usage: u32,
}

impl Promotion {
    /// Create a promotion, validating the rule bounds and date order.
    pub fn new(
        product_id: ProductId,
        rule: DiscountRule,
        starts_at: DateTime<Utc>,
        ends_at: DateTime<Utc>,
    ) -> Result<Self, PricingError> {
        rule.validate()?;
        if ends_at <= starts_at {
            return Err(PricingError::InvalidPromotion(format!(
                "ends_at ({ends_at}) must be after starts_at ({starts_at})"
            )));
        }
        Ok(Self {
            id: PromotionId::generate(),
            product_id,
            rule,
            starts_at,
            ends_at,
            active: true,
            min_purchase: None,
            max_usage: None,
            current_usage: 0,
        })
    }

    /// Create a percentage promotion.
    pub fn percentage(
        product_id: ProductId,
        value: f64,
        starts_at: DateTime<Utc>,
        ends_at: DateTime<Utc>,
    ) -> Result<Self, PricingError> {
        Self::new(product_id, DiscountRule::Percentage(value), starts_at, ends_at)
    }

    /// Create a fixed-amount promotion.
    pub fn fixed(
        product_id: ProductId,
        amount: Money,
        starts_at: DateTime<Utc>,
        ends_at: DateTime<Utc>,
    ) -> Result<Self, PricingError> {
        Self::new(product_id, DiscountRule::Fixed(amount), starts_at, ends_at)
    }

    /// Add a minimum purchase requirement.
    pub fn with_min_purchase(mut self, amount: Money) -> Self {
        self.min_purchase = Some(amount);
        self
    }

    /// Add a usage cap.
    pub fn with_max_usage(mut self, cap: u32) -> Self {
        self.max_usage = Some(cap);
        self
    }

    /// Check whether the promotion is valid at `now`.
    ///
    /// Valid means: active, inside the `[starts_at, ends_at]` window (both
    /// boundaries inclusive), and not usage-exhausted. Pure predicate, no
    /// side effects.
    pub fn is_valid_at(&self, now: DateTime<Utc>) -> bool {
        if !self.active {
            return false;
        }
        if now < self.starts_at || now > self.ends_at {
            return false;
        }
        !self.is_exhausted()
    }

    /// Check whether the usage cap has been reached.
    pub fn is_exhausted(&self) -> bool {
        self.max_usage
            .map(|cap| self.current_usage >= cap)
            .unwrap_or(false)
    }

    /// Check whether the validity window has passed at `now`.
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        now > self.ends_at
    }

    /// Check whether the order subtotal meets the minimum purchase floor.
    ///
    /// A currency mismatch counts as not met.
    pub fn meets_min_purchase(&self, subtotal: &Money) -> bool {
        match &self.min_purchase {
            None => true,
            Some(floor) => {
                floor.currency == subtotal.currency
                    && subtotal.amount_cents >= floor.amount_cents
            }
        }
    }

    /// Apply the discount to a unit price at `now`.
    ///
    /// If the promotion is not valid at `now`, the price is returned
    /// unchanged. A lapsed or not-yet-active promotion silently fails to
    /// discount; it is not an error. The result is never negative.
    pub fn apply_at(&self, price: Money, now: DateTime<Utc>) -> Money {
        if !self.is_valid_at(now) {
            return price;
        }
        match &self.rule {
            DiscountRule::Percentage(value) => {
                let discount = price.percentage(*value);
                price.saturating_subtract(&discount).unwrap_or(price)
            }
            // A fixed discount in a different currency cannot apply;
            // fall back to the undiscounted price.
            DiscountRule::Fixed(amount) => price.saturating_subtract(amount).unwrap_or(price),
        }
    }

    /// Record one successful application of this promotion.
    ///
    /// Re-checks the cap even though `is_valid_at` should already have
    /// excluded an exhausted promotion: concurrent finalizations may have
    /// consumed the remaining uses in between. Increments the counter and
    /// deactivates the promotion once the cap is reached.
    ///
    /// Must be called at most once per successful order-promotion
    /// association. Cross-order serialization is the caller's concern;
    /// see the `tally-usage` crate.
    pub fn record_usage(&mut self) -> Result<(), PricingError> {
        if self.is_exhausted() {
            return Err(PricingError::UsageExceeded(self.id.as_str().to_string()));
        }
        self.current_usage += 1;
        if self.is_exhausted() {
            self.active = false;
        }
        Ok(())
    }
}
