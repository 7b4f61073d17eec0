//! Pricing error types.

use thiserror::Error;

/// Errors surfaced by promotion evaluation and order total computation.
///
/// None of these are transient; they are caller-input errors and are
/// reported unchanged, never retried or coerced.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PricingError {
    /// Order has no line items.
    #[error("Order has no line items")]
    EmptyOrder,

    /// A line item's quantity is less than 1.
    #[error("Invalid quantity: {0}")]
    InvalidQuantity(i64),

    /// A monetary input that must be non-negative (tax, shipping, or a
    /// pinned unit price) is negative.
    #[error("Invalid {kind} adjustment: {amount_cents} cents")]
    InvalidAdjustment {
        /// Which amount was rejected ("tax", "shipping", "unit price").
        kind: &'static str,
        /// The offending amount.
        amount_cents: i64,
    },

    /// Price resolution failed for a referenced product.
    #[error("Product not found: {0}")]
    ProductNotFound(String),

    /// Promotion usage cap reached at increment time.
    #[error("Promotion usage exceeded: {0}")]
    UsageExceeded(String),

    /// A promotion was constructed with out-of-bounds values.
    #[error("Invalid promotion: {0}")]
    InvalidPromotion(String),

    /// Currency mismatch between amounts.
    #[error("Currency mismatch: expected {expected}, got {got}")]
    CurrencyMismatch {
        expected: &'static str,
        got: &'static str,
    },

    /// Arithmetic overflow in a money calculation.
    #[error("Arithmetic overflow in money calculation")]
    Overflow,
}
