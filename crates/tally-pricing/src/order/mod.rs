//! Order module.
//!
//! Contains the order entity, its line items, and the pricing engine that
//! computes the authoritative total.

mod order;
mod pricing;

pub use order::{Order, OrderLineItem, OrderStatus};
pub use pricing::{compute_total, LinePricing, OrderPricing, PriceResolver, PromotionResolver};
