//! Order total computation and promotion evaluation for Tally.
//!
//! This crate is the pricing core of the Tally commerce backend:
//!
//! - **Promotion**: time- and usage-bounded discount rules attached to
//!   products, with pure validity and price-transform logic
//! - **Order**: orders and line items, whose total is derived, never input
//! - **Pricing engine**: [`order::compute_total`], the single authority for
//!   an order's total and its per-line breakdown
//! - **Catalog**: a read-only product view implementing the price and
//!   promotion resolver traits
//!
//! The core is pure computation: resolvers are injected, `now` is a
//! parameter, and nothing here touches storage or mutates promotion usage.
//! Usage accounting is the `tally-usage` crate's job.
//!
//! # Example
//!
//! ```
//! use chrono::{TimeZone, Utc};
//! use tally_pricing::prelude::*;
//!
//! let mut catalog = InMemoryCatalog::new();
//! let product_id = ProductId::new("prod-1");
//! catalog.insert_product(Product::new(
//!     product_id.clone(),
//!     "SKU-1",
//!     "Widget",
//!     Money::new(2000, Currency::USD),
//! ));
//! catalog.insert_promotion(
//!     Promotion::percentage(
//!         product_id.clone(),
//!         10.0,
//!         Utc.with_ymd_and_hms(2026, 1, 1, 0, 0, 0).unwrap(),
//!         Utc.with_ymd_and_hms(2026, 12, 31, 0, 0, 0).unwrap(),
//!     )
//!     .unwrap(),
//! );
//!
//! let items = vec![OrderLineItem::new(product_id, 3)];
//! let now = Utc.with_ymd_and_hms(2026, 6, 1, 0, 0, 0).unwrap();
//! let pricing = compute_total(
//!     &items,
//!     &catalog,
//!     &catalog,
//!     Money::zero(Currency::USD),
//!     Money::zero(Currency::USD),
//!     now,
//! )
//! .unwrap();
//! assert_eq!(pricing.grand_total, Money::new(5400, Currency::USD));
//! ```

pub mod catalog;
pub mod error;
pub mod ids;
pub mod money;
pub mod order;
pub mod promotion;

pub use error::PricingError;
pub use ids::*;
pub use money::{Currency, Money};

/// Prelude for convenient imports.
pub mod prelude {
    pub use crate::catalog::{InMemoryCatalog, Product, ProductStatus};
    pub use crate::error::PricingError;
    pub use crate::ids::*;
    pub use crate::money::{Currency, Money};
    pub use crate::order::{
        compute_total, LinePricing, Order, OrderLineItem, OrderPricing, OrderStatus,
        PriceResolver, PromotionResolver,
    };
    pub use crate::promotion::{DiscountRule, Promotion};
}
