//! Serialized promotion usage accounting for Tally.
//!
//! The pricing core (`tally-pricing`) computes totals without side
//! effects, so the same computation serves cart previews and order
//! finalization. This crate owns the one stateful step: charging usage to
//! the promotions that applied, exactly once per confirmed order, under a
//! serializing discipline that keeps concurrent finalizations from
//! blowing past a promotion's usage cap.
//!
//! # Example
//!
//! ```
//! use tally_usage::{record_order, InMemoryUsageStore, UsageAccounting};
//! # use chrono::{TimeZone, Utc};
//! # use tally_pricing::prelude::*;
//! # let mut catalog = InMemoryCatalog::new();
//! # let product_id = ProductId::new("prod-1");
//! # catalog.insert_product(Product::new(product_id.clone(), "SKU-1", "Widget", Money::new(2000, Currency::USD)));
//! # let promo = Promotion::percentage(
//! #     product_id.clone(), 10.0,
//! #     Utc.with_ymd_and_hms(2026, 1, 1, 0, 0, 0).unwrap(),
//! #     Utc.with_ymd_and_hms(2026, 12, 31, 0, 0, 0).unwrap(),
//! # ).unwrap().with_max_usage(100);
//! # catalog.insert_promotion(promo);
//! # let items = vec![OrderLineItem::new(product_id, 1)];
//! # let now = Utc.with_ymd_and_hms(2026, 6, 1, 0, 0, 0).unwrap();
//! # let zero = Money::zero(Currency::USD);
//!
//! let store = InMemoryUsageStore::new();
//!
//! // Preview: pure, consumes nothing.
//! let pricing = compute_total(&items, &catalog, &catalog, zero, zero, now).unwrap();
//!
//! // Finalize: charge one usage per applied promotion.
//! let receipts = record_order(&store, &pricing, &catalog).unwrap();
//! assert_eq!(receipts.len(), 1);
//! assert_eq!(store.usage(&receipts[0].promotion_id), 1);
//! ```

mod store;

pub use store::{record_order, InMemoryUsageStore, UsageAccounting, UsageReceipt};

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{DateTime, TimeZone, Utc};
    use tally_pricing::prelude::*;

    fn usd(cents: i64) -> Money {
        Money::new(cents, Currency::USD)
    }

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 6, 15, 12, 0, 0).unwrap()
    }

    fn catalog_with_promo(max_usage: Option<u32>) -> (InMemoryCatalog, ProductId, PromotionId) {
        let mut catalog = InMemoryCatalog::new();
        let product_id = ProductId::new("prod-1");
        catalog.insert_product(Product::new(
            product_id.clone(),
            "SKU-1",
            "Widget",
            usd(2000),
        ));

        let mut promo = Promotion::percentage(
            product_id.clone(),
            10.0,
            Utc.with_ymd_and_hms(2026, 1, 1, 0, 0, 0).unwrap(),
            Utc.with_ymd_and_hms(2026, 12, 31, 0, 0, 0).unwrap(),
        )
        .unwrap();
        if let Some(cap) = max_usage {
            promo = promo.with_max_usage(cap);
        }
        let promo_id = promo.id.clone();
        catalog.insert_promotion(promo);
        (catalog, product_id, promo_id)
    }

    #[test]
    fn test_preview_then_finalize() {
        let (catalog, product_id, promo_id) = catalog_with_promo(Some(10));
        let store = InMemoryUsageStore::new();
        let items = vec![OrderLineItem::new(product_id, 2)];

        // Any number of previews consume nothing.
        for _ in 0..3 {
            let pricing =
                compute_total(&items, &catalog, &catalog, usd(0), usd(0), now()).unwrap();
            assert_eq!(pricing.grand_total, usd(3600));
        }
        assert_eq!(store.usage(&promo_id), 0);

        // Finalize charges exactly one usage.
        let pricing = compute_total(&items, &catalog, &catalog, usd(0), usd(0), now()).unwrap();
        let receipts = record_order(&store, &pricing, &catalog).unwrap();
        assert_eq!(receipts.len(), 1);
        assert_eq!(receipts[0].promotion_id, promo_id);
        assert_eq!(receipts[0].usage, 1);
        assert!(!receipts[0].exhausted);
        assert_eq!(store.usage(&promo_id), 1);
    }

    #[test]
    fn test_finalize_reports_exhaustion() {
        let (catalog, product_id, promo_id) = catalog_with_promo(Some(1));
        let store = InMemoryUsageStore::new();
        let items = vec![OrderLineItem::new(product_id, 1)];

        let pricing = compute_total(&items, &catalog, &catalog, usd(0), usd(0), now()).unwrap();
        let receipts = record_order(&store, &pricing, &catalog).unwrap();
        assert!(receipts[0].exhausted);

        // The next finalization of the same pricing hits the cap.
        let err = record_order(&store, &pricing, &catalog).unwrap_err();
        assert!(matches!(err, PricingError::UsageExceeded(_)));
        assert_eq!(store.usage(&promo_id), 1);
    }

    #[test]
    fn test_finalize_without_promotion_charges_nothing() {
        let mut catalog = InMemoryCatalog::new();
        let product_id = ProductId::new("prod-1");
        catalog.insert_product(Product::new(
            product_id.clone(),
            "SKU-1",
            "Widget",
            usd(2000),
        ));
        let store = InMemoryUsageStore::new();

        let items = vec![OrderLineItem::new(product_id, 1)];
        let pricing = compute_total(&items, &catalog, &catalog, usd(0), usd(0), now()).unwrap();
        let receipts = record_order(&store, &pricing, &catalog).unwrap();
        assert!(receipts.is_empty());
    }

    #[test]
    fn test_usage_written_back_deactivates_promotion() {
        let (mut catalog, product_id, promo_id) = catalog_with_promo(Some(1));
        let store = InMemoryUsageStore::new();
        let items = vec![OrderLineItem::new(product_id.clone(), 1)];

        let pricing = compute_total(&items, &catalog, &catalog, usd(0), usd(0), now()).unwrap();
        let receipts = record_order(&store, &pricing, &catalog).unwrap();

        // Caller writes the receipt back into the persisted promotion.
        for receipt in &receipts {
            let promo = catalog.promotion_by_id_mut(&receipt.promotion_id).unwrap();
            promo.record_usage().unwrap();
            assert_eq!(promo.current_usage, receipt.usage);
            assert_eq!(!promo.active, receipt.exhausted);
        }

        // The exhausted promotion no longer discounts.
        let pricing = compute_total(&items, &catalog, &catalog, usd(0), usd(0), now()).unwrap();
        assert!(!pricing.has_discounts());
        assert_eq!(pricing.grand_total, usd(2000));
        assert_eq!(store.usage(&promo_id), 1);
    }
}
