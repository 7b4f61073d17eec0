//! Serialized usage counters keyed by promotion.

use std::collections::HashMap;
use std::sync::Mutex;

use tally_pricing::order::{OrderPricing, PromotionResolver};
use tally_pricing::{PricingError, PromotionId};
use tracing::{debug, warn};

/// Serializing increment primitive for promotion usage.
///
/// Implementations must make the cap check and the increment one atomic
/// unit: two order finalizations racing on the last remaining use must
/// observe exactly one success. This is the check-then-act hazard the
/// pure evaluator cannot guard on its own.
pub trait UsageAccounting {
    /// Atomically increment the usage counter for a promotion, failing
    /// with [`PricingError::UsageExceeded`] when `max_usage` uses have
    /// already been recorded. Returns the new count.
    fn try_increment(
        &self,
        promotion_id: &PromotionId,
        max_usage: Option<u32>,
    ) -> Result<u32, PricingError>;

    /// Current usage count for a promotion (0 if never incremented).
    fn usage(&self, promotion_id: &PromotionId) -> u32;
}

/// In-memory usage store. A single lock serializes all increments, so the
/// cap check and the write are indivisible across threads.
#[derive(Debug, Default)]
pub struct InMemoryUsageStore {
    counts: Mutex<HashMap<PromotionId, u32>>,
}

impl InMemoryUsageStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a counter, e.g. when loading a promotion whose usage was
    /// already accumulated elsewhere.
    pub fn seed(&self, promotion_id: PromotionId, count: u32) {
        let mut counts = self.counts.lock().unwrap_or_else(|e| e.into_inner());
        counts.insert(promotion_id, count);
    }
}

impl UsageAccounting for InMemoryUsageStore {
    fn try_increment(
        &self,
        promotion_id: &PromotionId,
        max_usage: Option<u32>,
    ) -> Result<u32, PricingError> {
        let mut counts = self.counts.lock().unwrap_or_else(|e| e.into_inner());
        let count = counts.entry(promotion_id.clone()).or_insert(0);
        if let Some(cap) = max_usage {
            if *count >= cap {
                warn!(promotion_id = %promotion_id, cap, "promotion usage cap reached");
                return Err(PricingError::UsageExceeded(
                    promotion_id.as_str().to_string(),
                ));
            }
        }
        *count += 1;
        debug!(promotion_id = %promotion_id, usage = *count, "recorded promotion usage");
        Ok(*count)
    }

    fn usage(&self, promotion_id: &PromotionId) -> u32 {
        let counts = self.counts.lock().unwrap_or_else(|e| e.into_inner());
        counts.get(promotion_id).copied().unwrap_or(0)
    }
}

/// Outcome of charging one usage to a promotion during order finalization.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UsageReceipt {
    /// The promotion charged.
    pub promotion_id: PromotionId,
    /// Usage count after the increment.
    pub usage: u32,
    /// Whether this increment reached the cap. The caller should flip the
    /// persisted promotion's `active` flag off when this is set.
    pub exhausted: bool,
}

/// Consume usage for a finalized order: one increment per unique promotion
/// that applied in the computed pricing.
///
/// This is the finalize half of the preview/finalize split: computing a
/// total never touches usage, and this step must run at most once per
/// confirmed order. Increments are not transactional across promotions; if
/// one fails with [`PricingError::UsageExceeded`], earlier increments in
/// the same call stand and the caller decides whether to reprice or reject
/// the order.
///
/// Caps come from the currently attached promotion. If the resolver no
/// longer returns the promotion that applied (it was replaced or removed
/// after the total was computed), the usage is still recorded, uncapped.
pub fn record_order(
    store: &impl UsageAccounting,
    pricing: &OrderPricing,
    promotions: &impl PromotionResolver,
) -> Result<Vec<UsageReceipt>, PricingError> {
    let mut receipts = Vec::new();
    for promotion_id in pricing.applied_promotions() {
        let cap = pricing
            .line_items
            .iter()
            .find(|l| l.promotion_id.as_ref() == Some(&promotion_id))
            .and_then(|l| promotions.resolve_promotion(&l.product_id))
            .filter(|p| p.id == promotion_id)
            .and_then(|p| p.max_usage);

        let usage = store.try_increment(&promotion_id, cap)?;
        let exhausted = cap.map(|c| usage >= c).unwrap_or(false);
        receipts.push(UsageReceipt {
            promotion_id,
            usage,
            exhausted,
        });
    }
    Ok(receipts)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::thread;

    fn promo_id(s: &str) -> PromotionId {
        PromotionId::new(s)
    }

    #[test]
    fn test_increment_without_cap() {
        let store = InMemoryUsageStore::new();
        let id = promo_id("promo-1");

        for expected in 1..=50 {
            assert_eq!(store.try_increment(&id, None), Ok(expected));
        }
        assert_eq!(store.usage(&id), 50);
    }

    #[test]
    fn test_increment_stops_at_cap() {
        let store = InMemoryUsageStore::new();
        let id = promo_id("promo-1");

        assert_eq!(store.try_increment(&id, Some(2)), Ok(1));
        assert_eq!(store.try_increment(&id, Some(2)), Ok(2));
        let err = store.try_increment(&id, Some(2)).unwrap_err();
        assert!(matches!(err, PricingError::UsageExceeded(_)));
        assert_eq!(store.usage(&id), 2);
    }

    #[test]
    fn test_seeded_count_respected() {
        let store = InMemoryUsageStore::new();
        let id = promo_id("promo-1");
        store.seed(id.clone(), 4);

        assert_eq!(store.try_increment(&id, Some(5)), Ok(5));
        assert!(store.try_increment(&id, Some(5)).is_err());
    }

    #[test]
    fn test_counters_are_per_promotion() {
        let store = InMemoryUsageStore::new();
        let a = promo_id("promo-a");
        let b = promo_id("promo-b");

        store.try_increment(&a, Some(1)).unwrap();
        assert!(store.try_increment(&a, Some(1)).is_err());
        // exhausting a does not affect b
        assert_eq!(store.try_increment(&b, Some(1)), Ok(1));
    }

    #[test]
    fn test_concurrent_increments_never_exceed_cap() {
        const THREADS: usize = 16;
        const CAP: u32 = 5;

        let store = Arc::new(InMemoryUsageStore::new());
        let id = promo_id("promo-race");

        let handles: Vec<_> = (0..THREADS)
            .map(|_| {
                let store = Arc::clone(&store);
                let id = id.clone();
                thread::spawn(move || store.try_increment(&id, Some(CAP)).is_ok())
            })
            .collect();

        let successes = handles
            .into_iter()
            .map(|h| h.join().unwrap())
            .filter(|ok| *ok)
            .count();

        assert_eq!(successes, CAP as usize);
        assert_eq!(store.usage(&id), CAP);
    }
}
