//! Read-only product catalog.
//!
//! The pricing engine never reads the catalog directly; it goes through
//! the [`PriceResolver`] and [`PromotionResolver`] traits. `InMemoryCatalog`
//! is the batteries-included implementation for callers that hold their
//! catalog in memory, and for tests.

use crate::ids::{ProductId, PromotionId};
use crate::money::Money;
use crate::order::{PriceResolver, PromotionResolver};
use crate::promotion::Promotion;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Product visibility status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum ProductStatus {
    /// Product is active and purchasable.
    #[default]
    Active,
    /// Product is archived; data preserved but not purchasable.
    Archived,
}

impl ProductStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ProductStatus::Active => "active",
            ProductStatus::Archived => "archived",
        }
    }
}

/// A product in the catalog. Read-only from the pricing core's point of
/// view; it supplies the canonical unit price for line items that do not
/// pin one.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    /// Unique product identifier.
    pub id: ProductId,
    /// Stock keeping unit.
    pub sku: String,
    /// Product name.
    pub name: String,
    /// Canonical unit price.
    pub price: Money,
    /// Visibility status.
    pub status: ProductStatus,
}

impl Product {
    /// Create a new active product.
    pub fn new(
        id: ProductId,
        sku: impl Into<String>,
        name: impl Into<String>,
        price: Money,
    ) -> Self {
        Self {
            id,
            sku: sku.into(),
            name: name.into(),
            price,
            status: ProductStatus::Active,
        }
    }
}

/// In-memory catalog implementing both resolver traits.
#[derive(Debug, Clone, Default)]
pub struct InMemoryCatalog {
    products: HashMap<ProductId, Product>,
    promotions: HashMap<ProductId, Promotion>,
}

impl InMemoryCatalog {
    /// Create an empty catalog.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add or replace a product.
    pub fn insert_product(&mut self, product: Product) {
        self.products.insert(product.id.clone(), product);
    }

    /// Attach a promotion to its product. Replaces any promotion already
    /// attached to that product.
    pub fn insert_promotion(&mut self, promotion: Promotion) {
        self.promotions
            .insert(promotion.product_id.clone(), promotion);
    }

    /// Remove the promotion attached to a product.
    pub fn remove_promotion(&mut self, product_id: &ProductId) -> Option<Promotion> {
        self.promotions.remove(product_id)
    }

    /// Look up a product.
    pub fn product(&self, product_id: &ProductId) -> Option<&Product> {
        self.products.get(product_id)
    }

    /// Look up the promotion attached to a product.
    pub fn promotion(&self, product_id: &ProductId) -> Option<&Promotion> {
        self.promotions.get(product_id)
    }

    /// Mutable access to a promotion by its own ID, for usage write-back
    /// after an order is finalized.
    pub fn promotion_by_id_mut(&mut self, promotion_id: &PromotionId) -> Option<&mut Promotion> {
        self.promotions.values_mut().find(|p| &p.id == promotion_id)
    }
}

impl PriceResolver for InMemoryCatalog {
    /// Archived products do not resolve; their price is no longer canonical.
    fn resolve_price(&self, product_id: &ProductId) -> Option<Money> {
        self.products
            .get(product_id)
            .filter(|p| p.status == ProductStatus::Active)
            .map(|p| p.price)
    }
}

impl PromotionResolver for InMemoryCatalog {
    fn resolve_promotion(&self, product_id: &ProductId) -> Option<Promotion> {
        self.promotions.get(product_id).cloned()
    }
}
