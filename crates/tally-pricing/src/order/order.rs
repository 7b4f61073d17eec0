//! Order and line item types.

use crate::ids::{AddressId, OrderId, OrderLineItemId, ProductId, UserId, VariantId};
use crate::money::{Currency, Money};
use crate::order::OrderPricing;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Order status. Transitions are driven by the surrounding system; the
/// pricing core only cares that the value is one of these.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum OrderStatus {
    /// Order placed, awaiting processing.
    #[default]
    Pending,
    /// Order being prepared.
    Processing,
    /// Order shipped.
    Shipped,
    /// Order delivered.
    Delivered,
    /// Order cancelled.
    Cancelled,
}

impl OrderStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            OrderStatus::Pending => "pending",
            OrderStatus::Processing => "processing",
            OrderStatus::Shipped => "shipped",
            OrderStatus::Delivered => "delivered",
            OrderStatus::Cancelled => "cancelled",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "pending" => Some(OrderStatus::Pending),
            "processing" => Some(OrderStatus::Processing),
            "shipped" => Some(OrderStatus::Shipped),
            "delivered" => Some(OrderStatus::Delivered),
            "cancelled" => Some(OrderStatus::Cancelled),
            _ => None,
        }
    }

    /// Check if the order is in a terminal state.
    pub fn is_terminal(&self) -> bool {
        matches!(self, OrderStatus::Delivered | OrderStatus::Cancelled)
    }

    /// Check if the order can still be cancelled.
    pub fn can_cancel(&self) -> bool {
        matches!(self, OrderStatus::Pending | OrderStatus::Processing)
    }
}

/// A line item in an order.
///
/// Line items have no lifecycle outside their order. A line may pin the
/// unit price captured when the order was placed; if it does not, the
/// pricing engine resolves the canonical price from the catalog.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderLineItem {
    /// Unique line item identifier.
    pub id: OrderLineItemId,
    /// Product being purchased.
    pub product_id: ProductId,
    /// Variant, when the product has them.
    pub variant_id: Option<VariantId>,
    /// Quantity ordered. Validated by the pricing engine, which rejects
    /// anything below 1 rather than clamping.
    pub quantity: i64,
    /// Unit price captured at order time. `None` means resolve it.
    pub unit_price: Option<Money>,
}

impl OrderLineItem {
    /// Create a line item whose price is resolved from the catalog.
    pub fn new(product_id: ProductId, quantity: i64) -> Self {
        Self {
            id: OrderLineItemId::generate(),
            product_id,
            variant_id: None,
            quantity,
            unit_price: None,
        }
    }

    /// Pin the unit price captured at order time.
    pub fn with_unit_price(mut self, unit_price: Money) -> Self {
        self.unit_price = Some(unit_price);
        self
    }

    /// Set the variant.
    pub fn with_variant(mut self, variant_id: VariantId) -> Self {
        self.variant_id = Some(variant_id);
        self
    }
}

/// An order.
///
/// `grand_total` is derived, never input: it is `None` until a computed
/// [`OrderPricing`] is written back with [`Order::apply_pricing`], and any
/// change to items, tax, or shipping clears it again so a stale total can
/// never be persisted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Order {
    /// Unique order identifier.
    pub id: OrderId,
    /// Customer placing the order.
    pub user_id: UserId,
    /// Shipping address reference.
    pub shipping_address_id: AddressId,
    /// Line items, owned by the order.
    pub items: Vec<OrderLineItem>,
    /// Order currency.
    pub currency: Currency,
    /// Tax addition, default zero.
    pub tax_total: Money,
    /// Shipping addition, default zero.
    pub shipping_total: Money,
    /// The authoritative total, written back from a computed pricing.
    pub grand_total: Option<Money>,
    /// Order status.
    pub status: OrderStatus,
    /// Additional metadata as JSON.
    pub metadata: serde_json::Value,
    /// Creation time.
    pub created_at: DateTime<Utc>,
    /// Last update time.
    pub updated_at: DateTime<Utc>,
}

impl Order {
    /// Create a new pending order with no items.
    pub fn new(user_id: UserId, shipping_address_id: AddressId, currency: Currency) -> Self {
        let now = Utc::now();
        Self {
            id: OrderId::generate(),
            user_id,
            shipping_address_id,
            items: Vec::new(),
            currency,
            tax_total: Money::zero(currency),
            shipping_total: Money::zero(currency),
            grand_total: None,
            status: OrderStatus::Pending,
            metadata: serde_json::Value::Object(serde_json::Map::new()),
            created_at: now,
            updated_at: now,
        }
    }

    /// Add a line item. Clears any previously computed total.
    pub fn add_item(&mut self, item: OrderLineItem) {
        self.items.push(item);
        self.touch();
    }

    /// Remove a line item. Clears any previously computed total.
    pub fn remove_item(&mut self, line_item_id: &OrderLineItemId) -> bool {
        let len_before = self.items.len();
        self.items.retain(|i| &i.id != line_item_id);
        let removed = self.items.len() < len_before;
        if removed {
            self.touch();
        }
        removed
    }

    /// Set the tax addition. Clears any previously computed total.
    pub fn set_tax(&mut self, tax_total: Money) {
        self.tax_total = tax_total;
        self.touch();
    }

    /// Set the shipping addition. Clears any previously computed total.
    pub fn set_shipping(&mut self, shipping_total: Money) {
        self.shipping_total = shipping_total;
        self.touch();
    }

    /// Write a computed pricing's total back into the order.
    pub fn apply_pricing(&mut self, pricing: &OrderPricing) {
        self.grand_total = Some(pricing.grand_total);
        self.updated_at = Utc::now();
    }

    /// Total item count (sum of quantities).
    pub fn item_count(&self) -> i64 {
        self.items.iter().map(|i| i.quantity).sum()
    }

    /// Check if the order has no items.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Cancel the order if its status allows it.
    pub fn cancel(&mut self) -> bool {
        if !self.status.can_cancel() {
            return false;
        }
        self.status = OrderStatus::Cancelled;
        self.updated_at = Utc::now();
        true
    }

    /// Update the order status.
    pub fn set_status(&mut self, status: OrderStatus) {
        self.status = status;
        self.updated_at = Utc::now();
    }

    fn touch(&mut self) {
        self.grand_total = None;
        self.updated_at = Utc::now();
    }
}
