//! BillLedger - the working bill
//!
//! Owns the not-yet-paid line items (most-recent-first) and derives the
//! grand total from them on every read, so there is no running total that
//! could drift from the item list.

use super::input::{self, ItemFields};
use rust_decimal::Decimal;
use shared::money;
use shared::{BillingError, LineItem, PaidItem};

/// Label used when the merchant leaves the name blank
pub const DEFAULT_FALLBACK_NAME: &str = "Garments";

#[derive(Debug, Clone)]
pub struct BillLedger {
    items: Vec<LineItem>,
    fallback_name: String,
}

impl Default for BillLedger {
    fn default() -> Self {
        Self::new(DEFAULT_FALLBACK_NAME)
    }
}

impl BillLedger {
    pub fn new(fallback_name: impl Into<String>) -> Self {
        Self {
            items: Vec::new(),
            fallback_name: fallback_name.into(),
        }
    }

    pub fn fallback_name(&self) -> &str {
        &self.fallback_name
    }

    /// Add an item from raw quick-entry fields
    ///
    /// Nothing is added when any field fails validation.
    pub fn add_item(&mut self, name: &str, qty: &str, price: &str) -> Result<LineItem, BillingError> {
        let fields = input::parse_fields(name, qty, price, &self.fallback_name)?;
        Ok(self.push(fields))
    }

    /// Add an item from typed values
    pub fn add(&mut self, name: &str, qty: u32, price: f64) -> Result<LineItem, BillingError> {
        let fields = ItemFields {
            name: input::normalize_name(name, &self.fallback_name),
            qty: input::validate_qty(qty)?,
            price: input::validate_price(price)?,
        };
        Ok(self.push(fields))
    }

    fn push(&mut self, fields: ItemFields) -> LineItem {
        let item = LineItem::new(fields.name, fields.qty, fields.price);
        self.items.insert(0, item.clone());
        tracing::debug!(
            item_id = %item.id,
            name = %item.name,
            qty = item.qty,
            price = item.price,
            "Item added"
        );
        item
    }

    /// Remove an item by id; unknown ids are ignored
    ///
    /// Returns whether an item was removed.
    pub fn remove_item(&mut self, id: &str) -> bool {
        let before = self.items.len();
        self.items.retain(|it| it.id != id);
        let removed = self.items.len() != before;
        if removed {
            tracing::debug!(item_id = %id, "Item removed");
        }
        removed
    }

    /// Current items, most-recent-first
    pub fn items(&self) -> &[LineItem] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Σ qty * price as an exact decimal
    ///
    /// Item bounds keep the sum far inside `Decimal` range; an overflow
    /// would read as 0, which makes the bill unpayable.
    pub fn grand_total_decimal(&self) -> Decimal {
        money::sum_lines(self.items.iter().map(|it| (it.qty, it.price)))
            .map(money::round_money)
            .unwrap_or_default()
    }

    /// Σ qty * price, rounded to paise; 0 for an empty bill
    pub fn grand_total(&self) -> f64 {
        money::to_f64(self.grand_total_decimal())
    }

    /// Whether the bill can be paid (non-empty and total > 0)
    pub fn is_payable(&self) -> bool {
        !self.items.is_empty() && self.grand_total_decimal() > Decimal::ZERO
    }

    /// Deep copy of the items in display order
    pub fn snapshot(&self) -> Vec<PaidItem> {
        self.items.iter().map(LineItem::to_paid).collect()
    }

    pub fn clear(&mut self) {
        self.items.clear();
    }
}
