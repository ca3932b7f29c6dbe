//! Line Item Model

use serde::{Deserialize, Serialize};

/// One row of the working bill
///
/// Only ever constructed by the ledger after validation, so `qty >= 1` and
/// `price >= 0` hold for every instance in a bill.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LineItem {
    /// Assigned at creation, never reused
    pub id: String,
    pub name: String,
    pub qty: u32,
    pub price: f64,
}

impl LineItem {
    pub fn new(name: impl Into<String>, qty: u32, price: f64) -> Self {
        Self {
            id: crate::util::new_id(),
            name: name.into(),
            qty,
            price,
        }
    }

    /// `qty * price`, rounded to paise; `None` on overflow
    pub fn line_total(&self) -> Option<f64> {
        crate::money::line_total(self.qty, self.price).map(crate::money::to_f64)
    }

    /// Deep copy without the bill-local id
    pub fn to_paid(&self) -> PaidItem {
        PaidItem {
            name: self.name.clone(),
            qty: self.qty,
            price: self.price,
        }
    }
}

/// Item as frozen into a payment entry
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PaidItem {
    pub name: String,
    pub qty: u32,
    pub price: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_assigns_distinct_ids() {
        let a = LineItem::new("Shirt", 2, 499.5);
        let b = LineItem::new("Shirt", 2, 499.5);
        assert_ne!(a.id, b.id);
        assert_eq!(a.line_total(), Some(999.0));
    }

    #[test]
    fn test_to_paid_is_independent_copy() {
        let mut item = LineItem::new("Socks", 3, 40.0);
        let paid = item.to_paid();
        item.name.push_str(" (edited)");
        item.qty = 9;
        assert_eq!(paid.name, "Socks");
        assert_eq!(paid.qty, 3);
        assert_eq!(paid.price, 40.0);
    }
}
