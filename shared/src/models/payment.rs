//! Payment Entry Model

use super::line_item::PaidItem;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Payment status
///
/// Every locally recorded entry is `Completed`: the wallet handoff has no
/// callback, so confirmation is optimistic.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum PaymentStatus {
    Pending,
    #[default]
    Completed,
    Failed,
}

/// Completed payment, immutable once recorded
///
/// Field names follow the persisted JSON layout (`createdAt`, `vpa`, ...).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PaymentEntry {
    pub id: String,
    pub created_at: DateTime<Utc>,
    /// Grand total at payment time; equals the sum over `items`
    pub amount: f64,
    #[serde(rename = "vpa")]
    pub payee_vpa: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub payee_name: Option<String>,
    #[serde(default)]
    pub status: PaymentStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub payment_method: Option<String>,
    pub items: Vec<PaidItem>,
}

impl PaymentEntry {
    /// Sum of `qty * price` over the entry's own items, `None` on overflow
    pub fn recomputed_amount(&self) -> Option<f64> {
        crate::money::sum_lines(self.items.iter().map(|it| (it.qty, it.price))).map(crate::money::to_f64)
    }

    /// Whether `amount` agrees with the item snapshot
    pub fn is_consistent(&self) -> bool {
        self.recomputed_amount()
            .is_some_and(|sum| crate::money::amounts_match(self.amount, sum))
    }
}

/// Everything the history store needs to mint a [`PaymentEntry`]
#[derive(Debug, Clone, PartialEq)]
pub struct PaymentDraft {
    pub items: Vec<PaidItem>,
    pub amount: f64,
    pub payee_vpa: String,
    pub payee_name: Option<String>,
    pub payment_method: Option<String>,
}

impl PaymentDraft {
    pub fn new(items: Vec<PaidItem>, amount: f64, payee_vpa: impl Into<String>) -> Self {
        Self {
            items,
            amount,
            payee_vpa: payee_vpa.into(),
            payee_name: None,
            payment_method: None,
        }
    }

    pub fn with_payee_name(mut self, name: impl Into<String>) -> Self {
        self.payee_name = Some(name.into());
        self
    }

    pub fn with_payment_method(mut self, method: impl Into<String>) -> Self {
        self.payment_method = Some(method.into());
        self
    }
}
