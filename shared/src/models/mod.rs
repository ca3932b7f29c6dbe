//! Billing data models

pub mod line_item;
pub mod payment;

pub use line_item::{LineItem, PaidItem};
pub use payment::{PaymentDraft, PaymentEntry, PaymentStatus};
