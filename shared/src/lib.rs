//! Shared types for the billing desk
//!
//! Data models, error codes and money helpers used by the ledger, the
//! history store and any front-end that renders them.

pub mod error;
pub mod models;
pub mod money;
pub mod util;

// Re-exports
pub use error::{BillingError, BillingResult, ErrorCategory, ErrorCode};
pub use models::{LineItem, PaidItem, PaymentDraft, PaymentEntry, PaymentStatus};
pub use serde::{Deserialize, Serialize};
