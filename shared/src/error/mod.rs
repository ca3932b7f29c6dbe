//! Unified error system for the billing desk
//!
//! - [`ErrorCode`]: Standardized numeric codes
//! - [`ErrorCategory`]: Classification of errors by domain
//! - [`BillingError`]: The error type every component returns
//!
//! # Example
//!
//! ```
//! use shared::error::{BillingError, ErrorCode};
//!
//! let err = BillingError::EmptyBillOperation;
//! assert_eq!(err.code(), ErrorCode::BillEmpty);
//! assert_eq!(err.code().code(), 4003);
//! ```

mod category;
mod codes;
mod types;

pub use category::ErrorCategory;
pub use codes::{ErrorCode, InvalidErrorCode};
pub use types::{BillingError, BillingResult};
