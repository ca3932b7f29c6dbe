//! Billing error type

use super::codes::ErrorCode;
use thiserror::Error;

/// Errors raised by the bill ledger, the history store and the payment handoff
///
/// None of these is fatal: every variant degrades to "no-op plus notice" or
/// "reset to empty state" at the call site.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum BillingError {
    #[error("Invalid quantity: {0}")]
    InvalidQuantity(String),

    #[error("Invalid price: {0}")]
    InvalidPrice(String),

    #[error("Bill is empty")]
    EmptyBillOperation,

    #[error("Payment history decode failed: {0}")]
    PersistenceDecodeFailure(String),

    #[error("External handoff unavailable: {0}")]
    ExternalHandoffUnavailable(String),

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Config error: {0}")]
    Config(String),
}

impl BillingError {
    pub fn invalid_quantity(msg: impl Into<String>) -> Self {
        Self::InvalidQuantity(msg.into())
    }

    pub fn invalid_price(msg: impl Into<String>) -> Self {
        Self::InvalidPrice(msg.into())
    }

    pub fn handoff(msg: impl Into<String>) -> Self {
        Self::ExternalHandoffUnavailable(msg.into())
    }

    pub fn storage(msg: impl Into<String>) -> Self {
        Self::Storage(msg.into())
    }

    /// Error code for this error
    pub fn code(&self) -> ErrorCode {
        match self {
            Self::InvalidQuantity(_) => ErrorCode::InvalidQuantity,
            Self::InvalidPrice(_) => ErrorCode::InvalidPrice,
            Self::EmptyBillOperation => ErrorCode::BillEmpty,
            Self::PersistenceDecodeFailure(_) => ErrorCode::StorageCorrupted,
            Self::ExternalHandoffUnavailable(_) => ErrorCode::HandoffUnavailable,
            Self::Storage(_) => ErrorCode::StorageError,
            Self::Config(_) => ErrorCode::ConfigError,
        }
    }

    /// Short notice suitable for showing to the merchant
    pub fn notice(&self) -> &'static str {
        self.code().message()
    }
}

pub type BillingResult<T> = Result<T, BillingError>;
