//! Unified error codes for the billing desk
//!
//! Error codes are organized by category:
//! - 4xxx: Bill errors
//! - 5xxx: Payment handoff errors
//! - 9xxx: System errors

use serde::{Deserialize, Serialize};
use std::fmt;

/// Unified error code enum
///
/// Represented as u16 so the console (or any other front-end) can map codes
/// to localized notices without parsing messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "u16", try_from = "u16")]
#[repr(u16)]
pub enum ErrorCode {
    // ==================== 4xxx: Bill ====================
    /// Quantity is not a positive whole number
    InvalidQuantity = 4001,
    /// Price is missing, negative or not a number
    InvalidPrice = 4002,
    /// Operation needs a non-empty bill
    BillEmpty = 4003,

    // ==================== 5xxx: Payment ====================
    /// Wallet dispatch or QR renderer unavailable
    HandoffUnavailable = 5001,

    // ==================== 9xxx: System ====================
    /// Key-value store read/write failed
    StorageError = 9002,
    /// Configuration value invalid
    ConfigError = 9005,
    /// Persisted history could not be decoded
    StorageCorrupted = 9403,
}

impl ErrorCode {
    #[inline]
    pub const fn code(&self) -> u16 {
        *self as u16
    }

    pub const fn message(&self) -> &'static str {
        match self {
            ErrorCode::InvalidQuantity => "Quantity must be a whole number of at least 1",
            ErrorCode::InvalidPrice => "Price must be a number of at least 0",
            ErrorCode::BillEmpty => "Add at least 1 item first",

            ErrorCode::HandoffUnavailable => "Payment app or QR service is not available",

            ErrorCode::StorageError => "Could not access local storage",
            ErrorCode::ConfigError => "Invalid configuration",
            ErrorCode::StorageCorrupted => "Saved payment history is unreadable",
        }
    }
}

impl From<ErrorCode> for u16 {
    #[inline]
    fn from(code: ErrorCode) -> Self {
        code.code()
    }
}

/// Error when converting from an invalid u16 to ErrorCode
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InvalidErrorCode(pub u16);

impl fmt::Display for InvalidErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid error code: {}", self.0)
    }
}

impl std::error::Error for InvalidErrorCode {}

impl TryFrom<u16> for ErrorCode {
    type Error = InvalidErrorCode;

    fn try_from(value: u16) -> Result<Self, Self::Error> {
        match value {
            4001 => Ok(ErrorCode::InvalidQuantity),
            4002 => Ok(ErrorCode::InvalidPrice),
            4003 => Ok(ErrorCode::BillEmpty),
            5001 => Ok(ErrorCode::HandoffUnavailable),
            9002 => Ok(ErrorCode::StorageError),
            9005 => Ok(ErrorCode::ConfigError),
            9403 => Ok(ErrorCode::StorageCorrupted),
            _ => Err(InvalidErrorCode(value)),
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_code_values() {
        assert_eq!(ErrorCode::InvalidQuantity.code(), 4001);
        assert_eq!(ErrorCode::InvalidPrice.code(), 4002);
        assert_eq!(ErrorCode::BillEmpty.code(), 4003);
        assert_eq!(ErrorCode::HandoffUnavailable.code(), 5001);
        assert_eq!(ErrorCode::StorageCorrupted.code(), 9403);
    }

    #[test]
    fn test_try_from_u16() {
        assert_eq!(ErrorCode::try_from(4003), Ok(ErrorCode::BillEmpty));
        assert_eq!(ErrorCode::try_from(9002), Ok(ErrorCode::StorageError));
        assert_eq!(ErrorCode::try_from(0), Err(InvalidErrorCode(0)));
        assert_eq!(ErrorCode::try_from(1234), Err(InvalidErrorCode(1234)));
    }

    #[test]
    fn test_serde_as_number() {
        let json = serde_json::to_string(&ErrorCode::InvalidPrice).unwrap();
        assert_eq!(json, "4002");
        let back: ErrorCode = serde_json::from_str("4001").unwrap();
        assert_eq!(back, ErrorCode::InvalidQuantity);
        assert!(serde_json::from_str::<ErrorCode>("7").is_err());
    }
}
