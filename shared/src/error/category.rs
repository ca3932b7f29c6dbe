//! Error category classification

use super::codes::ErrorCode;
use serde::{Deserialize, Serialize};

/// Error category classification based on error code ranges
///
/// - 4xxx: Bill errors
/// - 5xxx: Payment errors
/// - 9xxx: System errors
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCategory {
    /// Codes outside the assigned ranges
    General,
    /// Bill errors (4xxx)
    Bill,
    /// Payment errors (5xxx)
    Payment,
    /// System errors (9xxx)
    System,
}

impl ErrorCategory {
    /// Determine category from error code value
    pub fn from_code(code: u16) -> Self {
        match code {
            4000..5000 => Self::Bill,
            5000..6000 => Self::Payment,
            9000.. => Self::System,
            _ => Self::General,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::General => "general",
            Self::Bill => "bill",
            Self::Payment => "payment",
            Self::System => "system",
        }
    }

    /// Whether the user can fix the problem by correcting their input
    pub fn is_user_error(&self) -> bool {
        matches!(self, Self::General | Self::Bill)
    }
}

impl ErrorCode {
    /// Get the category for this error code
    pub fn category(&self) -> ErrorCategory {
        ErrorCategory::from_code(self.code())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_category_from_code() {
        assert_eq!(ErrorCategory::from_code(2), ErrorCategory::General);
        assert_eq!(ErrorCategory::from_code(4001), ErrorCategory::Bill);
        assert_eq!(ErrorCategory::from_code(5001), ErrorCategory::Payment);
        assert_eq!(ErrorCategory::from_code(9403), ErrorCategory::System);
    }

    #[test]
    fn test_error_code_category() {
        assert_eq!(ErrorCode::BillEmpty.category(), ErrorCategory::Bill);
        assert_eq!(ErrorCode::StorageError.category(), ErrorCategory::System);
        assert!(ErrorCode::InvalidPrice.category().is_user_error());
        assert!(!ErrorCode::HandoffUnavailable.category().is_user_error());
    }
}
