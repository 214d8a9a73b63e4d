//! # Error Types
//!
//! Domain-specific error types for storefront-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  storefront-core errors (this file)                                    │
//! │  ├── CoreError        - Pricing failures (bad line, bad discount)      │
//! │  └── ValidationError  - Field-level input validation failures          │
//! │                                                                         │
//! │  storefront-client errors (separate crate)                             │
//! │  └── ClientError      - Network, auth, config failures                 │
//! │                                                                         │
//! │  Flow: ValidationError → CoreError → ClientError → CLI / UI            │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Tax figures have compliance implications: the engine reports every
//! malformed input as one of these variants instead of clamping it.

use rust_decimal::Decimal;
use thiserror::Error;

// =============================================================================
// Core Error
// =============================================================================

/// Pricing engine errors.
#[derive(Debug, Error)]
pub enum CoreError {
    /// A cart line cannot be priced.
    ///
    /// ## When This Occurs
    /// - `quantity < 1`
    /// - negative `unit_price_inclusive`
    #[error("Invalid line item at position {index}: {reason}")]
    InvalidLineItem { index: usize, reason: String },

    /// Discount percent is outside `[0, 100]`.
    ///
    /// ## User Workflow
    /// ```text
    /// Coupon { discountPercent: 150 }
    ///      │
    ///      ▼
    /// PricingEngine::compute_from_line_items
    ///      │
    ///      ▼
    /// InvalidDiscount { percent: 150 }
    ///      │
    ///      ▼
    /// UI shows: "Unable to compute total" (no breakdown rendered)
    /// ```
    #[error("Invalid discount percent {percent}: must be between 0 and 100")]
    InvalidDiscount { percent: Decimal },

    /// Tax rate is above 100%.
    #[error("Invalid tax rate {bps} bps: must be at most 10000")]
    InvalidTaxRate { bps: u32 },

    /// A flat amount (quotation price, lump sum) is negative or too large.
    #[error("Invalid {field}: {amount} is out of range")]
    InvalidAmount { field: String, amount: Decimal },

    /// Validation error (wraps ValidationError).
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),
}

// =============================================================================
// Validation Error
// =============================================================================

/// Input validation errors.
///
/// Used for early validation before the engine runs and before a cart
/// mutation is sent to the backend.
#[derive(Debug, Error)]
pub enum ValidationError {
    /// A required field is missing or empty.
    #[error("{field} is required")]
    Required { field: String },

    /// Field value is too long.
    #[error("{field} must be at most {max} characters")]
    TooLong { field: String, max: usize },

    /// Numeric value is out of range.
    #[error("{field} must be between {min} and {max}")]
    OutOfRange { field: String, min: i64, max: i64 },

    /// Value must be positive.
    #[error("{field} must be positive")]
    MustBePositive { field: String },

    /// Value must not be negative.
    #[error("{field} must not be negative")]
    MustNotBeNegative { field: String },

    /// Invalid format.
    #[error("{field} has invalid format: {reason}")]
    InvalidFormat { field: String, reason: String },
}

// =============================================================================
// Result Type Alias
// =============================================================================

/// Convenience type alias for Results with CoreError.
pub type CoreResult<T> = Result<T, CoreError>;

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let err = CoreError::InvalidDiscount {
            percent: Decimal::from(150),
        };
        assert_eq!(
            err.to_string(),
            "Invalid discount percent 150: must be between 0 and 100"
        );

        let err = CoreError::InvalidLineItem {
            index: 2,
            reason: "quantity must be positive".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "Invalid line item at position 2: quantity must be positive"
        );
    }

    #[test]
    fn test_validation_error_messages() {
        let err = ValidationError::Required {
            field: "product id".to_string(),
        };
        assert_eq!(err.to_string(), "product id is required");

        let err = ValidationError::MustNotBeNegative {
            field: "unit price".to_string(),
        };
        assert_eq!(err.to_string(), "unit price must not be negative");
    }

    #[test]
    fn test_validation_converts_to_core_error() {
        let validation_err = ValidationError::Required {
            field: "product id".to_string(),
        };
        let core_err: CoreError = validation_err.into();
        assert!(matches!(core_err, CoreError::Validation(_)));
    }
}
