//! # Validation Module
//!
//! Input validation for the pricing engine and for outbound cart mutations.
//!
//! ## Validation Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Validation Layers                                  │
//! │                                                                         │
//! │  Layer 1: CartStore (before a mutation leaves the client)              │
//! │  ├── validate_product_id                                               │
//! │  ├── validate_requested_quantity (1..=999)                             │
//! │  └── validate_discount_percent (coupon)                                │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 2: PricingEngine (every computation)                            │
//! │  ├── validate_quantity (>= 1)                                          │
//! │  ├── validate_unit_price (>= 0)                                        │
//! │  ├── validate_discount_percent ([0, 100])                              │
//! │  └── validate_tax_rate_bps (<= 10000)                                  │
//! │                                                                         │
//! │  Layer 3: Backend (authoritative cart)                                 │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use rust_decimal::Decimal;
//! use storefront_core::validation::{validate_discount_percent, validate_quantity};
//!
//! assert!(validate_quantity(2).is_ok());
//! assert!(validate_discount_percent(Decimal::from(150)).is_err());
//! ```

use rust_decimal::Decimal;

use crate::error::ValidationError;
use crate::MAX_ITEM_QUANTITY;

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

/// Longest product identifier the backend issues.
const MAX_PRODUCT_ID_LEN: usize = 64;

// =============================================================================
// Numeric Validators
// =============================================================================

/// Validates the quantity of a line being priced.
///
/// ## Rules
/// - Must be at least 1
pub fn validate_quantity(qty: i64) -> ValidationResult<()> {
    if qty < 1 {
        return Err(ValidationError::MustBePositive {
            field: "quantity".to_string(),
        });
    }

    Ok(())
}

/// Validates a quantity the shopper asks to put in the cart.
///
/// ## Rules
/// - Must be positive (> 0)
/// - Must not exceed MAX_ITEM_QUANTITY (999)
///
/// ## User Workflow
/// ```text
/// Shopper types quantity: 5
///      │
///      ▼
/// validate_requested_quantity(5) ← THIS FUNCTION
///      │
///      ├── qty <= 0?   → Error: "quantity must be positive"
///      ├── qty > 999?  → Error: "quantity must be between 1 and 999"
///      └── OK → request sent to backend
/// ```
pub fn validate_requested_quantity(qty: i64) -> ValidationResult<()> {
    validate_quantity(qty)?;

    if qty > MAX_ITEM_QUANTITY {
        return Err(ValidationError::OutOfRange {
            field: "quantity".to_string(),
            min: 1,
            max: MAX_ITEM_QUANTITY,
        });
    }

    Ok(())
}

/// Validates a tax-inclusive unit price.
///
/// ## Rules
/// - Must be non-negative (>= 0)
/// - Zero is allowed (free items)
pub fn validate_unit_price(price: Decimal) -> ValidationResult<()> {
    if price < Decimal::ZERO {
        return Err(ValidationError::MustNotBeNegative {
            field: "unit price".to_string(),
        });
    }

    Ok(())
}

/// Validates a coupon discount percent.
///
/// ## Rules
/// - Must be within `[0, 100]` inclusive
/// - Out-of-range values are rejected, never clamped
pub fn validate_discount_percent(percent: Decimal) -> ValidationResult<()> {
    if percent < Decimal::ZERO || percent > Decimal::ONE_HUNDRED {
        return Err(ValidationError::OutOfRange {
            field: "discount percent".to_string(),
            min: 0,
            max: 100,
        });
    }

    Ok(())
}

/// Validates a tax rate in basis points.
///
/// ## Rules
/// - Must be between 0 and 10000 (0% to 100%)
pub fn validate_tax_rate_bps(bps: u32) -> ValidationResult<()> {
    if bps > 10000 {
        return Err(ValidationError::OutOfRange {
            field: "tax rate".to_string(),
            min: 0,
            max: 10000,
        });
    }

    Ok(())
}

// =============================================================================
// String Validators
// =============================================================================

/// Validates a backend product identifier before it is put in a URL.
///
/// ## Rules
/// - Must not be empty
/// - At most 64 characters
/// - No whitespace or path separators
pub fn validate_product_id(id: &str) -> ValidationResult<()> {
    if id.trim().is_empty() {
        return Err(ValidationError::Required {
            field: "product id".to_string(),
        });
    }

    if id.len() > MAX_PRODUCT_ID_LEN {
        return Err(ValidationError::TooLong {
            field: "product id".to_string(),
            max: MAX_PRODUCT_ID_LEN,
        });
    }

    if id.chars().any(|c| c.is_whitespace() || c == '/' || c == '?' || c == '#') {
        return Err(ValidationError::InvalidFormat {
            field: "product id".to_string(),
            reason: "must not contain whitespace, '/', '?' or '#'".to_string(),
        });
    }

    Ok(())
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_validate_quantity() {
        assert!(validate_quantity(1).is_ok());
        assert!(validate_quantity(5000).is_ok());

        assert!(validate_quantity(0).is_err());
        assert!(validate_quantity(-1).is_err());
    }

    #[test]
    fn test_validate_requested_quantity() {
        assert!(validate_requested_quantity(1).is_ok());
        assert!(validate_requested_quantity(999).is_ok());

        assert!(validate_requested_quantity(0).is_err());
        assert!(validate_requested_quantity(1000).is_err());
    }

    #[test]
    fn test_validate_unit_price() {
        assert!(validate_unit_price(dec!(0)).is_ok());
        assert!(validate_unit_price(dec!(1099.99)).is_ok());
        assert!(validate_unit_price(dec!(-0.01)).is_err());
    }

    #[test]
    fn test_validate_discount_percent() {
        assert!(validate_discount_percent(dec!(0)).is_ok());
        assert!(validate_discount_percent(dec!(12.5)).is_ok());
        assert!(validate_discount_percent(dec!(100)).is_ok());

        assert!(validate_discount_percent(dec!(100.01)).is_err());
        assert!(validate_discount_percent(dec!(150)).is_err());
        assert!(validate_discount_percent(dec!(-5)).is_err());
    }

    #[test]
    fn test_validate_tax_rate_bps() {
        assert!(validate_tax_rate_bps(0).is_ok());
        assert!(validate_tax_rate_bps(1800).is_ok());
        assert!(validate_tax_rate_bps(10000).is_ok());
        assert!(validate_tax_rate_bps(10001).is_err());
    }

    #[test]
    fn test_validate_product_id() {
        assert!(validate_product_id("64f1c2a9e13b5a0012ab34cd").is_ok());
        assert!(validate_product_id("").is_err());
        assert!(validate_product_id("   ").is_err());
        assert!(validate_product_id("a b").is_err());
        assert!(validate_product_id("../admin").is_err());
        assert!(validate_product_id(&"x".repeat(65)).is_err());
    }
}
