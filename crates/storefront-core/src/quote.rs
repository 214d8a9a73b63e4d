//! # Quotation Pricing
//!
//! Government quotations and invoices carry one flat `price` instead of cart
//! lines. They are priced by the same engine as the cart.
//!
//! ```text
//! Quotation { price }
//!      │
//!      ├── TaxMode::Exclusive ──► compute_from_base_amount(price)
//!      │                          cgst = sgst = price × 9%, total = price × 1.18
//!      │
//!      └── TaxMode::Inclusive ──► compute_from_inclusive_amount(price)
//!                                 tax reversed out of price
//! ```

use rust_decimal::Decimal;

use crate::error::CoreResult;
use crate::pricing::{PricingBreakdown, PricingEngine};
use crate::types::TaxMode;

/// Prices a flat quotation amount. Quotations never carry a discount.
pub fn price_quotation(
    engine: &PricingEngine,
    price: Decimal,
    mode: TaxMode,
) -> CoreResult<PricingBreakdown> {
    match mode {
        TaxMode::Exclusive => engine.compute_from_base_amount(price, None),
        TaxMode::Inclusive => engine.compute_from_inclusive_amount(price, None),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::CoreError;
    use rust_decimal_macros::dec;

    #[test]
    fn test_exclusive_matches_flat_formula() {
        for price in [dec!(1), dec!(999.99), dec!(25000), dec!(123456.78)] {
            let b = price_quotation(&PricingEngine::gst(), price, TaxMode::Exclusive).unwrap();
            assert_eq!(b.base_amount, price);
            assert_eq!(b.cgst, price * dec!(0.09));
            assert_eq!(b.sgst, price * dec!(0.09));
            assert_eq!(b.grand_total, price * dec!(1.18));
        }
    }

    #[test]
    fn test_inclusive_reverses_tax() {
        let b = price_quotation(&PricingEngine::gst(), dec!(1180), TaxMode::Inclusive).unwrap();
        assert_eq!(b.base_amount, dec!(1000));
        assert_eq!(b.total_tax, dec!(180));
        assert_eq!(b.grand_total, dec!(1180));
    }

    #[test]
    fn test_negative_price_is_rejected() {
        let err = price_quotation(&PricingEngine::gst(), dec!(-5), TaxMode::Exclusive).unwrap_err();
        assert!(matches!(err, CoreError::InvalidAmount { .. }));
    }

    #[test]
    fn test_zero_price() {
        let b = price_quotation(&PricingEngine::gst(), dec!(0), TaxMode::Exclusive).unwrap();
        assert!(b.is_zero());
    }
}
