//! # Summary Rows
//!
//! The rows every display surface renders from a breakdown. Order summary,
//! checkout, order detail, quotation and invoice all call `summary_rows`, so
//! the same cart never shows two different sets of numbers.
//!
//! ```text
//! Subtotal          ₹1000.00
//! Discount          -₹100.00   (only when non-zero)
//! Taxable Amount     ₹900.00
//! CGST (9%)           ₹81.00
//! SGST (9%)           ₹81.00
//! Grand Total       ₹1062.00
//! ```

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::money::Money;
use crate::pricing::PricingBreakdown;
use crate::types::TaxRate;

/// One labelled line of a price summary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct SummaryRow {
    pub label: String,
    pub amount: Money,
}

impl SummaryRow {
    fn new(label: impl Into<String>, amount: Money) -> Self {
        SummaryRow {
            label: label.into(),
            amount,
        }
    }
}

/// Builds the display rows for a breakdown priced at `rate`.
///
/// The discount row carries a negative amount.
pub fn summary_rows(breakdown: &PricingBreakdown, rate: TaxRate) -> Vec<SummaryRow> {
    let shown = breakdown.display();
    let half = rate.half_percentage();

    let mut rows = Vec::with_capacity(6);
    rows.push(SummaryRow::new("Subtotal", shown.base_amount));
    if !breakdown.discount_amount.is_zero() {
        rows.push(SummaryRow::new(
            "Discount",
            Money::zero() - shown.discount_amount,
        ));
    }
    rows.push(SummaryRow::new("Taxable Amount", shown.taxable_amount));
    rows.push(SummaryRow::new(format!("CGST ({}%)", half), shown.cgst));
    rows.push(SummaryRow::new(format!("SGST ({}%)", half), shown.sgst));
    rows.push(SummaryRow::new("Grand Total", shown.grand_total));
    rows
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pricing::PricingEngine;
    use rust_decimal_macros::dec;

    fn labels(rows: &[SummaryRow]) -> Vec<&str> {
        rows.iter().map(|r| r.label.as_str()).collect()
    }

    #[test]
    fn test_rows_without_discount() {
        let b = PricingEngine::gst()
            .compute_from_inclusive_amount(dec!(1300), None)
            .unwrap();
        let rows = summary_rows(&b, TaxRate::GST_18);

        assert_eq!(
            labels(&rows),
            vec!["Subtotal", "Taxable Amount", "CGST (9%)", "SGST (9%)", "Grand Total"]
        );
        assert_eq!(rows[0].amount.to_string(), "₹1101.69");
        assert_eq!(rows[2].amount.to_string(), "₹99.15");
        assert_eq!(rows[4].amount.to_string(), "₹1300.00");
    }

    #[test]
    fn test_rows_with_discount() {
        let b = PricingEngine::gst()
            .compute_from_base_amount(dec!(1000), Some(dec!(10)))
            .unwrap();
        let rows = summary_rows(&b, TaxRate::GST_18);

        assert_eq!(rows.len(), 6);
        assert_eq!(rows[1].label, "Discount");
        assert_eq!(rows[1].amount.to_string(), "-₹100.00");
        assert_eq!(rows[2].amount.to_string(), "₹900.00");
        assert_eq!(rows[5].amount.to_string(), "₹1062.00");
    }

    #[test]
    fn test_labels_follow_rate() {
        let rate = TaxRate::from_bps(500);
        let b = PricingEngine::new(rate)
            .unwrap()
            .compute_from_base_amount(dec!(100), None)
            .unwrap();
        let rows = summary_rows(&b, rate);
        assert!(labels(&rows).contains(&"CGST (2.5%)"));
    }

    #[test]
    fn test_empty_cart_rows_are_zero() {
        let rows = summary_rows(&PricingBreakdown::zero(), TaxRate::GST_18);
        assert_eq!(rows.len(), 5);
        assert!(rows.iter().all(|r| r.amount.is_zero()));
    }
}
