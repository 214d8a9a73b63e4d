//! # Pricing Module
//!
//! The GST pricing engine. Every screen that shows money gets it from here.
//!
//! ## Algorithm
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  TAX-INCLUSIVE CART → GST BREAKDOWN                                     │
//! │                                                                         │
//! │  1. inclusive  = Σ unit_price_inclusive × quantity   (0 items ⇒ all 0)  │
//! │  2. base       = inclusive / (1 + rate)              (reverse the tax)  │
//! │  3. tax_before = inclusive − base                                       │
//! │  4. discount d > 0:                                                     │
//! │       discount = base × d / 100                      (pre-tax base!)    │
//! │       taxable  = base − discount                                        │
//! │       tax      = taxable × rate                      (recomputed)       │
//! │  5. otherwise:                                                          │
//! │       discount = 0, taxable = base, tax = tax_before                    │
//! │  6. cgst = sgst = tax / 2                                               │
//! │  7. grand_total = taxable + tax                                         │
//! │                                                                         │
//! │  The evaluation order above is fixed. Nothing is rounded until          │
//! │  `display()`.                                                           │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Entry Points
//! | Input                      | Function                         |
//! |----------------------------|----------------------------------|
//! | cart lines                 | `compute_from_line_items`        |
//! | a `Cart` with coupon       | `compute_for_cart`               |
//! | lump sum, tax included     | `compute_from_inclusive_amount`  |
//! | lump sum, tax excluded     | `compute_from_base_amount`       |
//!
//! There is deliberately no other way to produce a `PricingBreakdown`.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::error::{CoreError, CoreResult};
use crate::money::Money;
use crate::types::{Cart, LineItem, TaxRate};
use crate::validation::{
    validate_discount_percent, validate_quantity, validate_tax_rate_bps, validate_unit_price,
};

/// Largest amount (in rupees) the engine accepts as a total.
const MAX_AMOUNT_RUPEES: i64 = 1_000_000_000_000_000;

// =============================================================================
// Pricing Breakdown
// =============================================================================

/// The GST breakdown of a cart or a flat amount.
///
/// Held as derived state: always a pure function of the inputs, recomputed
/// from scratch and never patched.
///
/// ## Serialization
/// ```json
/// {
///   "baseAmount": 1101.69, "discountAmount": 0, "taxableAmount": 1101.69,
///   "cgst": 99.15, "sgst": 99.15, "totalTax": 198.31, "grandTotal": 1300
/// }
/// ```
/// (Values shown rounded; the wire carries the unrounded numbers.)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct PricingBreakdown {
    /// Pre-discount taxable value (tax excluded).
    #[ts(type = "number")]
    pub base_amount: Decimal,
    /// Discount applied to `base_amount` only.
    #[ts(type = "number")]
    pub discount_amount: Decimal,
    /// `base_amount − discount_amount`.
    #[ts(type = "number")]
    pub taxable_amount: Decimal,
    /// Central GST, half of `total_tax`.
    #[ts(type = "number")]
    pub cgst: Decimal,
    /// State GST, half of `total_tax`.
    #[ts(type = "number")]
    pub sgst: Decimal,
    #[ts(type = "number")]
    pub total_tax: Decimal,
    /// What the customer pays.
    #[ts(type = "number")]
    pub grand_total: Decimal,
}

impl PricingBreakdown {
    /// The breakdown of an empty cart.
    pub const fn zero() -> Self {
        PricingBreakdown {
            base_amount: Decimal::ZERO,
            discount_amount: Decimal::ZERO,
            taxable_amount: Decimal::ZERO,
            cgst: Decimal::ZERO,
            sgst: Decimal::ZERO,
            total_tax: Decimal::ZERO,
            grand_total: Decimal::ZERO,
        }
    }

    /// True when every field is zero.
    pub fn is_zero(&self) -> bool {
        [
            self.base_amount,
            self.discount_amount,
            self.taxable_amount,
            self.cgst,
            self.sgst,
            self.total_tax,
            self.grand_total,
        ]
        .iter()
        .all(Decimal::is_zero)
    }

    /// Rounds every field half-up to 2 decimals for presentation.
    ///
    /// Each field is rounded independently from its unrounded value.
    pub fn display(&self) -> DisplayBreakdown {
        DisplayBreakdown {
            base_amount: Money::from_decimal(self.base_amount),
            discount_amount: Money::from_decimal(self.discount_amount),
            taxable_amount: Money::from_decimal(self.taxable_amount),
            cgst: Money::from_decimal(self.cgst),
            sgst: Money::from_decimal(self.sgst),
            total_tax: Money::from_decimal(self.total_tax),
            grand_total: Money::from_decimal(self.grand_total),
        }
    }
}

/// A `PricingBreakdown` rounded for display.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct DisplayBreakdown {
    pub base_amount: Money,
    pub discount_amount: Money,
    pub taxable_amount: Money,
    pub cgst: Money,
    pub sgst: Money,
    pub total_tax: Money,
    pub grand_total: Money,
}

// =============================================================================
// Pricing Engine
// =============================================================================

/// Converts tax-inclusive amounts into a GST breakdown.
///
/// Stateless apart from its rate: calling it twice with the same input gives
/// bit-identical output.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PricingEngine {
    rate: TaxRate,
}

impl PricingEngine {
    /// Creates an engine for a combined tax rate.
    ///
    /// ## Errors
    /// `InvalidTaxRate` if the rate exceeds 100%.
    pub fn new(rate: TaxRate) -> CoreResult<Self> {
        validate_tax_rate_bps(rate.bps())
            .map_err(|_| CoreError::InvalidTaxRate { bps: rate.bps() })?;
        Ok(PricingEngine { rate })
    }

    /// Engine at the standard 18% GST.
    pub const fn gst() -> Self {
        PricingEngine {
            rate: TaxRate::GST_18,
        }
    }

    /// The combined rate this engine applies.
    #[inline]
    pub const fn rate(&self) -> TaxRate {
        self.rate
    }

    /// Prices cart lines with an optional percentage discount.
    ///
    /// ## Example
    /// ```rust
    /// use rust_decimal::Decimal;
    /// use storefront_core::{LineItem, PricingEngine};
    ///
    /// let engine = PricingEngine::gst();
    /// let items = [LineItem::new(Decimal::from(1180), 1)];
    ///
    /// let b = engine.compute_from_line_items(&items, Some(Decimal::from(10))).unwrap();
    /// assert_eq!(b.base_amount, Decimal::from(1000));
    /// assert_eq!(b.discount_amount, Decimal::from(100));
    /// assert_eq!(b.total_tax, Decimal::from(162));
    /// assert_eq!(b.grand_total, Decimal::from(1062));
    /// ```
    ///
    /// ## Errors
    /// - `InvalidDiscount` when the percent is outside `[0, 100]`
    /// - `InvalidLineItem` for `quantity < 1` or a negative unit price
    ///
    /// Inputs are validated before the empty-cart short-circuit, so a bad
    /// discount fails even on an empty cart.
    pub fn compute_from_line_items(
        &self,
        items: &[LineItem],
        discount_percent: Option<Decimal>,
    ) -> CoreResult<PricingBreakdown> {
        let discount = checked_discount(discount_percent)?;

        let mut inclusive_total = Decimal::ZERO;
        for (index, item) in items.iter().enumerate() {
            validate_quantity(item.quantity)
                .and_then(|_| validate_unit_price(item.unit_price_inclusive))
                .map_err(|e| CoreError::InvalidLineItem {
                    index,
                    reason: e.to_string(),
                })?;

            inclusive_total = item
                .unit_price_inclusive
                .checked_mul(Decimal::from(item.quantity))
                .and_then(|line| inclusive_total.checked_add(line))
                .ok_or_else(|| CoreError::InvalidLineItem {
                    index,
                    reason: "line total is too large to price".to_string(),
                })?;
        }

        if items.is_empty() {
            return Ok(PricingBreakdown::zero());
        }

        checked_amount("cart total", inclusive_total)?;
        Ok(self.reverse_inclusive(inclusive_total, discount))
    }

    /// Prices a cart using its own coupon.
    pub fn compute_for_cart(&self, cart: &Cart) -> CoreResult<PricingBreakdown> {
        self.compute_from_line_items(&cart.items, cart.discount_percent())
    }

    /// Prices a lump sum that already includes tax.
    ///
    /// Same as a single line of quantity 1 priced at `inclusive_total`.
    pub fn compute_from_inclusive_amount(
        &self,
        inclusive_total: Decimal,
        discount_percent: Option<Decimal>,
    ) -> CoreResult<PricingBreakdown> {
        let discount = checked_discount(discount_percent)?;
        checked_amount("inclusive amount", inclusive_total)?;

        if inclusive_total.is_zero() {
            return Ok(PricingBreakdown::zero());
        }

        Ok(self.reverse_inclusive(inclusive_total, discount))
    }

    /// Prices a lump sum that excludes tax.
    ///
    /// The amount is the `base_amount`; tax is always `taxable × rate`.
    ///
    /// ```rust
    /// use rust_decimal::Decimal;
    /// use storefront_core::PricingEngine;
    ///
    /// let b = PricingEngine::gst()
    ///     .compute_from_base_amount(Decimal::from(1000), None)
    ///     .unwrap();
    /// assert_eq!(b.cgst, Decimal::from(90));
    /// assert_eq!(b.grand_total, Decimal::from(1180));
    /// ```
    pub fn compute_from_base_amount(
        &self,
        base_amount: Decimal,
        discount_percent: Option<Decimal>,
    ) -> CoreResult<PricingBreakdown> {
        let discount = checked_discount(discount_percent)?;
        checked_amount("base amount", base_amount)?;

        if base_amount.is_zero() {
            return Ok(PricingBreakdown::zero());
        }

        let tax_before_discount = base_amount * self.rate.as_decimal();
        Ok(self.finish(base_amount, tax_before_discount, discount))
    }

    /// Steps 2-3: reverse the tax folded into an inclusive total.
    fn reverse_inclusive(&self, inclusive_total: Decimal, discount: Option<Decimal>) -> PricingBreakdown {
        let base_amount = inclusive_total / (Decimal::ONE + self.rate.as_decimal());
        let tax_before_discount = inclusive_total - base_amount;
        self.finish(base_amount, tax_before_discount, discount)
    }

    /// Steps 4-7.
    fn finish(
        &self,
        base_amount: Decimal,
        tax_before_discount: Decimal,
        discount: Option<Decimal>,
    ) -> PricingBreakdown {
        let (discount_amount, taxable_amount, total_tax) = match discount {
            Some(percent) if percent > Decimal::ZERO => {
                let discount_amount = base_amount * percent / Decimal::ONE_HUNDRED;
                let taxable_amount = base_amount - discount_amount;
                // Recomputed from the unrounded discounted base.
                let total_tax = taxable_amount * self.rate.as_decimal();
                (discount_amount, taxable_amount, total_tax)
            }
            _ => (Decimal::ZERO, base_amount, tax_before_discount),
        };

        let half = total_tax / Decimal::TWO;

        PricingBreakdown {
            base_amount,
            discount_amount,
            taxable_amount,
            cgst: half,
            sgst: half,
            total_tax,
            grand_total: taxable_amount + total_tax,
        }
    }
}

impl Default for PricingEngine {
    fn default() -> Self {
        PricingEngine::gst()
    }
}

fn checked_discount(discount_percent: Option<Decimal>) -> CoreResult<Option<Decimal>> {
    if let Some(percent) = discount_percent {
        validate_discount_percent(percent).map_err(|_| CoreError::InvalidDiscount { percent })?;
    }
    Ok(discount_percent)
}

fn checked_amount(field: &str, amount: Decimal) -> CoreResult<()> {
    if amount < Decimal::ZERO || amount > Decimal::from(MAX_AMOUNT_RUPEES) {
        return Err(CoreError::InvalidAmount {
            field: field.to_string(),
            amount,
        });
    }
    Ok(())
}

// =============================================================================
// Unit Tests
// =============================================================================
