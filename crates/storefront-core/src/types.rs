//! # Domain Types
//!
//! Core domain types fed into the pricing engine.
//!
//! ## Type Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌─────────────────────┐   ┌─────────────────┐   ┌─────────────────┐   │
//! │  │       Cart          │   │    LineItem     │   │     Coupon      │   │
//! │  │  ─────────────────  │   │  ─────────────  │   │  ─────────────  │   │
//! │  │  items: [LineItem]  │──►│  product_id     │   │  code           │   │
//! │  │  coupon: Coupon?    │   │  unit_price_inc │   │  discount_%     │   │
//! │  └─────────────────────┘   │  quantity       │   └─────────────────┘   │
//! │                            └─────────────────┘                          │
//! │  ┌─────────────────┐   ┌─────────────────┐                              │
//! │  │    TaxRate      │   │    TaxMode      │                              │
//! │  │  ─────────────  │   │  ─────────────  │                              │
//! │  │  bps (u32)      │   │  Exclusive      │                              │
//! │  │  1800 = 18%     │   │  Inclusive      │                              │
//! │  └─────────────────┘   └─────────────────┘                              │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Sticker prices in the storefront are tax-inclusive. The taxable base is
//! derived by division, never by subtracting the rate from the total.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::GST_RATE_BPS;

// =============================================================================
// Tax Rate
// =============================================================================

/// Tax rate represented in basis points (bps).
///
/// 1 basis point = 0.01%. The combined GST rate is always split into two
/// equal halves (CGST and SGST).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct TaxRate(u32);

impl TaxRate {
    /// Combined GST at 18% (CGST 9% + SGST 9%).
    pub const GST_18: TaxRate = TaxRate(GST_RATE_BPS);

    /// Creates a tax rate from basis points.
    #[inline]
    pub const fn from_bps(bps: u32) -> Self {
        TaxRate(bps)
    }

    /// Returns the rate in basis points.
    #[inline]
    pub const fn bps(&self) -> u32 {
        self.0
    }

    /// Returns the rate as an exact decimal fraction (1800 bps = 0.18).
    #[inline]
    pub fn as_decimal(&self) -> Decimal {
        Decimal::new(self.0 as i64, 4)
    }

    /// Returns the rate of each half (CGST or SGST) as a percentage.
    ///
    /// Used only for row labels: `CGST (9%)`.
    pub fn half_percentage(&self) -> Decimal {
        (Decimal::new(self.0 as i64, 2) / Decimal::TWO).normalize()
    }

    /// Returns the combined rate as a percentage (for labels only).
    pub fn percentage(&self) -> Decimal {
        Decimal::new(self.0 as i64, 2).normalize()
    }
}

impl Default for TaxRate {
    fn default() -> Self {
        TaxRate::GST_18
    }
}

// =============================================================================
// Line Item
// =============================================================================

/// One cart line: a tax-inclusive unit price and a quantity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct LineItem {
    /// Backend product identifier, when the line came from a real cart.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[ts(optional)]
    pub product_id: Option<String>,

    /// Unit price with tax already folded in.
    #[ts(type = "number")]
    pub unit_price_inclusive: Decimal,

    /// Number of units (must be at least 1 to be priced).
    #[ts(type = "number")]
    pub quantity: i64,
}

impl LineItem {
    /// Creates an anonymous line item.
    pub fn new(unit_price_inclusive: Decimal, quantity: i64) -> Self {
        LineItem {
            product_id: None,
            unit_price_inclusive,
            quantity,
        }
    }

    /// Creates a line item tied to a backend product.
    pub fn for_product(
        product_id: impl Into<String>,
        unit_price_inclusive: Decimal,
        quantity: i64,
    ) -> Self {
        LineItem {
            product_id: Some(product_id.into()),
            unit_price_inclusive,
            quantity,
        }
    }

    /// `unit_price_inclusive × quantity`.
    #[inline]
    pub fn line_total_inclusive(&self) -> Decimal {
        self.unit_price_inclusive * Decimal::from(self.quantity)
    }
}

// =============================================================================
// Coupon
// =============================================================================

/// A percentage coupon applied to the pre-tax base of a cart.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct Coupon {
    /// Coupon code as entered by the shopper.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[ts(optional)]
    pub code: Option<String>,

    /// Discount percent in `[0, 100]`.
    #[ts(type = "number")]
    pub discount_percent: Decimal,
}

impl Coupon {
    /// Creates a coupon without a code.
    pub fn percent(discount_percent: Decimal) -> Self {
        Coupon {
            code: None,
            discount_percent,
        }
    }

    /// Creates a coupon with a code.
    pub fn with_code(code: impl Into<String>, discount_percent: Decimal) -> Self {
        Coupon {
            code: Some(code.into()),
            discount_percent,
        }
    }
}

// =============================================================================
// Cart
// =============================================================================

/// A priced collection of line items plus an optional coupon.
///
/// Line order is irrelevant to pricing.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct Cart {
    pub items: Vec<LineItem>,
    #[serde(default)]
    pub coupon: Option<Coupon>,
}

impl Cart {
    /// Creates a new empty cart.
    pub fn new() -> Self {
        Cart::default()
    }

    /// Creates a cart from line items without a coupon.
    pub fn from_items(items: Vec<LineItem>) -> Self {
        Cart {
            items,
            coupon: None,
        }
    }

    /// Σ (unit price × quantity) over all lines, tax included.
    pub fn inclusive_total(&self) -> Decimal {
        self.items.iter().map(LineItem::line_total_inclusive).sum()
    }

    /// The active coupon's discount percent, if any.
    pub fn discount_percent(&self) -> Option<Decimal> {
        self.coupon.as_ref().map(|c| c.discount_percent)
    }

    /// Returns the number of lines in the cart.
    pub fn item_count(&self) -> usize {
        self.items.len()
    }

    /// Returns the total quantity of all lines.
    pub fn total_quantity(&self) -> i64 {
        self.items.iter().map(|i| i.quantity).sum()
    }

    /// Checks if the cart is empty.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

// =============================================================================
// Tax Mode
// =============================================================================

/// Whether a flat amount already contains tax.
///
/// Cart prices are always inclusive. Government quotations carry a single
/// `price` whose basis is configured (see `quote::price_quotation`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum TaxMode {
    /// Amount excludes tax; tax is added on top.
    #[default]
    Exclusive,
    /// Amount already includes tax; tax is reversed out of it.
    Inclusive,
}

impl std::fmt::Display for TaxMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TaxMode::Exclusive => write!(f, "exclusive"),
            TaxMode::Inclusive => write!(f, "inclusive"),
        }
    }
}

impl std::str::FromStr for TaxMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "exclusive" | "exc" => Ok(TaxMode::Exclusive),
            "inclusive" | "inc" => Ok(TaxMode::Inclusive),
            other => Err(format!(
                "Unknown tax mode: '{}'. Valid options: exclusive, inclusive",
                other
            )),
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_tax_rate_from_bps() {
        let rate = TaxRate::from_bps(1800);
        assert_eq!(rate.bps(), 1800);
        assert_eq!(rate.as_decimal(), dec!(0.18));
        assert_eq!(rate.percentage(), dec!(18));
        assert_eq!(rate.half_percentage(), dec!(9));
    }

    #[test]
    fn test_tax_rate_half_percentage_odd_rate() {
        let rate = TaxRate::from_bps(500);
        assert_eq!(rate.half_percentage(), dec!(2.5));
        assert_eq!(rate.half_percentage().to_string(), "2.5");
    }

    #[test]
    fn test_tax_rate_default_is_gst() {
        assert_eq!(TaxRate::default(), TaxRate::GST_18);
    }

    #[test]
    fn test_line_total_inclusive() {
        let item = LineItem::new(dec!(499.50), 3);
        assert_eq!(item.line_total_inclusive(), dec!(1498.50));
    }

    #[test]
    fn test_cart_totals() {
        let cart = Cart::from_items(vec![
            LineItem::for_product("p-1", dec!(500), 2),
            LineItem::for_product("p-2", dec!(300), 1),
        ]);
        assert_eq!(cart.inclusive_total(), dec!(1300));
        assert_eq!(cart.item_count(), 2);
        assert_eq!(cart.total_quantity(), 3);
        assert_eq!(cart.discount_percent(), None);
        assert!(!cart.is_empty());
        assert!(Cart::new().is_empty());
    }

    #[test]
    fn test_tax_mode_parsing() {
        assert_eq!("exclusive".parse::<TaxMode>().unwrap(), TaxMode::Exclusive);
        assert_eq!("Inclusive".parse::<TaxMode>().unwrap(), TaxMode::Inclusive);
        assert!("gross".parse::<TaxMode>().is_err());
        assert_eq!(TaxMode::default(), TaxMode::Exclusive);
    }

    #[test]
    fn test_cart_json_shape() {
        let cart = Cart {
            items: vec![LineItem::new(dec!(250.5), 2)],
            coupon: Some(Coupon::with_code("DIWALI10", dec!(10))),
        };
        let json = serde_json::to_value(&cart).unwrap();
        assert_eq!(json["items"][0]["unitPriceInclusive"], serde_json::json!(250.5));
        assert_eq!(json["items"][0]["quantity"], serde_json::json!(2));
        assert_eq!(json["coupon"]["discountPercent"], serde_json::json!(10.0));
        assert_eq!(json["coupon"]["code"], serde_json::json!("DIWALI10"));
    }

    #[test]
    fn test_ts_optional_fields() {
        let line = LineItem::decl();
        assert!(line.contains("productId?: string"), "{}", line);
        assert!(!line.contains("null"), "{}", line);

        let coupon = Coupon::decl();
        assert!(coupon.contains("code?: string"), "{}", coupon);
        assert!(!coupon.contains("null"), "{}", coupon);
    }
}
