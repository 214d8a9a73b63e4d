//! # storefront-core: Pure Pricing Logic for the Storefront
//!
//! This crate is the **heart** of the storefront. It turns tax-inclusive cart
//! lines into a GST-compliant breakdown, and it is the only place in the
//! workspace where tax is computed.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Storefront Architecture                            │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                    Display Surfaces                             │   │
//! │  │   Order Summary ─ Checkout ─ Order Detail ─ Quotation/Invoice   │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │ PricingBreakdown / SummaryRow          │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │               storefront-client (CartStore, API)                │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │               ★ storefront-core (THIS CRATE) ★                  │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────┐  ┌───────────┐  ┌───────────┐  ┌───────────┐  │   │
//! │  │   │  pricing  │  │   money   │  │   quote   │  │ validation│  │   │
//! │  │   │  Engine   │  │   Money   │  │ flat-price│  │   rules   │  │   │
//! │  │   │ Breakdown │  │  ₹ format │  │  routing  │  │  checks   │  │   │
//! │  │   └───────────┘  └───────────┘  └───────────┘  └───────────┘  │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO NETWORK • PURE FUNCTIONS                          │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`pricing`] - `PricingEngine` and `PricingBreakdown`
//! - [`money`] - Display money (paise, half-up rounded)
//! - [`types`] - Domain types (LineItem, Cart, Coupon, TaxRate)
//! - [`quote`] - Flat-price quotation pricing through the same engine
//! - [`summary`] - The rows every screen renders
//! - [`error`] - Domain error types
//! - [`validation`] - Input validation
//!
//! ## Design Principles
//!
//! 1. **Pure Functions**: same input = same output, bit for bit
//! 2. **Decimal Internally**: amounts are `Decimal` and never rounded mid-computation
//! 3. **Round Once**: only [`Money::from_decimal`] rounds, and only for display
//! 4. **Fail Loudly**: malformed input is an error, never a plausible-looking figure
//!
//! ## Example Usage
//!
//! ```rust
//! use rust_decimal::Decimal;
//! use storefront_core::{LineItem, PricingEngine};
//!
//! let engine = PricingEngine::gst();
//! let items = vec![
//!     LineItem::new(Decimal::from(500), 2),
//!     LineItem::new(Decimal::from(300), 1),
//! ];
//!
//! let breakdown = engine.compute_from_line_items(&items, None).unwrap();
//! assert_eq!(breakdown.grand_total, Decimal::from(1300));
//! assert_eq!(breakdown.display().grand_total.to_string(), "₹1300.00");
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod money;
pub mod pricing;
pub mod quote;
pub mod summary;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use error::{CoreError, CoreResult, ValidationError};
pub use money::Money;
pub use pricing::{DisplayBreakdown, PricingBreakdown, PricingEngine};
pub use quote::price_quotation;
pub use summary::{summary_rows, SummaryRow};
pub use types::*;

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Combined GST rate in basis points (18%), split evenly into CGST and SGST.
pub const GST_RATE_BPS: u32 = 1800;

/// Currency symbol used by `Money`'s `Display` implementation.
pub const CURRENCY_SYMBOL: &str = "₹";

/// Maximum quantity a shopper may request for a single line.
///
/// Only outbound cart mutations are checked against this. Carts confirmed by
/// the server are priced whatever their quantities.
pub const MAX_ITEM_QUANTITY: i64 = 999;
