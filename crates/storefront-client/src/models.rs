//! # Wire Models
//!
//! JSON shapes exchanged with the backend, and their conversion into
//! `storefront-core` types.
//!
//! ```json
//! {
//!   "items": [
//!     { "product": { "_id": "64f1...", "name": "Ceiling Fan", "price": 1180 }, "quantity": 2 }
//!   ],
//!   "coupon": { "code": "GOV10", "discountPercent": 10 }
//! }
//! ```
//!
//! Prices are JSON numbers and land in `Decimal` without passing through
//! `f64` arithmetic.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use storefront_core::{Cart, Coupon, LineItem};

// =============================================================================
// Cart
// =============================================================================

/// A product as embedded in cart and order lines.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductPayload {
    #[serde(rename = "_id")]
    pub id: String,
    #[serde(default)]
    pub name: String,
    /// Tax-inclusive unit price.
    pub price: Decimal,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CartItemPayload {
    pub product: ProductPayload,
    pub quantity: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CouponPayload {
    #[serde(default)]
    pub code: Option<String>,
    pub discount_percent: Decimal,
}

/// `GET /api/cart`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CartPayload {
    #[serde(default)]
    pub items: Vec<CartItemPayload>,
    #[serde(default)]
    pub coupon: Option<CouponPayload>,
}

impl CartItemPayload {
    fn to_line_item(&self) -> LineItem {
        LineItem::for_product(self.product.id.clone(), self.product.price, self.quantity)
    }
}

impl CouponPayload {
    fn to_coupon(&self) -> Coupon {
        Coupon {
            code: self.code.clone(),
            discount_percent: self.discount_percent,
        }
    }
}

impl CartPayload {
    /// Converts to the engine's cart. Values are not validated here; the
    /// engine rejects bad lines when pricing.
    pub fn to_cart(&self) -> Cart {
        Cart {
            items: self.items.iter().map(CartItemPayload::to_line_item).collect(),
            coupon: self.coupon.as_ref().map(CouponPayload::to_coupon),
        }
    }
}

// =============================================================================
// Mutations
// =============================================================================

/// Body of `POST /api/cart/add` and `PUT /api/cart/update`.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CartItemRequest<'a> {
    pub product_id: &'a str,
    pub quantity: i64,
}

// =============================================================================
// Orders and Quotations
// =============================================================================

/// `GET /api/orders/{id}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderPayload {
    #[serde(rename = "_id")]
    pub id: String,
    #[serde(default)]
    pub items: Vec<CartItemPayload>,
    #[serde(default)]
    pub coupon: Option<CouponPayload>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

impl OrderPayload {
    /// The order's lines and coupon, priced exactly like a live cart.
    pub fn to_cart(&self) -> Cart {
        Cart {
            items: self.items.iter().map(CartItemPayload::to_line_item).collect(),
            coupon: self.coupon.as_ref().map(CouponPayload::to_coupon),
        }
    }
}

/// `GET /api/quotations/{id}`: a government quotation with one flat price.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuotationPayload {
    #[serde(rename = "_id")]
    pub id: String,
    pub price: Decimal,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
}
