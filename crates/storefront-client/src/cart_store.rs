//! # Cart Store
//!
//! Holds the shopper's cart and its GST breakdown for the whole session.
//!
//! ## Data Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        CartStore Operations                             │
//! │                                                                         │
//! │  Caller                   CartStore                  Backend            │
//! │  ──────                   ─────────                  ───────            │
//! │                                                                         │
//! │  add_item(p, 2) ────────► validate ───────────────► POST /cart/add      │
//! │                           refresh() ◄────────────── GET  /cart          │
//! │                           engine.compute_for_cart()                     │
//! │                           snapshot = { cart, breakdown, Ready }         │
//! │                                                                         │
//! │  apply_coupon(c) ───────► validate percent (reject, state untouched)    │
//! │                           engine.compute_for_cart() (confirmed cart)    │
//! │                                                                         │
//! │  Fetch fails ──────────► cart dropped, breakdown = zero,                │
//! │                           status = Unavailable, Err                     │
//! │                           coupons wait for the next good refresh()      │
//! │  Engine fails ─────────► breakdown = zero, status = Unavailable         │
//! │                                                                         │
//! │  NOTE: The breakdown is always recomputed from the whole cart. It is    │
//! │        never patched, and never updated before the backend confirms.    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Concurrency
//! Reads take the snapshot `RwLock` briefly. Mutations and refreshes are
//! serialized by a separate `Mutex` held across the backend round-trip, so
//! an older response can never overwrite a newer one.

use chrono::{DateTime, Utc};
use serde::Serialize;
use std::fmt;
use std::sync::Arc;
use storefront_core::validation::{
    validate_discount_percent, validate_product_id, validate_requested_quantity,
};
use storefront_core::{
    summary_rows, Cart, CoreError, Coupon, PricingBreakdown, PricingEngine, SummaryRow,
};
use tokio::sync::{Mutex, RwLock};
use tracing::{debug, info, warn};

use crate::api::StorefrontApi;
use crate::error::ClientResult;

// =============================================================================
// Snapshot
// =============================================================================

/// Whether the current breakdown can be shown.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PricingStatus {
    /// Nothing fetched yet.
    #[default]
    NotLoaded,
    /// Breakdown reflects the server-confirmed cart.
    Ready,
    /// The cart could not be fetched or priced. The breakdown is all zero.
    Unavailable,
}

impl fmt::Display for PricingStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PricingStatus::NotLoaded => write!(f, "not loaded"),
            PricingStatus::Ready => write!(f, "ready"),
            PricingStatus::Unavailable => write!(f, "unable to compute total"),
        }
    }
}

/// The cart and its breakdown at one point in time.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CartSnapshot {
    pub cart: Cart,
    pub breakdown: PricingBreakdown,
    pub status: PricingStatus,
    pub refreshed_at: Option<DateTime<Utc>>,
}

impl CartSnapshot {
    fn empty() -> Self {
        CartSnapshot {
            cart: Cart::new(),
            breakdown: PricingBreakdown::zero(),
            status: PricingStatus::NotLoaded,
            refreshed_at: None,
        }
    }
}

struct StoreState {
    snapshot: CartSnapshot,
    /// Coupon applied in this session, kept across refreshes unless the
    /// backend cart carries its own.
    applied_coupon: Option<Coupon>,
    /// `snapshot.cart` came from a successful fetch.
    cart_confirmed: bool,
}

// =============================================================================
// Cart Store
// =============================================================================

/// The session's cart. Construct once and share by reference.
pub struct CartStore {
    api: Arc<dyn StorefrontApi>,
    engine: PricingEngine,
    state: RwLock<StoreState>,
    mutation: Mutex<()>,
}

impl CartStore {
    pub fn new(api: Arc<dyn StorefrontApi>, engine: PricingEngine) -> Self {
        CartStore {
            api,
            engine,
            state: RwLock::new(StoreState {
                snapshot: CartSnapshot::empty(),
                applied_coupon: None,
                cart_confirmed: false,
            }),
            mutation: Mutex::new(()),
        }
    }

    // =========================================================================
    // Server Round-Trips
    // =========================================================================

    /// Fetches the server cart and reprices it from scratch.
    ///
    /// ## Errors
    /// Any fetch error is returned after the breakdown is reset to zero and
    /// the status set to `Unavailable`. A pricing failure is not an error
    /// here: it shows up as `Unavailable` in the returned snapshot.
    pub async fn refresh(&self) -> ClientResult<CartSnapshot> {
        let _guard = self.mutation.lock().await;
        self.refresh_locked().await
    }

    /// Adds `quantity` units of a product, then refreshes.
    pub async fn add_item(&self, product_id: &str, quantity: i64) -> ClientResult<CartSnapshot> {
        validate_product_id(product_id)?;
        validate_requested_quantity(quantity)?;

        let _guard = self.mutation.lock().await;
        debug!(product_id, quantity, "Adding to cart");
        self.api.add_to_cart(product_id, quantity).await?;
        self.refresh_locked().await
    }

    /// Sets a line's quantity. Zero removes the line.
    pub async fn update_quantity(
        &self,
        product_id: &str,
        quantity: i64,
    ) -> ClientResult<CartSnapshot> {
        if quantity == 0 {
            return self.remove_item(product_id).await;
        }

        validate_product_id(product_id)?;
        validate_requested_quantity(quantity)?;

        let _guard = self.mutation.lock().await;
        debug!(product_id, quantity, "Updating cart quantity");
        self.api.update_cart_item(product_id, quantity).await?;
        self.refresh_locked().await
    }

    pub async fn remove_item(&self, product_id: &str) -> ClientResult<CartSnapshot> {
        validate_product_id(product_id)?;

        let _guard = self.mutation.lock().await;
        debug!(product_id, "Removing from cart");
        self.api.remove_from_cart(product_id).await?;
        self.refresh_locked().await
    }

    /// Empties the cart and drops any applied coupon.
    pub async fn clear(&self) -> ClientResult<CartSnapshot> {
        let _guard = self.mutation.lock().await;
        self.api.clear_cart().await?;
        self.state.write().await.applied_coupon = None;
        info!("Cart cleared");
        self.refresh_locked().await
    }

    // =========================================================================
    // Coupons
    // =========================================================================

    /// Applies a percentage coupon and reprices.
    ///
    /// An out-of-range percent is rejected and leaves the store untouched.
    /// Without a server-confirmed cart the coupon is only recorded, and the
    /// breakdown stays as it is until the next successful `refresh()`.
    pub async fn apply_coupon(&self, coupon: Coupon) -> ClientResult<CartSnapshot> {
        let percent = coupon.discount_percent;
        validate_discount_percent(percent).map_err(|_| CoreError::InvalidDiscount { percent })?;

        let _guard = self.mutation.lock().await;
        let mut state = self.state.write().await;

        info!(code = ?coupon.code, %percent, "Applying coupon");
        state.applied_coupon = Some(coupon);
        self.reprice_with_coupon(&mut state);

        Ok(state.snapshot.clone())
    }

    pub async fn remove_coupon(&self) -> CartSnapshot {
        let _guard = self.mutation.lock().await;
        let mut state = self.state.write().await;

        state.applied_coupon = None;
        self.reprice_with_coupon(&mut state);

        state.snapshot.clone()
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    pub async fn breakdown(&self) -> PricingBreakdown {
        self.state.read().await.snapshot.breakdown
    }

    pub async fn snapshot(&self) -> CartSnapshot {
        self.state.read().await.snapshot.clone()
    }

    pub async fn status(&self) -> PricingStatus {
        self.state.read().await.snapshot.status
    }

    /// Display rows for the current breakdown.
    pub async fn summary_rows(&self) -> Vec<SummaryRow> {
        let breakdown = self.breakdown().await;
        summary_rows(&breakdown, self.engine.rate())
    }

    pub fn engine(&self) -> &PricingEngine {
        &self.engine
    }

    // =========================================================================
    // Internals
    // =========================================================================

    /// Caller must hold `self.mutation`.
    async fn refresh_locked(&self) -> ClientResult<CartSnapshot> {
        let fetched = self.api.fetch_cart().await;
        let mut state = self.state.write().await;

        match fetched {
            Ok(payload) => {
                let mut cart = payload.to_cart();
                if cart.coupon.is_none() {
                    cart.coupon = state.applied_coupon.clone();
                }
                state.snapshot = self.price(cart);
                state.cart_confirmed = true;
                debug!(
                    lines = state.snapshot.cart.item_count(),
                    status = %state.snapshot.status,
                    "Cart refreshed"
                );
                Ok(state.snapshot.clone())
            }
            Err(e) => {
                warn!(error = %e, "Cart fetch failed, showing zero breakdown");
                state.snapshot = CartSnapshot {
                    cart: Cart::new(),
                    breakdown: PricingBreakdown::zero(),
                    status: PricingStatus::Unavailable,
                    refreshed_at: Some(Utc::now()),
                };
                state.cart_confirmed = false;
                Err(e)
            }
        }
    }

    /// Reprices the confirmed cart with the session coupon. No-op when
    /// there is no confirmed cart.
    fn reprice_with_coupon(&self, state: &mut StoreState) {
        if !state.cart_confirmed {
            debug!("No confirmed cart, coupon held until the next refresh");
            return;
        }
        let mut cart = state.snapshot.cart.clone();
        cart.coupon = state.applied_coupon.clone();
        state.snapshot = self.price(cart);
    }

    /// Prices `cart`. A pricing error yields a zero, `Unavailable` snapshot.
    fn price(&self, cart: Cart) -> CartSnapshot {
        let (breakdown, status) = match self.engine.compute_for_cart(&cart) {
            Ok(breakdown) => (breakdown, PricingStatus::Ready),
            Err(e) => {
                warn!(error = %e, "Unable to compute total");
                (PricingBreakdown::zero(), PricingStatus::Unavailable)
            }
        };

        CartSnapshot {
            cart,
            breakdown,
            status,
            refreshed_at: Some(Utc::now()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ClientError;
    use crate::models::{CartItemPayload, CartPayload, OrderPayload, ProductPayload, QuotationPayload};
    use async_trait::async_trait;
    use rust_decimal::Decimal;
    use rust_decimal_macros::dec;
    use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

    /// In-memory backend holding one cart.
    #[derive(Default)]
    struct FakeApi {
        cart: std::sync::Mutex<CartPayload>,
        prices: std::sync::Mutex<Vec<(String, Decimal)>>,
        fail_fetch: AtomicBool,
        mutations: AtomicUsize,
    }

    impl FakeApi {
        fn with_catalog(catalog: &[(&str, Decimal)]) -> Arc<Self> {
            let api = FakeApi::default();
            *api.prices.lock().unwrap() = catalog
                .iter()
                .map(|(id, price)| (id.to_string(), *price))
                .collect();
            Arc::new(api)
        }

        fn price_of(&self, id: &str) -> Decimal {
            self.prices
                .lock()
                .unwrap()
                .iter()
                .find(|(p, _)| p == id)
                .map(|(_, price)| *price)
                .unwrap_or(Decimal::ZERO)
        }
    }

    #[async_trait]
    impl StorefrontApi for FakeApi {
        async fn fetch_cart(&self) -> ClientResult<CartPayload> {
            if self.fail_fetch.load(Ordering::SeqCst) {
                return Err(ClientError::Http("connection reset".into()));
            }
            Ok(self.cart.lock().unwrap().clone())
        }

        async fn add_to_cart(&self, product_id: &str, quantity: i64) -> ClientResult<()> {
            self.mutations.fetch_add(1, Ordering::SeqCst);
            let price = self.price_of(product_id);
            let mut cart = self.cart.lock().unwrap();
            match cart.items.iter_mut().find(|i| i.product.id == product_id) {
                Some(line) => line.quantity += quantity,
                None => cart.items.push(CartItemPayload {
                    product: ProductPayload {
                        id: product_id.to_string(),
                        name: product_id.to_string(),
                        price,
                    },
                    quantity,
                }),
            }
            Ok(())
        }

        async fn update_cart_item(&self, product_id: &str, quantity: i64) -> ClientResult<()> {
            self.mutations.fetch_add(1, Ordering::SeqCst);
            let mut cart = self.cart.lock().unwrap();
            match cart.items.iter_mut().find(|i| i.product.id == product_id) {
                Some(line) => {
                    line.quantity = quantity;
                    Ok(())
                }
                None => Err(ClientError::NotFound(product_id.to_string())),
            }
        }

        async fn remove_from_cart(&self, product_id: &str) -> ClientResult<()> {
            self.mutations.fetch_add(1, Ordering::SeqCst);
            self.cart
                .lock()
                .unwrap()
                .items
                .retain(|i| i.product.id != product_id);
            Ok(())
        }

        async fn clear_cart(&self) -> ClientResult<()> {
            self.mutations.fetch_add(1, Ordering::SeqCst);
            *self.cart.lock().unwrap() = CartPayload::default();
            Ok(())
        }

        async fn fetch_order(&self, order_id: &str) -> ClientResult<OrderPayload> {
            Err(ClientError::NotFound(order_id.to_string()))
        }

        async fn fetch_quotation(&self, quotation_id: &str) -> ClientResult<QuotationPayload> {
            Err(ClientError::NotFound(quotation_id.to_string()))
        }
    }

    fn store(api: Arc<FakeApi>) -> CartStore {
        CartStore::new(api, PricingEngine::gst())
    }

    #[tokio::test]
    async fn test_new_store_is_zero_and_not_loaded() {
        let store = store(FakeApi::with_catalog(&[]));
        assert!(store.breakdown().await.is_zero());
        assert_eq!(store.status().await, PricingStatus::NotLoaded);
    }

    #[tokio::test]
    async fn test_add_items_reprices_from_server_cart() {
        let api = FakeApi::with_catalog(&[("fan", dec!(500)), ("bulb", dec!(300))]);
        let store = store(api.clone());

        store.add_item("fan", 2).await.unwrap();
        let snapshot = store.add_item("bulb", 1).await.unwrap();

        assert_eq!(snapshot.status, PricingStatus::Ready);
        assert_eq!(snapshot.cart.item_count(), 2);
        assert_eq!(snapshot.breakdown.grand_total, dec!(1300));
        assert_eq!(snapshot.breakdown.display().cgst.to_string(), "₹99.15");
        assert_eq!(api.mutations.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_update_to_zero_removes_line() {
        let api = FakeApi::with_catalog(&[("fan", dec!(500))]);
        let store = store(api);

        store.add_item("fan", 2).await.unwrap();
        let snapshot = store.update_quantity("fan", 5).await.unwrap();
        assert_eq!(snapshot.breakdown.grand_total, dec!(2500));

        let snapshot = store.update_quantity("fan", 0).await.unwrap();
        assert!(snapshot.cart.is_empty());
        assert!(snapshot.breakdown.is_zero());
    }

    #[tokio::test]
    async fn test_invalid_quantity_never_reaches_backend() {
        let api = FakeApi::with_catalog(&[("fan", dec!(500))]);
        let store = store(api.clone());

        assert!(store.add_item("fan", 1000).await.is_err());
        assert!(store.add_item("", 1).await.is_err());
        assert_eq!(api.mutations.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_fetch_failure_resets_to_zero() {
        let api = FakeApi::with_catalog(&[("fan", dec!(1180))]);
        let store = store(api.clone());
        store.add_item("fan", 1).await.unwrap();
        assert!(!store.breakdown().await.is_zero());

        api.fail_fetch.store(true, Ordering::SeqCst);
        let err = store.refresh().await.unwrap_err();

        assert!(err.is_retryable());
        assert!(store.breakdown().await.is_zero());
        assert_eq!(store.status().await, PricingStatus::Unavailable);
    }

    #[tokio::test]
    async fn test_coupon_after_fetch_failure_keeps_zero() {
        let api = FakeApi::with_catalog(&[("fan", dec!(1180))]);
        let store = store(api.clone());
        store.add_item("fan", 1).await.unwrap();

        api.fail_fetch.store(true, Ordering::SeqCst);
        assert!(store.refresh().await.is_err());
        assert!(store.snapshot().await.cart.is_empty());

        let snapshot = store.apply_coupon(Coupon::percent(dec!(10))).await.unwrap();
        assert_eq!(snapshot.status, PricingStatus::Unavailable);
        assert!(snapshot.breakdown.is_zero());

        let snapshot = store.remove_coupon().await;
        assert_eq!(snapshot.status, PricingStatus::Unavailable);
        assert!(snapshot.breakdown.is_zero());

        // A recorded coupon is used once the cart can be fetched again.
        store.apply_coupon(Coupon::percent(dec!(10))).await.unwrap();
        api.fail_fetch.store(false, Ordering::SeqCst);
        let snapshot = store.refresh().await.unwrap();
        assert_eq!(snapshot.status, PricingStatus::Ready);
        assert_eq!(snapshot.breakdown.grand_total, dec!(1062));
    }

    #[tokio::test]
    async fn test_coupon_discounts_pre_tax_base() {
        let api = FakeApi::with_catalog(&[("fan", dec!(1180))]);
        let store = store(api);
        store.add_item("fan", 1).await.unwrap();

        let snapshot = store
            .apply_coupon(Coupon::with_code("GOV10", dec!(10)))
            .await
            .unwrap();
        assert_eq!(snapshot.breakdown.discount_amount, dec!(100));
        assert_eq!(snapshot.breakdown.grand_total, dec!(1062));

        // The coupon survives a refresh.
        let snapshot = store.refresh().await.unwrap();
        assert_eq!(snapshot.breakdown.grand_total, dec!(1062));

        let rows = store.summary_rows().await;
        assert!(rows.iter().any(|r| r.label == "Discount"));

        let snapshot = store.remove_coupon().await;
        assert_eq!(snapshot.breakdown.grand_total, dec!(1180));
    }

    #[tokio::test]
    async fn test_invalid_coupon_leaves_state_untouched() {
        let api = FakeApi::with_catalog(&[("fan", dec!(1180))]);
        let store = store(api);
        let before = store.add_item("fan", 1).await.unwrap();

        let err = store.apply_coupon(Coupon::percent(dec!(150))).await.unwrap_err();
        assert!(matches!(
            err,
            ClientError::Core(CoreError::InvalidDiscount { .. })
        ));
        assert_eq!(store.snapshot().await, before);
    }

    #[tokio::test]
    async fn test_unpriceable_server_cart_is_unavailable() {
        let api = FakeApi::with_catalog(&[("broken", dec!(-10))]);
        let store = store(api);

        let snapshot = store.add_item("broken", 1).await.unwrap();
        assert_eq!(snapshot.status, PricingStatus::Unavailable);
        assert!(snapshot.breakdown.is_zero());
        assert_eq!(PricingStatus::Unavailable.to_string(), "unable to compute total");
    }

    #[tokio::test]
    async fn test_clear_drops_coupon() {
        let api = FakeApi::with_catalog(&[("fan", dec!(1180))]);
        let store = store(api);
        store.add_item("fan", 1).await.unwrap();
        store.apply_coupon(Coupon::percent(dec!(20))).await.unwrap();

        let snapshot = store.clear().await.unwrap();
        assert!(snapshot.cart.is_empty());
        assert!(snapshot.cart.coupon.is_none());
        assert!(snapshot.breakdown.is_zero());
    }
}
