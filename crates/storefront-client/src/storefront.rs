//! # Storefront Context
//!
//! The one object the application builds at start-up. It owns the pricing
//! engine, the credential chain, the backend client and the cart store, and
//! prices every display surface through the same engine.
//!
//! ```text
//! Storefront
//! ├── engine        PricingEngine (rate from [pricing] gst_rate_bps)
//! ├── credentials   Arc<dyn CredentialProvider>
//! ├── api           Arc<dyn StorefrontApi>
//! └── cart          CartStore
//!
//! order_summary(id)     ──► fetch_order ──► compute_for_cart ──► rows
//! quotation_summary(id) ──► fetch_quotation ──► price_quotation ──► rows
//! ```

use rust_decimal::Decimal;
use serde::Serialize;
use std::sync::Arc;
use storefront_core::{
    price_quotation, summary_rows, PricingBreakdown, PricingEngine, SummaryRow, TaxMode,
};
use tracing::{debug, info};

use crate::api::{HttpStorefrontApi, StorefrontApi};
use crate::cart_store::CartStore;
use crate::config::ClientConfig;
use crate::credentials::{
    CompositeCredentials, CredentialProvider, PersistedSessionCredentials, SessionCredentials,
};
use crate::error::{ClientError, ClientResult};

/// A priced document (past order or quotation) ready to render.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PricedDocument {
    pub id: String,
    pub breakdown: PricingBreakdown,
    pub rows: Vec<SummaryRow>,
}

/// Application context.
pub struct Storefront {
    config: ClientConfig,
    engine: PricingEngine,
    credentials: Arc<dyn CredentialProvider>,
    api: Arc<dyn StorefrontApi>,
    cart: CartStore,
}

impl Storefront {
    /// Wires the context from explicit parts.
    pub fn new(
        config: ClientConfig,
        credentials: Arc<dyn CredentialProvider>,
        api: Arc<dyn StorefrontApi>,
    ) -> ClientResult<Self> {
        config.validate()?;
        let engine = PricingEngine::new(config.tax_rate())?;
        let cart = CartStore::new(api.clone(), engine);

        info!(
            base_url = %config.api.base_url,
            gst_bps = engine.rate().bps(),
            quote_basis = %config.quote_basis(),
            "Storefront context ready"
        );

        Ok(Storefront {
            config,
            engine,
            credentials,
            api,
            cart,
        })
    }

    /// Builds the usual HTTP context: in-memory session first, then the
    /// persisted session file.
    pub fn connect(config: ClientConfig) -> ClientResult<Self> {
        let persisted_path = config.session_file_path().ok_or_else(|| {
            ClientError::InvalidConfig("no session file location available".into())
        })?;

        let credentials: Arc<dyn CredentialProvider> =
            Arc::new(CompositeCredentials::session_then_persisted(
                Arc::new(SessionCredentials::new()),
                Arc::new(PersistedSessionCredentials::new(persisted_path)),
            ));
        let api = Arc::new(HttpStorefrontApi::new(&config, credentials.clone())?);

        Self::new(config, credentials, api)
    }

    pub fn cart(&self) -> &CartStore {
        &self.cart
    }

    pub fn engine(&self) -> &PricingEngine {
        &self.engine
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Clears every credential layer.
    pub fn sign_out(&self) {
        self.credentials.clear_session();
        info!("Signed out");
    }

    /// Reprices a past order with the live engine.
    ///
    /// Unlike the cart, a pricing failure here is returned as an error so
    /// the caller renders no breakdown at all.
    pub async fn order_summary(&self, order_id: &str) -> ClientResult<PricedDocument> {
        let order = self.api.fetch_order(order_id).await?;
        let breakdown = self.engine.compute_for_cart(&order.to_cart())?;
        debug!(order_id, grand_total = %breakdown.grand_total, "Order priced");

        Ok(self.document(order.id, breakdown))
    }

    /// Prices a government quotation using the configured price basis.
    pub async fn quotation_summary(&self, quotation_id: &str) -> ClientResult<PricedDocument> {
        let quotation = self.api.fetch_quotation(quotation_id).await?;
        let breakdown = self.price_flat(quotation.price, self.config.quote_basis())?;
        debug!(quotation_id, grand_total = %breakdown.grand_total, "Quotation priced");

        Ok(self.document(quotation.id, breakdown))
    }

    /// Prices a flat amount without touching the backend.
    pub fn price_flat(&self, price: Decimal, mode: TaxMode) -> ClientResult<PricingBreakdown> {
        Ok(price_quotation(&self.engine, price, mode)?)
    }

    /// Display rows for any breakdown produced by this context.
    pub fn rows(&self, breakdown: &PricingBreakdown) -> Vec<SummaryRow> {
        summary_rows(breakdown, self.engine.rate())
    }

    fn document(&self, id: String, breakdown: PricingBreakdown) -> PricedDocument {
        PricedDocument {
            id,
            rows: self.rows(&breakdown),
            breakdown,
        }
    }
}
