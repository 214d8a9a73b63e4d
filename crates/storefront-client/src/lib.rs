//! # storefront-client: Backend Client and Cart Session
//!
//! Everything around the pricing engine that performs I/O: the remote
//! backend API, credentials, configuration, and the cart store.
//!
//! ## Module Organization
//! - [`api`] - `StorefrontApi` trait and its HTTP implementation
//! - [`cart_store`] - `CartStore`, the session's cart and breakdown
//! - [`config`] - `ClientConfig` (defaults, TOML file, environment)
//! - [`credentials`] - `CredentialProvider` and its implementations
//! - [`error`] - `ClientError`
//! - [`models`] - JSON wire shapes
//! - [`storefront`] - `Storefront`, the application context
//!
//! ## Usage
//! ```rust,no_run
//! use storefront_client::{ClientConfig, Storefront};
//!
//! # async fn run() -> storefront_client::ClientResult<()> {
//! let storefront = Storefront::connect(ClientConfig::load(None)?)?;
//! let snapshot = storefront.cart().refresh().await?;
//! println!("{}", snapshot.breakdown.display().grand_total);
//! # Ok(())
//! # }
//! ```

pub mod api;
pub mod cart_store;
pub mod config;
pub mod credentials;
pub mod error;
pub mod models;
pub mod storefront;

pub use api::{HttpStorefrontApi, StorefrontApi};
pub use cart_store::{CartSnapshot, CartStore, PricingStatus};
pub use config::ClientConfig;
pub use credentials::{
    AccessToken, CompositeCredentials, CredentialProvider, PersistedSessionCredentials,
    SessionCredentials, StoredSession,
};
pub use error::{ClientError, ClientResult};
pub use storefront::{PricedDocument, Storefront};
