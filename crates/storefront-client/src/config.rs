//! # Client Configuration
//!
//! Configuration for the backend client and the pricing context.
//!
//! ## Configuration Sources
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Configuration Priority                               │
//! │                                                                         │
//! │  1. Environment Variables (highest priority)                           │
//! │     STOREFRONT_API_URL=https://api.example.in                          │
//! │     STOREFRONT_QUOTE_BASIS=inclusive                                   │
//! │                                                                         │
//! │  2. TOML Config File                                                   │
//! │     ~/.config/storefront/storefront.toml (Linux)                       │
//! │     ~/Library/Application Support/in.storefront.storefront/ (macOS)    │
//! │                                                                         │
//! │  3. Default Values (lowest priority)                                   │
//! │     localhost backend, 18% GST, exclusive quotation prices             │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Configuration File Format
//! ```toml
//! [api]
//! base_url = "https://api.example.in"
//! timeout_secs = 15
//!
//! [pricing]
//! gst_rate_bps = 1800
//! quote_price_basis = "exclusive"  # exclusive | inclusive
//!
//! [display]
//! currency_symbol = "₹"
//!
//! [session]
//! session_file = "/home/me/.local/share/storefront/session.json"
//! ```

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;
use storefront_core::validation::validate_tax_rate_bps;
use storefront_core::{TaxMode, TaxRate, CURRENCY_SYMBOL, GST_RATE_BPS};
use tracing::{debug, info, warn};

use crate::error::{ClientError, ClientResult};

// =============================================================================
// API Settings
// =============================================================================

/// Where the backend lives.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiSettings {
    /// Backend origin, without the `/api` suffix.
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Per-request timeout (seconds).
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,
}

fn default_base_url() -> String {
    "http://localhost:5000".to_string()
}

fn default_timeout() -> u64 {
    15
}

impl Default for ApiSettings {
    fn default() -> Self {
        ApiSettings {
            base_url: default_base_url(),
            timeout_secs: default_timeout(),
        }
    }
}

// =============================================================================
// Pricing Settings
// =============================================================================

/// Tax settings shared by every pricing call site.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PricingSettings {
    /// Combined GST rate in basis points.
    #[serde(default = "default_gst_rate")]
    pub gst_rate_bps: u32,

    /// Whether a quotation `price` already includes GST.
    #[serde(default)]
    pub quote_price_basis: TaxMode,
}

fn default_gst_rate() -> u32 {
    GST_RATE_BPS
}

impl Default for PricingSettings {
    fn default() -> Self {
        PricingSettings {
            gst_rate_bps: default_gst_rate(),
            quote_price_basis: TaxMode::default(),
        }
    }
}

// =============================================================================
// Display and Session Settings
// =============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DisplaySettings {
    #[serde(default = "default_currency_symbol")]
    pub currency_symbol: String,
}

fn default_currency_symbol() -> String {
    CURRENCY_SYMBOL.to_string()
}

impl Default for DisplaySettings {
    fn default() -> Self {
        DisplaySettings {
            currency_symbol: default_currency_symbol(),
        }
    }
}

/// Where the persisted session lives.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SessionSettings {
    /// Overrides the platform data directory location.
    #[serde(default)]
    pub session_file: Option<PathBuf>,
}

// =============================================================================
// Main Client Configuration
// =============================================================================

/// Complete client configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ClientConfig {
    #[serde(default)]
    pub api: ApiSettings,

    #[serde(default)]
    pub pricing: PricingSettings,

    #[serde(default)]
    pub display: DisplaySettings,

    #[serde(default)]
    pub session: SessionSettings,
}

impl ClientConfig {
    /// Creates a config with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads configuration from file, environment, and defaults.
    ///
    /// ## Load Order (later overrides earlier)
    /// 1. Default values
    /// 2. Config file (storefront.toml)
    /// 3. Environment variables
    pub fn load(config_path: Option<PathBuf>) -> ClientResult<Self> {
        Self::load_with(config_path, |key| std::env::var(key).ok())
    }

    /// Same as [`ClientConfig::load`], reading overrides through `lookup`.
    pub fn load_with(
        config_path: Option<PathBuf>,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> ClientResult<Self> {
        let mut config = Self::default();

        if let Some(path) = config_path.or_else(Self::default_config_path) {
            if path.exists() {
                info!(?path, "Loading storefront config from file");
                let contents = std::fs::read_to_string(&path)
                    .map_err(|e| ClientError::ConfigLoadFailed(e.to_string()))?;
                config = toml::from_str(&contents)?;
            } else {
                debug!(?path, "Config file not found, using defaults");
            }
        }

        config.apply_overrides(lookup);
        config.validate()?;

        Ok(config)
    }

    /// Saves configuration to file.
    pub fn save(&self, config_path: Option<PathBuf>) -> ClientResult<()> {
        let path = config_path
            .or_else(Self::default_config_path)
            .ok_or_else(|| ClientError::ConfigSaveFailed("No config path available".into()))?;

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .map_err(|e| ClientError::ConfigSaveFailed(e.to_string()))?;
        }

        let contents = toml::to_string_pretty(self)?;
        std::fs::write(&path, contents).map_err(|e| ClientError::ConfigSaveFailed(e.to_string()))?;

        info!(?path, "Storefront config saved");
        Ok(())
    }

    /// Validates the configuration.
    pub fn validate(&self) -> ClientResult<()> {
        let url = &self.api.base_url;
        if !url.starts_with("http://") && !url.starts_with("https://") {
            return Err(ClientError::InvalidConfig(format!(
                "API base URL must start with http:// or https://, got: {}",
                url
            )));
        }

        if self.api.timeout_secs == 0 {
            return Err(ClientError::InvalidConfig(
                "timeout_secs must be greater than 0".into(),
            ));
        }

        validate_tax_rate_bps(self.pricing.gst_rate_bps)
            .map_err(|e| ClientError::InvalidConfig(e.to_string()))?;

        Ok(())
    }

    /// Applies `STOREFRONT_*` overrides read through `lookup`.
    fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(url) = lookup("STOREFRONT_API_URL") {
            debug!(url = %url, "Overriding API URL from environment");
            self.api.base_url = url;
        }

        if let Some(secs) = lookup("STOREFRONT_TIMEOUT_SECS") {
            match secs.parse::<u64>() {
                Ok(s) => self.api.timeout_secs = s,
                Err(_) => warn!(value = %secs, "Ignoring non-numeric STOREFRONT_TIMEOUT_SECS"),
            }
        }

        if let Some(bps) = lookup("STOREFRONT_GST_RATE_BPS") {
            match bps.parse::<u32>() {
                Ok(b) => {
                    debug!(bps = b, "Overriding GST rate from environment");
                    self.pricing.gst_rate_bps = b;
                }
                Err(_) => warn!(value = %bps, "Ignoring non-numeric STOREFRONT_GST_RATE_BPS"),
            }
        }

        if let Some(basis) = lookup("STOREFRONT_QUOTE_BASIS") {
            match basis.parse::<TaxMode>() {
                Ok(mode) => self.pricing.quote_price_basis = mode,
                Err(e) => warn!(error = %e, "Ignoring STOREFRONT_QUOTE_BASIS"),
            }
        }

        if let Some(symbol) = lookup("STOREFRONT_CURRENCY_SYMBOL") {
            self.display.currency_symbol = symbol;
        }

        if let Some(path) = lookup("STOREFRONT_SESSION_FILE") {
            self.session.session_file = Some(PathBuf::from(path));
        }
    }

    /// Returns the default config file path.
    fn default_config_path() -> Option<PathBuf> {
        directories::ProjectDirs::from("in", "storefront", "storefront")
            .map(|dirs| dirs.config_dir().join("storefront.toml"))
    }

    // =========================================================================
    // Convenience Methods
    // =========================================================================

    /// The configured combined GST rate.
    pub fn tax_rate(&self) -> TaxRate {
        TaxRate::from_bps(self.pricing.gst_rate_bps)
    }

    /// Quotation price basis.
    pub fn quote_basis(&self) -> TaxMode {
        self.pricing.quote_price_basis
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.api.timeout_secs)
    }

    /// Path of the persisted session file, if any can be determined.
    pub fn session_file_path(&self) -> Option<PathBuf> {
        self.session.session_file.clone().or_else(|| {
            directories::ProjectDirs::from("in", "storefront", "storefront")
                .map(|dirs| dirs.data_dir().join("session.json"))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_default_config() {
        let config = ClientConfig::default();
        assert_eq!(config.api.base_url, "http://localhost:5000");
        assert_eq!(config.tax_rate(), TaxRate::GST_18);
        assert_eq!(config.quote_basis(), TaxMode::Exclusive);
        assert_eq!(config.display.currency_symbol, "₹");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_config_validation() {
        let mut config = ClientConfig::default();

        config.api.base_url = "ftp://example".to_string();
        assert!(config.validate().is_err());

        config.api.base_url = "https://api.example.in".to_string();
        config.api.timeout_secs = 0;
        assert!(config.validate().is_err());

        config.api.timeout_secs = 10;
        config.pricing.gst_rate_bps = 12000;
        assert!(config.validate().unwrap_err().is_config_error());
    }

    #[test]
    fn test_overrides() {
        let mut config = ClientConfig::default();
        config.apply_overrides(lookup_from(&[
            ("STOREFRONT_API_URL", "https://api.example.in"),
            ("STOREFRONT_QUOTE_BASIS", "inclusive"),
            ("STOREFRONT_GST_RATE_BPS", "1200"),
            ("STOREFRONT_TIMEOUT_SECS", "not-a-number"),
        ]));

        assert_eq!(config.api.base_url, "https://api.example.in");
        assert_eq!(config.quote_basis(), TaxMode::Inclusive);
        assert_eq!(config.tax_rate().bps(), 1200);
        assert_eq!(config.api.timeout_secs, 15);
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("storefront.toml");
        std::fs::write(
            &path,
            r#"
[api]
base_url = "https://shop.example.in"

[pricing]
quote_price_basis = "inclusive"
"#,
        )
        .unwrap();

        let config = ClientConfig::load_with(Some(path.clone()), lookup_from(&[])).unwrap();
        assert_eq!(config.api.base_url, "https://shop.example.in");
        assert_eq!(config.api.timeout_secs, 15);
        assert_eq!(config.pricing.gst_rate_bps, 1800);
        assert_eq!(config.quote_basis(), TaxMode::Inclusive);

        // Environment wins over the file.
        let config = ClientConfig::load_with(
            Some(path),
            lookup_from(&[
                ("STOREFRONT_API_URL", "https://staging.example.in"),
                ("STOREFRONT_QUOTE_BASIS", "exclusive"),
            ]),
        )
        .unwrap();
        assert_eq!(config.api.base_url, "https://staging.example.in");
        assert_eq!(config.quote_basis(), TaxMode::Exclusive);
    }

    #[test]
    fn test_load_missing_file_uses_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config =
            ClientConfig::load_with(Some(dir.path().join("absent.toml")), lookup_from(&[])).unwrap();
        assert_eq!(config.api.base_url, "http://localhost:5000");
        assert_eq!(config.tax_rate(), TaxRate::GST_18);
        assert_eq!(config.quote_basis(), TaxMode::Exclusive);
    }

    #[test]
    fn test_load_rejects_invalid_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("storefront.toml");
        std::fs::write(&path, "[pricing]\ngst_rate_bps = 20000\n").unwrap();

        let err = ClientConfig::load_with(Some(path.clone()), lookup_from(&[])).unwrap_err();
        assert!(matches!(err, ClientError::InvalidConfig(_)));

        // An override that makes the rate valid again is applied before validation.
        let config =
            ClientConfig::load_with(Some(path), lookup_from(&[("STOREFRONT_GST_RATE_BPS", "1800")]))
                .unwrap();
        assert_eq!(config.tax_rate(), TaxRate::GST_18);

        std::fs::write(dir.path().join("broken.toml"), "[api\nbase_url=").unwrap();
        let err = ClientConfig::load_with(Some(dir.path().join("broken.toml")), lookup_from(&[]))
            .unwrap_err();
        assert!(matches!(err, ClientError::ConfigLoadFailed(_)));
    }

    #[test]
    fn test_save_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("storefront.toml");

        let mut config = ClientConfig::default();
        config.session.session_file = Some(dir.path().join("session.json"));
        config.save(Some(path.clone())).unwrap();

        let toml_str = std::fs::read_to_string(&path).unwrap();
        assert!(toml_str.contains("[api]"));
        assert!(toml_str.contains("[pricing]"));
        assert_eq!(
            config.session_file_path(),
            Some(dir.path().join("session.json"))
        );
    }

    #[test]
    fn test_bad_toml_is_load_error() {
        let err: ClientError = toml::from_str::<ClientConfig>("[api\nbase_url=").unwrap_err().into();
        assert!(matches!(err, ClientError::ConfigLoadFailed(_)));
    }
}
