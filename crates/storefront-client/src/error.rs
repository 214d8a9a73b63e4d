//! # Client Error Types
//!
//! Error types for everything that leaves the process.
//!
//! ## Error Categories
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Client Error Categories                            │
//! │                                                                         │
//! │  ┌─────────────────┐  ┌─────────────────┐  ┌─────────────────────────┐ │
//! │  │  Configuration  │  │   Transport     │  │     Backend             │ │
//! │  │                 │  │                 │  │                         │ │
//! │  │  InvalidConfig  │  │  Http           │  │  NotFound               │ │
//! │  │  ConfigLoad     │  │  Timeout        │  │  Forbidden              │ │
//! │  │  ConfigSave     │  │  InvalidResponse│  │  Rejected / Server      │ │
//! │  └─────────────────┘  └─────────────────┘  └─────────────────────────┘ │
//! │                                                                         │
//! │  ┌─────────────────┐  ┌─────────────────┐                              │
//! │  │   Session       │  │    Pricing      │                              │
//! │  │                 │  │                 │                              │
//! │  │  Unauthenticated│  │  Core(CoreError)│                              │
//! │  │  SessionStorage │  │                 │                              │
//! │  └─────────────────┘  └─────────────────┘                              │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use storefront_core::{CoreError, ValidationError};
use thiserror::Error;

/// Result type alias for client operations.
pub type ClientResult<T> = Result<T, ClientError>;

/// Every failure the client can report.
#[derive(Debug, Error)]
pub enum ClientError {
    // =========================================================================
    // Configuration Errors
    // =========================================================================
    /// Invalid client configuration.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// Failed to load config file.
    #[error("Failed to load config: {0}")]
    ConfigLoadFailed(String),

    /// Failed to save config file.
    #[error("Failed to save config: {0}")]
    ConfigSaveFailed(String),

    // =========================================================================
    // Session Errors
    // =========================================================================
    /// No usable access token, or the backend rejected it.
    #[error("Not signed in")]
    Unauthenticated,

    /// The persisted session could not be read or written.
    #[error("Session storage error: {0}")]
    SessionStorage(String),

    // =========================================================================
    // Transport Errors
    // =========================================================================
    /// The request never produced a response.
    #[error("Request failed: {0}")]
    Http(String),

    /// The request timed out.
    #[error("Request timed out")]
    Timeout,

    /// The response body did not match the expected shape.
    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    // =========================================================================
    // Backend Errors
    // =========================================================================
    /// 403 from the backend.
    #[error("Forbidden: {0}")]
    Forbidden(String),

    /// 404 from the backend.
    #[error("Not found: {0}")]
    NotFound(String),

    /// 400/422 from the backend.
    #[error("Rejected by server: {0}")]
    Rejected(String),

    /// Any other non-success status.
    #[error("Server error {status}: {message}")]
    Server { status: u16, message: String },

    // =========================================================================
    // Pricing Errors
    // =========================================================================
    /// Pricing or input validation failed.
    #[error(transparent)]
    Core(#[from] CoreError),
}

// =============================================================================
// Error Conversions
// =============================================================================

impl From<ValidationError> for ClientError {
    fn from(err: ValidationError) -> Self {
        ClientError::Core(CoreError::Validation(err))
    }
}

impl From<reqwest::Error> for ClientError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            ClientError::Timeout
        } else if err.is_decode() {
            ClientError::InvalidResponse(err.to_string())
        } else {
            ClientError::Http(err.to_string())
        }
    }
}

impl From<serde_json::Error> for ClientError {
    fn from(err: serde_json::Error) -> Self {
        ClientError::InvalidResponse(err.to_string())
    }
}

impl From<toml::de::Error> for ClientError {
    fn from(err: toml::de::Error) -> Self {
        ClientError::ConfigLoadFailed(err.to_string())
    }
}

impl From<toml::ser::Error> for ClientError {
    fn from(err: toml::ser::Error) -> Self {
        ClientError::ConfigSaveFailed(err.to_string())
    }
}

// =============================================================================
// Error Categorization
// =============================================================================

impl ClientError {
    /// Returns true if the operation may succeed when repeated.
    ///
    /// ## Retryable Errors
    /// - Transport failures and timeouts
    /// - 5xx responses
    pub fn is_retryable(&self) -> bool {
        match self {
            ClientError::Http(_) | ClientError::Timeout => true,
            ClientError::Server { status, .. } => *status >= 500,
            _ => false,
        }
    }

    /// Returns true if the user has to sign in again.
    pub fn is_auth_error(&self) -> bool {
        matches!(self, ClientError::Unauthenticated)
    }

    /// Returns true if this error indicates a configuration problem.
    pub fn is_config_error(&self) -> bool {
        matches!(
            self,
            ClientError::InvalidConfig(_)
                | ClientError::ConfigLoadFailed(_)
                | ClientError::ConfigSaveFailed(_)
        )
    }
}
