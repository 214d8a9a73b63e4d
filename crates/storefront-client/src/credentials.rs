//! # Credential Providers
//!
//! Where the backend access token comes from.
//!
//! ## Provider Chain
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                       CompositeCredentials                              │
//! │                                                                         │
//! │  current_token()                                                        │
//! │      │                                                                  │
//! │      ├──► SessionCredentials (in memory, signed in this run)            │
//! │      │        └── Some(token)? ──► use it                               │
//! │      │                                                                  │
//! │      ├──► PersistedSessionCredentials (session.json on disk)            │
//! │      │        └── Some(token)? ──► use it                               │
//! │      │                                                                  │
//! │      └──► None ──► require_token() = Err(ClientError::Unauthenticated)  │
//! │                                                                         │
//! │  clear_session() clears every provider in the chain.                    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Expired tokens are never handed out.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};
use tracing::{debug, info, warn};

use crate::error::{ClientError, ClientResult};

// =============================================================================
// Access Token
// =============================================================================

/// An opaque bearer token. `Debug` never prints the value.
#[derive(Clone, PartialEq, Eq)]
pub struct AccessToken(String);

impl AccessToken {
    pub fn new(token: impl Into<String>) -> Self {
        AccessToken(token.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Value for the `Authorization` header.
    pub fn bearer(&self) -> String {
        format!("Bearer {}", self.0)
    }
}

impl fmt::Debug for AccessToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("AccessToken(***)")
    }
}

// =============================================================================
// Provider Trait
// =============================================================================

/// Source of the current access token.
pub trait CredentialProvider: Send + Sync {
    /// The token to send with the next request, if one is available.
    fn current_token(&self) -> Option<AccessToken>;

    /// Forgets the session (sign-out or a 401 from the backend).
    fn clear_session(&self);

    /// Like `current_token`, but a missing token is an error.
    fn require_token(&self) -> ClientResult<AccessToken> {
        self.current_token().ok_or(ClientError::Unauthenticated)
    }
}

// =============================================================================
// Stored Session
// =============================================================================

/// A token plus its expiry. This is also the on-disk JSON shape.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoredSession {
    pub access_token: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expires_at: Option<DateTime<Utc>>,
}

impl StoredSession {
    pub fn new(access_token: impl Into<String>, expires_at: Option<DateTime<Utc>>) -> Self {
        StoredSession {
            access_token: access_token.into(),
            expires_at,
        }
    }

    /// True once `expires_at` has passed. Sessions without expiry never expire.
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        self.expires_at.map(|at| now >= at).unwrap_or(false)
    }

    fn usable_token(&self) -> Option<AccessToken> {
        if self.access_token.is_empty() || self.is_expired_at(Utc::now()) {
            return None;
        }
        Some(AccessToken::new(self.access_token.clone()))
    }
}

// =============================================================================
// In-Memory Provider
// =============================================================================

/// The session signed in during this run.
#[derive(Debug, Default)]
pub struct SessionCredentials {
    session: RwLock<Option<StoredSession>>,
}

impl SessionCredentials {
    /// An empty, signed-out provider.
    pub fn new() -> Self {
        Self::default()
    }

    /// A provider already holding `token`, with no expiry.
    pub fn with_token(token: impl Into<String>) -> Self {
        let provider = Self::new();
        provider.sign_in(StoredSession::new(token, None));
        provider
    }

    /// Replaces the current session.
    pub fn sign_in(&self, session: StoredSession) {
        info!(expires_at = ?session.expires_at, "Session signed in");
        *write_lock(&self.session) = Some(session);
    }

    pub fn is_signed_in(&self) -> bool {
        self.current_token().is_some()
    }
}

impl CredentialProvider for SessionCredentials {
    fn current_token(&self) -> Option<AccessToken> {
        read_lock(&self.session).as_ref().and_then(StoredSession::usable_token)
    }

    fn clear_session(&self) {
        *write_lock(&self.session) = None;
    }
}

// =============================================================================
// Persisted Provider
// =============================================================================

/// A session kept in a JSON file so it survives restarts.
///
/// ```json
/// { "accessToken": "eyJhbGciOi...", "expiresAt": "2026-01-31T18:30:00Z" }
/// ```
#[derive(Debug, Clone)]
pub struct PersistedSessionCredentials {
    path: PathBuf,
}

impl PersistedSessionCredentials {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        PersistedSessionCredentials { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Reads the stored session. A missing file is `Ok(None)`.
    pub fn load(&self) -> ClientResult<Option<StoredSession>> {
        let contents = match std::fs::read_to_string(&self.path) {
            Ok(contents) => contents,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(ClientError::SessionStorage(e.to_string())),
        };

        let session = serde_json::from_str(&contents)
            .map_err(|e| ClientError::SessionStorage(e.to_string()))?;
        Ok(Some(session))
    }

    /// Writes the session, creating parent directories as needed.
    pub fn save(&self, session: &StoredSession) -> ClientResult<()> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)
                .map_err(|e| ClientError::SessionStorage(e.to_string()))?;
        }

        let contents = serde_json::to_string_pretty(session)
            .map_err(|e| ClientError::SessionStorage(e.to_string()))?;
        std::fs::write(&self.path, contents)
            .map_err(|e| ClientError::SessionStorage(e.to_string()))?;

        info!(path = ?self.path, "Session persisted");
        Ok(())
    }
}

impl CredentialProvider for PersistedSessionCredentials {
    fn current_token(&self) -> Option<AccessToken> {
        match self.load() {
            Ok(session) => session.as_ref().and_then(StoredSession::usable_token),
            Err(e) => {
                warn!(path = ?self.path, error = %e, "Unreadable session file");
                None
            }
        }
    }

    fn clear_session(&self) {
        match std::fs::remove_file(&self.path) {
            Ok(()) => info!(path = ?self.path, "Persisted session removed"),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
            Err(e) => warn!(path = ?self.path, error = %e, "Failed to remove session file"),
        }
    }
}

// =============================================================================
// Composite Provider
// =============================================================================

/// Tries each provider in order; the first token wins.
pub struct CompositeCredentials {
    providers: Vec<Arc<dyn CredentialProvider>>,
}

impl CompositeCredentials {
    pub fn new(providers: Vec<Arc<dyn CredentialProvider>>) -> Self {
        CompositeCredentials { providers }
    }

    /// The usual chain: this run's session, then the persisted one.
    pub fn session_then_persisted(
        session: Arc<SessionCredentials>,
        persisted: Arc<PersistedSessionCredentials>,
    ) -> Self {
        Self::new(vec![session as Arc<dyn CredentialProvider>, persisted])
    }
}

impl CredentialProvider for CompositeCredentials {
    fn current_token(&self) -> Option<AccessToken> {
        let found = self
            .providers
            .iter()
            .enumerate()
            .find_map(|(position, p)| p.current_token().map(|t| (position, t)));

        match found {
            Some((position, token)) => {
                debug!(position, "Token found in credential chain");
                Some(token)
            }
            None => {
                debug!(providers = self.providers.len(), "No token in credential chain");
                None
            }
        }
    }

    fn clear_session(&self) {
        for provider in &self.providers {
            provider.clear_session();
        }
    }
}

// A poisoned lock only means another thread panicked mid-write of an
// Option; the value is still a valid session or None.
fn read_lock<T>(lock: &RwLock<T>) -> RwLockReadGuard<'_, T> {
    lock.read().unwrap_or_else(|poisoned| poisoned.into_inner())
}

fn write_lock<T>(lock: &RwLock<T>) -> RwLockWriteGuard<'_, T> {
    lock.write().unwrap_or_else(|poisoned| poisoned.into_inner())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    #[test]
    fn test_token_debug_is_redacted() {
        let token = AccessToken::new("secret-value");
        assert_eq!(format!("{:?}", token), "AccessToken(***)");
        assert_eq!(token.bearer(), "Bearer secret-value");
    }

    #[test]
    fn test_session_credentials() {
        let creds = SessionCredentials::new();
        assert!(creds.current_token().is_none());
        assert!(matches!(
            creds.require_token(),
            Err(ClientError::Unauthenticated)
        ));

        creds.sign_in(StoredSession::new("abc", None));
        assert_eq!(creds.require_token().unwrap().as_str(), "abc");

        creds.clear_session();
        assert!(!creds.is_signed_in());
    }

    #[test]
    fn test_expired_session_yields_no_token() {
        let creds = SessionCredentials::new();
        creds.sign_in(StoredSession::new("old", Some(Utc::now() - Duration::minutes(1))));
        assert!(creds.current_token().is_none());

        creds.sign_in(StoredSession::new("fresh", Some(Utc::now() + Duration::hours(1))));
        assert_eq!(creds.current_token().unwrap().as_str(), "fresh");
    }

    #[test]
    fn test_persisted_round_trip_and_clear() {
        let dir = tempfile::tempdir().unwrap();
        let creds = PersistedSessionCredentials::new(dir.path().join("auth").join("session.json"));

        assert!(creds.load().unwrap().is_none());
        assert!(creds.current_token().is_none());

        creds.save(&StoredSession::new("disk-token", None)).unwrap();
        assert_eq!(creds.current_token().unwrap().as_str(), "disk-token");

        let json = std::fs::read_to_string(creds.path()).unwrap();
        assert!(json.contains("\"accessToken\""));

        creds.clear_session();
        assert!(!creds.path().exists());
        // Clearing twice is fine.
        creds.clear_session();
    }

    #[test]
    fn test_corrupt_session_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("session.json");
        std::fs::write(&path, "not json").unwrap();

        let creds = PersistedSessionCredentials::new(&path);
        assert!(matches!(creds.load(), Err(ClientError::SessionStorage(_))));
        assert!(creds.current_token().is_none());
    }

    #[test]
    fn test_composite_prefers_first_provider() {
        let dir = tempfile::tempdir().unwrap();
        let session = Arc::new(SessionCredentials::new());
        let persisted = Arc::new(PersistedSessionCredentials::new(dir.path().join("s.json")));
        persisted.save(&StoredSession::new("from-disk", None)).unwrap();

        let chain = CompositeCredentials::session_then_persisted(session.clone(), persisted.clone());
        assert_eq!(chain.current_token().unwrap().as_str(), "from-disk");

        session.sign_in(StoredSession::new("from-memory", None));
        assert_eq!(chain.current_token().unwrap().as_str(), "from-memory");

        chain.clear_session();
        assert!(chain.current_token().is_none());
        assert!(!persisted.path().exists());
        assert!(matches!(chain.require_token(), Err(ClientError::Unauthenticated)));
    }
}
