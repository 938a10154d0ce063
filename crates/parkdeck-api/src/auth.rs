use std::sync::{Arc, RwLock};

use secrecy::SecretString;

/// Which platform role the client authenticates as.
///
/// Determines the login path: partner accounts authenticate against the
/// user-service gateway, platform administrators against the admin
/// gateway. All other endpoints are shared and scoped by the token.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    /// Parking-lot partner (business owner).
    Partner,
    /// Platform administrator.
    Admin,
}

impl Role {
    /// The login endpoint path for this role.
    pub fn login_path(&self) -> &'static str {
        match self {
            Self::Partner => "v1/user-service/auth/login",
            Self::Admin => "auth/login",
        }
    }

    /// The token refresh endpoint path.
    ///
    /// Both roles refresh through the user-service; admin tokens are
    /// issued by the same token service behind the gateway.
    pub fn refresh_path(&self) -> &'static str {
        "v1/user-service/auth/refresh"
    }
}

/// An access/refresh token pair as issued by a login or refresh call.
#[derive(Clone)]
pub struct SessionTokens {
    pub access: SecretString,
    pub refresh: SecretString,
}

impl std::fmt::Debug for SessionTokens {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // Never print token material.
        f.debug_struct("SessionTokens").finish_non_exhaustive()
    }
}

/// Shared, rotatable token cell.
///
/// The [`ApiClient`](crate::ApiClient) reads the access token from here
/// on *every* request, so a rotation (login, refresh, logout) is picked
/// up immediately without rebuilding the client. Cheaply cloneable.
#[derive(Clone, Default)]
pub struct TokenSource {
    inner: Arc<RwLock<Option<SessionTokens>>>,
}

impl TokenSource {
    /// An empty source -- requests go out unauthenticated until
    /// [`set`](Self::set) is called.
    pub fn empty() -> Self {
        Self::default()
    }

    /// A source pre-loaded with a token pair (e.g. from a persisted session).
    pub fn with_tokens(tokens: SessionTokens) -> Self {
        Self {
            inner: Arc::new(RwLock::new(Some(tokens))),
        }
    }

    /// Replace the current token pair.
    pub fn set(&self, tokens: SessionTokens) {
        *self.inner.write().expect("token lock poisoned") = Some(tokens);
    }

    /// Drop all token material (logout).
    pub fn clear(&self) {
        *self.inner.write().expect("token lock poisoned") = None;
    }

    /// The current access token, if any.
    pub fn access_token(&self) -> Option<SecretString> {
        self.inner
            .read()
            .expect("token lock poisoned")
            .as_ref()
            .map(|t| t.access.clone())
    }

    /// The current refresh token, if any.
    pub fn refresh_token(&self) -> Option<SecretString> {
        self.inner
            .read()
            .expect("token lock poisoned")
            .as_ref()
            .map(|t| t.refresh.clone())
    }

    /// Whether a token pair is currently loaded.
    pub fn is_authenticated(&self) -> bool {
        self.inner.read().expect("token lock poisoned").is_some()
    }
}

impl std::fmt::Debug for TokenSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenSource")
            .field("authenticated", &self.is_authenticated())
            .finish()
    }
}
