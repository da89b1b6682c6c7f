//! Session controller: the single owner of authentication state.
//!
//! The controller mediates every auth call to the backend and keeps the
//! in-memory `SessionState` and the persisted token in step. Any failure
//! while logging in or revalidating drops back to the anonymous state and
//! removes the persisted token.
//!
//! Operations may interleave at network boundaries (a `logout` can land
//! while a `check_auth` is waiting on the backend). Each write replaces the
//! whole record, and the last one to complete wins.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use tokio::sync::watch;
use tracing::{debug, info, warn};

use crate::api::{ApiError, AuthBackend};
use crate::models::{NewUser, User};

use super::{AuthError, SessionState, SessionStore, TokenStore};

/// Shown when the backend rejects a login without explaining why
const LOGIN_FAILED: &str = "Login failed";

/// Shown when the backend rejects a registration without explaining why
const REGISTRATION_FAILED: &str = "Registration failed";

pub struct SessionController<B, S> {
    backend: B,
    tokens: S,
    store: SessionStore,
}

impl<B: AuthBackend, S: TokenStore> SessionController<B, S> {
    pub fn new(backend: B, tokens: S) -> Self {
        Self {
            backend,
            tokens,
            store: SessionStore::new(),
        }
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn snapshot(&self) -> Arc<SessionState> {
        self.store.snapshot()
    }

    pub fn subscribe(&self) -> watch::Receiver<Arc<SessionState>> {
        self.store.subscribe()
    }

    pub fn is_authenticated(&self) -> bool {
        self.store.snapshot().is_authenticated
    }

    pub fn user(&self) -> Option<User> {
        self.store.snapshot().user.clone()
    }

    /// When the persisted token was saved. `None` if there is no token or
    /// the store does not record it.
    pub fn token_stored_at(&self) -> Option<DateTime<Utc>> {
        match self.tokens.stored_at() {
            Ok(stored_at) => stored_at,
            Err(e) => {
                debug!(error = %e, "Token timestamp unavailable");
                None
            }
        }
    }

    // =========================================================================
    // Validated transitions
    // =========================================================================

    /// Log in with an email and password.
    ///
    /// On success the session holds the fetched profile and the token is
    /// persisted. On any failure the session is anonymous, the persisted
    /// token is gone, and the error is returned for display.
    pub async fn login(&self, identifier: &str, secret: &str) -> Result<User, AuthError> {
        match self.try_login(identifier, secret).await {
            Ok(user) => {
                info!(username = %user.username, "Login successful");
                Ok(user)
            }
            Err(e) => {
                warn!(error = %e, "Login failed");
                self.reset();
                Err(e)
            }
        }
    }

    async fn try_login(&self, identifier: &str, secret: &str) -> Result<User, AuthError> {
        let issued = self
            .backend
            .issue_token(identifier, secret)
            .await
            .map_err(|e| {
                AuthError::from_api(e, |rejected| {
                    AuthError::AuthenticationFailed(
                        rejected.detail().unwrap_or(LOGIN_FAILED).to_string(),
                    )
                })
            })?;

        let token = issued
            .token()
            .ok_or_else(|| AuthError::ProtocolError("No access token received".to_string()))?
            .to_string();

        let user = self.backend.current_user(&token).await.map_err(|e| {
            AuthError::from_api(e, |_| {
                AuthError::ProfileFetchFailed("Failed to fetch user data".to_string())
            })
        })?;

        self.store
            .replace(SessionState::authenticated(token.clone(), user.clone()));
        self.tokens
            .save(&token)
            .map_err(|e| AuthError::Storage(e.to_string()))?;

        Ok(user)
    }

    /// Revalidate the persisted token.
    ///
    /// Returns the token while it is still accepted, or `None` when there is
    /// no usable token and the caller should send the user to log in. An
    /// unchanged profile leaves the session record untouched.
    pub async fn check_auth(&self) -> Option<String> {
        let token = match self.tokens.load() {
            Ok(Some(token)) => token,
            Ok(None) => {
                debug!("No persisted token");
                self.store.replace(SessionState::anonymous());
                return None;
            }
            Err(e) => {
                warn!(error = %e, "Failed to read persisted token");
                self.reset();
                return None;
            }
        };

        match self.validate(&token).await {
            Ok(user) => {
                let changed = self
                    .store
                    .replace_if_changed(SessionState::authenticated(token.clone(), user));
                debug!(changed, "Token still valid");
                Some(token)
            }
            Err(e) => {
                warn!(error = %e, "Auth check failed");
                self.reset();
                None
            }
        }
    }

    async fn validate(&self, token: &str) -> Result<User, AuthError> {
        self.backend.current_user(token).await.map_err(|e| {
            AuthError::from_api(e, |_| {
                AuthError::TokenInvalid("Failed to validate token".to_string())
            })
        })
    }

    /// Forget the session and the persisted token. Never fails.
    pub fn logout(&self) {
        if let Err(e) = self.tokens.clear() {
            warn!(error = %e, "Failed to remove persisted token");
        }
        self.store.replace(SessionState::anonymous());
        info!("Logged out");
    }

    /// Create an account. The session is left as it was; the new account
    /// still has to log in.
    pub async fn register(&self, new_user: &NewUser) -> Result<(), AuthError> {
        self.backend.register(new_user).await.map_err(|e| {
            let err = AuthError::from_api(e, |rejected: &ApiError| {
                AuthError::RegistrationFailed(
                    rejected.detail().unwrap_or(REGISTRATION_FAILED).to_string(),
                )
            });
            warn!(error = %err, "Registration failed");
            err
        })?;
        info!(username = %new_user.username, "Registration successful");
        Ok(())
    }

    // =========================================================================
    // Trusted updates
    // =========================================================================

    /// Set the authenticated flag directly, for callers that already hold
    /// validated data. Nothing is checked or persisted.
    pub fn set_authenticated(&self, value: bool) {
        self.store.set_authenticated(value);
    }

    /// Set the profile directly, for callers that already hold validated
    /// data. Nothing is checked or persisted.
    pub fn set_user(&self, user: Option<User>) {
        self.store.set_user(user);
    }

    fn reset(&self) {
        if let Err(e) = self.tokens.clear() {
            warn!(error = %e, "Failed to remove persisted token");
        }
        self.store.replace(SessionState::anonymous());
    }
}
