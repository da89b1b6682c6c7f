//! REST API client module for the assessment backend.
//!
//! This module provides the `ApiClient` for the backend's auth and
//! assessment endpoints, and the `AuthBackend` trait the session
//! controller is written against.
//!
//! Authenticated endpoints take a bearer token issued by
//! `POST /api/auth/token`.

pub mod client;
pub mod error;

use async_trait::async_trait;

use crate::models::{NewUser, TokenResponse, User};

pub use client::ApiClient;
pub use error::ApiError;

/// The auth endpoints the session controller depends on.
#[async_trait]
pub trait AuthBackend: Send + Sync {
    /// Exchange credentials for an access token.
    async fn issue_token(&self, username: &str, password: &str) -> Result<TokenResponse, ApiError>;

    /// Look up the profile that owns `token`.
    async fn current_user(&self, token: &str) -> Result<User, ApiError>;

    /// Create a new account.
    async fn register(&self, new_user: &NewUser) -> Result<(), ApiError>;
}
