//! Authentication module for managing user sessions and the access token.
//!
//! This module provides:
//! - `SessionController`: login, revalidation and logout against the backend
//! - `SessionStore`: observable, replace-only holder of the `SessionState`
//! - `TokenStore`: where the access token survives restarts
//!   (`KeyringTokenStore`, `FileTokenStore`, `MemoryTokenStore`)

pub mod controller;
pub mod credentials;
pub mod error;
pub mod session;
pub mod store;
pub mod token_file;

pub use controller::SessionController;
pub use credentials::KeyringTokenStore;
pub use error::AuthError;
pub use session::{SessionState, SessionStore};
pub use store::{MemoryTokenStore, TokenStore};
pub use token_file::FileTokenStore;
