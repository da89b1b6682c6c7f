//! Assessor core - session handling for the personality assessment service.
//!
//! This crate holds everything a front end needs to talk to the assessment
//! backend: the REST client, token persistence, and the session controller
//! that keeps the two in sync.

pub mod api;
pub mod auth;
pub mod config;
pub mod models;

pub use api::{ApiClient, ApiError, AuthBackend};
pub use auth::{AuthError, SessionController, SessionState, SessionStore, TokenStore};
pub use config::Config;
pub use models::{Assessment, NewUser, ResumeUpload, TokenResponse, User};
