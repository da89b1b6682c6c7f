//! Data models for the assessment backend.
//!
//! - `User`: the profile returned by the "current user" endpoint
//! - `NewUser`: registration payload
//! - `TokenResponse`: token-issuance response
//! - `ResumeUpload`: result of a resume upload
//! - `Assessment`: the current assessment and its attached resume

pub mod user;

pub use user::{Assessment, NewUser, ResumeUpload, TokenResponse, User};
