use thiserror::Error;

use crate::api::ApiError;

/// Failures surfaced by the session controller.
///
/// Every variant carries a message fit to show the user as-is.
#[derive(Error, Debug)]
pub enum AuthError {
    #[error("{0}")]
    AuthenticationFailed(String),

    #[error("Malformed response: {0}")]
    ProtocolError(String),

    #[error("{0}")]
    ProfileFetchFailed(String),

    #[error("{0}")]
    TokenInvalid(String),

    #[error("Unable to reach server: {0}")]
    NetworkFailure(String),

    #[error("{0}")]
    RegistrationFailed(String),

    #[error("Failed to store token: {0}")]
    Storage(String),
}

impl AuthError {
    /// Map an API failure, using `rejected` to build the error for
    /// non-success statuses. Transport and parse failures map the same way
    /// for every operation.
    pub(crate) fn from_api(err: ApiError, rejected: impl FnOnce(&ApiError) -> AuthError) -> Self {
        match err {
            ApiError::NetworkError(e) => AuthError::NetworkFailure(e.to_string()),
            ApiError::InvalidResponse(msg) | ApiError::InvalidInput(msg) => {
                AuthError::ProtocolError(msg)
            }
            ref status_err => rejected(status_err),
        }
    }
}
