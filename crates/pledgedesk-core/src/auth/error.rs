use thiserror::Error;

use crate::api::ApiError;

/// Message shown when the login endpoint cannot be reached
pub const UNREACHABLE_MESSAGE: &str =
    "Unable to connect to the server. Please check your internet connection or try again later.";

/// Message for rejected credentials in the simulated backend
pub const INVALID_CREDENTIALS_MESSAGE: &str = "Invalid username or password";

/// Login failure, already phrased for display.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AuthError {
    #[error("{}", UNREACHABLE_MESSAGE)]
    Unreachable,

    #[error("{}", INVALID_CREDENTIALS_MESSAGE)]
    InvalidCredentials,

    /// Rejected by the backend; the backend's message verbatim
    #[error("{0}")]
    Rejected(String),

    /// Login requested while a session is active
    #[error("Already logged in. Log out before logging in again.")]
    AlreadyAuthenticated,

    /// A newer login or a logout happened while this attempt was in flight
    #[error("Login attempt superseded by a newer one")]
    Superseded,
}

impl From<ApiError> for AuthError {
    fn from(err: ApiError) -> Self {
        if err.is_unreachable() {
            return AuthError::Unreachable;
        }
        match err {
            ApiError::Request { message, .. } => AuthError::Rejected(message),
            other => AuthError::Rejected(other.to_string()),
        }
    }
}
