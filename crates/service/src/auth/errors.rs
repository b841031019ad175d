use thiserror::Error;

/// Credential and token failures.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AuthError {
    #[error("invalid credentials")]
    InvalidCredentials,
    #[error("missing credentials")]
    MissingCredentials,
    #[error("invalid token")]
    InvalidToken,
    #[error("token expired")]
    TokenExpired,
    #[error("hashing error: {0}")]
    HashError(String),
    #[error("token error: {0}")]
    TokenError(String),
}

impl AuthError {
    /// Stable numeric code for external mapping/logging
    pub fn code(&self) -> u16 {
        match self {
            AuthError::InvalidCredentials => 1004,
            AuthError::MissingCredentials => 1005,
            AuthError::InvalidToken => 1006,
            AuthError::TokenExpired => 1007,
            AuthError::HashError(_) => 1101,
            AuthError::TokenError(_) => 1102,
        }
    }

    /// Failures of our own machinery rather than of the caller's credentials.
    pub fn is_internal(&self) -> bool {
        matches!(self, AuthError::HashError(_) | AuthError::TokenError(_))
    }
}
