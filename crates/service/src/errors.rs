use thiserror::Error;

use crate::auth::errors::AuthError;

/// Status a transport should use for a successful create.
pub const STATUS_CREATED: u16 = 201;
/// Status a transport should use for any other success.
pub const STATUS_OK: u16 = 200;

#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("validation error: {0}")]
    Validation(String),
    #[error("not found: {0}")]
    NotFound(String),
    #[error(transparent)]
    Auth(#[from] AuthError),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("internal error: {0}")]
    Internal(String),
}

impl ServiceError {
    pub fn not_found(entity: &str, id: impl std::fmt::Display) -> Self {
        Self::NotFound(format!("{entity} {id}"))
    }

    /// Stable numeric code for external mapping/logging
    pub fn code(&self) -> u16 {
        match self {
            ServiceError::Validation(_) => 2001,
            ServiceError::NotFound(_) => 2002,
            ServiceError::Auth(e) => e.code(),
            ServiceError::Io(_) => 2101,
            ServiceError::Internal(_) => 2102,
        }
    }

    /// HTTP status a transport layer should answer with.
    pub fn status_code(&self) -> u16 {
        match self {
            ServiceError::Validation(_) => 400,
            ServiceError::NotFound(_) => 404,
            ServiceError::Auth(e) if e.is_internal() => 500,
            ServiceError::Auth(_) => 401,
            ServiceError::Io(_) | ServiceError::Internal(_) => 500,
        }
    }
}

impl From<models::errors::ModelError> for ServiceError {
    fn from(e: models::errors::ModelError) -> Self {
        match e {
            models::errors::ModelError::Validation(msg) => ServiceError::Validation(msg),
        }
    }
}

impl From<serde_json::Error> for ServiceError {
    fn from(e: serde_json::Error) -> Self {
        ServiceError::Internal(format!("serialization: {e}"))
    }
}
