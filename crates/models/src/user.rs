use serde::{Deserialize, Serialize};

use crate::{errors::ModelError, RecordId};

/// A stored account. `hashed_password` is empty until credentials are set.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: RecordId,
    pub email: String,
    #[serde(default)]
    pub hashed_password: String,
}

/// What callers get back: never the password hash.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PublicUser {
    pub id: RecordId,
    pub email: String,
}

impl From<&User> for PublicUser {
    fn from(u: &User) -> Self {
        Self { id: u.id, email: u.email.clone() }
    }
}

impl From<User> for PublicUser {
    fn from(u: User) -> Self {
        Self { id: u.id, email: u.email }
    }
}

pub fn validate_email(email: &str) -> Result<(), ModelError> {
    let email = email.trim();
    match email.split_once('@') {
        Some((local, domain)) if !local.is_empty() && !domain.is_empty() => Ok(()),
        _ => Err(ModelError::Validation("invalid email".into())),
    }
}

pub fn validate_password(password: &str) -> Result<(), ModelError> {
    if password.is_empty() {
        return Err(ModelError::Validation("password required".into()));
    }
    Ok(())
}
