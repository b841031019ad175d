use models::user::PublicUser;
use serde::{Deserialize, Serialize};

/// Registration input
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegisterInput {
    pub email: String,
    pub password: String,
}

/// Login input. `expires_in_seconds` can only shorten the token lifetime.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginInput {
    pub email: String,
    pub password: String,
    #[serde(default)]
    pub expires_in_seconds: Option<i64>,
}

/// New email and password for the authenticated user
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateCredentialsInput {
    pub email: String,
    pub password: String,
}

/// Login result (session)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthSession {
    #[serde(flatten)]
    pub user: PublicUser,
    pub token: String,
}
