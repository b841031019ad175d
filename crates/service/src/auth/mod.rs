//! Auth module: password hashing, signed tokens, bearer extraction, and the
//! login/credential-update workflows built on them.
//!
//! Everything here is stateless apart from the read-only [`token::TokenConfig`].

pub mod bearer;
pub mod domain;
pub mod errors;
pub mod password;
pub mod repository;
pub mod service;
pub mod token;

pub use bearer::extract_bearer_token;
pub use errors::AuthError;
pub use password::{hash_password, verify_password};
pub use service::AuthService;
pub use token::{issue_token, validate_token, TokenConfig};
