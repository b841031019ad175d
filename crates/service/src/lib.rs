//! Service layer: the chirp/user store and the auth workflows on top of it.
//! - `storage` owns the store file and its locking discipline.
//! - `auth` hashes passwords and issues/validates tokens.
//! - `chirp_service` applies the content policy before posts are stored.
//! - Errors carry the status code a transport layer should answer with.

pub mod errors;
pub mod auth;
pub mod runtime;
pub mod storage;
pub mod chirp_service;
pub mod context;
