//! Record types persisted by the store plus the content rules applied to them.

pub mod errors;
pub mod chirp;
pub mod user;

/// Identifier of a stored record. Zero is never a valid id.
pub type RecordId = u64;
