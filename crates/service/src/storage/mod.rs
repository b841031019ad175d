//! Storage abstractions for service layer
//!
//! `json_document_store` is the generic whole-file JSON store with the
//! read/write locking discipline; `database` is the chirp/user document on top.

pub mod json_document_store;
pub mod database;

pub use database::{Database, StoreDocument};
pub use json_document_store::{Document, JsonDocumentStore};
