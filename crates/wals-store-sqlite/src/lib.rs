//! SQLite backend for the WALS language store.
//!
//! Three layers over one synchronous [`rusqlite::Connection`]:
//!
//! - [`schema`] declares the four canonical tables and their indices.
//! - [`load`] writes a parsed [`wals_core::dataset::Dataset`] inside a single
//!   transaction.
//! - [`SqliteStore`] answers the read queries, translating raw feature and
//!   value ids into their human-readable names.

pub mod load;
pub mod schema;
mod store;
mod translations;

pub mod error;

pub use error::{Error, Result};
pub use load::LoadSummary;
pub use store::SqliteStore;

#[cfg(test)]
mod tests;
