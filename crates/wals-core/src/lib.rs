//! Core types and trait definitions for the WALS language store.
//!
//! This crate is deliberately free of archive and database dependencies.
//! The parser, the SQLite store and the CLI all depend on it.

pub mod dataset;
pub mod error;
pub mod language;
pub mod store;

pub use error::{Error, Result};
