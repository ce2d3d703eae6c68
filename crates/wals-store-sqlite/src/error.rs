//! Error type for `wals-store-sqlite`.

use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error(transparent)]
  Core(#[from] wals_core::Error),

  #[error("database error: {0}")]
  Database(#[from] rusqlite::Error),

  /// Table or index creation failed; the schema cannot be used.
  #[error("failed to execute schema step '{step}'")]
  Schema {
    step:   &'static str,
    #[source]
    source: rusqlite::Error,
  },

  #[error("failed to open SQLite database at {path:?}")]
  Open {
    path:   PathBuf,
    #[source]
    source: rusqlite::Error,
  },
}

impl Error {
  /// True when a name, feature or value lookup matched nothing.
  pub fn is_not_found(&self) -> bool {
    matches!(self, Self::Core(e) if e.is_not_found())
  }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
