//! Error types for `wals-core`.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("language not found: {0:?}")]
  LanguageNotFound(String),

  #[error("feature not found: {0:?}")]
  FeatureNotFound(String),

  #[error("value {value_id} not found for feature {feature_id:?}")]
  ValueNotFound { feature_id: String, value_id: i64 },

  #[error("language {wals_code:?} has a non-numeric {field}: {value:?}")]
  InvalidCoordinate {
    wals_code: String,
    field:     &'static str,
    value:     String,
  },

  #[error("feature {feature_id:?} has a non-integer value id: {value:?}")]
  InvalidValueId { feature_id: String, value: String },
}

impl Error {
  /// True for the lookup failures (`*NotFound`), false for data errors.
  pub fn is_not_found(&self) -> bool {
    matches!(
      self,
      Self::LanguageNotFound(_)
        | Self::FeatureNotFound(_)
        | Self::ValueNotFound { .. }
    )
  }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
