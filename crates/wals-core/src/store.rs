//! The `LanguageStore` trait.
//!
//! Implemented by storage backends (e.g. `wals-store-sqlite`). The CLI and
//! [`Language::get_family_members`] depend on this abstraction, not on any
//! concrete backend.

use crate::language::Language;

/// Read API over a loaded WALS dataset.
///
/// Lookup asymmetry is part of the contract: an unknown name is an error,
/// while an unknown family or an unused feature/value pair is an empty
/// result.
pub trait LanguageStore {
  type Error: std::error::Error + Send + Sync + 'static;

  /// Total number of languages, cached when the store was (re)loaded.
  fn language_count(&self) -> usize;

  /// Total number of features, cached when the store was (re)loaded.
  fn feature_count(&self) -> usize;

  /// Hydrate the language whose stored name is exactly `name`.
  fn get_language_by_name(
    &self,
    name: &str,
  ) -> Result<Language<'_, Self>, Self::Error>;

  /// Every language whose family is exactly `family`.
  fn get_languages_by_family(
    &self,
    family: &str,
  ) -> Result<Vec<Language<'_, Self>>, Self::Error>;

  /// Every language with a datapoint for `(feature_id, value_id)`.
  ///
  /// The combination is not validated first; an invalid pair simply matches
  /// nothing.
  fn get_languages_by_feature_value(
    &self,
    feature_id: &str,
    value_id: i64,
  ) -> Result<Vec<Language<'_, Self>>, Self::Error>;
}
