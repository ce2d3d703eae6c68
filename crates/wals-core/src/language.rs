//! The hydrated, denormalised view of one language.
//!
//! Callers never see raw feature or value ids: [`LanguageProfile::features`]
//! maps human-readable feature names to human-readable value descriptions.

use std::{collections::BTreeMap, fmt, ops::Deref};

use serde::{Deserialize, Serialize};

use crate::store::LanguageStore;

// ─── Profile ─────────────────────────────────────────────────────────────────

/// Geographic position. Either half may be unknown.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Location {
  pub latitude:  Option<f64>,
  pub longitude: Option<f64>,
}

/// Plain data for one language, as returned by the query layer.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LanguageProfile {
  pub code:      String,
  /// Display name: parentheses removed, spaces replaced with underscores.
  pub name:      String,
  pub location:  Location,
  pub genus:     String,
  pub family:    String,
  pub subfamily: String,
  pub iso_codes: String,
  /// Feature name → value long description.
  pub features:  BTreeMap<String, String>,
}

/// Normalise a stored language name for display.
///
/// ```
/// use wals_core::language::display_name;
///
/// assert_eq!(display_name("Chinese (Mandarin)"), "Chinese_Mandarin");
/// ```
pub fn display_name(raw: &str) -> String {
  raw
    .chars()
    .filter(|c| !matches!(c, '(' | ')'))
    .map(|c| if c == ' ' { '_' } else { c })
    .collect()
}

// ─── Language ────────────────────────────────────────────────────────────────

/// A [`LanguageProfile`] together with a handle to the store that produced
/// it, so derived relationships can be queried without the caller threading
/// the store through.
pub struct Language<'s, S: ?Sized> {
  profile: LanguageProfile,
  store:   &'s S,
}

impl<'s, S: ?Sized> Language<'s, S> {
  pub fn new(profile: LanguageProfile, store: &'s S) -> Self {
    Self { profile, store }
  }

  pub fn profile(&self) -> &LanguageProfile { &self.profile }

  pub fn into_profile(self) -> LanguageProfile { self.profile }
}

impl<'s, S: LanguageStore + ?Sized> Language<'s, S> {
  /// All languages sharing this language's family, this one included.
  pub fn get_family_members(&self) -> Result<Vec<Language<'s, S>>, S::Error> {
    self.store.get_languages_by_family(&self.profile.family)
  }
}

impl<S: ?Sized> Deref for Language<'_, S> {
  type Target = LanguageProfile;

  fn deref(&self) -> &LanguageProfile { &self.profile }
}

impl<S: ?Sized> Clone for Language<'_, S> {
  fn clone(&self) -> Self {
    Self { profile: self.profile.clone(), store: self.store }
  }
}

impl<S: ?Sized> fmt::Debug for Language<'_, S> {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_struct("Language")
      .field("profile", &self.profile)
      .finish_non_exhaustive()
  }
}
