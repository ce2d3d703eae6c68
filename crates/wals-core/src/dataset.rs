//! The canonical in-memory dataset produced by the archive parser and consumed
//! by the loader.
//!
//! Records keep the upstream text verbatim. Numeric coercion (coordinates,
//! value ids) happens once, at load time, through [`parse_coordinate`] and
//! [`parse_value_id`], so a bad cell fails the whole ingestion rather than
//! being skipped.

use serde::{Deserialize, Serialize};

use crate::{Error, Result};

// ─── Records ─────────────────────────────────────────────────────────────────

/// One row of language metadata.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LanguageRecord {
  pub wals_code: String,
  pub name:      String,
  /// Raw latitude text; empty when the source has no coordinate.
  pub latitude:  String,
  pub longitude: String,
  pub genus:     String,
  pub family:    String,
  /// Absent from the wide export, where it is always empty.
  pub subfamily: String,
  /// Possibly composite (several ISO 639-3 codes in one cell).
  pub iso_codes: String,
}

/// One typological dimension, e.g. `("81A", "Order of Subject, Object and Verb")`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeatureRecord {
  pub id:   String,
  pub name: String,
}

/// One admissible answer for a feature. `value_id` is scoped to `feature_id`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ValueRecord {
  pub feature_id:       String,
  pub value_id:         String,
  pub description:      String,
  pub long_description: String,
}

/// A single `feature → value` cell for one language.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DataPointEntry {
  pub feature_id: String,
  /// `None` when the language has no data for this feature.
  pub value_id:   Option<String>,
}

impl DataPointEntry {
  /// Build an entry, normalising an empty cell to `None`.
  pub fn new(feature_id: impl Into<String>, value_id: &str) -> Self {
    Self {
      feature_id: feature_id.into(),
      value_id:   (!value_id.is_empty()).then(|| value_id.to_owned()),
    }
  }
}

/// All datapoints recorded for one language.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DataPointRecord {
  pub wals_code: String,
  pub entries:   Vec<DataPointEntry>,
}

impl DataPointRecord {
  /// Entries that actually carry a value, as `(feature_id, raw value_id)`.
  pub fn present(&self) -> impl Iterator<Item = (&str, &str)> {
    self
      .entries
      .iter()
      .filter_map(|e| e.value_id.as_deref().map(|v| (e.feature_id.as_str(), v)))
  }
}

// ─── Dataset ─────────────────────────────────────────────────────────────────

/// The canonical dataset: four flat record lists.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Dataset {
  pub languages:  Vec<LanguageRecord>,
  pub features:   Vec<FeatureRecord>,
  pub values:     Vec<ValueRecord>,
  pub datapoints: Vec<DataPointRecord>,
}

impl Dataset {
  /// Number of datapoint rows the loader will emit (absent values excluded).
  pub fn datapoint_count(&self) -> usize {
    self.datapoints.iter().map(|d| d.present().count()).sum()
  }
}

// ─── Coercion ────────────────────────────────────────────────────────────────

/// Parse a raw coordinate cell. Empty (or all-whitespace) is `None`, never
/// `0.0`.
pub fn parse_coordinate(
  wals_code: &str,
  field: &'static str,
  raw: &str,
) -> Result<Option<f64>> {
  let trimmed = raw.trim();
  if trimmed.is_empty() {
    return Ok(None);
  }
  trimmed
    .parse::<f64>()
    .map(Some)
    .map_err(|_| Error::InvalidCoordinate {
      wals_code: wals_code.to_owned(),
      field,
      value: raw.to_owned(),
    })
}

/// Parse a raw value id cell into its integer form.
pub fn parse_value_id(feature_id: &str, raw: &str) -> Result<i64> {
  raw.trim().parse::<i64>().map_err(|_| Error::InvalidValueId {
    feature_id: feature_id.to_owned(),
    value:      raw.to_owned(),
  })
}
