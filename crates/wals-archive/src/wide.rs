//! Parser for the new wide export.
//!
//! Layout of `language.csv`:
//!
//! ```text
//! wals code,iso codes,glottocode,name,latitude,longitude,genus,family,<id> <name>,…
//! aaa,iso1,,AAAlang,10.0,20.0,GenusX,FamilyY,1 SOV,…
//! ```
//!
//! Each feature header splits on its first space into id and name; each
//! non-empty cell splits on its first space into value id and long
//! description. Value definitions are collected as they are first seen.

use std::{
  collections::HashSet,
  io::{Read, Seek},
};

use csv::StringRecord;
use tracing::debug;
use wals_core::dataset::{
  DataPointEntry, DataPointRecord, Dataset, FeatureRecord, LanguageRecord, ValueRecord,
};

use crate::{
  Members, WIDE_LANGUAGE_FILE,
  error::{Error, Result},
};

/// Fixed language columns preceding the feature columns.
const LANGUAGE_COLUMNS: [&str; 8] = [
  "wals code",
  "iso codes",
  "glottocode",
  "name",
  "latitude",
  "longitude",
  "genus",
  "family",
];

pub(crate) fn parse<R: Read + Seek>(members: &mut Members<'_, R>) -> Result<Dataset> {
  let bytes = members.read(WIDE_LANGUAGE_FILE)?;
  let mut reader = csv::Reader::from_reader(bytes.as_slice());
  let headers = reader.headers()?.clone();

  check_language_columns(&headers)?;

  let mut dataset = Dataset {
    features: headers
      .iter()
      .skip(LANGUAGE_COLUMNS.len())
      .map(parse_feature_header)
      .collect::<Result<_>>()?,
    ..Dataset::default()
  };

  let mut seen_values = HashSet::new();
  for row in reader.records() {
    let row = row?;
    let (language, datapoint) =
      parse_row(&row, &dataset.features, &mut seen_values, &mut dataset.values)?;
    dataset.languages.push(language);
    dataset.datapoints.push(datapoint);
  }

  debug!(
    languages = dataset.languages.len(),
    features = dataset.features.len(),
    values = dataset.values.len(),
    "read wide language table"
  );
  Ok(dataset)
}

/// The fixed columns are read by position, so each must sit exactly where
/// expected or every later cell would shift.
fn check_language_columns(headers: &StringRecord) -> Result<()> {
  for (idx, expected) in LANGUAGE_COLUMNS.iter().enumerate() {
    if headers.get(idx).map(str::trim) != Some(*expected) {
      return Err(Error::MissingColumn {
        file:   WIDE_LANGUAGE_FILE.to_owned(),
        column: (*expected).to_owned(),
      });
    }
  }
  Ok(())
}

/// `"81A Order of Subject, Object and Verb"` → `("81A", "Order of …")`.
fn parse_feature_header(header: &str) -> Result<FeatureRecord> {
  let (id, name) = header
    .split_once(' ')
    .ok_or_else(|| Error::MalformedFeatureHeader(header.to_owned()))?;
  Ok(FeatureRecord { id: id.to_owned(), name: name.to_owned() })
}

fn parse_row(
  row: &StringRecord,
  features: &[FeatureRecord],
  seen_values: &mut HashSet<ValueRecord>,
  values: &mut Vec<ValueRecord>,
) -> Result<(LanguageRecord, DataPointRecord)> {
  let cell = |idx: usize| row.get(idx).unwrap_or_default().to_owned();

  let language = LanguageRecord {
    wals_code: cell(0),
    iso_codes: cell(1),
    name:      cell(3),
    latitude:  cell(4),
    longitude: cell(5),
    genus:     cell(6),
    family:    cell(7),
    subfamily: String::new(),
  };

  let mut entries = Vec::new();
  for (feature, raw) in features.iter().zip(row.iter().skip(LANGUAGE_COLUMNS.len())) {
    if raw.is_empty() {
      continue;
    }
    let (value_id, long_description) =
      raw.split_once(' ').ok_or_else(|| Error::MalformedCell {
        wals_code:  language.wals_code.clone(),
        feature_id: feature.id.clone(),
        cell:       raw.to_owned(),
      })?;

    entries.push(DataPointEntry::new(&feature.id, value_id));

    let value = ValueRecord {
      feature_id:       feature.id.clone(),
      value_id:         value_id.to_owned(),
      description:      String::new(),
      long_description: long_description.to_owned(),
    };
    if seen_values.insert(value.clone()) {
      values.push(value);
    }
  }

  let datapoint = DataPointRecord { wals_code: language.wals_code.clone(), entries };
  Ok((language, datapoint))
}
