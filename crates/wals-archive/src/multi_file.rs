//! Parser for the old multi-file export.
//!
//! Each CSV carries its own header row; records are built by header name.
//!
//! ```text
//! languages.csv   wals code,name,latitude,longitude,genus,family,subfamily,iso codes
//! features.csv    id,name
//! values.csv      feature_id,value_id,description,long description
//! datapoints.csv  wals_code,<feature id>,<feature id>,…
//! ```

use std::io::{Read, Seek};

use csv::StringRecord;
use tracing::debug;
use wals_core::dataset::{
  DataPointEntry, DataPointRecord, Dataset, FeatureRecord, LanguageRecord, ValueRecord,
};

use crate::{
  Members,
  error::{Error, Result},
};

/// Header names accepted for the language key in `datapoints.csv`.
const WALS_CODE_MARKERS: [&str; 2] = ["wals_code", "wals code"];

pub(crate) fn parse<R: Read + Seek>(members: &mut Members<'_, R>) -> Result<Dataset> {
  let languages = read_table(members, "languages.csv")?;
  let features = read_table(members, "features.csv")?;
  let values = read_table(members, "values.csv")?;
  let datapoints = read_datapoints(members)?;

  let dataset = Dataset {
    languages: languages
      .rows
      .iter()
      .map(|row| -> Result<LanguageRecord> {
        Ok(LanguageRecord {
          wals_code: languages.field(row, "wals code")?,
          name:      languages.field(row, "name")?,
          latitude:  languages.field(row, "latitude")?,
          longitude: languages.field(row, "longitude")?,
          genus:     languages.field(row, "genus")?,
          family:    languages.field(row, "family")?,
          subfamily: languages.field(row, "subfamily")?,
          iso_codes: languages.field(row, "iso codes")?,
        })
      })
      .collect::<Result<_>>()?,
    features: features
      .rows
      .iter()
      .map(|row| -> Result<FeatureRecord> {
        Ok(FeatureRecord {
          id:   features.field(row, "id")?,
          name: features.field(row, "name")?,
        })
      })
      .collect::<Result<_>>()?,
    values: values
      .rows
      .iter()
      .map(|row| -> Result<ValueRecord> {
        Ok(ValueRecord {
          feature_id:       values.field(row, "feature_id")?,
          value_id:         values.field(row, "value_id")?,
          description:      values.field(row, "description")?,
          long_description: values.field(row, "long description")?,
        })
      })
      .collect::<Result<_>>()?,
    datapoints,
  };

  Ok(dataset)
}

// ─── Tables ──────────────────────────────────────────────────────────────────

/// A fully-read CSV member: its header row and data rows.
struct Table {
  file:    &'static str,
  headers: StringRecord,
  rows:    Vec<StringRecord>,
}

impl Table {
  fn column(&self, name: &str) -> Result<usize> {
    self
      .headers
      .iter()
      .position(|h| h == name)
      .ok_or_else(|| Error::MissingColumn {
        file:   self.file.to_owned(),
        column: name.to_owned(),
      })
  }

  fn field(&self, row: &StringRecord, name: &str) -> Result<String> {
    let idx = self.column(name)?;
    Ok(row.get(idx).unwrap_or_default().to_owned())
  }
}

fn read_table<R: Read + Seek>(
  members: &mut Members<'_, R>,
  file: &'static str,
) -> Result<Table> {
  let bytes = members.read(file)?;
  let mut reader = csv::Reader::from_reader(bytes.as_slice());
  let headers = reader.headers()?.clone();
  let rows = reader.records().collect::<Result<Vec<_>, _>>()?;
  debug!(file, rows = rows.len(), "read CSV member");
  Ok(Table { file, headers, rows })
}

/// `datapoints.csv` is wide: every column except the language key is a
/// feature id, every cell a value id or empty.
fn read_datapoints<R: Read + Seek>(members: &mut Members<'_, R>) -> Result<Vec<DataPointRecord>> {
  let table = read_table(members, "datapoints.csv")?;
  let key = table
    .headers
    .iter()
    .position(|h| WALS_CODE_MARKERS.iter().any(|m| *m == h))
    .ok_or_else(|| Error::MissingColumn {
      file:   table.file.to_owned(),
      column: WALS_CODE_MARKERS[0].to_owned(),
    })?;

  let records = table
    .rows
    .iter()
    .map(|row| DataPointRecord {
      wals_code: row.get(key).unwrap_or_default().to_owned(),
      entries:   table
        .headers
        .iter()
        .zip(row.iter())
        .enumerate()
        .filter(|(idx, _)| *idx != key)
        .map(|(_, (feature_id, cell))| DataPointEntry::new(feature_id, cell))
        .collect(),
    })
    .collect();

  Ok(records)
}
