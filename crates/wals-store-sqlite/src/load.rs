//! Bulk loader: writes a parsed [`Dataset`] into the schema.
//!
//! The whole load (clear, insert, index) runs inside one transaction. Any
//! failure drops the transaction, which rolls back, so the store is left
//! exactly as it was before the call.

use rusqlite::{Connection, Transaction};
use tracing::{debug, info};
use wals_core::dataset::{
  DataPointRecord, Dataset, FeatureRecord, LanguageRecord, ValueRecord, parse_coordinate,
  parse_value_id,
};

use crate::{Result, schema};

/// Row counts written by one [`load`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LoadSummary {
  pub languages:  usize,
  pub features:   usize,
  pub values:     usize,
  pub datapoints: usize,
}

/// Replace the store contents with `dataset`.
pub fn load(conn: &mut Connection, dataset: &Dataset) -> Result<LoadSummary> {
  info!(
    languages = dataset.languages.len(),
    features = dataset.features.len(),
    "loading WALS dataset"
  );

  let tx = conn.transaction()?;
  schema::create_tables(&tx)?;
  schema::clear_tables(&tx)?;

  let summary = LoadSummary {
    languages:  insert_languages(&tx, &dataset.languages)?,
    features:   insert_features(&tx, &dataset.features)?,
    values:     insert_values(&tx, &dataset.values)?,
    datapoints: insert_datapoints(&tx, &dataset.datapoints)?,
  };

  schema::create_indices(&tx)?;
  tx.commit()?;

  info!(?summary, "WALS dataset loaded");
  Ok(summary)
}

fn insert_languages(tx: &Transaction<'_>, records: &[LanguageRecord]) -> Result<usize> {
  let mut stmt =
    tx.prepare_cached("INSERT INTO languages VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)")?;

  for r in records {
    let latitude = parse_coordinate(&r.wals_code, "latitude", &r.latitude)?;
    let longitude = parse_coordinate(&r.wals_code, "longitude", &r.longitude)?;
    stmt.execute(rusqlite::params![
      r.wals_code,
      r.name,
      latitude,
      longitude,
      r.genus,
      r.family,
      r.subfamily,
      r.iso_codes,
    ])?;
  }

  debug!(rows = records.len(), "inserted languages");
  Ok(records.len())
}

fn insert_features(tx: &Transaction<'_>, records: &[FeatureRecord]) -> Result<usize> {
  let mut stmt = tx.prepare_cached("INSERT INTO features VALUES (?1, ?2)")?;
  for r in records {
    stmt.execute(rusqlite::params![r.id, r.name])?;
  }

  debug!(rows = records.len(), "inserted features");
  Ok(records.len())
}

fn insert_values(tx: &Transaction<'_>, records: &[ValueRecord]) -> Result<usize> {
  let mut stmt = tx.prepare_cached("INSERT INTO values_ VALUES (?1, ?2, ?3, ?4)")?;
  for r in records {
    let value_id = parse_value_id(&r.feature_id, &r.value_id)?;
    stmt.execute(rusqlite::params![r.feature_id, value_id, r.description, r.long_description])?;
  }

  debug!(rows = records.len(), "inserted values");
  Ok(records.len())
}

/// One row per present `(feature, value)` entry; absent values are not stored.
fn insert_datapoints(tx: &Transaction<'_>, records: &[DataPointRecord]) -> Result<usize> {
  let mut stmt = tx.prepare_cached("INSERT INTO data_points VALUES (?1, ?2, ?3)")?;
  let mut rows = 0;
  for r in records {
    for (feature_id, raw) in r.present() {
      let value_id = parse_value_id(feature_id, raw)?;
      stmt.execute(rusqlite::params![r.wals_code, feature_id, value_id])?;
      rows += 1;
    }
  }

  debug!(rows, "inserted data points");
  Ok(rows)
}
