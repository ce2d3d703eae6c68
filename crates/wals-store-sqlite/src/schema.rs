//! SQL schema for the WALS SQLite store.
//!
//! Column order matters: the loader inserts positionally.
//!
//! ```text
//! languages(wals_code PK, name, latitude, longitude, genus, family, subfamily, iso_codes)
//! features(id PK, name)
//! values_(feature_id, value_id, short_desc, long_desc)
//! data_points(wals_code FK→languages, feature_id FK→features, value_id)
//! ```

use rusqlite::Connection;

use crate::{Error, Result};

/// `(step, DDL)` pairs; idempotent thanks to `IF NOT EXISTS`.
const TABLES: [(&str, &str); 4] = [
  (
    "create languages",
    "CREATE TABLE IF NOT EXISTS languages (
        wals_code  TEXT PRIMARY KEY,
        name       TEXT,
        latitude   REAL,
        longitude  REAL,
        genus      TEXT,
        family     TEXT,
        subfamily  TEXT,
        iso_codes  TEXT
    )",
  ),
  (
    "create features",
    "CREATE TABLE IF NOT EXISTS features (
        id    TEXT PRIMARY KEY,
        name  TEXT
    )",
  ),
  (
    // (feature_id, value_id) is logically unique; not enforced.
    "create values_",
    "CREATE TABLE IF NOT EXISTS values_ (
        feature_id  TEXT,
        value_id    INTEGER,
        short_desc  TEXT,
        long_desc   TEXT
    )",
  ),
  (
    "create data_points",
    "CREATE TABLE IF NOT EXISTS data_points (
        wals_code   TEXT REFERENCES languages(wals_code),
        feature_id  TEXT REFERENCES features(id),
        value_id    INTEGER
    )",
  ),
];

/// Family is one-to-many, so its index is not unique.
const INDICES: [(&str, &str); 4] = [
  (
    "index languages.name",
    "CREATE UNIQUE INDEX IF NOT EXISTS lang_name ON languages(name)",
  ),
  (
    "index languages.family",
    "CREATE INDEX IF NOT EXISTS lang_family ON languages(family)",
  ),
  (
    "index data_points.wals_code",
    "CREATE INDEX IF NOT EXISTS data_wals ON data_points(wals_code)",
  ),
  (
    "index data_points.feature_value",
    "CREATE INDEX IF NOT EXISTS data_feature_value
        ON data_points(feature_id, value_id)",
  ),
];

/// Dependents before referents.
const CLEAR_ORDER: [&str; 4] = ["data_points", "values_", "languages", "features"];

/// Ensure the four tables exist.
pub fn create_tables(conn: &Connection) -> Result<()> {
  TABLES.iter().try_for_each(|&(step, sql)| run_step(conn, step, sql))
}

/// Ensure the lookup indices exist.
pub fn create_indices(conn: &Connection) -> Result<()> {
  INDICES.iter().try_for_each(|&(step, sql)| run_step(conn, step, sql))
}

/// Tables and indices together.
pub fn ensure_schema(conn: &Connection) -> Result<()> {
  create_tables(conn)?;
  create_indices(conn)
}

/// Empty all four tables, leaving the schema in place.
pub fn clear_tables(conn: &Connection) -> Result<()> {
  for table in CLEAR_ORDER {
    conn.execute(&format!("DELETE FROM {table}"), [])?;
  }
  Ok(())
}

fn run_step(conn: &Connection, step: &'static str, sql: &str) -> Result<()> {
  conn
    .execute(sql, [])
    .map(|_| ())
    .map_err(|source| Error::Schema { step, source })
}
