//! [`SqliteStore`]: the SQLite implementation of [`LanguageStore`].

use std::{collections::BTreeMap, path::Path};

use rusqlite::{Connection, OptionalExtension as _};
use tracing::debug;
use wals_core::{
  dataset::Dataset,
  language::{Language, LanguageProfile, Location, display_name},
  store::LanguageStore,
};

use crate::{
  Error, Result,
  load::{self, LoadSummary},
  schema,
  translations::Translations,
};

// ─── Store ───────────────────────────────────────────────────────────────────

/// A WALS language store backed by a single SQLite connection.
///
/// The id/name translations and the language/feature counts are owned by the
/// store and rebuilt whenever its contents are reloaded.
#[derive(Debug)]
pub struct SqliteStore {
  conn:           Connection,
  translations:   Translations,
  language_count: usize,
  feature_count:  usize,
}

impl SqliteStore {
  /// Open (or create) a store at `path`.
  pub fn open(path: impl AsRef<Path>) -> Result<Self> {
    let path = path.as_ref();
    let conn = Connection::open(path).map_err(|source| Error::Open {
      path: path.to_path_buf(),
      source,
    })?;
    Self::from_connection(conn)
  }

  /// Open an in-memory store, mainly for tests.
  pub fn open_in_memory() -> Result<Self> {
    Self::from_connection(Connection::open_in_memory()?)
  }

  /// Wrap an already-open connection, ensuring the schema exists.
  pub fn from_connection(conn: Connection) -> Result<Self> {
    conn
      .pragma_update(None, "foreign_keys", true)
      .map_err(|source| Error::Schema { step: "enable foreign keys", source })?;
    schema::ensure_schema(&conn)?;

    let mut store = Self {
      conn,
      translations: Translations::default(),
      language_count: 0,
      feature_count: 0,
    };
    store.refresh()?;
    Ok(store)
  }

  /// Replace the store contents with `dataset` (all or nothing), then rebuild
  /// the translations.
  pub fn ingest(&mut self, dataset: &Dataset) -> Result<LoadSummary> {
    let summary = load::load(&mut self.conn, dataset)?;
    self.refresh()?;
    Ok(summary)
  }

  /// Empty all four tables.
  pub fn clear(&mut self) -> Result<()> {
    let tx = self.conn.transaction()?;
    schema::clear_tables(&tx)?;
    tx.commit()?;
    self.refresh()
  }

  pub fn connection(&self) -> &Connection { &self.conn }

  // ── Translations ──────────────────────────────────────────────────────────

  pub fn feature_name(&self, feature_id: &str) -> Option<&str> {
    self.translations.feature_name(feature_id)
  }

  pub fn feature_id_for_name(&self, name: &str) -> Option<&str> {
    self.translations.feature_id(name)
  }

  pub fn value_name(&self, feature_id: &str, value_id: i64) -> Option<&str> {
    self.translations.value_name(feature_id, value_id)
  }

  pub fn value_id_for_name(&self, feature_id: &str, name: &str) -> Option<i64> {
    self.translations.value_id(feature_id, name)
  }

  // ── Internals ─────────────────────────────────────────────────────────────

  fn refresh(&mut self) -> Result<()> {
    self.translations = Translations::build(&self.conn)?;
    self.language_count = self.count("SELECT COUNT(wals_code) FROM languages")?;
    self.feature_count = self.count("SELECT COUNT(id) FROM features")?;
    debug!(
      languages = self.language_count,
      features = self.feature_count,
      "rebuilt translations"
    );
    Ok(())
  }

  fn count(&self, sql: &str) -> Result<usize> {
    let n: i64 = self.conn.query_row(sql, [], |row| row.get(0))?;
    Ok(usize::try_from(n).unwrap_or_default())
  }

  fn codes<P: rusqlite::Params>(&self, sql: &str, params: P) -> Result<Vec<String>> {
    let mut stmt = self.conn.prepare_cached(sql)?;
    let codes = stmt
      .query_map(params, |row| row.get(0))?
      .collect::<rusqlite::Result<Vec<String>>>()?;
    Ok(codes)
  }

  /// Hydrate one language: its row plus every datapoint, translated to names.
  fn lang_from_code(&self, code: &str) -> Result<Language<'_, Self>> {
    let mut profile = self
      .conn
      .prepare_cached(
        "SELECT wals_code, name, latitude, longitude, genus, family, subfamily, iso_codes
         FROM languages WHERE wals_code = ?1",
      )?
      .query_row([code], |row| {
        Ok(LanguageProfile {
          code:      row.get(0)?,
          name:      display_name(&row.get::<_, String>(1)?),
          location:  Location { latitude: row.get(2)?, longitude: row.get(3)? },
          genus:     row.get(4)?,
          family:    row.get(5)?,
          subfamily: row.get(6)?,
          iso_codes: row.get(7)?,
          features:  BTreeMap::new(),
        })
      })
      .optional()?
      .ok_or_else(|| wals_core::Error::LanguageNotFound(code.to_owned()))?;

    let mut stmt = self.conn.prepare_cached(
      "SELECT feature_id, value_id FROM data_points
       WHERE wals_code = ?1 AND value_id IS NOT NULL",
    )?;
    let rows = stmt
      .query_map([code], |row| Ok((row.get::<_, String>(0)?, row.get::<_, i64>(1)?)))?
      .collect::<rusqlite::Result<Vec<_>>>()?;

    for (feature_id, value_id) in rows {
      let feature = self
        .feature_name(&feature_id)
        .ok_or_else(|| wals_core::Error::FeatureNotFound(feature_id.clone()))?;
      let value = self
        .value_name(&feature_id, value_id)
        .ok_or_else(|| wals_core::Error::ValueNotFound {
          feature_id: feature_id.clone(),
          value_id,
        })?;
      profile.features.insert(feature.to_owned(), value.to_owned());
    }

    Ok(Language::new(profile, self))
  }

  fn hydrate_all(&self, codes: Vec<String>) -> Result<Vec<Language<'_, Self>>> {
    codes.iter().map(|code| self.lang_from_code(code)).collect()
  }
}

// ─── LanguageStore impl ──────────────────────────────────────────────────────

impl LanguageStore for SqliteStore {
  type Error = Error;

  fn language_count(&self) -> usize { self.language_count }

  fn feature_count(&self) -> usize { self.feature_count }

  fn get_language_by_name(&self, name: &str) -> Result<Language<'_, Self>> {
    let code = self
      .conn
      .query_row("SELECT wals_code FROM languages WHERE name = ?1", [name], |row| {
        row.get::<_, String>(0)
      })
      .optional()?
      .ok_or_else(|| wals_core::Error::LanguageNotFound(name.to_owned()))?;
    self.lang_from_code(&code)
  }

  fn get_languages_by_family(&self, family: &str) -> Result<Vec<Language<'_, Self>>> {
    let codes = self.codes(
      "SELECT wals_code FROM languages WHERE family = ?1 ORDER BY wals_code",
      [family],
    )?;
    self.hydrate_all(codes)
  }

  fn get_languages_by_feature_value(
    &self,
    feature_id: &str,
    value_id: i64,
  ) -> Result<Vec<Language<'_, Self>>> {
    let codes = self.codes(
      "SELECT DISTINCT wals_code FROM data_points
       WHERE feature_id = ?1 AND value_id = ?2
       ORDER BY wals_code",
      rusqlite::params![feature_id, value_id],
    )?;
    self.hydrate_all(codes)
  }
}
