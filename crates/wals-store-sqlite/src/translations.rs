//! Id ↔ name lookup tables, built by scanning `features` and `values_`.

use std::collections::HashMap;

use rusqlite::Connection;

use crate::Result;

/// Per-feature value maps.
#[derive(Debug, Default)]
struct ValueNames {
  by_id:   HashMap<i64, String>,
  by_name: HashMap<String, i64>,
}

#[derive(Debug, Default)]
pub(crate) struct Translations {
  feature_names: HashMap<String, String>,
  feature_ids:   HashMap<String, String>,
  values:        HashMap<String, ValueNames>,
}

impl Translations {
  pub(crate) fn build(conn: &Connection) -> Result<Self> {
    let mut translations = Self::default();

    let mut stmt = conn.prepare("SELECT id, name FROM features")?;
    let features = stmt.query_map([], |row| Ok((row.get::<_, String>(0)?, row.get::<_, String>(1)?)))?;
    for feature in features {
      let (id, name) = feature?;
      translations.feature_ids.insert(name.clone(), id.clone());
      translations.feature_names.insert(id, name);
    }

    let mut stmt = conn.prepare("SELECT feature_id, value_id, long_desc FROM values_")?;
    let values = stmt.query_map([], |row| {
      Ok((
        row.get::<_, String>(0)?,
        row.get::<_, i64>(1)?,
        row.get::<_, String>(2)?,
      ))
    })?;
    for value in values {
      let (feature_id, value_id, name) = value?;
      let entry = translations.values.entry(feature_id).or_default();
      entry.by_name.insert(name.clone(), value_id);
      entry.by_id.insert(value_id, name);
    }

    Ok(translations)
  }

  pub(crate) fn feature_name(&self, feature_id: &str) -> Option<&str> {
    self.feature_names.get(feature_id).map(String::as_str)
  }

  pub(crate) fn feature_id(&self, name: &str) -> Option<&str> {
    self.feature_ids.get(name).map(String::as_str)
  }

  pub(crate) fn value_name(&self, feature_id: &str, value_id: i64) -> Option<&str> {
    self
      .values
      .get(feature_id)
      .and_then(|v| v.by_id.get(&value_id))
      .map(String::as_str)
  }

  pub(crate) fn value_id(&self, feature_id: &str, name: &str) -> Option<i64> {
    self
      .values
      .get(feature_id)
      .and_then(|v| v.by_name.get(name))
      .copied()
  }
}
