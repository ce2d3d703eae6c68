//! Integration tests for `SqliteStore` against an in-memory database.

use std::{
  collections::BTreeSet,
  io::{Cursor, Write},
};

use wals_core::{
  dataset::{
    DataPointEntry, DataPointRecord, Dataset, FeatureRecord, LanguageRecord, ValueRecord,
  },
  language::Location,
  store::LanguageStore,
};
use zip::{ZipWriter, write::SimpleFileOptions};

use crate::{Error, LoadSummary, SqliteStore};

// ─── Fixtures ────────────────────────────────────────────────────────────────

fn store() -> SqliteStore { SqliteStore::open_in_memory().expect("in-memory store") }

fn language(code: &str, name: &str, family: &str, lat: &str, long: &str) -> LanguageRecord {
  LanguageRecord {
    wals_code: code.into(),
    name:      name.into(),
    latitude:  lat.into(),
    longitude: long.into(),
    genus:     format!("{family}-genus"),
    family:    family.into(),
    subfamily: String::new(),
    iso_codes: format!("{code}1 {code}2"),
  }
}

fn feature(id: &str, name: &str) -> FeatureRecord {
  FeatureRecord { id: id.into(), name: name.into() }
}

fn value(feature_id: &str, value_id: &str, long: &str) -> ValueRecord {
  ValueRecord {
    feature_id:       feature_id.into(),
    value_id:         value_id.into(),
    description:      String::new(),
    long_description: long.into(),
  }
}

fn datapoint(code: &str, entries: &[(&str, &str)]) -> DataPointRecord {
  DataPointRecord {
    wals_code: code.into(),
    entries:   entries.iter().map(|(f, v)| DataPointEntry::new(*f, v)).collect(),
  }
}

/// Four languages over two families, two features.
fn sample() -> Dataset {
  Dataset {
    languages:  vec![
      language("eng", "English", "Indo-European", "52.0", "0.0"),
      language("ger", "German", "Indo-European", "52.0", "10.0"),
      language("jpn", "Japanese", "Japanese", "35.0", "135.0"),
      language("xyz", "Lost (Language)", "Isolate", "", ""),
    ],
    features:   vec![feature("81A", "Order of Subject, Object and Verb"), feature("49A", "Number of Cases")],
    values:     vec![
      value("81A", "1", "SOV"),
      value("81A", "2", "SVO"),
      value("49A", "1", "No morphological case-marking"),
      value("49A", "3", "3 cases"),
    ],
    datapoints: vec![
      datapoint("eng", &[("81A", "2"), ("49A", "1")]),
      datapoint("ger", &[("81A", ""), ("49A", "3")]),
      datapoint("jpn", &[("81A", "1"), ("49A", "")]),
      datapoint("xyz", &[]),
    ],
  }
}

fn loaded() -> SqliteStore {
  let mut s = store();
  s.ingest(&sample()).unwrap();
  s
}

fn codes<S: ?Sized>(langs: &[wals_core::language::Language<'_, S>]) -> Vec<String> {
  langs.iter().map(|l| l.code.clone()).collect()
}

fn table_count(s: &SqliteStore, table: &str) -> i64 {
  s.connection()
    .query_row(&format!("SELECT COUNT(*) FROM {table}"), [], |row| row.get(0))
    .unwrap()
}

// ─── Loading ─────────────────────────────────────────────────────────────────

#[test]
fn empty_store_has_zero_counts() {
  let s = store();
  assert_eq!(s.language_count(), 0);
  assert_eq!(s.feature_count(), 0);
}

#[test]
fn ingest_reports_rows_and_counts() {
  let mut s = store();
  let summary = s.ingest(&sample()).unwrap();

  assert_eq!(
    summary,
    LoadSummary { languages: 4, features: 2, values: 4, datapoints: 4 }
  );
  assert_eq!(s.language_count(), 4);
  assert_eq!(s.feature_count(), 2);
  assert_eq!(table_count(&s, "data_points"), 4);
}

#[test]
fn absent_values_are_not_stored() {
  let s = loaded();
  let nulls: i64 = s
    .connection()
    .query_row("SELECT COUNT(*) FROM data_points WHERE value_id IS NULL", [], |row| row.get(0))
    .unwrap();
  assert_eq!(nulls, 0);
}

#[test]
fn reingest_replaces_everything() {
  let mut s = loaded();
  let smaller = Dataset {
    languages:  vec![language("jpn", "Japanese", "Japanese", "35.0", "135.0")],
    features:   vec![feature("81A", "Order of Subject, Object and Verb")],
    values:     vec![value("81A", "1", "SOV")],
    datapoints: vec![datapoint("jpn", &[("81A", "1")])],
  };
  s.ingest(&smaller).unwrap();

  assert_eq!(s.language_count(), 1);
  assert_eq!(s.feature_count(), 1);
  assert_eq!(table_count(&s, "values_"), 1);
  assert!(s.get_language_by_name("English").is_err());
  assert_eq!(s.feature_name("49A"), None);
}

#[test]
fn failed_ingest_leaves_previous_contents() {
  let mut s = loaded();
  let mut bad = sample();
  bad.languages.push(language("bad", "Bad", "Isolate", "north", "0.0"));

  let err = s.ingest(&bad).unwrap_err();
  assert!(matches!(
    err,
    Error::Core(wals_core::Error::InvalidCoordinate { ref wals_code, .. }) if wals_code == "bad"
  ));

  assert_eq!(s.language_count(), 4);
  assert_eq!(table_count(&s, "languages"), 4);
  assert_eq!(table_count(&s, "data_points"), 4);
  assert!(s.get_language_by_name("English").is_ok());
}

#[test]
fn failed_first_ingest_leaves_store_empty() {
  let mut s = store();
  let mut bad = sample();
  bad.values.push(value("81A", "x", "Broken"));

  let err = s.ingest(&bad).unwrap_err();
  assert!(matches!(err, Error::Core(wals_core::Error::InvalidValueId { .. })));
  for table in ["languages", "features", "values_", "data_points"] {
    assert_eq!(table_count(&s, table), 0, "{table} should be empty");
  }
}

#[test]
fn non_integer_datapoint_value_fails_ingest() {
  let mut s = store();
  let mut bad = sample();
  bad.datapoints.push(datapoint("xyz", &[("81A", "two")]));
  assert!(s.ingest(&bad).is_err());
  assert_eq!(table_count(&s, "languages"), 0);
}

#[test]
fn duplicate_language_name_fails_ingest() {
  let mut s = store();
  let mut bad = sample();
  bad.languages.push(language("en2", "English", "Indo-European", "", ""));
  assert!(matches!(s.ingest(&bad), Err(Error::Database(_))));
  assert_eq!(s.language_count(), 0);
}

#[test]
fn datapoint_for_unknown_language_fails_ingest() {
  let mut s = store();
  let mut bad = sample();
  bad.datapoints.push(datapoint("nope", &[("81A", "1")]));
  assert!(matches!(s.ingest(&bad), Err(Error::Database(_))));
}

#[test]
fn clear_empties_tables_and_counts() {
  let mut s = loaded();
  s.clear().unwrap();

  assert_eq!(s.language_count(), 0);
  assert_eq!(s.feature_count(), 0);
  assert_eq!(table_count(&s, "values_"), 0);
  assert_eq!(s.feature_name("81A"), None);
}

// ─── Queries ─────────────────────────────────────────────────────────────────

#[test]
fn get_language_by_name_round_trips() {
  let s = loaded();
  let eng = s.get_language_by_name("English").unwrap();

  assert_eq!(eng.code, "eng");
  assert_eq!(eng.name, "English");
  assert_eq!(eng.family, "Indo-European");
  assert_eq!(eng.genus, "Indo-European-genus");
  assert_eq!(eng.subfamily, "");
  assert_eq!(eng.iso_codes, "eng1 eng2");
  assert_eq!(
    eng.location,
    Location { latitude: Some(52.0), longitude: Some(0.0) }
  );
  assert_eq!(eng.features.len(), 2);
  assert_eq!(eng.features["Order of Subject, Object and Verb"], "SVO");
  assert_eq!(eng.features["Number of Cases"], "No morphological case-marking");
}

#[test]
fn every_language_round_trips_by_name() {
  let s = loaded();
  for record in sample().languages {
    let lang = s.get_language_by_name(&record.name).unwrap();
    assert_eq!(lang.code, record.wals_code);
    assert_eq!(lang.family, record.family);
    assert_eq!(lang.genus, record.genus);
    assert_eq!(lang.subfamily, record.subfamily);
    assert_eq!(lang.iso_codes, record.iso_codes);
  }
}

#[test]
fn display_name_is_normalised() {
  let s = loaded();
  let lost = s.get_language_by_name("Lost (Language)").unwrap();
  assert_eq!(lost.name, "Lost_Language");
}

#[test]
fn empty_coordinates_hydrate_as_none() {
  let s = loaded();
  let lost = s.get_language_by_name("Lost (Language)").unwrap();
  assert_eq!(lost.location, Location { latitude: None, longitude: None });
  assert!(lost.features.is_empty());
}

#[test]
fn absent_values_are_missing_from_features() {
  let s = loaded();
  let ger = s.get_language_by_name("German").unwrap();
  assert_eq!(ger.features.len(), 1);
  assert_eq!(ger.features["Number of Cases"], "3 cases");
}

#[test]
fn unknown_name_is_not_found() {
  let s = loaded();
  let err = s.get_language_by_name("Klingon").unwrap_err();
  assert!(err.is_not_found());
  assert!(matches!(
    err,
    Error::Core(wals_core::Error::LanguageNotFound(ref n)) if n == "Klingon"
  ));
}

#[test]
fn family_grouping_is_complete() {
  let s = loaded();
  let ie = s.get_languages_by_family("Indo-European").unwrap();
  assert_eq!(codes(&ie), vec!["eng", "ger"]);

  let all: BTreeSet<String> = ["Indo-European", "Japanese", "Isolate"]
    .iter()
    .flat_map(|f| codes(&s.get_languages_by_family(f).unwrap()))
    .collect();
  assert_eq!(all.len(), 4);
}

#[test]
fn unknown_family_is_empty() {
  let s = loaded();
  assert!(s.get_languages_by_family("Klingonic").unwrap().is_empty());
}

#[test]
fn feature_value_filter_matches_exactly() {
  let s = loaded();
  let sov = s.get_languages_by_feature_value("81A", 1).unwrap();
  assert_eq!(codes(&sov), vec!["jpn"]);

  let svo = s.get_languages_by_feature_value("81A", 2).unwrap();
  assert_eq!(codes(&svo), vec!["eng"]);
}

#[test]
fn unused_feature_value_pair_is_empty() {
  let s = loaded();
  assert!(s.get_languages_by_feature_value("81A", 6).unwrap().is_empty());
  assert!(s.get_languages_by_feature_value("999Z", 1).unwrap().is_empty());
}

#[test]
fn family_members_come_back_through_the_store() {
  let s = loaded();
  let eng = s.get_language_by_name("English").unwrap();
  let members = eng.get_family_members().unwrap();
  assert_eq!(codes(&members), vec!["eng", "ger"]);
}

#[test]
fn translations_are_bidirectional() {
  let s = loaded();
  assert_eq!(s.feature_name("49A"), Some("Number of Cases"));
  assert_eq!(s.feature_id_for_name("Number of Cases"), Some("49A"));
  assert_eq!(s.value_name("81A", 1), Some("SOV"));
  assert_eq!(s.value_id_for_name("81A", "SVO"), Some(2));
  assert_eq!(s.value_id_for_name("49A", "SVO"), None);
}

#[test]
fn missing_value_definition_is_not_found_on_hydration() {
  let mut s = store();
  let mut data = sample();
  data.values.retain(|v| !(v.feature_id == "81A" && v.value_id == "2"));
  s.ingest(&data).unwrap();

  let err = s.get_language_by_name("English").unwrap_err();
  assert!(err.is_not_found());
  assert!(matches!(
    err,
    Error::Core(wals_core::Error::ValueNotFound { value_id: 2, .. })
  ));
}

// ─── Persistence ─────────────────────────────────────────────────────────────

#[test]
fn reopened_file_store_rebuilds_translations() {
  let dir = tempfile::tempdir().unwrap();
  let path = dir.path().join("wals.db");

  {
    let mut s = SqliteStore::open(&path).unwrap();
    s.ingest(&sample()).unwrap();
  }

  let s = SqliteStore::open(&path).unwrap();
  assert_eq!(s.language_count(), 4);
  assert_eq!(s.feature_count(), 2);
  let jpn = s.get_language_by_name("Japanese").unwrap();
  assert_eq!(jpn.features["Order of Subject, Object and Verb"], "SOV");
}

#[test]
fn open_reports_bad_path() {
  let err = SqliteStore::open("/nonexistent/dir/wals.db").unwrap_err();
  assert!(matches!(err, Error::Open { .. }));
}

// ─── Archive → store ─────────────────────────────────────────────────────────

fn zip_of(members: &[(&str, &str)]) -> Cursor<Vec<u8>> {
  let mut writer = ZipWriter::new(Cursor::new(Vec::new()));
  for (name, contents) in members {
    writer.start_file(*name, SimpleFileOptions::default()).unwrap();
    writer.write_all(contents.as_bytes()).unwrap();
  }
  let mut cursor = writer.finish().unwrap();
  cursor.set_position(0);
  cursor
}

#[test]
fn wide_archive_scenario() {
  let archive = zip_of(&[
    (
      "language.csv",
      "wals code,iso codes,glottocode,name,latitude,longitude,genus,family,1A Order\n\
       aaa,iso1,,AAAlang,10.0,20.0,GenusX,FamilyY,1 SOV\n",
    ),
    ("metadata.txt", ""),
  ]);
  let dataset = wals_archive::parse_archive(archive).unwrap();

  let mut s = store();
  let summary = s.ingest(&dataset).unwrap();
  assert_eq!(
    summary,
    LoadSummary { languages: 1, features: 1, values: 1, datapoints: 1 }
  );

  let (feature_id, name): (String, String) = s
    .connection()
    .query_row("SELECT id, name FROM features", [], |r| Ok((r.get(0)?, r.get(1)?)))
    .unwrap();
  assert_eq!((feature_id.as_str(), name.as_str()), ("1A", "Order"));

  let (value_id, long_desc): (i64, String) = s
    .connection()
    .query_row("SELECT value_id, long_desc FROM values_ WHERE feature_id = '1A'", [], |r| {
      Ok((r.get(0)?, r.get(1)?))
    })
    .unwrap();
  assert_eq!((value_id, long_desc.as_str()), (1, "SOV"));

  let lang = s.get_language_by_name("AAAlang").unwrap();
  assert_eq!(lang.code, "aaa");
  assert_eq!(lang.genus, "GenusX");
  assert_eq!(lang.family, "FamilyY");
  assert_eq!(lang.subfamily, "");
  assert_eq!(lang.location, Location { latitude: Some(10.0), longitude: Some(20.0) });
  assert_eq!(lang.features["Order"], "SOV");

  let sov = s.get_languages_by_feature_value("1A", 1).unwrap();
  assert_eq!(codes(&sov), vec!["aaa"]);
}

#[test]
fn multi_file_archive_loads() {
  let archive = zip_of(&[
    (
      "languages.csv",
      "wals code,name,latitude,longitude,genus,family,subfamily,iso codes\n\
       aaa,Alpha,1.5,,GenusA,FamilyF,SubF,aaa\n\
       bbb,Beta,,,GenusB,FamilyF,,bbb\n",
    ),
    ("features.csv", "id,name\n1A,Consonant Inventories\n"),
    (
      "values.csv",
      "feature_id,value_id,description,long description\n\
       1A,1,Small,Small inventory\n\
       1A,2,Large,Large inventory\n",
    ),
    ("datapoints.csv", "wals_code,1A\naaa,2\nbbb,\n"),
    ("authors.csv", "name\n"),
  ]);
  let dataset = wals_archive::parse_archive(archive).unwrap();

  let mut s = store();
  s.ingest(&dataset).unwrap();

  let alpha = s.get_language_by_name("Alpha").unwrap();
  assert_eq!(alpha.subfamily, "SubF");
  assert_eq!(alpha.location, Location { latitude: Some(1.5), longitude: None });
  assert_eq!(alpha.features["Consonant Inventories"], "Large inventory");

  let beta = s.get_language_by_name("Beta").unwrap();
  assert!(beta.features.is_empty());

  let family = s.get_languages_by_family("FamilyF").unwrap();
  assert_eq!(codes(&family), vec!["aaa", "bbb"]);
}
