//! `wals`: load and query the World Atlas of Language Structures.
//!
//! # Usage
//!
//! ```text
//! wals ingest wals-language.csv.zip
//! wals language English
//! wals family Indo-European
//! wals feature 81A 1
//! wals --json feature "Order of Subject, Object and Verb" SOV
//! ```

mod output;
mod settings;

use std::{io, path::PathBuf};

use anyhow::{Context as _, Result, bail};
use clap::{Parser, Subcommand};
use settings::Settings;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;
use wals_core::{language::LanguageProfile, store::LanguageStore};
use wals_store_sqlite::SqliteStore;

// ─── CLI args ─────────────────────────────────────────────────────────────────

#[derive(Parser, Debug)]
#[command(name = "wals", author, version, about = "Query the World Atlas of Language Structures")]
struct Cli {
  /// Path to the TOML configuration file.
  #[arg(short, long, default_value = "wals.toml")]
  config: PathBuf,

  /// SQLite database file (overrides the config file and WALS_STORE_PATH).
  #[arg(long, value_name = "FILE")]
  db: Option<PathBuf>,

  /// Print results as JSON.
  #[arg(long, global = true)]
  json: bool,

  #[command(subcommand)]
  command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
  /// Replace the database contents with a zipped WALS export.
  Ingest {
    /// Local path to the zip archive.
    archive: PathBuf,
  },
  /// Show one language by its exact name.
  Language { name: String },
  /// List every language in a family.
  Family { family: String },
  /// List the languages sharing a family with the named language.
  FamilyMembers { name: String },
  /// List languages taking a value for a feature (ids or names).
  Feature { feature: String, value: String },
  /// Print language and feature counts.
  Stats,
}

// ─── Entry point ──────────────────────────────────────────────────────────────

fn main() -> Result<()> {
  tracing_subscriber::fmt()
    .with_writer(io::stderr)
    .with_env_filter(
      EnvFilter::builder()
        .with_default_directive(LevelFilter::INFO.into())
        .from_env_lossy(),
    )
    .init();

  let cli = Cli::parse();
  let settings = Settings::load(&cli.config, cli.db.as_deref())?;

  if let Some(parent) = settings.store_path.parent()
    && !parent.as_os_str().is_empty()
  {
    std::fs::create_dir_all(parent)
      .with_context(|| format!("failed to create {}", parent.display()))?;
  }

  let mut store = SqliteStore::open(&settings.store_path)
    .with_context(|| format!("failed to open store at {:?}", settings.store_path))?;

  let mut stdout = io::stdout().lock();
  run(&mut store, cli.command, cli.json, &mut stdout)
}

fn run<W: io::Write>(
  store: &mut SqliteStore,
  command: Command,
  json: bool,
  out: &mut W,
) -> Result<()> {
  match command {
    Command::Ingest { archive } => {
      let dataset = wals_archive::parse_archive_path(&archive)
        .with_context(|| format!("failed to parse {}", archive.display()))?;
      let summary = store.ingest(&dataset).context("ingestion failed")?;
      tracing::info!(
        languages = summary.languages,
        features = summary.features,
        values = summary.values,
        datapoints = summary.datapoints,
        "ingested {}",
        archive.display()
      );
      Ok(())
    }
    Command::Language { name } => {
      let lang = store.get_language_by_name(&name)?;
      output::write_languages(out, &[lang.into_profile()], json)
    }
    Command::Family { family } => {
      let langs = profiles(store.get_languages_by_family(&family)?);
      output::write_languages(out, &langs, json)
    }
    Command::FamilyMembers { name } => {
      let lang = store.get_language_by_name(&name)?;
      let langs = profiles(lang.get_family_members()?);
      output::write_languages(out, &langs, json)
    }
    Command::Feature { feature, value } => {
      let feature_id = resolve_feature(store, &feature);
      let value_id = resolve_value(store, &feature_id, &value)?;
      let langs = profiles(store.get_languages_by_feature_value(&feature_id, value_id)?);
      output::write_languages(out, &langs, json)
    }
    Command::Stats => {
      if json {
        let stats = serde_json::json!({
          "languages": store.language_count(),
          "features":  store.feature_count(),
        });
        writeln!(out, "{stats}")?;
      } else {
        writeln!(out, "languages: {}", store.language_count())?;
        writeln!(out, "features:  {}", store.feature_count())?;
      }
      Ok(())
    }
  }
}

// ─── Argument resolution ──────────────────────────────────────────────────────

fn profiles<S: ?Sized>(langs: Vec<wals_core::language::Language<'_, S>>) -> Vec<LanguageProfile> {
  langs.into_iter().map(|l| l.into_profile()).collect()
}

/// Accept a feature id or a feature name. Anything else is passed through
/// unchanged and simply matches nothing.
fn resolve_feature(store: &SqliteStore, feature: &str) -> String {
  if store.feature_name(feature).is_some() {
    return feature.to_owned();
  }
  store
    .feature_id_for_name(feature)
    .unwrap_or(feature)
    .to_owned()
}

/// Accept an integer value id or the value's long description.
fn resolve_value(store: &SqliteStore, feature_id: &str, value: &str) -> Result<i64> {
  if let Ok(id) = value.trim().parse::<i64>() {
    return Ok(id);
  }
  match store.value_id_for_name(feature_id, value) {
    Some(id) => Ok(id),
    None => bail!("unknown value {value:?} for feature {feature_id:?}"),
  }
}
