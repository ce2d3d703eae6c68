//! Settings for the `wals` binary.
//!
//! Precedence, lowest first: built-in default, the optional TOML file,
//! `WALS_*` environment variables, the `--db` flag.

use std::path::{Path, PathBuf};

use anyhow::Context as _;
use serde::Deserialize;

pub const DEFAULT_STORE_PATH: &str = "~/.wals/wals.db";

#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
  /// SQLite database file; a leading `~/` is expanded.
  pub store_path: PathBuf,
}

impl Settings {
  pub fn load(config_file: &Path, db_override: Option<&Path>) -> anyhow::Result<Self> {
    let settings = config::Config::builder()
      .set_default("store_path", DEFAULT_STORE_PATH)?
      .add_source(config::File::from(config_file.to_path_buf()).required(false))
      .add_source(config::Environment::with_prefix("WALS"))
      .set_override_option(
        "store_path",
        db_override.map(|p| p.to_string_lossy().into_owned()),
      )?
      .build()
      .context("failed to read config file")?;

    let mut settings: Self = settings
      .try_deserialize()
      .context("failed to deserialise Settings")?;
    settings.store_path = expand_tilde(&settings.store_path);
    Ok(settings)
  }
}

/// Expand a leading `~` to the user's home directory.
pub fn expand_tilde(path: &Path) -> PathBuf {
  let s = path.to_string_lossy();
  if let Some(rest) = s.strip_prefix("~/")
    && let Ok(home) = std::env::var("HOME")
  {
    return PathBuf::from(home).join(rest);
  }
  path.to_path_buf()
}
