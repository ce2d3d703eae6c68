//! WALS archive parser.
//!
//! Reads a zipped WALS export and produces the canonical
//! [`wals_core::dataset::Dataset`]. Two upstream layouts are understood:
//!
//! - [`ArchiveFormat::NewWide`]: a single wide `language.csv` with one column
//!   per feature (plus one auxiliary member).
//! - [`ArchiveFormat::OldMultiFile`]: separate `languages.csv`,
//!   `features.csv`, `values.csv` and `datapoints.csv` (plus one auxiliary
//!   member).
//!
//! Pure synchronous; no database dependencies.
//!
//! # Quick start
//!
//! ```no_run
//! let dataset = wals_archive::parse_archive_path("wals-language.csv.zip").unwrap();
//! println!("{} languages", dataset.languages.len());
//! ```

pub mod error;
mod multi_file;
mod wide;

use std::{
  collections::HashMap,
  fs::File,
  io::{BufReader, Read, Seek},
  path::Path,
};

pub use error::{Error, Result};
use tracing::{debug, info};
use wals_core::dataset::Dataset;
use zip::ZipArchive;

/// Member of the wide export.
pub const WIDE_LANGUAGE_FILE: &str = "language.csv";

/// Members of the multi-file export that carry data. A fifth member ships
/// alongside them and is ignored.
pub const MULTI_FILE_MEMBERS: [&str; 4] =
  ["languages.csv", "features.csv", "values.csv", "datapoints.csv"];

// ─── Format ──────────────────────────────────────────────────────────────────

/// The closed set of archive layouts this crate can parse.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArchiveFormat {
  OldMultiFile,
  NewWide,
}

impl ArchiveFormat {
  /// Map an archive's member names to a layout.
  ///
  /// Detection keys on the file names rather than the member count. An
  /// archive carrying both name sets is read as the multi-file export.
  /// Members are addressed by base name, so a data file appearing in two
  /// directories is rejected rather than picking one.
  pub fn detect<'a, I>(member_names: I) -> Result<Self>
  where
    I: IntoIterator<Item = &'a str>,
  {
    let members: Vec<&str> = member_names
      .into_iter()
      .filter(|name| !name.ends_with('/'))
      .collect();
    let basenames: Vec<&str> = members.iter().map(|m| basename(m)).collect();

    let data_files = MULTI_FILE_MEMBERS.iter().chain([&WIDE_LANGUAGE_FILE]);
    for file in data_files {
      if basenames.iter().filter(|b| *b == file).count() > 1 {
        return Err(Error::DuplicateMember((*file).to_owned()));
      }
    }

    let wide = basenames.contains(&WIDE_LANGUAGE_FILE);
    let multi = MULTI_FILE_MEMBERS.iter().all(|m| basenames.contains(m));

    match (multi, wide) {
      (true, _) => Ok(Self::OldMultiFile),
      (false, true) => Ok(Self::NewWide),
      (false, false) => Err(Error::UnsupportedLayout {
        members: members.into_iter().map(str::to_owned).collect(),
      }),
    }
  }

  /// Parse an opened archive as this layout.
  pub fn parse<R: Read + Seek>(self, archive: &mut ZipArchive<R>) -> Result<Dataset> {
    let mut members = Members::new(archive);
    match self {
      Self::OldMultiFile => multi_file::parse(&mut members),
      Self::NewWide => wide::parse(&mut members),
    }
  }
}

// ─── Public API ──────────────────────────────────────────────────────────────

/// Detect the layout of the zip archive in `reader` and parse it.
pub fn parse_archive<R: Read + Seek>(reader: R) -> Result<Dataset> {
  let mut archive = ZipArchive::new(reader)?;
  let format = ArchiveFormat::detect(archive.file_names())?;
  debug!(?format, members = archive.len(), "detected archive layout");

  let dataset = format.parse(&mut archive)?;
  info!(
    ?format,
    languages = dataset.languages.len(),
    features = dataset.features.len(),
    values = dataset.values.len(),
    datapoints = dataset.datapoint_count(),
    "parsed WALS archive"
  );
  Ok(dataset)
}

/// Open the zip archive at `path` and parse it.
pub fn parse_archive_path(path: impl AsRef<Path>) -> Result<Dataset> {
  let file = File::open(path.as_ref())?;
  parse_archive(BufReader::new(file))
}

// ─── Member access ───────────────────────────────────────────────────────────

/// Archive members addressed by their base file name, so an export nested in
/// a top-level directory still resolves.
pub(crate) struct Members<'a, R> {
  archive: &'a mut ZipArchive<R>,
  by_base: HashMap<String, String>,
}

impl<'a, R: Read + Seek> Members<'a, R> {
  fn new(archive: &'a mut ZipArchive<R>) -> Self {
    let by_base = archive
      .file_names()
      .map(|name| (basename(name).to_owned(), name.to_owned()))
      .collect();
    Self { archive, by_base }
  }

  /// Read the whole member named `base` into memory.
  pub(crate) fn read(&mut self, base: &str) -> Result<Vec<u8>> {
    let full = self
      .by_base
      .get(base)
      .ok_or_else(|| Error::MissingMember(base.to_owned()))?;
    let mut file = self.archive.by_name(full)?;
    let mut buf = Vec::new();
    file.read_to_end(&mut buf)?;
    Ok(buf)
  }
}

fn basename(name: &str) -> &str {
  name.rsplit('/').next().unwrap_or(name)
}

// ─── Test helpers ────────────────────────────────────────────────────────────
