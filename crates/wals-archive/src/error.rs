//! Error types for the WALS archive parser.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("zip error: {0}")]
  Zip(#[from] zip::result::ZipError),

  #[error("csv error: {0}")]
  Csv(#[from] csv::Error),

  #[error("io error: {0}")]
  Io(#[from] std::io::Error),

  /// The member files match neither the wide nor the multi-file export.
  #[error("unsupported archive layout: members {members:?}")]
  UnsupportedLayout { members: Vec<String> },

  /// Two members share a data file's base name, e.g. `a/language.csv` and
  /// `b/language.csv`.
  #[error("archive has more than one member named {0:?}")]
  DuplicateMember(String),

  #[error("archive has no member named {0:?}")]
  MissingMember(String),

  #[error("{file} is missing column {column:?}")]
  MissingColumn { file: String, column: String },

  /// A wide-export feature column not of the form `<id> <name>`.
  #[error("malformed feature column header: {0:?}")]
  MalformedFeatureHeader(String),

  /// A wide-export cell not of the form `<value_id> <description>`.
  #[error("malformed cell for language {wals_code:?}, feature {feature_id:?}: {cell:?}")]
  MalformedCell {
    wals_code:  String,
    feature_id: String,
    cell:       String,
  },
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
