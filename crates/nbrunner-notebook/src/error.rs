use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum NotebookError {
  #[error("notebook io error at {path}: {source}")]
  Io {
    path: PathBuf,
    #[source]
    source: std::io::Error,
  },

  #[error("malformed notebook {path}: {source}")]
  Parse {
    path: PathBuf,
    #[source]
    source: serde_json::Error,
  },

  #[error("unsupported notebook format in {path}: nbformat {version}")]
  UnsupportedVersion { path: PathBuf, version: String },

  #[error("failed to serialize notebook: {0}")]
  Serialize(#[source] serde_json::Error),
}
