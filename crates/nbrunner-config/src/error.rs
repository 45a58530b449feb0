use std::path::PathBuf;

use thiserror::Error;

/// Errors that can occur while loading a batch configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
  /// The config file could not be read.
  #[error("failed to read batch config {path}: {source}")]
  Read {
    path: PathBuf,
    #[source]
    source: std::io::Error,
  },

  /// The config file is not a list of valid run entries.
  #[error("failed to parse batch config {path}: {message}")]
  Parse { path: PathBuf, message: String },

  /// The current working directory could not be determined.
  #[error("failed to determine working directory: {0}")]
  WorkingDir(#[source] std::io::Error),
}
