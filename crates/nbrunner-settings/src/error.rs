use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum SettingsError {
  /// A required field has no value and the resolver could not supply one.
  #[error("missing required setting '{field}' (set {var})")]
  Missing { field: &'static str, var: String },

  #[error("invalid boolean for {var}: '{value}'")]
  InvalidBool { var: String, value: String },

  #[error("failed to load env file {path}: {source}")]
  EnvFile {
    path: PathBuf,
    #[source]
    source: dotenvy::Error,
  },

  #[error("failed to determine working directory: {0}")]
  WorkingDir(#[source] std::io::Error),

  #[error("failed to read {field} from prompt: {source}")]
  Prompt {
    field: &'static str,
    #[source]
    source: std::io::Error,
  },
}
