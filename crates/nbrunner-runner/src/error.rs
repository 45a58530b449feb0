use std::path::PathBuf;

use nbrunner_engine::EngineError;
use nbrunner_notebook::NotebookError;
use thiserror::Error;

/// Errors binding the per-run execution context.
#[derive(Debug, Error)]
pub enum ContextError {
  #[error("execution context '{key}' is already bound by another run")]
  AlreadyBound { key: String },

  #[error("invalid environment variable name '{key}'")]
  InvalidKey { key: String },
}

/// Errors that end a batch.
#[derive(Debug, Error)]
pub enum RunnerError {
  #[error(transparent)]
  Context(#[from] ContextError),

  #[error(transparent)]
  Notebook(#[from] NotebookError),

  /// The engine failed for a reason other than a cell error.
  #[error("notebook engine failed: {0}")]
  Engine(#[from] EngineError),

  #[error("failed to create output directory {path}: {source}")]
  OutputDir {
    path: PathBuf,
    #[source]
    source: std::io::Error,
  },

  #[error("failed to write report: {0}")]
  Report(#[from] std::io::Error),
}
