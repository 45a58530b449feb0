//! Engine error types.

use std::fmt;

/// Why a cell stopped the notebook.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
  /// The cell's code raised an error.
  Error,
  /// The cell ran past the configured timeout.
  Timeout,
}

/// A failed cell, as recorded in the document's error output.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CellFailure {
  /// Position of the cell in the notebook (counting all cell types).
  pub cell_index: usize,
  pub kind: FailureKind,
  pub ename: String,
  pub evalue: String,
  pub traceback: Vec<String>,
}

impl fmt::Display for CellFailure {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "cell {}: {}: {}", self.cell_index, self.ename, self.evalue)
  }
}

/// Errors that can occur while executing a notebook.
#[derive(Debug, thiserror::Error)]
pub enum EngineError {
  /// A cell failed. The notebook holds the error output.
  #[error("cell execution failed: {0}")]
  Cell(CellFailure),

  /// The engine could not execute the notebook at all.
  #[error("kernel error: {message}")]
  Kernel { message: String },
}

impl EngineError {
  pub fn kernel(message: impl Into<String>) -> Self {
    Self::Kernel {
      message: message.into(),
    }
  }
}
