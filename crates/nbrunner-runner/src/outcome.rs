use std::fmt;
use std::path::PathBuf;

use nbrunner_engine::CellFailure;
use nbrunner_notebook::Notebook;

use crate::run_id::RunId;

/// How a single notebook run ended.
#[derive(Debug, Clone, PartialEq)]
pub enum RunOutcome {
  /// Every cell executed without error.
  Success(Notebook),
  /// A cell failed; `notebook` holds everything up to and including it.
  Failed {
    notebook: Notebook,
    failure: CellFailure,
  },
}

impl RunOutcome {
  pub fn is_success(&self) -> bool {
    matches!(self, Self::Success(_))
  }

  pub fn notebook(&self) -> &Notebook {
    match self {
      Self::Success(notebook) | Self::Failed { notebook, .. } => notebook,
    }
  }

  pub fn failure(&self) -> Option<&CellFailure> {
    match self {
      Self::Success(_) => None,
      Self::Failed { failure, .. } => Some(failure),
    }
  }
}

/// A finished run and where its artifact was written.
#[derive(Debug, Clone, PartialEq)]
pub struct RunRecord {
  pub run_id: RunId,
  pub output_path: PathBuf,
  pub outcome: RunOutcome,
}

/// Success and total counts for a batch.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BatchSummary {
  successful: usize,
  total: usize,
}

impl BatchSummary {
  pub fn record(&mut self, success: bool) {
    self.total += 1;
    if success {
      self.successful += 1;
    }
  }

  pub fn successful(&self) -> usize {
    self.successful
  }

  pub fn total(&self) -> usize {
    self.total
  }

  pub fn failed(&self) -> usize {
    self.total - self.successful
  }

  pub fn all_succeeded(&self) -> bool {
    self.successful == self.total
  }
}

impl fmt::Display for BatchSummary {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "Successful runs: {}/{}", self.successful, self.total)
  }
}

#[cfg(test)]
mod tests {
  use nbrunner_engine::FailureKind;

  use super::*;

  #[test]
  fn test_summary_counts() {
    let mut summary = BatchSummary::default();
    assert!(summary.all_succeeded());

    summary.record(true);
    summary.record(false);
    summary.record(true);

    assert_eq!(summary.successful(), 2);
    assert_eq!(summary.total(), 3);
    assert_eq!(summary.failed(), 1);
    assert!(!summary.all_succeeded());
    assert_eq!(summary.to_string(), "Successful runs: 2/3");
  }

  #[test]
  fn test_outcome_accessors() {
    let failure = CellFailure {
      cell_index: 1,
      kind: FailureKind::Error,
      ename: "ValueError".to_string(),
      evalue: "boom".to_string(),
      traceback: vec![],
    };
    let failed = RunOutcome::Failed {
      notebook: Notebook::default(),
      failure: failure.clone(),
    };

    assert!(!failed.is_success());
    assert_eq!(failed.failure(), Some(&failure));
    assert!(RunOutcome::Success(Notebook::default()).failure().is_none());
  }
}
