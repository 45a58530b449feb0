//! The notebook execution loop.

use std::io::Write;
use std::path::{Path, PathBuf};
use std::time::Duration;

use nbrunner_config::RunSpec;
use nbrunner_engine::{DEFAULT_CELL_TIMEOUT, EngineError, ExecutionContext, ExecutionEngine};
use nbrunner_notebook::Notebook;
use tracing::{error, info, instrument, warn};

use crate::context::RunContext;
use crate::error::RunnerError;
use crate::outcome::{BatchSummary, RunOutcome, RunRecord};
use crate::report::Reporter;
use crate::run_id::RunId;

/// Environment variable notebooks read to find their config/credentials file.
pub const DEFAULT_CONFIG_ENV_KEY: &str = "DS_CONFIG_FILE";

/// Configuration for the runner.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunnerConfig {
  /// Environment variable bound to the run's config path.
  pub config_env_key: String,
  /// Upper bound on a single cell's execution.
  pub cell_timeout: Duration,
}

impl Default for RunnerConfig {
  fn default() -> Self {
    Self {
      config_env_key: DEFAULT_CONFIG_ENV_KEY.to_string(),
      cell_timeout: DEFAULT_CELL_TIMEOUT,
    }
  }
}

/// Runs notebooks through an [`ExecutionEngine`], one at a time.
pub struct NotebookRunner<E> {
  engine: E,
  config: RunnerConfig,
}

impl<E: ExecutionEngine> NotebookRunner<E> {
  pub fn new(engine: E, config: RunnerConfig) -> Self {
    Self { engine, config }
  }

  pub fn engine(&self) -> &E {
    &self.engine
  }

  pub fn config(&self) -> &RunnerConfig {
    &self.config
  }

  /// Execute one notebook and persist the result.
  ///
  /// The config env var is bound for the whole call and released on every
  /// exit path. Once the notebook has been parsed, its artifact is written no
  /// matter how execution went. A cell failure is reported as
  /// [`RunOutcome::Failed`]; every other error is returned after the artifact
  /// write.
  #[instrument(
    name = "notebook_run",
    skip_all,
    fields(
      run_id = %run_id,
      notebook = %notebook_path.display(),
    )
  )]
  pub async fn execute_one(
    &self,
    run_id: &RunId,
    notebook_path: &Path,
    config_path: &Path,
    output_dir: &Path,
  ) -> Result<RunRecord, RunnerError> {
    let _context = RunContext::bind(&self.config.config_env_key, config_path)?;

    let mut notebook = Notebook::read(notebook_path).await?;

    let ctx = ExecutionContext::new(working_dir(notebook_path))
      .with_timeout(self.config.cell_timeout)
      .with_config(&self.config.config_env_key, config_path);
    info!(config = %config_path.display(), cells = notebook.cells.len(), "run started");

    let executed = self.engine.run(&mut notebook, &ctx).await;

    let output_path = artifact_path(notebook_path, run_id, output_dir);
    notebook.write(&output_path).await?;

    let outcome = match executed {
      Ok(()) => {
        info!(output_path = %output_path.display(), "run succeeded");
        RunOutcome::Success(notebook)
      }
      Err(EngineError::Cell(failure)) => {
        warn!(
          output_path = %output_path.display(),
          error = %failure,
          "run failed, traceback saved in output notebook"
        );
        RunOutcome::Failed { notebook, failure }
      }
      Err(e) => {
        error!(output_path = %output_path.display(), error = %e, "run aborted");
        return Err(e.into());
      }
    };

    Ok(RunRecord {
      run_id: *run_id,
      output_path,
      outcome,
    })
  }

  /// Execute every run in order and report the tally.
  ///
  /// The first error other than a cell failure stops the batch; no summary
  /// is printed in that case.
  pub async fn run_batch<W: Write>(
    &self,
    runs: &[RunSpec],
    output_dir: &Path,
    reporter: &mut Reporter<W>,
  ) -> Result<BatchSummary, RunnerError> {
    tokio::fs::create_dir_all(output_dir)
      .await
      .map_err(|source| RunnerError::OutputDir {
        path: output_dir.to_path_buf(),
        source,
      })?;

    info!(runs = runs.len(), output_dir = %output_dir.display(), "batch started");

    let mut summary = BatchSummary::default();
    for spec in runs {
      let run_id = RunId::new();
      reporter.run_started(&run_id, spec)?;

      let record = self
        .execute_one(&run_id, &spec.path, &spec.config_path, output_dir)
        .await?;

      let success = record.outcome.is_success();
      if !success {
        reporter.run_failed(&record.run_id, &record.output_path)?;
      }
      summary.record(success);
    }

    info!(
      successful = summary.successful(),
      total = summary.total(),
      "batch completed"
    );
    reporter.summary(&summary)?;

    Ok(summary)
  }
}

/// Where the artifact of `run_id` for `notebook_path` is written:
/// `{output_dir}/{notebook stem}_{run_id}.ipynb`.
pub fn artifact_path(notebook_path: &Path, run_id: &RunId, output_dir: &Path) -> PathBuf {
  let stem = notebook_path
    .file_stem()
    .map(|s| s.to_string_lossy())
    .unwrap_or_default();
  output_dir.join(format!("{}_{}.ipynb", stem, run_id))
}

/// Directory a notebook's relative paths resolve against.
fn working_dir(notebook_path: &Path) -> PathBuf {
  match notebook_path.parent() {
    Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
    _ => PathBuf::from("."),
  }
}
