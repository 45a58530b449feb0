//! Process-backed notebook execution.

use std::time::Duration;

use async_trait::async_trait;
use nbrunner_notebook::{CodeCell, Notebook, Output};
use tracing::{debug, info, instrument, warn};

use crate::context::ExecutionContext;
use crate::driver::CellReply;
use crate::engine::ExecutionEngine;
use crate::error::{CellFailure, EngineError, FailureKind};
use crate::kernel::KernelSession;

/// The interpreter that hosts a run's cells.
///
/// It is started as `program args... -c <driver>`, so it must accept a
/// program via `-c` the way CPython does.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KernelCommand {
  pub program: String,
  pub args: Vec<String>,
}

impl KernelCommand {
  pub fn new(program: impl Into<String>, args: impl IntoIterator<Item = impl Into<String>>) -> Self {
    Self {
      program: program.into(),
      args: args.into_iter().map(Into::into).collect(),
    }
  }
}

impl Default for KernelCommand {
  fn default() -> Self {
    Self::new("python3", Vec::<String>::new())
  }
}

/// Runs a notebook's code cells in one interpreter process.
///
/// Cells execute in document order inside the notebook's working directory
/// and share a single namespace, so names bound by one cell are visible to
/// the cells after it. A fresh process is started for every run and is
/// killed when a cell exceeds the timeout.
pub struct ProcessEngine {
  kernel: KernelCommand,
}

impl ProcessEngine {
  pub fn new(kernel: KernelCommand) -> Self {
    Self { kernel }
  }

  pub fn kernel(&self) -> &KernelCommand {
    &self.kernel
  }
}

impl Default for ProcessEngine {
  fn default() -> Self {
    Self::new(KernelCommand::default())
  }
}

#[async_trait]
impl ExecutionEngine for ProcessEngine {
  #[instrument(
    name = "notebook_execute",
    skip(self, notebook, ctx),
    fields(
      kernel = %self.kernel.program,
      working_dir = %ctx.working_dir.display(),
    )
  )]
  async fn run(&self, notebook: &mut Notebook, ctx: &ExecutionContext) -> Result<(), EngineError> {
    if let Some(name) = notebook.kernel_name() {
      debug!(kernelspec = %name, "notebook kernelspec");
    }

    for cell in notebook.cells.iter_mut().filter_map(|c| c.as_code_mut()) {
      cell.clear();
    }

    let mut session = KernelSession::start(&self.kernel, ctx)?;

    let mut execution_count = 0;
    for (cell_index, cell) in notebook.cells.iter_mut().enumerate() {
      let Some(code) = cell.as_code_mut() else {
        continue;
      };
      if code.source.is_blank() {
        continue;
      }

      execution_count += 1;
      code.execution_count = Some(execution_count);
      debug!(cell_index, execution_count, "executing cell");

      let executed = tokio::time::timeout(ctx.timeout, session.execute(code.source.as_str())).await;
      let failure = match executed {
        Ok(reply) => record_reply(code, cell_index, reply?),
        Err(_) => {
          session.kill().await;
          Some(timeout_failure(cell_index, ctx.timeout))
        }
      };

      if let Some(failure) = failure {
        warn!(cell_index, error = %failure, "cell failed");
        code.outputs.push(Output::error(
          failure.ename.clone(),
          failure.evalue.clone(),
          failure.traceback.clone(),
        ));
        session.shutdown().await;
        return Err(EngineError::Cell(failure));
      }
    }

    session.shutdown().await;
    info!(cells_executed = execution_count, "notebook executed");
    Ok(())
  }
}

/// Attach a reply's outputs to `code`; returns the failure if the cell raised.
fn record_reply(code: &mut CodeCell, cell_index: usize, reply: CellReply) -> Option<CellFailure> {
  let (stdout, stderr) = match &reply {
    CellReply::Ok { stdout, stderr, .. } | CellReply::Error { stdout, stderr, .. } => (stdout, stderr),
  };
  if !stdout.is_empty() {
    code.outputs.push(Output::stream("stdout", stdout.clone()));
  }
  if !stderr.is_empty() {
    code.outputs.push(Output::stream("stderr", stderr.clone()));
  }

  match reply {
    CellReply::Ok { result, .. } => {
      if let Some(text) = result {
        code.outputs.push(Output::execute_result(code.execution_count, text));
      }
      None
    }
    CellReply::Error {
      ename,
      evalue,
      traceback,
      ..
    } => Some(CellFailure {
      cell_index,
      kind: FailureKind::Error,
      ename,
      evalue,
      traceback,
    }),
  }
}

fn timeout_failure(cell_index: usize, timeout: Duration) -> CellFailure {
  let evalue = format!("cell execution timed out after {}s", timeout.as_secs_f64());
  CellFailure {
    cell_index,
    kind: FailureKind::Timeout,
    ename: "CellTimeoutError".to_string(),
    traceback: vec![evalue.clone()],
    evalue,
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_default_kernel_is_python() {
    let engine = ProcessEngine::default();
    assert_eq!(engine.kernel().program, "python3");
    assert!(engine.kernel().args.is_empty());
  }

  #[test]
  fn test_record_ok_reply() {
    let mut code = CodeCell::new("print('hi'); 1 + 1");
    code.execution_count = Some(4);
    let reply = CellReply::Ok {
      stdout: "hi\n".to_string(),
      stderr: String::new(),
      result: Some("2".to_string()),
    };

    assert_eq!(record_reply(&mut code, 0, reply), None);
    assert_eq!(
      code.outputs,
      vec![Output::stream("stdout", "hi\n"), Output::execute_result(Some(4), "2")]
    );
  }

  #[test]
  fn test_record_error_reply() {
    let mut code = CodeCell::new("raise KeyError('k')");
    let reply = CellReply::Error {
      stdout: String::new(),
      stderr: "warned\n".to_string(),
      ename: "KeyError".to_string(),
      evalue: "'k'".to_string(),
      traceback: vec!["KeyError: 'k'".to_string()],
    };

    let failure = record_reply(&mut code, 3, reply).unwrap();
    assert_eq!(failure.cell_index, 3);
    assert_eq!(failure.kind, FailureKind::Error);
    assert_eq!(failure.ename, "KeyError");
    assert_eq!(code.outputs, vec![Output::stream("stderr", "warned\n")]);
  }

  #[test]
  fn test_timeout_failure() {
    let failure = timeout_failure(1, Duration::from_millis(1500));
    assert_eq!(failure.kind, FailureKind::Timeout);
    assert_eq!(failure.evalue, "cell execution timed out after 1.5s");
  }
}
