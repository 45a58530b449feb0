//! A live interpreter process serving one notebook run.

use std::process::Stdio;
use std::time::Duration;

use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader, Lines};
use tokio::process::{Child, ChildStdin, ChildStdout, Command};
use tracing::{debug, warn};

use crate::context::ExecutionContext;
use crate::driver::{CellReply, CellRequest, DRIVER_SOURCE};
use crate::error::EngineError;
use crate::process::KernelCommand;

/// How long a kernel gets to exit once its input is closed.
const SHUTDOWN_GRACE: Duration = Duration::from_secs(5);

/// One interpreter process shared by every cell of a run.
///
/// The child is killed when the session is dropped.
pub(crate) struct KernelSession {
  child: Child,
  requests: Option<ChildStdin>,
  replies: Lines<BufReader<ChildStdout>>,
}

impl KernelSession {
  pub(crate) fn start(kernel: &KernelCommand, ctx: &ExecutionContext) -> Result<Self, EngineError> {
    let mut command = Command::new(&kernel.program);
    command
      .args(&kernel.args)
      .arg("-c")
      .arg(DRIVER_SOURCE)
      .current_dir(&ctx.working_dir)
      .stdin(Stdio::piped())
      .stdout(Stdio::piped())
      .stderr(Stdio::inherit())
      .kill_on_drop(true);
    if let Some((key, path)) = ctx.config_env() {
      command.env(key, path);
    }

    let mut child = command
      .spawn()
      .map_err(|e| EngineError::kernel(format!("failed to start '{}': {}", kernel.program, e)))?;
    let requests = child
      .stdin
      .take()
      .ok_or_else(|| EngineError::kernel("kernel stdin was not captured"))?;
    let replies = child
      .stdout
      .take()
      .ok_or_else(|| EngineError::kernel("kernel stdout was not captured"))?;

    debug!(pid = child.id(), "kernel started");
    Ok(Self {
      child,
      requests: Some(requests),
      replies: BufReader::new(replies).lines(),
    })
  }

  /// Send one cell and wait for its reply.
  pub(crate) async fn execute(&mut self, source: &str) -> Result<CellReply, EngineError> {
    let mut line = serde_json::to_string(&CellRequest { source })
      .map_err(|e| EngineError::kernel(format!("failed to encode cell: {}", e)))?;
    line.push('\n');

    let requests = self
      .requests
      .as_mut()
      .ok_or_else(|| EngineError::kernel("kernel input is closed"))?;
    let sent = async {
      requests.write_all(line.as_bytes()).await?;
      requests.flush().await
    }
    .await;
    if let Err(e) = sent {
      return Err(self.died(format!("failed to send cell: {}", e)));
    }

    let reply = match self.replies.next_line().await {
      Ok(Some(reply)) => reply,
      Ok(None) => return Err(self.died("kernel exited while executing a cell".to_string())),
      Err(e) => return Err(self.died(format!("failed to read kernel reply: {}", e))),
    };
    serde_json::from_str(&reply)
      .map_err(|e| EngineError::kernel(format!("malformed kernel reply: {}", e)))
  }

  /// Close the kernel's input and give it a moment to exit on its own.
  pub(crate) async fn shutdown(&mut self) {
    drop(self.requests.take());
    match tokio::time::timeout(SHUTDOWN_GRACE, self.child.wait()).await {
      Ok(Ok(status)) => debug!(%status, "kernel exited"),
      Ok(Err(e)) => warn!(error = %e, "failed to wait for kernel"),
      Err(_) => {
        warn!("kernel still running after its input closed");
        self.kill().await;
      }
    }
  }

  /// Kill the kernel outright, e.g. after a cell timed out.
  pub(crate) async fn kill(&mut self) {
    drop(self.requests.take());
    if let Err(e) = self.child.kill().await {
      warn!(error = %e, "failed to kill kernel");
    }
  }

  fn died(&mut self, message: String) -> EngineError {
    match self.child.try_wait() {
      Ok(Some(status)) => EngineError::kernel(format!("{} ({})", message, status)),
      _ => EngineError::kernel(message),
    }
  }
}
