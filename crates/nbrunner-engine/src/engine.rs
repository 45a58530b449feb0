use async_trait::async_trait;
use nbrunner_notebook::Notebook;

use crate::context::ExecutionContext;
use crate::error::EngineError;

/// Executes the code cells of a notebook document.
///
/// Implementations mutate `notebook` in place: execution counts and outputs
/// are recorded as each cell runs, so the document reflects partial progress
/// even when `run` returns an error.
#[async_trait]
pub trait ExecutionEngine: Send + Sync {
  async fn run(&self, notebook: &mut Notebook, ctx: &ExecutionContext) -> Result<(), EngineError>;
}

