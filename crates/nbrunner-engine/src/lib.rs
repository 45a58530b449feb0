//! nbrunner Engine
//!
//! This crate defines the contract between the runner and whatever actually
//! evaluates notebook cells. The runner hands an [`ExecutionEngine`] a parsed
//! [`Notebook`](nbrunner_notebook::Notebook) plus an [`ExecutionContext`]; the
//! engine executes the cells in order, recording outputs on the document as it
//! goes, and stops at the first failing cell.
//!
//! Failures come in two flavours:
//! - [`EngineError::Cell`] - a cell raised or timed out. The document holds the
//!   error output and the batch is expected to carry on.
//! - [`EngineError::Kernel`] - the engine itself could not do its job (the
//!   interpreter could not be started, pipes broke, ...).
//!
//! [`ProcessEngine`] is the built-in implementation. It starts one `python3`
//! process per run and feeds it the code cells one at a time, so cells share
//! state the way they do in a notebook kernel.

mod context;
mod driver;
mod engine;
mod error;
mod kernel;
mod process;

pub use context::{DEFAULT_CELL_TIMEOUT, ExecutionContext};
pub use engine::ExecutionEngine;
pub use error::{CellFailure, EngineError, FailureKind};
pub use process::{KernelCommand, ProcessEngine};
