//! nbrunner Runner
//!
//! This crate runs a batch of notebooks, one after another, and reports how
//! many of them made it to the end.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                      NotebookRunner                         │
//! │  - run_batch(specs, output_dir, reporter) → BatchSummary    │
//! │  - one fresh RunId per spec, strictly sequential            │
//! └─────────────────────────────────────────────────────────────┘
//!                               │
//!                               ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │                  NotebookRunner::execute_one                │
//! │  - binds the config env var (RunContext guard)              │
//! │  - parses the notebook, runs it, always writes the artifact │
//! │  - cell failures become RunOutcome::Failed                  │
//! └─────────────────────────────────────────────────────────────┘
//!                               │
//!                               ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │                      ExecutionEngine                        │
//! │  - evaluates cells, mutating the document in place          │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! Cell failures are routine and never stop the batch. Anything else
//! (missing notebook, malformed document, unwritable output directory, a
//! broken kernel) is returned as a [`RunnerError`] and ends the batch before
//! a summary is printed.

mod context;
mod error;
mod outcome;
mod report;
mod run_id;
mod runner;

pub use context::RunContext;
pub use error::{ContextError, RunnerError};
pub use outcome::{BatchSummary, RunOutcome, RunRecord};
pub use report::{Reporter, SEPARATOR_WIDTH};
pub use run_id::RunId;
pub use runner::{DEFAULT_CONFIG_ENV_KEY, NotebookRunner, RunnerConfig, artifact_path};
