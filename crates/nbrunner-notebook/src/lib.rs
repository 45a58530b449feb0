//! nbrunner Notebook
//!
//! This crate provides the in-memory representation of a notebook document
//! (nbformat v4) and the read/write operations the runner needs. Only the
//! parts of the format the runner touches are typed; everything else in the
//! document metadata is carried through untouched.

mod cell;
mod error;
mod notebook;
mod output;
mod text;

pub use cell::{Cell, CodeCell, TextCell};
pub use error::NotebookError;
pub use notebook::{NBFORMAT, NBFORMAT_MINOR, Notebook};
pub use output::Output;
pub use text::MultilineString;

/// Free-form JSON object used for notebook, cell and output metadata.
pub type Metadata = serde_json::Map<String, serde_json::Value>;
