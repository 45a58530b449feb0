use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::Metadata;
use crate::cell::Cell;
use crate::error::NotebookError;

/// Major format version this crate reads and writes.
pub const NBFORMAT: u32 = 4;
/// Minor format version written for new documents.
pub const NBFORMAT_MINOR: u32 = 5;

/// A notebook document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Notebook {
  pub cells: Vec<Cell>,
  #[serde(default)]
  pub metadata: Metadata,
  pub nbformat: u32,
  pub nbformat_minor: u32,
}

impl Default for Notebook {
  fn default() -> Self {
    Self::new(Vec::new())
  }
}

impl Notebook {
  pub fn new(cells: Vec<Cell>) -> Self {
    Self {
      cells,
      metadata: Metadata::new(),
      nbformat: NBFORMAT,
      nbformat_minor: NBFORMAT_MINOR,
    }
  }

  /// Read and parse a notebook from disk.
  pub async fn read(path: impl AsRef<Path>) -> Result<Self, NotebookError> {
    let path = path.as_ref();
    let content = tokio::fs::read_to_string(path)
      .await
      .map_err(|source| NotebookError::Io {
        path: path.to_path_buf(),
        source,
      })?;
    Self::parse(&content, path)
  }

  /// Parse a notebook from JSON text. `origin` is only used in error messages.
  pub fn parse(content: &str, origin: impl AsRef<Path>) -> Result<Self, NotebookError> {
    let origin = origin.as_ref();
    let parse_err = |source| NotebookError::Parse {
      path: origin.to_path_buf(),
      source,
    };

    let value: serde_json::Value = serde_json::from_str(content).map_err(parse_err)?;
    match value.get("nbformat") {
      Some(v) if v.as_u64() == Some(u64::from(NBFORMAT)) => {}
      Some(v) => {
        return Err(NotebookError::UnsupportedVersion {
          path: origin.to_path_buf(),
          version: v.to_string(),
        });
      }
      // let serde report the missing field
      None => {}
    }

    serde_json::from_value(value).map_err(parse_err)
  }

  /// Serialize the notebook the way nbformat lays it out on disk.
  pub fn to_bytes(&self) -> Result<Vec<u8>, NotebookError> {
    let mut buf = Vec::new();
    let formatter = serde_json::ser::PrettyFormatter::with_indent(b" ");
    let mut serializer = serde_json::Serializer::with_formatter(&mut buf, formatter);
    self
      .serialize(&mut serializer)
      .map_err(NotebookError::Serialize)?;
    buf.push(b'\n');
    Ok(buf)
  }

  /// Write the notebook to `path`, replacing any existing file.
  ///
  /// The parent directory must already exist.
  pub async fn write(&self, path: impl AsRef<Path>) -> Result<(), NotebookError> {
    let path = path.as_ref();
    let bytes = self.to_bytes()?;
    tokio::fs::write(path, bytes)
      .await
      .map_err(|source| NotebookError::Io {
        path: path.to_path_buf(),
        source,
      })
  }

  /// Kernel name declared in the notebook metadata, if any.
  pub fn kernel_name(&self) -> Option<&str> {
    self
      .metadata
      .get("kernelspec")
      .and_then(|spec| spec.get("name"))
      .and_then(|name| name.as_str())
  }

  pub fn code_cell_count(&self) -> usize {
    self.cells.iter().filter(|c| c.as_code().is_some()).count()
  }
}

#[cfg(test)]
mod tests {
  use serde_json::json;

  use super::*;
  use crate::output::Output;

  const SAMPLE: &str = r##"{
 "cells": [
  {
   "cell_type": "markdown",
   "metadata": {},
   "source": ["# Title\n", "text"]
  },
  {
   "cell_type": "code",
   "execution_count": 3,
   "id": "abc",
   "metadata": {"tags": ["parameters"]},
   "outputs": [
    {"output_type": "stream", "name": "stdout", "text": "hi\n"}
   ],
   "source": "print('hi')"
  }
 ],
 "metadata": {
  "kernelspec": {"name": "python3", "display_name": "Python 3", "language": "python"},
  "custom": {"keep": true}
 },
 "nbformat": 4,
 "nbformat_minor": 5
}"##;

  #[test]
  fn test_parse_sample() {
    let nb = Notebook::parse(SAMPLE, "sample.ipynb").unwrap();
    assert_eq!(nb.cells.len(), 2);
    assert_eq!(nb.code_cell_count(), 1);
    assert_eq!(nb.kernel_name(), Some("python3"));

    let code = nb.cells[1].as_code().unwrap();
    assert_eq!(code.execution_count, Some(3));
    assert_eq!(code.id.as_deref(), Some("abc"));
    assert_eq!(code.source.as_str(), "print('hi')");
    assert_eq!(code.outputs, vec![Output::stream("stdout", "hi\n")]);
  }

  #[test]
  fn test_roundtrip_preserves_metadata() {
    let nb = Notebook::parse(SAMPLE, "sample.ipynb").unwrap();
    let bytes = nb.to_bytes().unwrap();
    let text = String::from_utf8(bytes).unwrap();

    assert!(text.ends_with("}\n"));
    assert!(text.starts_with("{\n \"cells\""));

    let again = Notebook::parse(&text, "again.ipynb").unwrap();
    assert_eq!(again, nb);
    assert_eq!(again.metadata["custom"], json!({"keep": true}));
  }

  #[test]
  fn test_rejects_old_format() {
    let err = Notebook::parse(r#"{"nbformat": 3, "worksheets": []}"#, "old.ipynb").unwrap_err();
    assert!(matches!(err, NotebookError::UnsupportedVersion { .. }));
  }

  #[test]
  fn test_rejects_malformed_json() {
    let err = Notebook::parse("{not json", "bad.ipynb").unwrap_err();
    assert!(matches!(err, NotebookError::Parse { .. }));
    assert!(err.to_string().contains("bad.ipynb"));
  }

  #[test]
  fn test_rejects_unknown_cell_type() {
    let content = r#"{"cells": [{"cell_type": "widget", "source": ""}], "metadata": {}, "nbformat": 4, "nbformat_minor": 5}"#;
    let err = Notebook::parse(content, "x.ipynb").unwrap_err();
    assert!(matches!(err, NotebookError::Parse { .. }));
  }

  #[tokio::test]
  async fn test_write_then_read() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("out.ipynb");

    let mut nb = Notebook::new(vec![Cell::markdown("# hi"), Cell::code("1 + 1")]);
    if let Some(code) = nb.cells[1].as_code_mut() {
      code.execution_count = Some(1);
      code.outputs.push(Output::error("ValueError", "bad", vec!["line 1".into()]));
    }
    nb.write(&path).await.unwrap();

    let read = Notebook::read(&path).await.unwrap();
    assert_eq!(read, nb);
    assert!(read.cells[1].as_code().unwrap().has_error());
  }

  #[tokio::test]
  async fn test_read_missing_file() {
    let dir = tempfile::tempdir().unwrap();
    let err = Notebook::read(dir.path().join("missing.ipynb")).await.unwrap_err();
    assert!(matches!(err, NotebookError::Io { .. }));
  }
}
