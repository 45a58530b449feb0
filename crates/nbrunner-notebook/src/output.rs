use serde::{Deserialize, Serialize};

use crate::Metadata;
use crate::text::MultilineString;

/// An output recorded on a code cell.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "output_type", rename_all = "snake_case")]
pub enum Output {
  Stream {
    name: String,
    text: MultilineString,
  },
  DisplayData {
    data: Metadata,
    #[serde(default)]
    metadata: Metadata,
  },
  ExecuteResult {
    execution_count: Option<u32>,
    data: Metadata,
    #[serde(default)]
    metadata: Metadata,
  },
  Error {
    ename: String,
    evalue: String,
    traceback: Vec<String>,
  },
}

impl Output {
  pub fn stream(name: impl Into<String>, text: impl Into<MultilineString>) -> Self {
    Self::Stream {
      name: name.into(),
      text: text.into(),
    }
  }

  /// A plain-text `execute_result`, the value of a cell's trailing expression.
  pub fn execute_result(execution_count: Option<u32>, text: impl Into<String>) -> Self {
    let mut data = Metadata::new();
    data.insert("text/plain".to_string(), serde_json::Value::String(text.into()));
    Self::ExecuteResult {
      execution_count,
      data,
      metadata: Metadata::new(),
    }
  }

  pub fn error(ename: impl Into<String>, evalue: impl Into<String>, traceback: Vec<String>) -> Self {
    Self::Error {
      ename: ename.into(),
      evalue: evalue.into(),
      traceback,
    }
  }

  pub fn is_error(&self) -> bool {
    matches!(self, Self::Error { .. })
  }
}
