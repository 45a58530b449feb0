use serde::{Deserialize, Serialize};

use crate::Metadata;
use crate::output::Output;
use crate::text::MultilineString;

/// One unit of a notebook document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "cell_type", rename_all = "lowercase")]
pub enum Cell {
  Code(CodeCell),
  Markdown(TextCell),
  Raw(TextCell),
}

impl Cell {
  pub fn code(source: impl Into<MultilineString>) -> Self {
    Self::Code(CodeCell::new(source))
  }

  pub fn markdown(source: impl Into<MultilineString>) -> Self {
    Self::Markdown(TextCell::new(source))
  }

  pub fn source(&self) -> &MultilineString {
    match self {
      Self::Code(cell) => &cell.source,
      Self::Markdown(cell) | Self::Raw(cell) => &cell.source,
    }
  }

  pub fn as_code(&self) -> Option<&CodeCell> {
    match self {
      Self::Code(cell) => Some(cell),
      _ => None,
    }
  }

  pub fn as_code_mut(&mut self) -> Option<&mut CodeCell> {
    match self {
      Self::Code(cell) => Some(cell),
      _ => None,
    }
  }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CodeCell {
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub id: Option<String>,
  pub execution_count: Option<u32>,
  #[serde(default)]
  pub metadata: Metadata,
  #[serde(default)]
  pub outputs: Vec<Output>,
  pub source: MultilineString,
}

impl CodeCell {
  pub fn new(source: impl Into<MultilineString>) -> Self {
    Self {
      id: None,
      execution_count: None,
      metadata: Metadata::new(),
      outputs: Vec::new(),
      source: source.into(),
    }
  }

  /// Drop any outputs and execution count left over from a previous run.
  pub fn clear(&mut self) {
    self.execution_count = None;
    self.outputs.clear();
  }

  pub fn has_error(&self) -> bool {
    self.outputs.iter().any(Output::is_error)
  }
}

/// A markdown or raw cell.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextCell {
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub id: Option<String>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub attachments: Option<serde_json::Value>,
  #[serde(default)]
  pub metadata: Metadata,
  pub source: MultilineString,
}

impl TextCell {
  pub fn new(source: impl Into<MultilineString>) -> Self {
    Self {
      id: None,
      attachments: None,
      metadata: Metadata::new(),
      source: source.into(),
    }
  }
}
