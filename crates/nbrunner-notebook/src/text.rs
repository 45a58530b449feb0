use std::fmt;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Text stored in a notebook as either one string or a list of lines.
///
/// Reading accepts both forms. Writing always produces a list of lines, each
/// keeping its trailing newline, which is what nbformat itself writes.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MultilineString(String);

impl MultilineString {
  pub fn as_str(&self) -> &str {
    &self.0
  }

  pub fn is_blank(&self) -> bool {
    self.0.trim().is_empty()
  }

  pub fn lines(&self) -> impl Iterator<Item = &str> {
    self.0.split_inclusive('\n')
  }
}

impl From<String> for MultilineString {
  fn from(value: String) -> Self {
    Self(value)
  }
}

impl From<&str> for MultilineString {
  fn from(value: &str) -> Self {
    Self(value.to_string())
  }
}

impl fmt::Display for MultilineString {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(&self.0)
  }
}

impl Serialize for MultilineString {
  fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.collect_seq(self.lines())
  }
}

impl<'de> Deserialize<'de> for MultilineString {
  fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Repr {
      One(String),
      Many(Vec<String>),
    }

    Ok(match Repr::deserialize(deserializer)? {
      Repr::One(s) => Self(s),
      Repr::Many(lines) => Self(lines.concat()),
    })
  }
}
