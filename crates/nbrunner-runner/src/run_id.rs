use std::fmt;

use uuid::Uuid;

/// Unique identifier of one notebook run, shown as 32 hex characters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RunId(Uuid);

impl RunId {
  pub fn new() -> Self {
    Self(Uuid::new_v4())
  }
}

impl Default for RunId {
  fn default() -> Self {
    Self::new()
  }
}

impl fmt::Display for RunId {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{}", self.0.simple())
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_display_is_plain_hex() {
    let id = RunId::new().to_string();
    assert_eq!(id.len(), 32);
    assert!(id.chars().all(|c| c.is_ascii_hexdigit() && !c.is_ascii_uppercase()));
  }

  #[test]
  fn test_ids_are_unique() {
    assert_ne!(RunId::new(), RunId::new());
  }
}
