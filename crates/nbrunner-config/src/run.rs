use std::fmt;
use std::path::{Component, Path, PathBuf};

use serde::{Deserialize, Serialize};

/// A single declared unit of work: a notebook and the config file it runs with.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunSpec {
  /// Location of the notebook document.
  pub path: PathBuf,

  /// Location of the config/credentials file exposed to the notebook.
  #[serde(rename = "ds_config")]
  pub config_path: PathBuf,
}

impl RunSpec {
  pub fn new(path: impl Into<PathBuf>, config_path: impl Into<PathBuf>) -> Self {
    Self {
      path: path.into(),
      config_path: config_path.into(),
    }
  }

  /// Make both paths absolute against `base` and fold away `.` and `..`.
  ///
  /// Normalization is lexical; symlinks are not followed, and the files do
  /// not have to exist yet.
  pub fn resolve(self, base: &Path) -> Self {
    Self {
      path: normalize(&base.join(self.path)),
      config_path: normalize(&base.join(self.config_path)),
    }
  }
}

fn normalize(path: &Path) -> PathBuf {
  let mut normalized = PathBuf::new();
  for component in path.components() {
    match component {
      Component::CurDir => {}
      Component::ParentDir => {
        let last = normalized.components().next_back();
        match last {
          Some(Component::Normal(_)) => {
            normalized.pop();
          }
          // `..` at the root stays at the root
          Some(Component::RootDir | Component::Prefix(_)) => {}
          _ => normalized.push(component),
        }
      }
      other => normalized.push(other),
    }
  }
  normalized
}

impl fmt::Display for RunSpec {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(
      f,
      "{{path: {}, ds_config: {}}}",
      self.path.display(),
      self.config_path.display()
    )
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_resolve_relative_paths() {
    let spec = RunSpec::new("nb/a.ipynb", "creds/a.yaml").resolve(Path::new("/work"));
    assert_eq!(spec.path, PathBuf::from("/work/nb/a.ipynb"));
    assert_eq!(spec.config_path, PathBuf::from("/work/creds/a.yaml"));
  }

  #[test]
  fn test_resolve_keeps_absolute_paths() {
    let spec = RunSpec::new("/abs/a.ipynb", "creds/a.yaml").resolve(Path::new("/work"));
    assert_eq!(spec.path, PathBuf::from("/abs/a.ipynb"));
  }

  #[test]
  fn test_resolve_folds_dot_segments() {
    let spec = RunSpec::new("../nb/./a.ipynb", "./creds/../b.yaml").resolve(Path::new("/work/batch"));
    assert_eq!(spec.path, PathBuf::from("/work/nb/a.ipynb"));
    assert_eq!(spec.config_path, PathBuf::from("/work/batch/b.yaml"));
    assert_eq!(spec.to_string(), "{path: /work/nb/a.ipynb, ds_config: /work/batch/b.yaml}");
  }

  #[test]
  fn test_normalize_stops_at_root() {
    assert_eq!(normalize(Path::new("/../../a.yaml")), PathBuf::from("/a.yaml"));
  }

  #[test]
  fn test_normalize_keeps_leading_parent_of_relative_path() {
    assert_eq!(normalize(Path::new("../../a/../b")), PathBuf::from("../../b"));
  }

  #[test]
  fn test_display() {
    let spec = RunSpec::new("a.ipynb", "a.yaml");
    assert_eq!(spec.to_string(), "{path: a.ipynb, ds_config: a.yaml}");
  }
}
