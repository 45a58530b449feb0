use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::run::RunSpec;

/// An ordered batch of notebook runs.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BatchConfig {
  pub runs: Vec<RunSpec>,
}

impl BatchConfig {
  /// Read a batch config from disk. Paths ending in `.json` are parsed as JSON,
  /// everything else as YAML. Paths inside are returned as written.
  pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
    let path = path.as_ref();
    let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
      path: path.to_path_buf(),
      source,
    })?;

    let is_json = path
      .extension()
      .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));

    let parsed = if is_json {
      serde_json::from_str(&content).map_err(|e| e.to_string())
    } else {
      serde_yaml::from_str(&content).map_err(|e| e.to_string())
    };

    parsed.map_err(|message| ConfigError::Parse {
      path: path.to_path_buf(),
      message,
    })
  }

  /// Read a batch config and resolve every path against the current working directory.
  pub fn load_resolved(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
    let cwd = std::env::current_dir().map_err(ConfigError::WorkingDir)?;
    Ok(Self::load(path)?.resolve(&cwd))
  }

  /// Make every run's paths absolute against `base`.
  pub fn resolve(self, base: &Path) -> Self {
    Self {
      runs: self.runs.into_iter().map(|run| run.resolve(base)).collect(),
    }
  }

  pub fn len(&self) -> usize {
    self.runs.len()
  }

  pub fn is_empty(&self) -> bool {
    self.runs.is_empty()
  }
}
