use std::path::PathBuf;
use std::time::Duration;

/// Per-cell timeout used when none is configured.
pub const DEFAULT_CELL_TIMEOUT: Duration = Duration::from_secs(600);

/// Execution metadata handed to an engine for one notebook run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExecutionContext {
  /// Directory the notebook's relative paths resolve against.
  pub working_dir: PathBuf,
  /// Upper bound on the execution of a single cell.
  pub timeout: Duration,
  /// Config/credentials file for this run, if any.
  pub config_path: Option<PathBuf>,
  /// Environment variable name that carries `config_path`.
  pub config_env_key: String,
}

impl ExecutionContext {
  pub fn new(working_dir: impl Into<PathBuf>) -> Self {
    Self {
      working_dir: working_dir.into(),
      timeout: DEFAULT_CELL_TIMEOUT,
      config_path: None,
      config_env_key: String::new(),
    }
  }

  pub fn with_timeout(mut self, timeout: Duration) -> Self {
    self.timeout = timeout;
    self
  }

  pub fn with_config(mut self, env_key: impl Into<String>, path: impl Into<PathBuf>) -> Self {
    self.config_env_key = env_key.into();
    self.config_path = Some(path.into());
    self
  }

  /// The `(key, value)` pair engines should expose to cell code, if configured.
  pub fn config_env(&self) -> Option<(&str, &PathBuf)> {
    match &self.config_path {
      Some(path) if !self.config_env_key.is_empty() => Some((self.config_env_key.as_str(), path)),
      _ => None,
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_defaults() {
    let ctx = ExecutionContext::new("/nb");
    assert_eq!(ctx.timeout, DEFAULT_CELL_TIMEOUT);
    assert_eq!(ctx.config_env(), None);
  }

  #[test]
  fn test_config_env() {
    let ctx = ExecutionContext::new("/nb").with_config("DS_CONFIG_FILE", "/creds.yaml");
    let (key, path) = ctx.config_env().unwrap();
    assert_eq!(key, "DS_CONFIG_FILE");
    assert_eq!(path, &PathBuf::from("/creds.yaml"));
  }
}
