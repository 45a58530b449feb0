use std::collections::HashMap;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::error::SettingsError;

/// Somewhere settings values can be looked up by variable name.
pub trait EnvSource {
  fn get(&self, key: &str) -> Option<String>;
}

/// The current process environment.
#[derive(Debug, Clone, Copy, Default)]
pub struct ProcessEnv;

impl EnvSource for ProcessEnv {
  fn get(&self, key: &str) -> Option<String> {
    std::env::var(key).ok()
  }
}

impl EnvSource for HashMap<String, String> {
  fn get(&self, key: &str) -> Option<String> {
    HashMap::get(self, key).cloned()
  }
}

const ENV_FILE_NAME: &str = ".env";

/// Process environment layered over the values of a `.env` file.
///
/// Process variables win; the file only fills gaps. The file is read into
/// memory and never exported into the process environment.
#[derive(Debug, Clone, Default)]
pub struct DotenvSource {
  path: Option<PathBuf>,
  values: HashMap<String, String>,
}

impl DotenvSource {
  /// Look for a `.env` file in the current directory and its ancestors.
  /// Finding none is not an error.
  pub fn discover() -> Result<Self, SettingsError> {
    let cwd = std::env::current_dir().map_err(SettingsError::WorkingDir)?;
    Self::discover_from(&cwd)
  }

  /// Like [`discover`](Self::discover), starting the search at `dir`. The
  /// nearest file wins.
  pub fn discover_from(dir: &Path) -> Result<Self, SettingsError> {
    let Some(path) = dir
      .ancestors()
      .map(|d| d.join(ENV_FILE_NAME))
      .find(|candidate| candidate.is_file())
    else {
      debug!(start = %dir.display(), "no .env file found");
      return Ok(Self::default());
    };

    let env = Self::from_path(&path)?;
    debug!(path = %path.display(), vars = env.values.len(), "loaded .env file");
    Ok(env)
  }

  /// Load a specific env file.
  pub fn from_path(path: impl AsRef<Path>) -> Result<Self, SettingsError> {
    let path = path.as_ref();
    let env_err = |source| SettingsError::EnvFile {
      path: path.to_path_buf(),
      source,
    };

    let values = dotenvy::from_path_iter(path)
      .map_err(env_err)?
      .collect::<Result<HashMap<_, _>, _>>()
      .map_err(env_err)?;

    Ok(Self {
      path: Some(path.to_path_buf()),
      values,
    })
  }

  pub fn path(&self) -> Option<&Path> {
    self.path.as_deref()
  }
}

impl EnvSource for DotenvSource {
  fn get(&self, key: &str) -> Option<String> {
    ProcessEnv
      .get(key)
      .or_else(|| self.values.get(key).cloned())
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_from_path_reads_values() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join(".env");
    std::fs::write(&path, "NBRUNNER_DOTENV_ONLY_KEY=from-file\n").unwrap();

    let env = DotenvSource::from_path(&path).unwrap();
    assert_eq!(env.path(), Some(path.as_path()));
    assert_eq!(env.get("NBRUNNER_DOTENV_ONLY_KEY").as_deref(), Some("from-file"));
    assert_eq!(env.get("NBRUNNER_DOTENV_UNSET_KEY"), None);
  }

  #[test]
  fn test_process_env_wins() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join(".env");
    // PATH is always set in the test process
    std::fs::write(&path, "PATH=from-file\n").unwrap();

    let env = DotenvSource::from_path(&path).unwrap();
    assert_ne!(env.get("PATH").as_deref(), Some("from-file"));
  }

  #[test]
  fn test_discover_walks_up_to_nearest_file() {
    let dir = tempfile::tempdir().unwrap();
    let nested = dir.path().join("project").join("notebooks");
    std::fs::create_dir_all(&nested).unwrap();
    let outer = dir.path().join(".env");
    let inner = dir.path().join("project").join(".env");
    std::fs::write(&outer, "NBRUNNER_DOTENV_WALK_KEY=outer\n").unwrap();
    std::fs::write(&inner, "NBRUNNER_DOTENV_WALK_KEY=inner\n").unwrap();

    let env = DotenvSource::discover_from(&nested).unwrap();
    assert_eq!(env.path(), Some(inner.as_path()));
    assert_eq!(env.get("NBRUNNER_DOTENV_WALK_KEY").as_deref(), Some("inner"));
  }

  #[test]
  fn test_discover_reports_found_path_on_parse_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join(".env");
    std::fs::write(&path, "NOT A VALID LINE\n").unwrap();

    match DotenvSource::discover_from(dir.path()).unwrap_err() {
      SettingsError::EnvFile { path: reported, .. } => assert_eq!(reported, path),
      other => panic!("expected an env file error, got {other:?}"),
    }
  }

  #[test]
  fn test_missing_file() {
    let dir = tempfile::tempdir().unwrap();
    let err = DotenvSource::from_path(dir.path().join("nope.env")).unwrap_err();
    assert!(matches!(err, SettingsError::EnvFile { .. }));
  }
}
